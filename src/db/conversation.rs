//! Conversation log repository

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DbPool;
use crate::concierge::Intent;
use crate::{Error, Result};

/// Extra facts stored alongside each exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMetadata {
    pub timestamp: DateTime<Utc>,
    /// Length of the utterance in Unicode scalar values
    pub message_length: usize,
    pub intent: String,
    /// Number of earlier turns the client sent with the request
    #[serde(default)]
    pub history_length: usize,
}

impl ConversationMetadata {
    /// Metadata for an utterance answered now
    #[must_use]
    pub fn new(user_message: &str, intent: &Intent, history_length: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            message_length: user_message.chars().count(),
            intent: intent.label().to_string(),
            history_length,
        }
    }
}

/// A logged exchange
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: String,
    pub session_id: String,
    pub user_message: String,
    pub bot_response: String,
    pub intent: String,
    pub metadata: Option<ConversationMetadata>,
    pub created_at: DateTime<Utc>,
}

/// Per-session rollup of the log
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub session_id: String,
    pub turns: usize,
    pub first_at: DateTime<Utc>,
    pub last_at: DateTime<Utc>,
}

/// Conversation repository
#[derive(Clone)]
pub struct ConversationRepo {
    pool: DbPool,
}

impl ConversationRepo {
    /// Create a new conversation repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append an exchange to the log
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn record(
        &self,
        session_id: &str,
        user_message: &str,
        bot_response: &str,
        metadata: &ConversationMetadata,
    ) -> Result<Conversation> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let metadata_json = serde_json::to_string(metadata)?;

        conn.execute(
            "INSERT INTO conversations (id, session_id, user_message, bot_response, intent, metadata, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                &id,
                session_id,
                user_message,
                bot_response,
                &metadata.intent,
                &metadata_json,
                now.to_rfc3339_opts(SecondsFormat::Millis, true),
            ],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(Conversation {
            id,
            session_id: session_id.to_string(),
            user_message: user_message.to_string(),
            bot_response: bot_response.to_string(),
            intent: metadata.intent.clone(),
            metadata: Some(metadata.clone()),
            created_at: now,
        })
    }

    /// Get the most recent exchanges for a session, oldest first
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn list_for_session(&self, session_id: &str, limit: usize) -> Result<Vec<Conversation>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, session_id, user_message, bot_response, intent, metadata, created_at
                 FROM conversations WHERE session_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        #[allow(clippy::cast_possible_wrap)]
        let conversations = stmt
            .query_map(rusqlite::params![session_id, limit as i64], |row| {
                Ok(Conversation {
                    id: row.get(0)?,
                    session_id: row.get(1)?,
                    user_message: row.get(2)?,
                    bot_response: row.get(3)?,
                    intent: row.get(4)?,
                    metadata: serde_json::from_str(&row.get::<_, String>(5)?).ok(),
                    created_at: parse_datetime(&row.get::<_, String>(6)?),
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .filter_map(std::result::Result::ok)
            .collect::<Vec<_>>();

        // Reverse to get chronological order
        Ok(conversations.into_iter().rev().collect())
    }

    /// Summarize every session in the log, most recently active first
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT session_id, COUNT(*), MIN(created_at), MAX(created_at)
                 FROM conversations
                 GROUP BY session_id
                 ORDER BY MAX(created_at) DESC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let sessions = stmt
            .query_map([], |row| {
                Ok(SessionSummary {
                    session_id: row.get(0)?,
                    turns: usize::try_from(row.get::<_, i64>(1)?).unwrap_or(0),
                    first_at: parse_datetime(&row.get::<_, String>(2)?),
                    last_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .filter_map(std::result::Result::ok)
            .collect();

        Ok(sessions)
    }

    /// Count all logged exchanges
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn count(&self) -> Result<usize> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM conversations", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Remove every exchange tagged with a session, returning how many were removed
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn delete_session(&self, session_id: &str) -> Result<usize> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        conn.execute("DELETE FROM conversations WHERE session_id = ?1", [session_id])
            .map_err(|e| Error::Database(e.to_string()))
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory;

    fn setup() -> ConversationRepo {
        ConversationRepo::new(init_memory().unwrap())
    }

    fn record(repo: &ConversationRepo, session: &str, text: &str, reply: &str) -> Conversation {
        let metadata = ConversationMetadata::new(text, &Intent::Greeting, 0);
        repo.record(session, text, reply, &metadata).unwrap()
    }

    #[test]
    fn test_record_and_list() {
        let repo = setup();

        record(&repo, "session-1", "Hello", "Welcome!");
        record(&repo, "session-1", "Thanks", "My pleasure!");
        record(&repo, "session-2", "Hi", "Hello!");

        let turns = repo.list_for_session("session-1", 10).unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].user_message, "Hello");
        assert_eq!(turns[1].bot_response, "My pleasure!");
        assert_eq!(turns[0].intent, "greeting");

        assert_eq!(repo.count().unwrap(), 3);
    }

    #[test]
    fn test_list_limit_keeps_latest() {
        let repo = setup();

        for i in 0..5 {
            record(&repo, "s", &format!("message {i}"), "ok");
        }

        let turns = repo.list_for_session("s", 2).unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].user_message, "message 3");
        assert_eq!(turns[1].user_message, "message 4");
    }

    #[test]
    fn test_metadata_stored() {
        let repo = setup();
        let metadata = ConversationMetadata::new("Café?", &Intent::Dining, 4);
        repo.record("s", "Café?", "Breakfast...", &metadata).unwrap();

        let stored = repo.list_for_session("s", 1).unwrap().remove(0);
        let stored_meta = stored.metadata.unwrap();
        assert_eq!(stored_meta.message_length, 5);
        assert_eq!(stored_meta.history_length, 4);
        assert_eq!(stored_meta.intent, "dining");
        assert_eq!(stored.intent, "dining");
    }

    #[test]
    fn test_metadata_json_is_camel_case() {
        let metadata = ConversationMetadata::new("hey", &Intent::Greeting, 2);
        let json = serde_json::to_value(&metadata).unwrap();

        assert_eq!(json["messageLength"], 3);
        assert_eq!(json["historyLength"], 2);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_list_sessions() {
        let repo = setup();

        record(&repo, "older", "Hello", "Welcome!");
        record(&repo, "older", "Bye", "Goodbye!");
        record(&repo, "newer", "Hi", "Hello!");

        let sessions = repo.list_sessions().unwrap();
        assert_eq!(sessions.len(), 2);

        let older = sessions.iter().find(|s| s.session_id == "older").unwrap();
        assert_eq!(older.turns, 2);
        assert!(older.first_at <= older.last_at);
    }

    #[test]
    fn test_delete_session() {
        let repo = setup();

        record(&repo, "keep", "Hello", "Welcome!");
        record(&repo, "purge", "Hi", "Hello!");
        record(&repo, "purge", "Bye", "Goodbye!");

        assert_eq!(repo.delete_session("purge").unwrap(), 2);
        assert_eq!(repo.delete_session("purge").unwrap(), 0);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_unknown_session_is_empty() {
        let repo = setup();
        assert!(repo.list_for_session("missing", 10).unwrap().is_empty());
    }
}
