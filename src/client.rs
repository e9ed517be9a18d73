//! HTTP client for the assistant endpoint
//!
//! Mirrors what the browser front-end does around its single HTTP call:
//! record the guest turn, send it with the earlier turns, record the reply,
//! and fall back to an apology when the call fails.

use std::time::Duration;

use crate::api::assistant::{AssistantRequest, AssistantResponse};
use crate::transcript::Transcript;
use crate::{Error, Result};

/// Reply recorded when the assistant cannot be reached
pub const APOLOGY: &str =
    "I apologize, but I'm having trouble processing that. Could you please repeat?";

/// Client for a running concierge gateway
pub struct ConciergeClient {
    http: reqwest::Client,
    endpoint: String,
    bearer: Option<String>,
    transcript: Transcript,
}

impl ConciergeClient {
    /// Create a client for the given assistant endpoint URL
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created
    pub fn new(endpoint: impl Into<String>, bearer: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            bearer,
            transcript: Transcript::new(),
        })
    }

    /// Use an existing transcript (and its session id)
    #[must_use]
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    /// The running transcript
    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Send one utterance without touching the transcript
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status
    pub async fn ask(&self, text: &str) -> Result<AssistantResponse> {
        let body = AssistantRequest {
            user_message: Some(text.to_string()),
            session_id: Some(self.transcript.session_id().to_string()),
            conversation_history: Some(self.transcript.history()),
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Client(format!("{} returned {status}", self.endpoint)));
        }

        Ok(response.json().await?)
    }

    /// Send an utterance as the next turn of the conversation
    ///
    /// Blank input is ignored and returns `None`. Otherwise the reply (or the
    /// apology, if the request failed) is appended to the transcript and returned.
    pub async fn send(&mut self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }

        // History covers the turns before this one
        let result = self.ask(text).await;
        self.transcript.push_user(text);

        let reply = match result {
            Ok(response) => response.response,
            Err(e) => {
                tracing::error!(error = %e, "error processing message");
                APOLOGY.to_string()
            }
        };

        self.transcript.push_bot(reply.clone());
        Some(reply)
    }
}
