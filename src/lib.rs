//! Concierge Gateway - voice concierge backend for a hotel front desk
//!
//! This library provides the pieces behind a browser voice chat:
//! - Keyword intent matching over a canned response set
//! - An append-only conversation log tagged by client session
//! - The HTTP endpoint the browser calls once per utterance
//! - A text client that keeps the transcript the way the browser does
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │      Browser (speech capture / playback)    │
//! └──────────────────────┬──────────────────────┘
//!                        │ POST /api/assistant
//! ┌──────────────────────▼──────────────────────┐
//! │               Concierge Gateway             │
//! │   api  │  concierge (rules)  │  db (log)    │
//! └─────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod client;
pub mod concierge;
pub mod config;
pub mod db;
pub mod error;
pub mod transcript;

pub use api::{ApiServer, ApiServerBuilder, ApiState};
pub use client::ConciergeClient;
pub use concierge::{Concierge, CustomRule, HotelProfile, Intent, Reply};
pub use config::Config;
pub use db::{ConversationRepo, DbPool};
pub use error::{Error, Result};
pub use transcript::{Role, Transcript};
