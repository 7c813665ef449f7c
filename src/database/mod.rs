//! # Goal Repository
//!
//! Typed read access to the hosted goal store. The worker only ever reads:
//! incomplete goals, and the profile that owns a goal.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod models;
pub mod supabase;

pub use models::{Goal, GoalId, UserProfile};
pub use supabase::SupabaseRepository;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no {table} row matching {key}")]
    NotFound { table: &'static str, key: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{table} query returned HTTP {status}: {body}")]
    Status {
        table: &'static str,
        status: u16,
        body: String,
    },

    #[error("could not decode {table} rows: {source}")]
    Decode {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

/// Read-only view of the goal store used by the reminder scheduler
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// All goals whose completion flag is false
    async fn fetch_incomplete_goals(&self) -> Result<Vec<Goal>, RepositoryError>;

    /// The single profile owned by `user_id`
    async fn fetch_profile_by_user_id(&self, user_id: &str) -> Result<UserProfile, RepositoryError>;
}
