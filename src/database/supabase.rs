//! Supabase (PostgREST) implementation of [`GoalRepository`]
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use super::{Goal, GoalRepository, RepositoryError, UserProfile};

const GOALS_TABLE: &str = "goals";
const PROFILES_TABLE: &str = "profiles";

/// Shared HTTP client against the project's REST endpoint
#[derive(Clone)]
pub struct SupabaseRepository {
    client: reqwest::Client,
    rest_url: String,
}

impl SupabaseRepository {
    pub fn new(project_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| anyhow::anyhow!("SUPABASE_KEY contains invalid header characters"))?;
        headers.insert("apikey", key);
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| anyhow::anyhow!("SUPABASE_KEY contains invalid header characters"))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("goal-reminders/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
        })
    }

    /// Raw JSON rows. Only a non-array body is a decode error here.
    async fn select(
        &self,
        table: &'static str,
        filters: &[(&str, String)],
    ) -> Result<Vec<Value>, RepositoryError> {
        let url = format!("{}/{table}", self.rest_url);
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters.iter().cloned());

        debug!("Querying {table} with {query:?}");

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RepositoryError::Status {
                table,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| RepositoryError::Decode { table, source })
    }
}

/// Decode each row on its own, dropping the ones that don't fit `T`
fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value(row) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    warn!("⚠️ Skipping malformed {table} row (id: {id}): {e}");
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl GoalRepository for SupabaseRepository {
    async fn fetch_incomplete_goals(&self) -> Result<Vec<Goal>, RepositoryError> {
        let rows = self
            .select(GOALS_TABLE, &[("is_completed", "eq.false".to_string())])
            .await?;
        Ok(decode_rows(GOALS_TABLE, rows))
    }

    async fn fetch_profile_by_user_id(&self, user_id: &str) -> Result<UserProfile, RepositoryError> {
        let rows = self
            .select(
                PROFILES_TABLE,
                &[
                    ("user_id", format!("eq.{user_id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::NotFound {
                table: PROFILES_TABLE,
                key: format!("user_id={user_id}"),
            })?;

        serde_json::from_value(row).map_err(|source| RepositoryError::Decode {
            table: PROFILES_TABLE,
            source,
        })
    }
}
