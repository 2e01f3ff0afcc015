// src/services/profile_store.rs
use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::profile::{
    AttendanceRecord, Enrollment, FeeRecord, MarkRecord, ProfileContext, StudentProfile,
};

/// Resolves a caller token to that caller's records.
///
/// `Ok(None)` means the token did not map to a student profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self, token: &str) -> Result<Option<ProfileContext>>;
}

#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    by_token: HashMap<String, ProfileContext>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, token: impl Into<String>, ctx: ProfileContext) -> Self {
        self.by_token.insert(token.into(), ctx);
        self
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, token: &str) -> Result<Option<ProfileContext>> {
        Ok(self.by_token.get(token).cloned())
    }
}

/// Supabase-style managed store: an auth endpoint for token lookup and a
/// PostgREST endpoint for the tables.
#[derive(Debug, Clone)]
pub struct RestProfileStore {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

impl RestProfileStore {
    pub fn new(http: reqwest::Client, base_url: &str, service_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    async fn user_id(&self, token: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await
            .context("auth lookup failed")?;

        if !response.status().is_success() {
            tracing::debug!(status = response.status().as_u16(), "token not recognised");
            return Ok(None);
        }

        let user: AuthUser = response.json().await.context("invalid auth user payload")?;
        Ok(Some(user.id))
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let rows = self
            .http
            .get(format!("{}/rest/v1/{table}", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .query(query)
            .send()
            .await
            .with_context(|| format!("query on {table} failed"))?
            .error_for_status()
            .with_context(|| format!("query on {table} rejected"))?
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("invalid rows from {table}"))?;
        Ok(rows)
    }
}

#[async_trait]
impl ProfileStore for RestProfileStore {
    async fn load(&self, token: &str) -> Result<Option<ProfileContext>> {
        let Some(user_id) = self.user_id(token).await? else {
            return Ok(None);
        };

        let user_filter = format!("eq.{user_id}");
        let profile: Option<StudentProfile> = self
            .select("profiles", &[("select", "*"), ("user_id", user_filter.as_str()), ("limit", "1")])
            .await?
            .into_iter()
            .next();
        let Some(profile) = profile else {
            return Ok(None);
        };

        let student = format!("eq.{}", profile.id);
        let student = student.as_str();
        let enrollment_query = [("select", "*,courses(name,code,credits)"), ("student_id", student)];
        let marks_query = [("select", "*,courses(name,code)"), ("student_id", student)];
        let fees_query = [("select", "*"), ("student_id", student), ("limit", "1")];
        let attendance_query = [
            ("select", "*,courses(name)"),
            ("student_id", student),
            ("order", "date.desc"),
            ("limit", "10"),
        ];

        let (enrollments, marks, fees, attendance) = tokio::try_join!(
            self.select::<Enrollment>("enrollments", &enrollment_query),
            self.select::<MarkRecord>("marks", &marks_query),
            self.select::<FeeRecord>("fees", &fees_query),
            self.select::<AttendanceRecord>("attendance_records", &attendance_query),
        )?;

        Ok(Some(ProfileContext {
            profile,
            enrollments,
            marks,
            attendance,
            fees: fees.into_iter().next(),
        }))
    }
}
