use crate::config::Config;
use crate::errors::AppError;
use crate::lms_models::{EnrollmentPage, FinalGradeValue, OrgUnitInfo};
use crate::models::Enrollment;
use async_trait::async_trait;
use url::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Name shown for a course whose org unit lookup failed.
pub const COURSE_NAME_FALLBACK: &str = "N/A";

/// The three LMS lookups a grade cycle needs.
///
/// Only the enrollment listing reports failures. Per-course lookups degrade:
/// a failed grade lookup is `None`, a failed name lookup is
/// [`COURSE_NAME_FALLBACK`].
#[async_trait]
pub trait GradeSource: Send + Sync {
    /// Lists the org units `user_id` is enrolled in.
    async fn list_enrollments(&self, user_id: &str) -> Result<Vec<Enrollment>, AppError>;

    /// Final grade of `user_id` in `org_unit_id`, or `None` if it could not be fetched.
    async fn fetch_grade(&self, org_unit_id: i64, user_id: &str) -> Option<FinalGradeValue>;

    /// Display name of `org_unit_id`.
    async fn fetch_course_name(&self, org_unit_id: i64) -> String;
}

/// Rejects blank ids before anything goes over the wire.
///
/// `.` and `..` are rejected too: URL path building drops them as dot
/// segments instead of encoding them.
pub fn validate_user_id(user_id: &str) -> Result<&str, AppError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(AppError::ValidationError(
            "Please enter a valid User ID.".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Client for the Brightspace/D2L REST API.
///
/// Every request carries the externally supplied bearer token. There are no
/// retries, and no timeout unless `LMS_TIMEOUT_SECS` is set.
#[derive(Clone)]
pub struct LmsClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    lp_version: String,
    le_version: String,
}

impl LmsClient {
    /// Creates a new `LmsClient` from the application configuration.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.lms_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            AppError::InternalError(format!("Failed to create LMS client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: config.lms_base_url.clone(),
            token: config.lms_token.clone(),
            lp_version: config.lp_version.clone(),
            le_version: config.le_version.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends percent-encoded `segments` to the configured API root.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::InternalError(format!("Invalid LMS base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                AppError::InternalError(format!(
                    "LMS base URL '{}' cannot take a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn enrollments_url(&self, user_id: &str) -> Result<Url, AppError> {
        // Trailing empty segment keeps the trailing slash the route expects
        self.endpoint(&[
            "lp",
            self.lp_version.as_str(),
            "enrollments",
            "users",
            user_id,
            "orgunits",
            "",
        ])
    }

    pub fn final_grade_url(&self, org_unit_id: i64, user_id: &str) -> Result<Url, AppError> {
        let org_unit = org_unit_id.to_string();
        self.endpoint(&[
            "le",
            self.le_version.as_str(),
            org_unit.as_str(),
            "grades",
            "final",
            "values",
            user_id,
        ])
    }

    pub fn org_unit_url(&self, org_unit_id: i64) -> Result<Url, AppError> {
        let org_unit = org_unit_id.to_string();
        self.endpoint(&["lp", self.lp_version.as_str(), "orgstructure", org_unit.as_str()])
    }

    /// Issues an authenticated GET and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AppError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::NetworkError(format!(
                "LMS returned {} for {}: {}",
                status,
                url.path(),
                error_text
            )));
        }

        response.json().await.map_err(|e| {
            AppError::NetworkError(format!("Failed to parse LMS response: {}", e))
        })
    }
}

#[async_trait]
impl GradeSource for LmsClient {
    async fn list_enrollments(&self, user_id: &str) -> Result<Vec<Enrollment>, AppError> {
        let user_id = validate_user_id(user_id)?;
        let url = self.enrollments_url(user_id)?;
        tracing::info!("Listing enrollments for user {}", user_id);

        let page: EnrollmentPage = self.get_json(url).await?;
        let enrollments: Vec<Enrollment> = page
            .items
            .into_iter()
            .map(|item| Enrollment {
                org_unit_id: item.org_unit.id,
            })
            .collect();

        tracing::info!(
            "User {} is enrolled in {} org unit(s)",
            user_id,
            enrollments.len()
        );
        Ok(enrollments)
    }

    async fn fetch_grade(&self, org_unit_id: i64, user_id: &str) -> Option<FinalGradeValue> {
        let result = match self.final_grade_url(org_unit_id, user_id) {
            Ok(url) => self.get_json::<FinalGradeValue>(url).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(grade) => Some(grade),
            Err(e) => {
                tracing::warn!("Error fetching grades for org unit {}: {}", org_unit_id, e);
                None
            }
        }
    }

    async fn fetch_course_name(&self, org_unit_id: i64) -> String {
        let result = match self.org_unit_url(org_unit_id) {
            Ok(url) => self.get_json::<OrgUnitInfo>(url).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(info) => info
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| COURSE_NAME_FALLBACK.to_string()),
            Err(e) => {
                tracing::warn!(
                    "Error fetching course name for org unit {}: {}",
                    org_unit_id,
                    e
                );
                COURSE_NAME_FALLBACK.to_string()
            }
        }
    }
}
