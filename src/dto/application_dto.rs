use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::JobApplication;
use crate::models::assignment::JobAssignment;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApplicationPayload {
    pub job_id: Uuid,
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
    pub expected_rate: Option<Decimal>,
    #[validate(url)]
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateApplicationStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobScopedQuery {
    pub job_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationStatusResponse {
    pub application: JobApplication,
    /// Present when the update accepted the application.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<JobAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentPayload {
    pub application_id: Uuid,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompleteAssignmentPayload {
    pub end_date: Option<DateTime<Utc>>,
}
