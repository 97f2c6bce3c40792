use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Hourly,
    Daily,
    Weekly,
    FixedDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Open,
    Filled,
    Closed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "OPEN",
            JobStatus::Filled => "FILLED",
            JobStatus::Closed => "CLOSED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(JobStatus::Open),
            "FILLED" => Ok(JobStatus::Filled),
            "CLOSED" => Ok(JobStatus::Closed),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            other => Err(format!("invalid job status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub builder_profile_id: Uuid,
    pub jobsite_id: Uuid,
    pub job_type_id: Uuid,
    pub experience_level_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub number_of_labourers: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub pay_rate: Decimal,
    pub payment_type: PaymentType,
    pub payment_day: Option<i32>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDetails {
    #[serde(flatten)]
    pub job: Job,
    pub license_ids: Vec<Uuid>,
    pub skill_ids: Vec<Uuid>,
}

/// Column values for an insert or a full replace of a job posting.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub builder_profile_id: Uuid,
    pub jobsite_id: Uuid,
    pub job_type_id: Uuid,
    pub experience_level_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub number_of_labourers: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub pay_rate: Decimal,
    pub payment_type: PaymentType,
    pub payment_day: Option<i32>,
    pub license_ids: Vec<Uuid>,
    pub skill_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub job_type_id: Option<Uuid>,
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
