use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job::{Job, NewJob, PaymentType};
use crate::models::jobsite::{JobsiteUpdate, NewJobsite};
use crate::services::job_service::JobList;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobsitePayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateJobsitePayload {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

/// Body for both creating and fully replacing a job posting.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobPayload {
    pub jobsite_id: Uuid,
    pub job_type_id: Uuid,
    pub experience_level_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
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
    #[serde(default)]
    pub license_ids: Vec<Uuid>,
    #[serde(default)]
    pub skill_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateJobStatusPayload {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
    pub job_type_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub items: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl CreateJobsitePayload {
    pub fn into_new(self, builder_profile_id: Uuid) -> NewJobsite {
        NewJobsite {
            builder_profile_id,
            name: self.name,
            address: self.address,
            suburb: self.suburb,
            state: self.state,
            postcode: self.postcode,
            latitude: self.latitude,
            longitude: self.longitude,
            notes: self.notes,
        }
    }
}

impl From<UpdateJobsitePayload> for JobsiteUpdate {
    fn from(value: UpdateJobsitePayload) -> Self {
        Self {
            name: value.name,
            address: value.address,
            suburb: value.suburb,
            state: value.state,
            postcode: value.postcode,
            latitude: value.latitude,
            longitude: value.longitude,
            notes: value.notes,
        }
    }
}

impl JobPayload {
    pub fn into_new(self, builder_profile_id: Uuid) -> NewJob {
        NewJob {
            builder_profile_id,
            jobsite_id: self.jobsite_id,
            job_type_id: self.job_type_id,
            experience_level_id: self.experience_level_id,
            title: self.title,
            description: self.description,
            number_of_labourers: self.number_of_labourers,
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            pay_rate: self.pay_rate,
            payment_type: self.payment_type,
            payment_day: self.payment_day,
            license_ids: self.license_ids,
            skill_ids: self.skill_ids,
        }
    }
}

impl From<JobList> for JobListResponse {
    fn from(value: JobList) -> Self {
        Self {
            items: value.items,
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}
