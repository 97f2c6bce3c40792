use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::application_dto::{ApplicationStatusResponse, CreateApplicationPayload};
use crate::error::{Error, Result};
use crate::models::application::{ApplicationStatus, JobApplication, NewApplication};
use crate::models::job::JobDetails;
use crate::repositories::{ApplicationRepository, BuilderProfileRepository, JobRepository};
use crate::services::job_service::{builder_profile_for, ensure_job_owner};

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    builder_profiles: Arc<dyn BuilderProfileRepository>,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        builder_profiles: Arc<dyn BuilderProfileRepository>,
    ) -> Self {
        Self {
            applications,
            jobs,
            builder_profiles,
        }
    }

    async fn job(&self, job_id: Uuid) -> Result<JobDetails> {
        self.jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    async fn application(&self, id: Uuid) -> Result<JobApplication> {
        self.applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))
    }

    async fn ensure_builder_owns_job(&self, user_id: Uuid, job_id: Uuid) -> Result<()> {
        let job = self.job(job_id).await?;
        let profile = builder_profile_for(self.builder_profiles.as_ref(), user_id).await?;
        ensure_job_owner(&profile, &job.job)
    }

    /// One application per (job, labour user); a repeat is a 409 even when two
    /// requests race.
    pub async fn create(
        &self,
        labour_user_id: Uuid,
        payload: CreateApplicationPayload,
    ) -> Result<JobApplication> {
        self.job(payload.job_id).await?;

        let application = self
            .applications
            .create(NewApplication {
                job_id: payload.job_id,
                labour_user_id,
                cover_letter: payload.cover_letter,
                expected_rate: payload.expected_rate,
                resume_url: payload.resume_url,
            })
            .await?
            .ok_or_else(|| {
                Error::Conflict("Application already exists for this job".to_string())
            })?;

        tracing::info!(
            application_id = %application.id,
            job_id = %application.job_id,
            "application submitted"
        );
        Ok(application)
    }

    pub async fn withdraw(&self, labour_user_id: Uuid, id: Uuid) -> Result<JobApplication> {
        let application = self.application(id).await?;
        if application.labour_user_id != labour_user_id {
            return Err(Error::Forbidden(
                "Only the applicant can withdraw this application".to_string(),
            ));
        }
        if application.status == ApplicationStatus::Withdrawn {
            return Err(Error::BadRequest(
                "Application already withdrawn".to_string(),
            ));
        }

        let withdrawn = self
            .applications
            .withdraw(id, Utc::now())
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        tracing::info!(application_id = %id, "application withdrawn");
        Ok(withdrawn)
    }

    /// Builder-side status change. Any valid status may follow any other;
    /// ACCEPTED also makes sure an ACTIVE assignment exists.
    pub async fn update_status(
        &self,
        builder_user_id: Uuid,
        id: Uuid,
        raw_status: &str,
    ) -> Result<ApplicationStatusResponse> {
        let status: ApplicationStatus = raw_status
            .parse()
            .map_err(|_| Error::BadRequest("Invalid application status".to_string()))?;

        let application = self.application(id).await?;
        self.ensure_builder_owns_job(builder_user_id, application.job_id)
            .await?;

        let response = if status == ApplicationStatus::Accepted {
            let (application, assignment) = self
                .applications
                .accept(id)
                .await?
                .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
            tracing::info!(
                application_id = %id,
                assignment_id = %assignment.id,
                "application accepted"
            );
            ApplicationStatusResponse {
                application,
                assignment: Some(assignment),
            }
        } else {
            let application = self
                .applications
                .update_status(id, status)
                .await?
                .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
            tracing::info!(application_id = %id, status = %status, "application status updated");
            ApplicationStatusResponse {
                application,
                assignment: None,
            }
        };
        Ok(response)
    }

    /// Visible to the applicant and to the builder who owns the job.
    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<JobApplication> {
        let application = self.application(id).await?;
        if application.labour_user_id != user_id {
            self.ensure_builder_owns_job(user_id, application.job_id)
                .await
                .map_err(|err| match err {
                    Error::NotFound(_) | Error::Forbidden(_) => {
                        Error::Forbidden("You do not have access to this application".to_string())
                    }
                    other => other,
                })?;
        }
        Ok(application)
    }

    pub async fn list_for_job(&self, builder_user_id: Uuid, job_id: Uuid) -> Result<Vec<JobApplication>> {
        self.ensure_builder_owns_job(builder_user_id, job_id).await?;
        self.applications.list_by_job(job_id).await
    }

    pub async fn list_mine(&self, labour_user_id: Uuid) -> Result<Vec<JobApplication>> {
        self.applications.list_by_labour(labour_user_id).await
    }
}
