use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::application_dto::CreateAssignmentPayload;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::application::ApplicationStatus;
use crate::models::assignment::{AssignmentStatus, JobAssignment, NewAssignment};
use crate::models::user::UserRole;
use crate::repositories::{
    ApplicationRepository, AssignmentRepository, BuilderProfileRepository, JobRepository,
};
use crate::services::job_service::{builder_profile_for, ensure_job_owner};

#[derive(Clone)]
pub struct AssignmentService {
    assignments: Arc<dyn AssignmentRepository>,
    applications: Arc<dyn ApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    builder_profiles: Arc<dyn BuilderProfileRepository>,
}

impl AssignmentService {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        applications: Arc<dyn ApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        builder_profiles: Arc<dyn BuilderProfileRepository>,
    ) -> Self {
        Self {
            assignments,
            applications,
            jobs,
            builder_profiles,
        }
    }

    async fn ensure_builder_owns_job(&self, user_id: Uuid, job_id: Uuid) -> Result<()> {
        let job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        let profile = builder_profile_for(self.builder_profiles.as_ref(), user_id).await?;
        ensure_job_owner(&profile, &job.job)
    }

    async fn assignment(&self, id: Uuid) -> Result<JobAssignment> {
        self.assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Assignment not found".to_string()))
    }

    pub async fn create(
        &self,
        builder_user_id: Uuid,
        payload: CreateAssignmentPayload,
    ) -> Result<JobAssignment> {
        let application = self
            .applications
            .find_by_id(payload.application_id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        self.ensure_builder_owns_job(builder_user_id, application.job_id)
            .await?;

        if application.status != ApplicationStatus::Accepted {
            return Err(Error::BadRequest(
                "Application must be accepted before creating an assignment".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
            if start > end {
                return Err(Error::BadRequest(
                    "start date must be before or equal to end date".to_string(),
                ));
            }
        }

        let assignment = self
            .assignments
            .create(NewAssignment {
                job_id: application.job_id,
                labour_user_id: application.labour_user_id,
                application_id: application.id,
                start_date: payload.start_date,
                end_date: payload.end_date,
            })
            .await?
            .ok_or_else(|| {
                Error::Conflict("Assignment already exists for this application".to_string())
            })?;
        tracing::info!(assignment_id = %assignment.id, application_id = %application.id, "assignment created");
        Ok(assignment)
    }

    /// Marks the assignment COMPLETED. Only an already completed assignment is
    /// refused; `end_date` defaults to now.
    pub async fn complete(
        &self,
        builder_user_id: Uuid,
        id: Uuid,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<JobAssignment> {
        let assignment = self.assignment(id).await?;
        self.ensure_builder_owns_job(builder_user_id, assignment.job_id)
            .await?;
        if assignment.status == AssignmentStatus::Completed {
            return Err(Error::BadRequest(
                "Assignment already completed".to_string(),
            ));
        }

        let end_date = end_date.unwrap_or_else(Utc::now);
        let completed = self
            .assignments
            .set_status(id, AssignmentStatus::Completed, Some(end_date))
            .await?
            .ok_or_else(|| Error::NotFound("Assignment not found".to_string()))?;
        tracing::info!(assignment_id = %id, "assignment completed");
        Ok(completed)
    }

    pub async fn cancel(&self, builder_user_id: Uuid, id: Uuid) -> Result<JobAssignment> {
        let assignment = self.assignment(id).await?;
        self.ensure_builder_owns_job(builder_user_id, assignment.job_id)
            .await?;
        if assignment.status == AssignmentStatus::Cancelled {
            return Err(Error::BadRequest(
                "Assignment already cancelled".to_string(),
            ));
        }

        let cancelled = self
            .assignments
            .set_status(id, AssignmentStatus::Cancelled, None)
            .await?
            .ok_or_else(|| Error::NotFound("Assignment not found".to_string()))?;
        tracing::info!(assignment_id = %id, "assignment cancelled");
        Ok(cancelled)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<JobAssignment> {
        let assignment = self.assignment(id).await?;
        if assignment.labour_user_id != user_id {
            self.ensure_builder_owns_job(user_id, assignment.job_id)
                .await
                .map_err(|err| match err {
                    Error::NotFound(_) | Error::Forbidden(_) => {
                        Error::Forbidden("You do not have access to this assignment".to_string())
                    }
                    other => other,
                })?;
        }
        Ok(assignment)
    }

    /// Labour users see the work they hold; builders see assignments on
    /// their jobs.
    pub async fn list_mine(&self, claims: &Claims) -> Result<Vec<JobAssignment>> {
        let user_id = claims.user_id()?;
        match claims.role {
            UserRole::Labour => self.assignments.list_by_labour(user_id).await,
            UserRole::Builder => {
                let profile = builder_profile_for(self.builder_profiles.as_ref(), user_id).await?;
                self.assignments.list_by_builder(profile.id).await
            }
            UserRole::Admin => Err(Error::Forbidden(
                "Only builder or labour accounts have assignments".to_string(),
            )),
        }
    }

    pub async fn list_for_job(&self, builder_user_id: Uuid, job_id: Uuid) -> Result<Vec<JobAssignment>> {
        self.ensure_builder_owns_job(builder_user_id, job_id).await?;
        self.assignments.list_by_job(job_id).await
    }
}
