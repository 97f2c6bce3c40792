use std::sync::Arc;
use uuid::Uuid;

use crate::dto::job_dto::{JobListQuery, JobPayload};
use crate::error::{Error, Result};
use crate::models::builder_profile::BuilderProfile;
use crate::models::job::{Job, JobDetails, JobFilter, JobStatus};
use crate::repositories::{BuilderProfileRepository, JobRepository};
use crate::services::job_validation_service::JobValidationService;

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    builder_profiles: Arc<dyn BuilderProfileRepository>,
    validation: JobValidationService,
}

#[derive(Debug)]
pub struct JobList {
    pub items: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

pub(crate) async fn builder_profile_for(
    builder_profiles: &dyn BuilderProfileRepository,
    user_id: Uuid,
) -> Result<BuilderProfile> {
    builder_profiles
        .find_by_user_id(user_id)
        .await?
        .ok_or_else(|| Error::NotFound("builder profile not found".to_string()))
}

pub(crate) fn ensure_job_owner(profile: &BuilderProfile, job: &Job) -> Result<()> {
    if job.builder_profile_id != profile.id {
        return Err(Error::Forbidden("job does not belong to builder".to_string()));
    }
    Ok(())
}

impl JobService {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        builder_profiles: Arc<dyn BuilderProfileRepository>,
        validation: JobValidationService,
    ) -> Self {
        Self {
            jobs,
            builder_profiles,
            validation,
        }
    }

    pub async fn create(&self, user_id: Uuid, payload: JobPayload) -> Result<JobDetails> {
        let profile = self.validation.validate(user_id, &payload).await?;
        let job = self.jobs.create(payload.into_new(profile.id)).await?;
        tracing::info!(job_id = %job.job.id, builder_profile_id = %profile.id, "job created");
        Ok(job)
    }

    pub async fn get(&self, id: Uuid) -> Result<JobDetails> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    /// Public listing; without an explicit status only OPEN jobs are shown.
    pub async fn list(&self, query: JobListQuery) -> Result<JobList> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| Error::BadRequest("page is out of range".to_string()))?;

        let status = match query.status.as_deref() {
            Some(raw) => raw
                .parse::<JobStatus>()
                .map_err(|_| Error::BadRequest("Invalid job status".to_string()))?,
            None => JobStatus::Open,
        };
        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let (items, total) = self
            .jobs
            .list(JobFilter {
                status: Some(status),
                job_type_id: query.job_type_id,
                search,
                limit: per_page,
                offset,
            })
            .await?;

        let total_pages = ((total as f64) / (per_page as f64)).ceil() as i64;

        Ok(JobList {
            items,
            total,
            page,
            per_page,
            total_pages,
        })
    }

    pub async fn list_mine(&self, user_id: Uuid) -> Result<Vec<Job>> {
        let profile = builder_profile_for(self.builder_profiles.as_ref(), user_id).await?;
        self.jobs.list_by_builder(profile.id).await
    }

    async fn owned(&self, user_id: Uuid, id: Uuid) -> Result<(BuilderProfile, JobDetails)> {
        let job = self.get(id).await?;
        let profile = builder_profile_for(self.builder_profiles.as_ref(), user_id).await?;
        ensure_job_owner(&profile, &job.job)?;
        Ok((profile, job))
    }

    pub async fn replace(&self, user_id: Uuid, id: Uuid, payload: JobPayload) -> Result<JobDetails> {
        self.owned(user_id, id).await?;
        let profile = self.validation.validate(user_id, &payload).await?;
        let job = self
            .jobs
            .replace(id, payload.into_new(profile.id))
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        tracing::info!(job_id = %id, "job replaced");
        Ok(job)
    }

    pub async fn update_status(&self, user_id: Uuid, id: Uuid, raw_status: &str) -> Result<Job> {
        let status = raw_status
            .parse::<JobStatus>()
            .map_err(|_| Error::BadRequest("Invalid job status".to_string()))?;
        self.owned(user_id, id).await?;
        let job = self
            .jobs
            .update_status(id, status)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        tracing::info!(job_id = %id, status = status.as_str(), "job status updated");
        Ok(job)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.owned(user_id, id).await?;
        if !self.jobs.delete(id).await? {
            return Err(Error::NotFound("Job not found".to_string()));
        }
        tracing::info!(job_id = %id, "job deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockBuilderProfileRepository, MockJobRepository, MockJobsiteRepository};
    use crate::repositories::mocks::MockStore;
    use crate::services::master_data_service::MasterDataService;
    use chrono::Utc;

    fn service(jobs: MockJobRepository, profiles: MockBuilderProfileRepository) -> JobService {
        let store = Arc::new(MockStore::new());
        let validation = JobValidationService::new(
            store.clone(),
            Arc::new(MockJobsiteRepository::new()),
            MasterDataService::new(store),
        );
        JobService::new(Arc::new(jobs), Arc::new(profiles), validation)
    }

    fn profile(user_id: Uuid) -> BuilderProfile {
        BuilderProfile {
            id: Uuid::new_v4(),
            user_id,
            company_name: "Acme Build".to_string(),
            abn: None,
            contact_name: None,
            phone: None,
            address: None,
            suburb: None,
            state: None,
            postcode: None,
            website: None,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn list_defaults_to_open_jobs_and_clamps_paging() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_list()
            .withf(|f| f.status == Some(JobStatus::Open) && f.limit == 100 && f.offset == 100)
            .returning(|_| Ok((vec![], 250)));
        let svc = service(jobs, MockBuilderProfileRepository::new());

        let list = svc
            .list(JobListQuery {
                page: Some(2),
                per_page: Some(500),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(list.page, 2);
        assert_eq!(list.per_page, 100);
        assert_eq!(list.total_pages, 3);
    }

    #[tokio::test]
    async fn huge_page_number_is_a_bad_request() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_list().never();
        let svc = service(jobs, MockBuilderProfileRepository::new());

        let err = svc
            .list(JobListQuery {
                page: Some(i64::MAX),
                per_page: Some(100),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(msg) if msg == "page is out of range"));
    }

    #[tokio::test]
    async fn list_rejects_unknown_status() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_list().never();
        let svc = service(jobs, MockBuilderProfileRepository::new());

        let err = svc
            .list(JobListQuery {
                status: Some("open".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn get_missing_job_is_not_found() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id().returning(|_| Ok(None));
        let svc = service(jobs, MockBuilderProfileRepository::new());

        let err = svc.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(msg) if msg == "Job not found"));
    }

    #[tokio::test]
    async fn list_mine_requires_a_builder_profile() {
        let mut profiles = MockBuilderProfileRepository::new();
        profiles.expect_find_by_user_id().returning(|_| Ok(None));
        let svc = service(MockJobRepository::new(), profiles);

        let err = svc.list_mine(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(msg) if msg == "builder profile not found"));
    }

    #[test]
    fn ownership_compares_builder_profiles() {
        let owner = profile(Uuid::new_v4());
        let stranger = profile(Uuid::new_v4());
        let job = Job {
            id: Uuid::new_v4(),
            builder_profile_id: owner.id,
            jobsite_id: Uuid::new_v4(),
            job_type_id: Uuid::new_v4(),
            experience_level_id: None,
            title: "Labourer".to_string(),
            description: None,
            number_of_labourers: 1,
            start_date: Utc::now().date_naive(),
            end_date: None,
            start_time: None,
            end_time: None,
            pay_rate: rust_decimal::Decimal::new(40, 0),
            payment_type: crate::models::job::PaymentType::Hourly,
            payment_day: None,
            status: JobStatus::Open,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(ensure_job_owner(&owner, &job).is_ok());
        assert!(matches!(
            ensure_job_owner(&stranger, &job),
            Err(Error::Forbidden(_))
        ));
    }
}
