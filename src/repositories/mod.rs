//! Persistence seams. Each trait wraps the SQL for one entity; services only
//! ever see `Arc<dyn ...>` so the PostgreSQL and in-memory implementations
//! are interchangeable.
//!
//! Inserts that must be unique return `Ok(None)` when the row already exists
//! instead of pre-checking with a separate query.

pub mod mocks;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    application::{ApplicationStatus, JobApplication, NewApplication},
    assignment::{AssignmentStatus, JobAssignment, NewAssignment},
    builder_profile::{BuilderProfile, BuilderProfileUpdate, NewBuilderProfile},
    job::{Job, JobDetails, JobFilter, JobStatus, NewJob},
    jobsite::{Jobsite, JobsiteUpdate, NewJobsite},
    labour_profile::{
        LabourProfile, LabourProfileDetails, LabourProfileUpdate, NewLabourLicense,
        NewLabourProfile, NewLabourSkill,
    },
    master_data::{MasterDataKind, MasterItem, NewMasterItem},
    user::{NewUser, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// `None` when the email is already registered.
    async fn create(&self, user: NewUser) -> Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MasterDataRepository: Send + Sync {
    async fn list(&self, kind: MasterDataKind) -> Result<Vec<MasterItem>>;
    async fn find(&self, kind: MasterDataKind, id: Uuid) -> Result<Option<MasterItem>>;
    /// Subset of `ids` present in the table for `kind`.
    async fn existing_ids(&self, kind: MasterDataKind, ids: &[Uuid]) -> Result<Vec<Uuid>>;
    async fn upsert(&self, kind: MasterDataKind, item: NewMasterItem) -> Result<MasterItem>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BuilderProfileRepository: Send + Sync {
    /// `None` when the user already owns a profile or the ABN is taken.
    async fn create(&self, profile: NewBuilderProfile) -> Result<Option<BuilderProfile>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BuilderProfile>>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<BuilderProfile>>;
    async fn update(
        &self,
        id: Uuid,
        update: BuilderProfileUpdate,
    ) -> Result<Option<BuilderProfile>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabourProfileRepository: Send + Sync {
    /// Inserts the profile and its license/skill rows atomically.
    async fn create(
        &self,
        profile: NewLabourProfile,
        licenses: Vec<NewLabourLicense>,
        skills: Vec<NewLabourSkill>,
    ) -> Result<Option<LabourProfileDetails>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<LabourProfileDetails>>;
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<LabourProfileDetails>>;
    async fn update(
        &self,
        id: Uuid,
        update: LabourProfileUpdate,
    ) -> Result<Option<LabourProfile>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobsiteRepository: Send + Sync {
    async fn create(&self, jobsite: NewJobsite) -> Result<Jobsite>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Jobsite>>;
    async fn list_by_builder(&self, builder_profile_id: Uuid) -> Result<Vec<Jobsite>>;
    async fn update(&self, id: Uuid, update: JobsiteUpdate) -> Result<Option<Jobsite>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Inserts the job and its license/skill requirements atomically.
    async fn create(&self, job: NewJob) -> Result<JobDetails>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobDetails>>;
    /// Page of matching jobs plus the total match count.
    async fn list(&self, filter: JobFilter) -> Result<(Vec<Job>, i64)>;
    async fn list_by_builder(&self, builder_profile_id: Uuid) -> Result<Vec<Job>>;
    /// Replaces every column and requirement row of an existing job.
    async fn replace(&self, id: Uuid, job: NewJob) -> Result<Option<JobDetails>>;
    async fn update_status(&self, id: Uuid, status: JobStatus) -> Result<Option<Job>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// `None` when the labour user already applied to the job.
    async fn create(&self, application: NewApplication) -> Result<Option<JobApplication>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobApplication>>;
    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<JobApplication>>;
    async fn list_by_labour(&self, labour_user_id: Uuid) -> Result<Vec<JobApplication>>;
    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>>;
    async fn withdraw(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<JobApplication>>;
    /// Sets ACCEPTED and ensures an ACTIVE assignment exists, in one unit of work.
    /// An assignment that already exists for the application is returned as is.
    async fn accept(&self, id: Uuid) -> Result<Option<(JobApplication, JobAssignment)>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// `None` when the application already has an assignment.
    async fn create(&self, assignment: NewAssignment) -> Result<Option<JobAssignment>>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobAssignment>>;
    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<JobAssignment>>;
    async fn list_by_labour(&self, labour_user_id: Uuid) -> Result<Vec<JobAssignment>>;
    async fn list_by_builder(&self, builder_profile_id: Uuid) -> Result<Vec<JobAssignment>>;
    async fn set_status(
        &self,
        id: Uuid,
        status: AssignmentStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Option<JobAssignment>>;
}

/// Every repository the services need, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub master_data: Arc<dyn MasterDataRepository>,
    pub builder_profiles: Arc<dyn BuilderProfileRepository>,
    pub labour_profiles: Arc<dyn LabourProfileRepository>,
    pub jobsites: Arc<dyn JobsiteRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
}

impl Repositories {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(postgres::PgStore::new(pool));
        Self::from_store(store)
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(mocks::MockStore::new()))
    }

    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + MasterDataRepository
            + BuilderProfileRepository
            + LabourProfileRepository
            + JobsiteRepository
            + JobRepository
            + ApplicationRepository
            + AssignmentRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            master_data: store.clone(),
            builder_profiles: store.clone(),
            labour_profiles: store.clone(),
            jobsites: store.clone(),
            jobs: store.clone(),
            applications: store.clone(),
            assignments: store,
        }
    }
}
