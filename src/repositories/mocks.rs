//! In-memory repository implementations for testing
//!
//! `MockStore` implements every repository trait over one shared state so
//! services and the HTTP router can be exercised without PostgreSQL. It
//! enforces the same unique keys the schema does.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    ApplicationRepository, AssignmentRepository, BuilderProfileRepository, JobRepository,
    JobsiteRepository, LabourProfileRepository, MasterDataRepository, UserRepository,
};
use crate::error::{Error, Result, ABN_TAKEN, REFERENCE_CONFLICT};
use crate::models::{
    application::{ApplicationStatus, JobApplication, NewApplication},
    assignment::{AssignmentStatus, JobAssignment, NewAssignment},
    builder_profile::{BuilderProfile, BuilderProfileUpdate, NewBuilderProfile},
    job::{Job, JobDetails, JobFilter, JobStatus, NewJob},
    jobsite::{Jobsite, JobsiteUpdate, NewJobsite},
    labour_profile::{
        LabourLicense, LabourProfile, LabourProfileDetails, LabourProfileUpdate,
        LabourSkill, NewLabourLicense, NewLabourProfile, NewLabourSkill,
    },
    master_data::{MasterDataKind, MasterItem, NewMasterItem},
    user::{NewUser, User, UserStatus},
};

#[derive(Default)]
struct MockState {
    users: Vec<User>,
    master_data: HashMap<MasterDataKind, Vec<MasterItem>>,
    builder_profiles: Vec<BuilderProfile>,
    labour_profiles: Vec<LabourProfileDetails>,
    jobsites: Vec<Jobsite>,
    jobs: Vec<JobDetails>,
    applications: Vec<JobApplication>,
    assignments: Vec<JobAssignment>,
}

/// Shared in-memory store; clones see the same data.
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<MockState>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a lookup row directly, returning its id.
    pub async fn seed_master_item(&self, kind: MasterDataKind, code: &str, name: &str) -> Uuid {
        let item = MasterItem {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            description: None,
            sort_order: 0,
            created_at: Utc::now(),
        };
        let id = item.id;
        self.state
            .lock()
            .await
            .master_data
            .entry(kind)
            .or_default()
            .push(item);
        id
    }

    /// Force a user's status, e.g. to exercise suspended-account logins.
    pub async fn set_user_status(&self, user_id: Uuid, status: UserStatus) {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
            user.status = status;
        }
    }
}

fn new_job_details(id: Uuid, job: NewJob, created_at: DateTime<Utc>, status: JobStatus) -> JobDetails {
    let mut license_ids = job.license_ids;
    license_ids.sort();
    license_ids.dedup();
    let mut skill_ids = job.skill_ids;
    skill_ids.sort();
    skill_ids.dedup();

    JobDetails {
        job: Job {
            id,
            builder_profile_id: job.builder_profile_id,
            jobsite_id: job.jobsite_id,
            job_type_id: job.job_type_id,
            experience_level_id: job.experience_level_id,
            title: job.title,
            description: job.description,
            number_of_labourers: job.number_of_labourers,
            start_date: job.start_date,
            end_date: job.end_date,
            start_time: job.start_time,
            end_time: job.end_time,
            pay_rate: job.pay_rate,
            payment_type: job.payment_type,
            payment_day: job.payment_day,
            status,
            created_at,
            updated_at: Utc::now(),
        },
        license_ids,
        skill_ids,
    }
}

fn abn_taken(profiles: &[BuilderProfile], abn: Option<&str>, except: Option<Uuid>) -> bool {
    let Some(abn) = abn else {
        return false;
    };
    profiles
        .iter()
        .any(|p| Some(p.id) != except && p.abn.as_deref() == Some(abn))
}

fn newest_first<T, F>(mut rows: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    rows.sort_by_key(|row| std::cmp::Reverse(created_at(row)));
    rows
}

#[async_trait]
impl UserRepository for MockStore {
    async fn create(&self, user: NewUser) -> Result<Option<User>> {
        let mut state = self.state.lock().await;
        if state.users.iter().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let now = Utc::now();
        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            phone: user.phone,
            role: user.role,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state.users.push(row.clone());
        Ok(Some(row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl MasterDataRepository for MockStore {
    async fn list(&self, kind: MasterDataKind) -> Result<Vec<MasterItem>> {
        let state = self.state.lock().await;
        let mut items = state.master_data.get(&kind).cloned().unwrap_or_default();
        items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    async fn find(&self, kind: MasterDataKind, id: Uuid) -> Result<Option<MasterItem>> {
        let state = self.state.lock().await;
        Ok(state
            .master_data
            .get(&kind)
            .and_then(|items| items.iter().find(|i| i.id == id).cloned()))
    }

    async fn existing_ids(&self, kind: MasterDataKind, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let state = self.state.lock().await;
        let Some(items) = state.master_data.get(&kind) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .copied()
            .filter(|id| items.iter().any(|i| i.id == *id))
            .collect())
    }

    async fn upsert(&self, kind: MasterDataKind, item: NewMasterItem) -> Result<MasterItem> {
        let mut state = self.state.lock().await;
        let items = state.master_data.entry(kind).or_default();
        if let Some(existing) = items.iter_mut().find(|i| i.code == item.code) {
            existing.name = item.name;
            existing.description = item.description;
            existing.sort_order = item.sort_order;
            return Ok(existing.clone());
        }
        let row = MasterItem {
            id: Uuid::new_v4(),
            code: item.code,
            name: item.name,
            description: item.description,
            sort_order: item.sort_order,
            created_at: Utc::now(),
        };
        items.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl BuilderProfileRepository for MockStore {
    async fn create(&self, profile: NewBuilderProfile) -> Result<Option<BuilderProfile>> {
        let mut state = self.state.lock().await;
        if state
            .builder_profiles
            .iter()
            .any(|p| p.user_id == profile.user_id)
        {
            return Ok(None);
        }
        if abn_taken(&state.builder_profiles, profile.abn.as_deref(), None) {
            return Err(Error::Conflict(ABN_TAKEN.to_string()));
        }
        let now = Utc::now();
        let row = BuilderProfile {
            id: Uuid::new_v4(),
            user_id: profile.user_id,
            company_name: profile.company_name,
            abn: profile.abn,
            contact_name: profile.contact_name,
            phone: profile.phone,
            address: profile.address,
            suburb: profile.suburb,
            state: profile.state,
            postcode: profile.postcode,
            website: profile.website,
            description: profile.description,
            created_at: now,
            updated_at: now,
        };
        state.builder_profiles.push(row.clone());
        Ok(Some(row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BuilderProfile>> {
        let state = self.state.lock().await;
        Ok(state.builder_profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<BuilderProfile>> {
        let state = self.state.lock().await;
        Ok(state
            .builder_profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        update: BuilderProfileUpdate,
    ) -> Result<Option<BuilderProfile>> {
        let mut state = self.state.lock().await;
        if abn_taken(&state.builder_profiles, update.abn.as_deref(), Some(id)) {
            return Err(Error::Conflict(ABN_TAKEN.to_string()));
        }
        let Some(p) = state.builder_profiles.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = update.company_name {
            p.company_name = v;
        }
        p.abn = update.abn.or(p.abn.take());
        p.contact_name = update.contact_name.or(p.contact_name.take());
        p.phone = update.phone.or(p.phone.take());
        p.address = update.address.or(p.address.take());
        p.suburb = update.suburb.or(p.suburb.take());
        p.state = update.state.or(p.state.take());
        p.postcode = update.postcode.or(p.postcode.take());
        p.website = update.website.or(p.website.take());
        p.description = update.description.or(p.description.take());
        p.updated_at = Utc::now();
        Ok(Some(p.clone()))
    }
}

#[async_trait]
impl LabourProfileRepository for MockStore {
    async fn create(
        &self,
        profile: NewLabourProfile,
        licenses: Vec<NewLabourLicense>,
        skills: Vec<NewLabourSkill>,
    ) -> Result<Option<LabourProfileDetails>> {
        let mut state = self.state.lock().await;
        if state
            .labour_profiles
            .iter()
            .any(|d| d.profile.user_id == profile.user_id)
        {
            return Ok(None);
        }
        let now = Utc::now();
        let profile_id = Uuid::new_v4();
        let details = LabourProfileDetails {
            profile: LabourProfile {
                id: profile_id,
                user_id: profile.user_id,
                first_name: profile.first_name,
                last_name: profile.last_name,
                phone: profile.phone,
                bio: profile.bio,
                suburb: profile.suburb,
                state: profile.state,
                postcode: profile.postcode,
                experience_level_id: profile.experience_level_id,
                hourly_rate: profile.hourly_rate,
                has_own_transport: profile.has_own_transport,
                is_available: profile.is_available,
                created_at: now,
                updated_at: now,
            },
            licenses: licenses
                .into_iter()
                .map(|l| LabourLicense {
                    id: Uuid::new_v4(),
                    labour_profile_id: profile_id,
                    license_id: l.license_id,
                    license_number: l.license_number,
                    expiry_date: l.expiry_date,
                    created_at: now,
                })
                .collect(),
            skills: skills
                .into_iter()
                .map(|s| LabourSkill {
                    id: Uuid::new_v4(),
                    labour_profile_id: profile_id,
                    skill_id: s.skill_id,
                    experience_level_id: s.experience_level_id,
                    created_at: now,
                })
                .collect(),
        };
        state.labour_profiles.push(details.clone());
        Ok(Some(details))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LabourProfileDetails>> {
        let state = self.state.lock().await;
        Ok(state
            .labour_profiles
            .iter()
            .find(|d| d.profile.id == id)
            .cloned())
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<LabourProfileDetails>> {
        let state = self.state.lock().await;
        Ok(state
            .labour_profiles
            .iter()
            .find(|d| d.profile.user_id == user_id)
            .cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        update: LabourProfileUpdate,
    ) -> Result<Option<LabourProfile>> {
        let mut state = self.state.lock().await;
        let Some(d) = state.labour_profiles.iter_mut().find(|d| d.profile.id == id) else {
            return Ok(None);
        };
        let p = &mut d.profile;
        if let Some(v) = update.first_name {
            p.first_name = v;
        }
        if let Some(v) = update.last_name {
            p.last_name = v;
        }
        p.phone = update.phone.or(p.phone.take());
        p.bio = update.bio.or(p.bio.take());
        p.suburb = update.suburb.or(p.suburb.take());
        p.state = update.state.or(p.state.take());
        p.postcode = update.postcode.or(p.postcode.take());
        p.experience_level_id = update.experience_level_id.or(p.experience_level_id);
        p.hourly_rate = update.hourly_rate.or(p.hourly_rate);
        if let Some(v) = update.has_own_transport {
            p.has_own_transport = v;
        }
        if let Some(v) = update.is_available {
            p.is_available = v;
        }
        p.updated_at = Utc::now();
        Ok(Some(p.clone()))
    }
}

#[async_trait]
impl JobsiteRepository for MockStore {
    async fn create(&self, jobsite: NewJobsite) -> Result<Jobsite> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let row = Jobsite {
            id: Uuid::new_v4(),
            builder_profile_id: jobsite.builder_profile_id,
            name: jobsite.name,
            address: jobsite.address,
            suburb: jobsite.suburb,
            state: jobsite.state,
            postcode: jobsite.postcode,
            latitude: jobsite.latitude,
            longitude: jobsite.longitude,
            notes: jobsite.notes,
            created_at: now,
            updated_at: now,
        };
        state.jobsites.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Jobsite>> {
        let state = self.state.lock().await;
        Ok(state.jobsites.iter().find(|s| s.id == id).cloned())
    }

    async fn list_by_builder(&self, builder_profile_id: Uuid) -> Result<Vec<Jobsite>> {
        let state = self.state.lock().await;
        let rows = state
            .jobsites
            .iter()
            .filter(|s| s.builder_profile_id == builder_profile_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |s: &Jobsite| s.created_at))
    }

    async fn update(&self, id: Uuid, update: JobsiteUpdate) -> Result<Option<Jobsite>> {
        let mut state = self.state.lock().await;
        let Some(s) = state.jobsites.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(v) = update.name {
            s.name = v;
        }
        if let Some(v) = update.address {
            s.address = v;
        }
        s.suburb = update.suburb.or(s.suburb.take());
        s.state = update.state.or(s.state.take());
        s.postcode = update.postcode.or(s.postcode.take());
        s.latitude = update.latitude.or(s.latitude);
        s.longitude = update.longitude.or(s.longitude);
        s.notes = update.notes.or(s.notes.take());
        s.updated_at = Utc::now();
        Ok(Some(s.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.jobs.iter().any(|j| j.job.jobsite_id == id) {
            return Err(Error::Conflict(REFERENCE_CONFLICT.to_string()));
        }
        let before = state.jobsites.len();
        state.jobsites.retain(|s| s.id != id);
        Ok(state.jobsites.len() < before)
    }
}

#[async_trait]
impl JobRepository for MockStore {
    async fn create(&self, job: NewJob) -> Result<JobDetails> {
        let mut state = self.state.lock().await;
        let details = new_job_details(Uuid::new_v4(), job, Utc::now(), JobStatus::Open);
        state.jobs.push(details.clone());
        Ok(details)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobDetails>> {
        let state = self.state.lock().await;
        Ok(state.jobs.iter().find(|d| d.job.id == id).cloned())
    }

    async fn list(&self, filter: JobFilter) -> Result<(Vec<Job>, i64)> {
        let state = self.state.lock().await;
        let search = filter.search.as_ref().map(|s| s.to_lowercase());
        let matching: Vec<Job> = state
            .jobs
            .iter()
            .map(|d| &d.job)
            .filter(|j| filter.status.map_or(true, |s| j.status == s))
            .filter(|j| filter.job_type_id.map_or(true, |t| j.job_type_id == t))
            .filter(|j| {
                search
                    .as_ref()
                    .map_or(true, |s| j.title.to_lowercase().contains(s))
            })
            .cloned()
            .collect();
        let total = matching.len() as i64;
        let page = newest_first(matching, |j: &Job| j.created_at)
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn list_by_builder(&self, builder_profile_id: Uuid) -> Result<Vec<Job>> {
        let state = self.state.lock().await;
        let rows = state
            .jobs
            .iter()
            .filter(|d| d.job.builder_profile_id == builder_profile_id)
            .map(|d| d.job.clone())
            .collect();
        Ok(newest_first(rows, |j: &Job| j.created_at))
    }

    async fn replace(&self, id: Uuid, job: NewJob) -> Result<Option<JobDetails>> {
        let mut state = self.state.lock().await;
        let Some(existing) = state.jobs.iter_mut().find(|d| d.job.id == id) else {
            return Ok(None);
        };
        let replaced = new_job_details(id, job, existing.job.created_at, existing.job.status);
        *existing = replaced.clone();
        Ok(Some(replaced))
    }

    async fn update_status(&self, id: Uuid, status: JobStatus) -> Result<Option<Job>> {
        let mut state = self.state.lock().await;
        let Some(d) = state.jobs.iter_mut().find(|d| d.job.id == id) else {
            return Ok(None);
        };
        d.job.status = status;
        d.job.updated_at = Utc::now();
        Ok(Some(d.job.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().await;
        let before = state.jobs.len();
        state.jobs.retain(|d| d.job.id != id);
        state.applications.retain(|a| a.job_id != id);
        state.assignments.retain(|a| a.job_id != id);
        Ok(state.jobs.len() < before)
    }
}

#[async_trait]
impl ApplicationRepository for MockStore {
    async fn create(&self, application: NewApplication) -> Result<Option<JobApplication>> {
        let mut state = self.state.lock().await;
        if state.applications.iter().any(|a| {
            a.job_id == application.job_id && a.labour_user_id == application.labour_user_id
        }) {
            return Ok(None);
        }
        let now = Utc::now();
        let row = JobApplication {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            labour_user_id: application.labour_user_id,
            status: ApplicationStatus::Applied,
            cover_letter: application.cover_letter,
            expected_rate: application.expected_rate,
            resume_url: application.resume_url,
            created_at: now,
            updated_at: now,
            withdrawn_at: None,
        };
        state.applications.push(row.clone());
        Ok(Some(row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobApplication>> {
        let state = self.state.lock().await;
        Ok(state.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<JobApplication>> {
        let state = self.state.lock().await;
        let rows = state
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |a: &JobApplication| a.created_at))
    }

    async fn list_by_labour(&self, labour_user_id: Uuid) -> Result<Vec<JobApplication>> {
        let state = self.state.lock().await;
        let rows = state
            .applications
            .iter()
            .filter(|a| a.labour_user_id == labour_user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |a: &JobApplication| a.created_at))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>> {
        let mut state = self.state.lock().await;
        let Some(a) = state.applications.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        a.status = status;
        a.updated_at = Utc::now();
        Ok(Some(a.clone()))
    }

    async fn withdraw(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<JobApplication>> {
        let mut state = self.state.lock().await;
        let Some(a) = state.applications.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        a.status = ApplicationStatus::Withdrawn;
        a.withdrawn_at = Some(at);
        a.updated_at = Utc::now();
        Ok(Some(a.clone()))
    }

    async fn accept(&self, id: Uuid) -> Result<Option<(JobApplication, JobAssignment)>> {
        let mut state = self.state.lock().await;
        let Some(a) = state.applications.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        a.status = ApplicationStatus::Accepted;
        a.updated_at = Utc::now();
        let application = a.clone();

        if let Some(existing) = state.assignments.iter().find(|x| x.application_id == id) {
            return Ok(Some((application, existing.clone())));
        }

        let start_date = state
            .jobs
            .iter()
            .find(|d| d.job.id == application.job_id)
            .and_then(|d| d.job.start_date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
        let now = Utc::now();
        let assignment = JobAssignment {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            labour_user_id: application.labour_user_id,
            application_id: application.id,
            start_date,
            end_date: None,
            status: AssignmentStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state.assignments.push(assignment.clone());
        Ok(Some((application, assignment)))
    }
}

#[async_trait]
impl AssignmentRepository for MockStore {
    async fn create(&self, assignment: NewAssignment) -> Result<Option<JobAssignment>> {
        let mut state = self.state.lock().await;
        if state
            .assignments
            .iter()
            .any(|a| a.application_id == assignment.application_id)
        {
            return Ok(None);
        }
        let now = Utc::now();
        let row = JobAssignment {
            id: Uuid::new_v4(),
            job_id: assignment.job_id,
            labour_user_id: assignment.labour_user_id,
            application_id: assignment.application_id,
            start_date: assignment.start_date,
            end_date: assignment.end_date,
            status: AssignmentStatus::Active,
            created_at: now,
            updated_at: now,
        };
        state.assignments.push(row.clone());
        Ok(Some(row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobAssignment>> {
        let state = self.state.lock().await;
        Ok(state.assignments.iter().find(|a| a.id == id).cloned())
    }

    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<JobAssignment>> {
        let state = self.state.lock().await;
        let rows = state
            .assignments
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |a: &JobAssignment| a.created_at))
    }

    async fn list_by_labour(&self, labour_user_id: Uuid) -> Result<Vec<JobAssignment>> {
        let state = self.state.lock().await;
        let rows = state
            .assignments
            .iter()
            .filter(|a| a.labour_user_id == labour_user_id)
            .cloned()
            .collect();
        Ok(newest_first(rows, |a: &JobAssignment| a.created_at))
    }

    async fn list_by_builder(&self, builder_profile_id: Uuid) -> Result<Vec<JobAssignment>> {
        let state = self.state.lock().await;
        let job_ids: Vec<Uuid> = state
            .jobs
            .iter()
            .filter(|d| d.job.builder_profile_id == builder_profile_id)
            .map(|d| d.job.id)
            .collect();
        let rows = state
            .assignments
            .iter()
            .filter(|a| job_ids.contains(&a.job_id))
            .cloned()
            .collect();
        Ok(newest_first(rows, |a: &JobAssignment| a.created_at))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AssignmentStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Option<JobAssignment>> {
        let mut state = self.state.lock().await;
        let Some(a) = state.assignments.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        a.status = status;
        a.end_date = end_date.or(a.end_date);
        a.updated_at = Utc::now();
        Ok(Some(a.clone()))
    }
}
