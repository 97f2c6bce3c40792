use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    ApplicationRepository, AssignmentRepository, BuilderProfileRepository, JobRepository,
    JobsiteRepository, LabourProfileRepository, MasterDataRepository, UserRepository,
};
use crate::error::Result;
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
    user::{NewUser, User},
};

const USER_COLUMNS: &str =
    "id, email, password_hash, full_name, phone, role, status, created_at, updated_at";

const MASTER_COLUMNS: &str = "id, code, name, description, sort_order, created_at";

const BUILDER_COLUMNS: &str = "id, user_id, company_name, abn, contact_name, phone, address, \
     suburb, state, postcode, website, description, created_at, updated_at";

const LABOUR_COLUMNS: &str = "id, user_id, first_name, last_name, phone, bio, suburb, state, \
     postcode, experience_level_id, hourly_rate, has_own_transport, is_available, created_at, \
     updated_at";

const JOBSITE_COLUMNS: &str = "id, builder_profile_id, name, address, suburb, state, postcode, \
     latitude, longitude, notes, created_at, updated_at";

const JOB_COLUMNS: &str = "id, builder_profile_id, jobsite_id, job_type_id, experience_level_id, \
     title, description, number_of_labourers, start_date, end_date, start_time, end_time, \
     pay_rate, payment_type, payment_day, status, created_at, updated_at";

const APPLICATION_COLUMNS: &str = "id, job_id, labour_user_id, status, cover_letter, \
     expected_rate, resume_url, created_at, updated_at, withdrawn_at";

const ASSIGNMENT_COLUMNS: &str = "id, job_id, labour_user_id, application_id, start_date, \
     end_date, status, created_at, updated_at";

/// PostgreSQL implementation of every repository trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn labour_details(&self, profile: LabourProfile) -> Result<LabourProfileDetails> {
        let licenses = sqlx::query_as::<_, LabourLicense>(
            "SELECT id, labour_profile_id, license_id, license_number, expiry_date, created_at
             FROM labour_profile_licenses
             WHERE labour_profile_id = $1
             ORDER BY created_at",
        )
        .bind(profile.id)
        .fetch_all(&self.pool)
        .await?;

        let skills = sqlx::query_as::<_, LabourSkill>(
            "SELECT id, labour_profile_id, skill_id, experience_level_id, created_at
             FROM labour_profile_skills
             WHERE labour_profile_id = $1
             ORDER BY created_at",
        )
        .bind(profile.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(LabourProfileDetails {
            profile,
            licenses,
            skills,
        })
    }

    async fn job_details(&self, job: Job) -> Result<JobDetails> {
        let license_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT license_id FROM job_licenses WHERE job_id = $1 ORDER BY license_id",
        )
        .bind(job.id)
        .fetch_all(&self.pool)
        .await?;

        let skill_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT skill_id FROM job_skills WHERE job_id = $1 ORDER BY skill_id",
        )
        .bind(job.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(JobDetails {
            job,
            license_ids,
            skill_ids,
        })
    }
}

async fn insert_job_requirements(
    tx: &mut Transaction<'_, Postgres>,
    job_id: Uuid,
    license_ids: &[Uuid],
    skill_ids: &[Uuid],
) -> Result<()> {
    for license_id in license_ids {
        sqlx::query(
            "INSERT INTO job_licenses (job_id, license_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(job_id)
        .bind(license_id)
        .execute(&mut **tx)
        .await?;
    }
    for skill_id in skill_ids {
        sqlx::query(
            "INSERT INTO job_skills (job_id, skill_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(job_id)
        .bind(skill_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> Result<Option<User>> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, full_name, phone, role, status)
             VALUES ($1, $2, $3, $4, $5, 'active')
             ON CONFLICT (email) DO NOTHING
             RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.full_name)
            .bind(&user.phone)
            .bind(user.role)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl MasterDataRepository for PgStore {
    async fn list(&self, kind: MasterDataKind) -> Result<Vec<MasterItem>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY sort_order, name",
            MASTER_COLUMNS,
            kind.table()
        );
        let items = sqlx::query_as::<_, MasterItem>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn find(&self, kind: MasterDataKind, id: Uuid) -> Result<Option<MasterItem>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            MASTER_COLUMNS,
            kind.table()
        );
        let item = sqlx::query_as::<_, MasterItem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn existing_ids(&self, kind: MasterDataKind, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT id FROM {} WHERE id = ANY($1)", kind.table());
        let found = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(found)
    }

    async fn upsert(&self, kind: MasterDataKind, item: NewMasterItem) -> Result<MasterItem> {
        let sql = format!(
            "INSERT INTO {} (code, name, description, sort_order)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (code) DO UPDATE
             SET name = EXCLUDED.name,
                 description = EXCLUDED.description,
                 sort_order = EXCLUDED.sort_order
             RETURNING {}",
            kind.table(),
            MASTER_COLUMNS
        );
        let row = sqlx::query_as::<_, MasterItem>(&sql)
            .bind(&item.code)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.sort_order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl BuilderProfileRepository for PgStore {
    async fn create(&self, profile: NewBuilderProfile) -> Result<Option<BuilderProfile>> {
        let sql = format!(
            "INSERT INTO builder_profiles (
                user_id, company_name, abn, contact_name, phone, address,
                suburb, state, postcode, website, description
             ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {}",
            BUILDER_COLUMNS
        );
        let row = sqlx::query_as::<_, BuilderProfile>(&sql)
            .bind(profile.user_id)
            .bind(&profile.company_name)
            .bind(&profile.abn)
            .bind(&profile.contact_name)
            .bind(&profile.phone)
            .bind(&profile.address)
            .bind(&profile.suburb)
            .bind(&profile.state)
            .bind(&profile.postcode)
            .bind(&profile.website)
            .bind(&profile.description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BuilderProfile>> {
        let sql = format!("SELECT {} FROM builder_profiles WHERE id = $1", BUILDER_COLUMNS);
        let row = sqlx::query_as::<_, BuilderProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<BuilderProfile>> {
        let sql = format!(
            "SELECT {} FROM builder_profiles WHERE user_id = $1",
            BUILDER_COLUMNS
        );
        let row = sqlx::query_as::<_, BuilderProfile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        update: BuilderProfileUpdate,
    ) -> Result<Option<BuilderProfile>> {
        let sql = format!(
            "UPDATE builder_profiles
             SET
                company_name = COALESCE($2, company_name),
                abn = COALESCE($3, abn),
                contact_name = COALESCE($4, contact_name),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                suburb = COALESCE($7, suburb),
                state = COALESCE($8, state),
                postcode = COALESCE($9, postcode),
                website = COALESCE($10, website),
                description = COALESCE($11, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            BUILDER_COLUMNS
        );
        let row = sqlx::query_as::<_, BuilderProfile>(&sql)
            .bind(id)
            .bind(&update.company_name)
            .bind(&update.abn)
            .bind(&update.contact_name)
            .bind(&update.phone)
            .bind(&update.address)
            .bind(&update.suburb)
            .bind(&update.state)
            .bind(&update.postcode)
            .bind(&update.website)
            .bind(&update.description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl LabourProfileRepository for PgStore {
    async fn create(
        &self,
        profile: NewLabourProfile,
        licenses: Vec<NewLabourLicense>,
        skills: Vec<NewLabourSkill>,
    ) -> Result<Option<LabourProfileDetails>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO labour_profiles (
                user_id, first_name, last_name, phone, bio, suburb, state, postcode,
                experience_level_id, hourly_rate, has_own_transport, is_available
             ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {}",
            LABOUR_COLUMNS
        );
        let inserted = sqlx::query_as::<_, LabourProfile>(&sql)
            .bind(profile.user_id)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(&profile.phone)
            .bind(&profile.bio)
            .bind(&profile.suburb)
            .bind(&profile.state)
            .bind(&profile.postcode)
            .bind(profile.experience_level_id)
            .bind(profile.hourly_rate)
            .bind(profile.has_own_transport)
            .bind(profile.is_available)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(created) = inserted else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut license_rows = Vec::with_capacity(licenses.len());
        for license in licenses {
            let row = sqlx::query_as::<_, LabourLicense>(
                "INSERT INTO labour_profile_licenses (labour_profile_id, license_id, license_number, expiry_date)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, labour_profile_id, license_id, license_number, expiry_date, created_at",
            )
            .bind(created.id)
            .bind(license.license_id)
            .bind(&license.license_number)
            .bind(license.expiry_date)
            .fetch_one(&mut *tx)
            .await?;
            license_rows.push(row);
        }

        let mut skill_rows = Vec::with_capacity(skills.len());
        for skill in skills {
            let row = sqlx::query_as::<_, LabourSkill>(
                "INSERT INTO labour_profile_skills (labour_profile_id, skill_id, experience_level_id)
                 VALUES ($1, $2, $3)
                 RETURNING id, labour_profile_id, skill_id, experience_level_id, created_at",
            )
            .bind(created.id)
            .bind(skill.skill_id)
            .bind(skill.experience_level_id)
            .fetch_one(&mut *tx)
            .await?;
            skill_rows.push(row);
        }

        tx.commit().await?;

        Ok(Some(LabourProfileDetails {
            profile: created,
            licenses: license_rows,
            skills: skill_rows,
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<LabourProfileDetails>> {
        let sql = format!("SELECT {} FROM labour_profiles WHERE id = $1", LABOUR_COLUMNS);
        let profile = sqlx::query_as::<_, LabourProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match profile {
            Some(profile) => Ok(Some(self.labour_details(profile).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<LabourProfileDetails>> {
        let sql = format!(
            "SELECT {} FROM labour_profiles WHERE user_id = $1",
            LABOUR_COLUMNS
        );
        let profile = sqlx::query_as::<_, LabourProfile>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        match profile {
            Some(profile) => Ok(Some(self.labour_details(profile).await?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        id: Uuid,
        update: LabourProfileUpdate,
    ) -> Result<Option<LabourProfile>> {
        let sql = format!(
            "UPDATE labour_profiles
             SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                bio = COALESCE($5, bio),
                suburb = COALESCE($6, suburb),
                state = COALESCE($7, state),
                postcode = COALESCE($8, postcode),
                experience_level_id = COALESCE($9, experience_level_id),
                hourly_rate = COALESCE($10, hourly_rate),
                has_own_transport = COALESCE($11, has_own_transport),
                is_available = COALESCE($12, is_available),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            LABOUR_COLUMNS
        );
        let row = sqlx::query_as::<_, LabourProfile>(&sql)
            .bind(id)
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.phone)
            .bind(&update.bio)
            .bind(&update.suburb)
            .bind(&update.state)
            .bind(&update.postcode)
            .bind(update.experience_level_id)
            .bind(update.hourly_rate)
            .bind(update.has_own_transport)
            .bind(update.is_available)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl JobsiteRepository for PgStore {
    async fn create(&self, jobsite: NewJobsite) -> Result<Jobsite> {
        let sql = format!(
            "INSERT INTO jobsites (
                builder_profile_id, name, address, suburb, state, postcode,
                latitude, longitude, notes
             ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
             RETURNING {}",
            JOBSITE_COLUMNS
        );
        let row = sqlx::query_as::<_, Jobsite>(&sql)
            .bind(jobsite.builder_profile_id)
            .bind(&jobsite.name)
            .bind(&jobsite.address)
            .bind(&jobsite.suburb)
            .bind(&jobsite.state)
            .bind(&jobsite.postcode)
            .bind(jobsite.latitude)
            .bind(jobsite.longitude)
            .bind(&jobsite.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Jobsite>> {
        let sql = format!("SELECT {} FROM jobsites WHERE id = $1", JOBSITE_COLUMNS);
        let row = sqlx::query_as::<_, Jobsite>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_builder(&self, builder_profile_id: Uuid) -> Result<Vec<Jobsite>> {
        let sql = format!(
            "SELECT {} FROM jobsites WHERE builder_profile_id = $1 ORDER BY created_at DESC",
            JOBSITE_COLUMNS
        );
        let rows = sqlx::query_as::<_, Jobsite>(&sql)
            .bind(builder_profile_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update(&self, id: Uuid, update: JobsiteUpdate) -> Result<Option<Jobsite>> {
        let sql = format!(
            "UPDATE jobsites
             SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                suburb = COALESCE($4, suburb),
                state = COALESCE($5, state),
                postcode = COALESCE($6, postcode),
                latitude = COALESCE($7, latitude),
                longitude = COALESCE($8, longitude),
                notes = COALESCE($9, notes),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            JOBSITE_COLUMNS
        );
        let row = sqlx::query_as::<_, Jobsite>(&sql)
            .bind(id)
            .bind(&update.name)
            .bind(&update.address)
            .bind(&update.suburb)
            .bind(&update.state)
            .bind(&update.postcode)
            .bind(update.latitude)
            .bind(update.longitude)
            .bind(&update.notes)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobsites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl JobRepository for PgStore {
    async fn create(&self, job: NewJob) -> Result<JobDetails> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO jobs (
                builder_profile_id, jobsite_id, job_type_id, experience_level_id,
                title, description, number_of_labourers, start_date, end_date,
                start_time, end_time, pay_rate, payment_type, payment_day, status
             ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,'OPEN')
             RETURNING {}",
            JOB_COLUMNS
        );
        let created = sqlx::query_as::<_, Job>(&sql)
            .bind(job.builder_profile_id)
            .bind(job.jobsite_id)
            .bind(job.job_type_id)
            .bind(job.experience_level_id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(job.number_of_labourers)
            .bind(job.start_date)
            .bind(job.end_date)
            .bind(&job.start_time)
            .bind(&job.end_time)
            .bind(job.pay_rate)
            .bind(job.payment_type)
            .bind(job.payment_day)
            .fetch_one(&mut *tx)
            .await?;

        insert_job_requirements(&mut tx, created.id, &job.license_ids, &job.skill_ids).await?;
        tx.commit().await?;

        let mut license_ids = job.license_ids;
        license_ids.sort();
        license_ids.dedup();
        let mut skill_ids = job.skill_ids;
        skill_ids.sort();
        skill_ids.dedup();

        Ok(JobDetails {
            job: created,
            license_ids,
            skill_ids,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobDetails>> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match job {
            Some(job) => Ok(Some(self.job_details(job).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: JobFilter) -> Result<(Vec<Job>, i64)> {
        let items_query = format!(
            "SELECT {} FROM jobs
             WHERE ($1::job_status IS NULL OR status = $1)
               AND ($2::uuid IS NULL OR job_type_id = $2)
               AND ($3::text IS NULL OR title ILIKE $3)
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5",
            JOB_COLUMNS
        );
        let search = filter.search.as_ref().map(|s| format!("%{}%", s));

        let items = sqlx::query_as::<_, Job>(&items_query)
            .bind(filter.status)
            .bind(filter.job_type_id)
            .bind(&search)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM jobs
             WHERE ($1::job_status IS NULL OR status = $1)
               AND ($2::uuid IS NULL OR job_type_id = $2)
               AND ($3::text IS NULL OR title ILIKE $3)",
        )
        .bind(filter.status)
        .bind(filter.job_type_id)
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        Ok((items, total))
    }

    async fn list_by_builder(&self, builder_profile_id: Uuid) -> Result<Vec<Job>> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE builder_profile_id = $1 ORDER BY created_at DESC",
            JOB_COLUMNS
        );
        let rows = sqlx::query_as::<_, Job>(&sql)
            .bind(builder_profile_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn replace(&self, id: Uuid, job: NewJob) -> Result<Option<JobDetails>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE jobs
             SET
                jobsite_id = $2,
                job_type_id = $3,
                experience_level_id = $4,
                title = $5,
                description = $6,
                number_of_labourers = $7,
                start_date = $8,
                end_date = $9,
                start_time = $10,
                end_time = $11,
                pay_rate = $12,
                payment_type = $13,
                payment_day = $14,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            JOB_COLUMNS
        );
        let updated = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .bind(job.jobsite_id)
            .bind(job.job_type_id)
            .bind(job.experience_level_id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(job.number_of_labourers)
            .bind(job.start_date)
            .bind(job.end_date)
            .bind(&job.start_time)
            .bind(&job.end_time)
            .bind(job.pay_rate)
            .bind(job.payment_type)
            .bind(job.payment_day)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(updated) = updated else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM job_licenses WHERE job_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM job_skills WHERE job_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_job_requirements(&mut tx, id, &job.license_ids, &job.skill_ids).await?;
        tx.commit().await?;

        Ok(Some(self.job_details(updated).await?))
    }

    async fn update_status(&self, id: Uuid, status: JobStatus) -> Result<Option<Job>> {
        let sql = format!(
            "UPDATE jobs SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicationRepository for PgStore {
    async fn create(&self, application: NewApplication) -> Result<Option<JobApplication>> {
        let sql = format!(
            "INSERT INTO job_applications (job_id, labour_user_id, status, cover_letter, expected_rate, resume_url)
             VALUES ($1, $2, 'APPLIED', $3, $4, $5)
             ON CONFLICT (job_id, labour_user_id) DO NOTHING
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(application.job_id)
            .bind(application.labour_user_id)
            .bind(&application.cover_letter)
            .bind(application.expected_rate)
            .bind(&application.resume_url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobApplication>> {
        let sql = format!(
            "SELECT {} FROM job_applications WHERE id = $1",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<JobApplication>> {
        let sql = format!(
            "SELECT {} FROM job_applications WHERE job_id = $1 ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_by_labour(&self, labour_user_id: Uuid) -> Result<Vec<JobApplication>> {
        let sql = format!(
            "SELECT {} FROM job_applications WHERE labour_user_id = $1 ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(labour_user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>> {
        let sql = format!(
            "UPDATE job_applications SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn withdraw(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<JobApplication>> {
        let sql = format!(
            "UPDATE job_applications
             SET status = 'WITHDRAWN', withdrawn_at = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(id)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn accept(&self, id: Uuid) -> Result<Option<(JobApplication, JobAssignment)>> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "UPDATE job_applications SET status = 'ACCEPTED', updated_at = NOW() WHERE id = $1 RETURNING {}",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, JobApplication>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(application) = application else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "INSERT INTO job_assignments (job_id, labour_user_id, application_id, start_date, status)
             SELECT a.job_id, a.labour_user_id, a.id, j.start_date::timestamptz, 'ACTIVE'
             FROM job_applications a
             JOIN jobs j ON j.id = a.job_id
             WHERE a.id = $1
             ON CONFLICT (application_id) DO NOTHING",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "SELECT {} FROM job_assignments WHERE application_id = $1",
            ASSIGNMENT_COLUMNS
        );
        let assignment = sqlx::query_as::<_, JobAssignment>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((application, assignment)))
    }
}

#[async_trait]
impl AssignmentRepository for PgStore {
    async fn create(&self, assignment: NewAssignment) -> Result<Option<JobAssignment>> {
        let sql = format!(
            "INSERT INTO job_assignments (job_id, labour_user_id, application_id, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5, 'ACTIVE')
             ON CONFLICT (application_id) DO NOTHING
             RETURNING {}",
            ASSIGNMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, JobAssignment>(&sql)
            .bind(assignment.job_id)
            .bind(assignment.labour_user_id)
            .bind(assignment.application_id)
            .bind(assignment.start_date)
            .bind(assignment.end_date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobAssignment>> {
        let sql = format!(
            "SELECT {} FROM job_assignments WHERE id = $1",
            ASSIGNMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, JobAssignment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_job(&self, job_id: Uuid) -> Result<Vec<JobAssignment>> {
        let sql = format!(
            "SELECT {} FROM job_assignments WHERE job_id = $1 ORDER BY created_at DESC",
            ASSIGNMENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobAssignment>(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_by_labour(&self, labour_user_id: Uuid) -> Result<Vec<JobAssignment>> {
        let sql = format!(
            "SELECT {} FROM job_assignments WHERE labour_user_id = $1 ORDER BY created_at DESC",
            ASSIGNMENT_COLUMNS
        );
        let rows = sqlx::query_as::<_, JobAssignment>(&sql)
            .bind(labour_user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_by_builder(&self, builder_profile_id: Uuid) -> Result<Vec<JobAssignment>> {
        let sql = "SELECT ja.id, ja.job_id, ja.labour_user_id, ja.application_id, ja.start_date,
                    ja.end_date, ja.status, ja.created_at, ja.updated_at
             FROM job_assignments ja
             JOIN jobs j ON j.id = ja.job_id
             WHERE j.builder_profile_id = $1
             ORDER BY ja.created_at DESC";
        let rows = sqlx::query_as::<_, JobAssignment>(sql)
            .bind(builder_profile_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AssignmentStatus,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Option<JobAssignment>> {
        let sql = format!(
            "UPDATE job_assignments
             SET status = $2, end_date = COALESCE($3, end_date), updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            ASSIGNMENT_COLUMNS
        );
        let row = sqlx::query_as::<_, JobAssignment>(&sql)
            .bind(id)
            .bind(status)
            .bind(end_date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
