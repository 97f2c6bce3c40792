use chrono::NaiveTime;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::job_dto::JobPayload;
use crate::error::{Error, Result};
use crate::models::builder_profile::BuilderProfile;
use crate::models::job::PaymentType;
use crate::models::master_data::MasterDataKind;
use crate::repositories::{BuilderProfileRepository, JobsiteRepository};
use crate::services::master_data_service::MasterDataService;

/// Checks a job payload before it is written. Field rules run first so a
/// malformed payload never costs a database round trip.
#[derive(Clone)]
pub struct JobValidationService {
    builder_profiles: Arc<dyn BuilderProfileRepository>,
    jobsites: Arc<dyn JobsiteRepository>,
    master_data: MasterDataService,
}

impl JobValidationService {
    pub fn new(
        builder_profiles: Arc<dyn BuilderProfileRepository>,
        jobsites: Arc<dyn JobsiteRepository>,
        master_data: MasterDataService,
    ) -> Self {
        Self {
            builder_profiles,
            jobsites,
            master_data,
        }
    }

    /// Runs every rule and returns the caller's builder profile on success.
    pub async fn validate(&self, user_id: Uuid, payload: &JobPayload) -> Result<BuilderProfile> {
        check_fields(payload)?;

        let profile = self
            .builder_profiles
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("builder profile not found".to_string()))?;

        let jobsite = self
            .jobsites
            .find_by_id(payload.jobsite_id)
            .await?
            .ok_or_else(|| Error::BadRequest("jobsite not found".to_string()))?;
        if jobsite.builder_profile_id != profile.id {
            return Err(Error::Forbidden(
                "jobsite does not belong to builder".to_string(),
            ));
        }

        if !self
            .master_data
            .exists(MasterDataKind::JobType, payload.job_type_id)
            .await?
        {
            return Err(Error::BadRequest("job type not found".to_string()));
        }

        if let Some(level_id) = payload.experience_level_id {
            if !self
                .master_data
                .exists(MasterDataKind::ExperienceLevel, level_id)
                .await?
            {
                return Err(Error::BadRequest("experience level not found".to_string()));
            }
        }

        self.master_data
            .ensure_all_exist(MasterDataKind::License, &payload.license_ids)
            .await?;
        self.master_data
            .ensure_all_exist(MasterDataKind::Skill, &payload.skill_ids)
            .await?;

        Ok(profile)
    }
}

/// Rules that need nothing but the payload itself.
pub fn check_fields(payload: &JobPayload) -> Result<()> {
    if payload.number_of_labourers <= 0 {
        return Err(Error::BadRequest(
            "number of labourers must be positive".to_string(),
        ));
    }

    if let Some(end_date) = payload.end_date {
        if payload.start_date > end_date {
            return Err(Error::BadRequest(
                "start date must be before or equal to end date".to_string(),
            ));
        }
    }

    if payload.payment_type == PaymentType::FixedDay
        && !matches!(payload.payment_day, Some(day) if (1..=31).contains(&day))
    {
        return Err(Error::BadRequest(
            "payment day must be between 1 and 31 for FIXED_DAY payment type".to_string(),
        ));
    }

    if let Some(start) = payload.start_time.as_deref() {
        if !is_clock_time(start) {
            return Err(Error::BadRequest(
                "start time must be in HH:MM format".to_string(),
            ));
        }
    }
    if let Some(end) = payload.end_time.as_deref() {
        if !is_clock_time(end) {
            return Err(Error::BadRequest(
                "end time must be in HH:MM format".to_string(),
            ));
        }
    }

    Ok(())
}

fn is_clock_time(raw: &str) -> bool {
    raw.len() == 5 && NaiveTime::parse_from_str(raw, "%H:%M").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::builder_profile::NewBuilderProfile;
    use crate::models::jobsite::NewJobsite;
    use crate::repositories::mocks::MockStore;
    use crate::repositories::{MockBuilderProfileRepository, MockJobsiteRepository};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn payload() -> JobPayload {
        JobPayload {
            jobsite_id: Uuid::new_v4(),
            job_type_id: Uuid::new_v4(),
            experience_level_id: None,
            title: "Concrete pour".to_string(),
            description: None,
            number_of_labourers: 2,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            end_date: Some(NaiveDate::from_ymd_opt(2026, 3, 6).unwrap()),
            start_time: Some("07:00".to_string()),
            end_time: Some("15:30".to_string()),
            pay_rate: Decimal::new(4250, 2),
            payment_type: PaymentType::Hourly,
            payment_day: None,
            license_ids: vec![],
            skill_ids: vec![],
        }
    }

    fn message(err: Error) -> String {
        match err {
            Error::BadRequest(msg) | Error::NotFound(msg) | Error::Forbidden(msg) => msg,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn accepts_a_well_formed_payload() {
        assert!(check_fields(&payload()).is_ok());
    }

    #[test]
    fn rejects_non_positive_labourers() {
        let mut p = payload();
        p.number_of_labourers = 0;
        assert_eq!(
            message(check_fields(&p).unwrap_err()),
            "number of labourers must be positive"
        );
    }

    #[test]
    fn rejects_end_before_start() {
        let mut p = payload();
        p.end_date = Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(
            message(check_fields(&p).unwrap_err()),
            "start date must be before or equal to end date"
        );

        p.end_date = Some(p.start_date);
        assert!(check_fields(&p).is_ok());
    }

    #[test]
    fn fixed_day_needs_a_day_of_month() {
        let mut p = payload();
        p.payment_type = PaymentType::FixedDay;
        for day in [None, Some(0), Some(32)] {
            p.payment_day = day;
            assert_eq!(
                message(check_fields(&p).unwrap_err()),
                "payment day must be between 1 and 31 for FIXED_DAY payment type"
            );
        }
        p.payment_day = Some(15);
        assert!(check_fields(&p).is_ok());
    }

    #[test]
    fn payment_day_is_ignored_for_other_types() {
        let mut p = payload();
        p.payment_type = PaymentType::Weekly;
        p.payment_day = Some(99);
        assert!(check_fields(&p).is_ok());
    }

    #[test]
    fn times_must_be_hh_mm() {
        let mut p = payload();
        p.start_time = Some("7:00".to_string());
        assert_eq!(
            message(check_fields(&p).unwrap_err()),
            "start time must be in HH:MM format"
        );

        p.start_time = Some("07:00".to_string());
        p.end_time = Some("25:00".to_string());
        assert_eq!(
            message(check_fields(&p).unwrap_err()),
            "end time must be in HH:MM format"
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        let mut p = payload();
        p.number_of_labourers = -1;
        p.payment_type = PaymentType::FixedDay;
        assert_eq!(
            message(check_fields(&p).unwrap_err()),
            "number of labourers must be positive"
        );
    }

    #[tokio::test]
    async fn field_errors_skip_repository_lookups() {
        let mut profiles = MockBuilderProfileRepository::new();
        profiles.expect_find_by_user_id().never();
        let mut jobsites = MockJobsiteRepository::new();
        jobsites.expect_find_by_id().never();
        let service = JobValidationService::new(
            Arc::new(profiles),
            Arc::new(jobsites),
            MasterDataService::new(Arc::new(MockStore::new())),
        );

        let mut p = payload();
        p.number_of_labourers = 0;
        assert!(service.validate(Uuid::new_v4(), &p).await.is_err());
    }

    struct Fixture {
        store: Arc<MockStore>,
        service: JobValidationService,
        user_id: Uuid,
        payload: JobPayload,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MockStore::new());
        let user_id = Uuid::new_v4();
        let profile = BuilderProfileRepository::create(
            &*store,
            NewBuilderProfile {
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
            },
        )
        .await
        .unwrap()
        .unwrap();
        let site = JobsiteRepository::create(
            &*store,
            NewJobsite {
                builder_profile_id: profile.id,
                name: "Tower A".to_string(),
                address: "1 George St".to_string(),
                suburb: None,
                state: None,
                postcode: None,
                latitude: None,
                longitude: None,
                notes: None,
            },
        )
        .await
        .unwrap();
        let job_type = store
            .seed_master_item(MasterDataKind::JobType, "GENERAL", "General labour")
            .await;

        let mut payload = payload();
        payload.jobsite_id = site.id;
        payload.job_type_id = job_type;

        let service = JobValidationService::new(
            store.clone(),
            store.clone(),
            MasterDataService::new(store.clone()),
        );
        Fixture {
            store,
            service,
            user_id,
            payload,
        }
    }

    #[tokio::test]
    async fn returns_the_builder_profile_when_valid() {
        let f = fixture().await;
        let profile = f.service.validate(f.user_id, &f.payload).await.unwrap();
        assert_eq!(profile.user_id, f.user_id);
    }

    #[tokio::test]
    async fn missing_builder_profile_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .validate(Uuid::new_v4(), &f.payload)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(msg) if msg == "builder profile not found"));
    }

    #[tokio::test]
    async fn unknown_jobsite_and_job_type_are_rejected() {
        let f = fixture().await;

        let mut p = f.payload.clone();
        p.jobsite_id = Uuid::new_v4();
        let err = f.service.validate(f.user_id, &p).await.unwrap_err();
        assert_eq!(message(err), "jobsite not found");

        let mut p = f.payload.clone();
        p.job_type_id = Uuid::new_v4();
        let err = f.service.validate(f.user_id, &p).await.unwrap_err();
        assert_eq!(message(err), "job type not found");

        let mut p = f.payload.clone();
        p.experience_level_id = Some(Uuid::new_v4());
        let err = f.service.validate(f.user_id, &p).await.unwrap_err();
        assert_eq!(message(err), "experience level not found");
    }

    #[tokio::test]
    async fn foreign_jobsite_is_forbidden() {
        let f = fixture().await;
        let other_user = Uuid::new_v4();
        BuilderProfileRepository::create(
            &*f.store,
            NewBuilderProfile {
                user_id: other_user,
                company_name: "Other Co".to_string(),
                abn: None,
                contact_name: None,
                phone: None,
                address: None,
                suburb: None,
                state: None,
                postcode: None,
                website: None,
                description: None,
            },
        )
        .await
        .unwrap();

        let err = f.service.validate(other_user, &f.payload).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(msg) if msg == "jobsite does not belong to builder"));
    }

    #[tokio::test]
    async fn unknown_requirement_ids_are_named() {
        let f = fixture().await;
        let license = f
            .store
            .seed_master_item(MasterDataKind::License, "WHITE_CARD", "White Card")
            .await;
        let bogus = Uuid::new_v4();

        let mut p = f.payload.clone();
        p.license_ids = vec![license, bogus];
        let err = f.service.validate(f.user_id, &p).await.unwrap_err();
        assert_eq!(message(err), format!("invalid license ID: {}", bogus));

        let mut p = f.payload.clone();
        p.skill_ids = vec![bogus];
        let err = f.service.validate(f.user_id, &p).await.unwrap_err();
        assert_eq!(message(err), format!("invalid skill ID: {}", bogus));
    }
}
