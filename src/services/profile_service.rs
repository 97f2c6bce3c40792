use std::sync::Arc;
use uuid::Uuid;

use crate::dto::profile_dto::{
    CreateBuilderProfilePayload, CreateLabourProfilePayload, UpdateBuilderProfilePayload,
    UpdateLabourProfilePayload,
};
use crate::error::{Error, Result};
use crate::models::builder_profile::BuilderProfile;
use crate::models::labour_profile::{LabourProfile, LabourProfileDetails};
use crate::models::master_data::MasterDataKind;
use crate::repositories::{BuilderProfileRepository, LabourProfileRepository};
use crate::services::master_data_service::MasterDataService;

#[derive(Clone)]
pub struct ProfileService {
    builder_profiles: Arc<dyn BuilderProfileRepository>,
    labour_profiles: Arc<dyn LabourProfileRepository>,
    master_data: MasterDataService,
}

impl ProfileService {
    pub fn new(
        builder_profiles: Arc<dyn BuilderProfileRepository>,
        labour_profiles: Arc<dyn LabourProfileRepository>,
        master_data: MasterDataService,
    ) -> Self {
        Self {
            builder_profiles,
            labour_profiles,
            master_data,
        }
    }

    pub async fn create_builder(
        &self,
        user_id: Uuid,
        payload: CreateBuilderProfilePayload,
    ) -> Result<BuilderProfile> {
        let profile = self
            .builder_profiles
            .create(payload.into_new(user_id))
            .await?
            .ok_or_else(|| Error::Conflict("Builder profile already exists".to_string()))?;
        tracing::info!(builder_profile_id = %profile.id, user_id = %user_id, "builder profile created");
        Ok(profile)
    }

    pub async fn builder_for_user(&self, user_id: Uuid) -> Result<BuilderProfile> {
        self.builder_profiles
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("builder profile not found".to_string()))
    }

    pub async fn update_builder(
        &self,
        user_id: Uuid,
        payload: UpdateBuilderProfilePayload,
    ) -> Result<BuilderProfile> {
        let existing = self.builder_for_user(user_id).await?;
        self.builder_profiles
            .update(existing.id, payload.into())
            .await?
            .ok_or_else(|| Error::NotFound("builder profile not found".to_string()))
    }

    async fn ensure_experience_level(&self, id: Option<Uuid>) -> Result<()> {
        let Some(id) = id else {
            return Ok(());
        };
        self.master_data
            .ensure_all_exist(MasterDataKind::ExperienceLevel, &[id])
            .await
    }

    /// Validates every referenced lookup id, then writes the profile and its
    /// license/skill rows together.
    pub async fn create_labour(
        &self,
        user_id: Uuid,
        payload: CreateLabourProfilePayload,
    ) -> Result<LabourProfileDetails> {
        self.ensure_experience_level(payload.experience_level_id)
            .await?;

        let license_ids: Vec<Uuid> = payload.licenses.iter().map(|l| l.license_id).collect();
        self.master_data
            .ensure_all_exist(MasterDataKind::License, &license_ids)
            .await?;

        let skill_ids: Vec<Uuid> = payload.skills.iter().map(|s| s.skill_id).collect();
        self.master_data
            .ensure_all_exist(MasterDataKind::Skill, &skill_ids)
            .await?;

        let skill_levels: Vec<Uuid> = payload
            .skills
            .iter()
            .filter_map(|s| s.experience_level_id)
            .collect();
        self.master_data
            .ensure_all_exist(MasterDataKind::ExperienceLevel, &skill_levels)
            .await?;

        let (profile, licenses, skills) = payload.into_parts(user_id);
        let details = self
            .labour_profiles
            .create(profile, licenses, skills)
            .await?
            .ok_or_else(|| Error::Conflict("Labour profile already exists".to_string()))?;
        tracing::info!(
            labour_profile_id = %details.profile.id,
            licenses = details.licenses.len(),
            skills = details.skills.len(),
            "labour profile created"
        );
        Ok(details)
    }

    pub async fn labour_for_user(&self, user_id: Uuid) -> Result<LabourProfileDetails> {
        self.labour_profiles
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("labour profile not found".to_string()))
    }

    pub async fn labour_by_id(&self, id: Uuid) -> Result<LabourProfileDetails> {
        self.labour_profiles
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("labour profile not found".to_string()))
    }

    pub async fn update_labour(
        &self,
        user_id: Uuid,
        payload: UpdateLabourProfilePayload,
    ) -> Result<LabourProfile> {
        self.ensure_experience_level(payload.experience_level_id)
            .await?;
        let existing = self.labour_for_user(user_id).await?;
        self.labour_profiles
            .update(existing.profile.id, payload.into())
            .await?
            .ok_or_else(|| Error::NotFound("labour profile not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::profile_dto::{LabourLicenseInput, LabourSkillInput};
    use crate::repositories::mocks::MockStore;
    use crate::repositories::MockLabourProfileRepository;

    fn service(store: Arc<MockStore>) -> ProfileService {
        ProfileService::new(
            store.clone(),
            store.clone(),
            MasterDataService::new(store),
        )
    }

    fn labour_payload() -> CreateLabourProfilePayload {
        CreateLabourProfilePayload {
            first_name: "Sam".to_string(),
            last_name: "Nguyen".to_string(),
            phone: None,
            bio: None,
            suburb: Some("Parramatta".to_string()),
            state: Some("NSW".to_string()),
            postcode: None,
            experience_level_id: None,
            hourly_rate: None,
            has_own_transport: true,
            is_available: true,
            licenses: vec![],
            skills: vec![],
        }
    }

    fn builder_payload(abn: Option<&str>) -> CreateBuilderProfilePayload {
        CreateBuilderProfilePayload {
            company_name: "Harbour Constructions".to_string(),
            abn: abn.map(str::to_string),
            contact_name: None,
            phone: None,
            address: None,
            suburb: None,
            state: None,
            postcode: None,
            website: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn second_builder_profile_conflicts() {
        let svc = service(Arc::new(MockStore::new()));
        let user = Uuid::new_v4();
        svc.create_builder(user, builder_payload(None)).await.unwrap();

        let err = svc
            .create_builder(user, builder_payload(None))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(msg) if msg == "Builder profile already exists"));
    }

    #[tokio::test]
    async fn taken_abn_is_reported_for_a_different_builder() {
        let svc = service(Arc::new(MockStore::new()));
        svc.create_builder(Uuid::new_v4(), builder_payload(Some("12345678901")))
            .await
            .unwrap();

        let newcomer = Uuid::new_v4();
        let err = svc
            .create_builder(newcomer, builder_payload(Some("12345678901")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(msg) if msg == "ABN already registered"));
        assert!(matches!(
            svc.builder_for_user(newcomer).await,
            Err(Error::NotFound(_))
        ));

        svc.create_builder(newcomer, builder_payload(Some("98765432109")))
            .await
            .unwrap();
        let err = svc
            .update_builder(
                newcomer,
                UpdateBuilderProfilePayload {
                    abn: Some("12345678901".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(msg) if msg == "ABN already registered"));
    }

    #[tokio::test]
    async fn labour_profile_is_stored_with_children() {
        let store = Arc::new(MockStore::new());
        let license = store
            .seed_master_item(MasterDataKind::License, "WHITE_CARD", "White Card")
            .await;
        let skill = store
            .seed_master_item(MasterDataKind::Skill, "CONCRETING", "Concreting")
            .await;
        let svc = service(store);
        let user = Uuid::new_v4();

        let mut payload = labour_payload();
        payload.licenses.push(LabourLicenseInput {
            license_id: license,
            license_number: Some("WC-1234".to_string()),
            expiry_date: None,
        });
        payload.skills.push(LabourSkillInput {
            skill_id: skill,
            experience_level_id: None,
        });

        let details = svc.create_labour(user, payload).await.unwrap();
        assert_eq!(details.licenses.len(), 1);
        assert_eq!(details.skills.len(), 1);

        let fetched = svc.labour_for_user(user).await.unwrap();
        assert_eq!(fetched.profile.id, details.profile.id);

        let err = svc.create_labour(user, labour_payload()).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(msg) if msg == "Labour profile already exists"));
    }

    #[tokio::test]
    async fn unknown_license_stops_before_insert() {
        let mut repo = MockLabourProfileRepository::new();
        repo.expect_create().never();
        let store = Arc::new(MockStore::new());
        let svc = ProfileService::new(store.clone(), Arc::new(repo), MasterDataService::new(store));

        let bogus = Uuid::new_v4();
        let mut payload = labour_payload();
        payload.licenses.push(LabourLicenseInput {
            license_id: bogus,
            license_number: None,
            expiry_date: None,
        });

        let err = svc
            .create_labour(Uuid::new_v4(), payload)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(msg) if msg == format!("invalid license ID: {}", bogus)));
    }

    #[tokio::test]
    async fn update_labour_toggles_availability() {
        let svc = service(Arc::new(MockStore::new()));
        let user = Uuid::new_v4();
        svc.create_labour(user, labour_payload()).await.unwrap();

        let updated = svc
            .update_labour(
                user,
                UpdateLabourProfilePayload {
                    is_available: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_available);
        assert_eq!(updated.first_name, "Sam");
    }
}
