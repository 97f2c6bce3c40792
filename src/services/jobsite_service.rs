use std::sync::Arc;
use uuid::Uuid;

use crate::dto::job_dto::{CreateJobsitePayload, UpdateJobsitePayload};
use crate::error::{Error, Result};
use crate::models::jobsite::Jobsite;
use crate::repositories::{BuilderProfileRepository, JobsiteRepository};
use crate::services::job_service::builder_profile_for;

#[derive(Clone)]
pub struct JobsiteService {
    jobsites: Arc<dyn JobsiteRepository>,
    builder_profiles: Arc<dyn BuilderProfileRepository>,
}

impl JobsiteService {
    pub fn new(
        jobsites: Arc<dyn JobsiteRepository>,
        builder_profiles: Arc<dyn BuilderProfileRepository>,
    ) -> Self {
        Self {
            jobsites,
            builder_profiles,
        }
    }

    pub async fn create(&self, user_id: Uuid, payload: CreateJobsitePayload) -> Result<Jobsite> {
        let profile = builder_profile_for(self.builder_profiles.as_ref(), user_id).await?;
        let site = self.jobsites.create(payload.into_new(profile.id)).await?;
        tracing::info!(jobsite_id = %site.id, builder_profile_id = %profile.id, "jobsite created");
        Ok(site)
    }

    pub async fn list_mine(&self, user_id: Uuid) -> Result<Vec<Jobsite>> {
        let profile = builder_profile_for(self.builder_profiles.as_ref(), user_id).await?;
        self.jobsites.list_by_builder(profile.id).await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Jobsite> {
        let profile = builder_profile_for(self.builder_profiles.as_ref(), user_id).await?;
        let site = self
            .jobsites
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("jobsite not found".to_string()))?;
        if site.builder_profile_id != profile.id {
            return Err(Error::Forbidden(
                "jobsite does not belong to builder".to_string(),
            ));
        }
        Ok(site)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: UpdateJobsitePayload,
    ) -> Result<Jobsite> {
        self.get(user_id, id).await?;
        self.jobsites
            .update(id, payload.into())
            .await?
            .ok_or_else(|| Error::NotFound("jobsite not found".to_string()))
    }

    /// Fails with 409 while jobs still reference the site.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        self.get(user_id, id).await?;
        if !self.jobsites.delete(id).await? {
            return Err(Error::NotFound("jobsite not found".to_string()));
        }
        tracing::info!(jobsite_id = %id, "jobsite deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::builder_profile::NewBuilderProfile;
    use crate::repositories::mocks::MockStore;

    async fn builder(store: &MockStore, company: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        BuilderProfileRepository::create(
            store,
            NewBuilderProfile {
                user_id,
                company_name: company.to_string(),
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
        user_id
    }

    fn site_payload(name: &str) -> CreateJobsitePayload {
        CreateJobsitePayload {
            name: name.to_string(),
            address: "12 Pitt St".to_string(),
            suburb: Some("Sydney".to_string()),
            state: Some("NSW".to_string()),
            postcode: Some("2000".to_string()),
            latitude: None,
            longitude: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn create_requires_builder_profile() {
        let store = Arc::new(MockStore::new());
        let svc = JobsiteService::new(store.clone(), store);
        let err = svc
            .create(Uuid::new_v4(), site_payload("Site"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn other_builders_cannot_touch_the_site() {
        let store = Arc::new(MockStore::new());
        let owner = builder(&store, "Owner Pty").await;
        let intruder = builder(&store, "Intruder Pty").await;
        let svc = JobsiteService::new(store.clone(), store);

        let site = svc.create(owner, site_payload("Block B")).await.unwrap();

        let err = svc.get(intruder, site.id).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(msg) if msg == "jobsite does not belong to builder"));
        assert!(svc.delete(intruder, site.id).await.is_err());

        svc.delete(owner, site.id).await.unwrap();
        let err = svc.get(owner, site.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn update_keeps_unset_fields() {
        let store = Arc::new(MockStore::new());
        let owner = builder(&store, "Owner Pty").await;
        let svc = JobsiteService::new(store.clone(), store);
        let site = svc.create(owner, site_payload("Block C")).await.unwrap();

        let updated = svc
            .update(
                owner,
                site.id,
                UpdateJobsitePayload {
                    notes: Some("Gate code 4411".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Block C");
        assert_eq!(updated.notes.as_deref(), Some("Gate code 4411"));
    }
}
