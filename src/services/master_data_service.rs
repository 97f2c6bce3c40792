use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::master_data::{MasterDataKind, MasterItem};
use crate::repositories::MasterDataRepository;

#[derive(Clone)]
pub struct MasterDataService {
    master_data: Arc<dyn MasterDataRepository>,
}

impl MasterDataService {
    pub fn new(master_data: Arc<dyn MasterDataRepository>) -> Self {
        Self { master_data }
    }

    pub async fn list(&self, kind: MasterDataKind) -> Result<Vec<MasterItem>> {
        self.master_data.list(kind).await
    }

    pub async fn get(&self, kind: MasterDataKind, id: Uuid) -> Result<MasterItem> {
        self.master_data
            .find(kind, id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("{} not found", kind.label())))
    }

    pub async fn exists(&self, kind: MasterDataKind, id: Uuid) -> Result<bool> {
        Ok(self.master_data.find(kind, id).await?.is_some())
    }

    /// First id in `ids` (in request order) that has no row, checked with one
    /// round trip.
    pub async fn first_missing(&self, kind: MasterDataKind, ids: &[Uuid]) -> Result<Option<Uuid>> {
        if ids.is_empty() {
            return Ok(None);
        }
        let found: HashSet<Uuid> = self
            .master_data
            .existing_ids(kind, ids)
            .await?
            .into_iter()
            .collect();
        Ok(ids.iter().copied().find(|id| !found.contains(id)))
    }

    /// Fails with 400 `invalid <label> ID: <id>` for the first unknown id.
    pub async fn ensure_all_exist(&self, kind: MasterDataKind, ids: &[Uuid]) -> Result<()> {
        match self.first_missing(kind, ids).await? {
            Some(id) => Err(Error::BadRequest(format!(
                "invalid {} ID: {}",
                kind.label(),
                id
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::mocks::MockStore;
    use crate::repositories::MockMasterDataRepository;

    #[tokio::test]
    async fn first_missing_keeps_request_order() {
        let store = Arc::new(MockStore::new());
        let known = store
            .seed_master_item(MasterDataKind::Skill, "FORMWORK", "Formwork")
            .await;
        let service = MasterDataService::new(store);

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let missing = service
            .first_missing(MasterDataKind::Skill, &[known, a, b])
            .await
            .unwrap();
        assert_eq!(missing, Some(a));
    }

    #[tokio::test]
    async fn ensure_all_exist_names_the_kind() {
        let service = MasterDataService::new(Arc::new(MockStore::new()));
        let id = Uuid::new_v4();
        let err = service
            .ensure_all_exist(MasterDataKind::License, &[id])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), format!("Bad request: invalid license ID: {}", id));
    }

    #[tokio::test]
    async fn empty_id_list_skips_the_lookup() {
        let mut repo = MockMasterDataRepository::new();
        repo.expect_existing_ids().never();
        let service = MasterDataService::new(Arc::new(repo));
        assert!(service
            .first_missing(MasterDataKind::Skill, &[])
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn get_reports_missing_item_by_label() {
        let mut repo = MockMasterDataRepository::new();
        repo.expect_find().returning(|_, _| Ok(None));
        let service = MasterDataService::new(Arc::new(repo));
        let err = service
            .get(MasterDataKind::JobType, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(msg) if msg == "job type not found"));
    }
}
