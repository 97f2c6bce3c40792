use crate::error::Result;
use crate::models::master_data::{MasterDataKind, NewMasterItem};
use crate::repositories::MasterDataRepository;

fn items(rows: &[(&str, &str, Option<&str>)]) -> Vec<NewMasterItem> {
    rows.iter()
        .enumerate()
        .map(|(i, (code, name, description))| {
            NewMasterItem::new(code, name, *description, (i as i32 + 1) * 10)
        })
        .collect()
}

/// Built-in lookup rows for `kind`, in display order.
pub fn defaults(kind: MasterDataKind) -> Vec<NewMasterItem> {
    match kind {
        MasterDataKind::ExperienceLevel => items(&[
            ("ENTRY", "Entry level", Some("No prior site experience required")),
            ("JUNIOR", "Junior", Some("Up to 2 years on site")),
            ("INTERMEDIATE", "Intermediate", Some("2 to 5 years on site")),
            ("SENIOR", "Senior", Some("5 or more years on site")),
            ("EXPERT", "Expert", Some("Leading hand or supervisor")),
        ]),
        MasterDataKind::License => items(&[
            ("WHITE_CARD", "White Card", Some("General construction induction")),
            ("DRIVERS_C", "Driver Licence (C)", None),
            ("DRIVERS_HR", "Heavy Rigid Licence (HR)", None),
            ("FORKLIFT_LF", "Forklift Licence (LF)", None),
            ("EWP", "Elevating Work Platform", None),
            ("DOGGING_DG", "Dogging (DG)", None),
            ("RIGGING_RB", "Basic Rigging (RB)", None),
            ("SCAFFOLD_SB", "Basic Scaffolding (SB)", None),
            ("TRAFFIC_CONTROL", "Traffic Control", None),
            ("WORKING_AT_HEIGHTS", "Working at Heights", None),
            ("CONFINED_SPACE", "Confined Space Entry", None),
            ("FIRST_AID", "First Aid Certificate", None),
        ]),
        MasterDataKind::JobType => items(&[
            ("GENERAL_LABOUR", "General labour", None),
            ("DEMOLITION", "Demolition", None),
            ("CONCRETING", "Concreting", None),
            ("FORMWORK", "Formwork", None),
            ("SCAFFOLDING", "Scaffolding", None),
            ("TRAFFIC_CONTROL", "Traffic control", None),
            ("SITE_CLEANING", "Site cleaning", None),
            ("LANDSCAPING", "Landscaping", None),
            ("CARPENTRY", "Carpentry", None),
            ("STEEL_FIXING", "Steel fixing", None),
        ]),
        MasterDataKind::Qualification => items(&[
            ("CERT_II_CONSTRUCTION", "Certificate II in Construction", None),
            ("CERT_III_CARPENTRY", "Certificate III in Carpentry", None),
            ("CERT_III_CONCRETING", "Certificate III in Concreting", None),
            ("CERT_IV_BUILDING", "Certificate IV in Building and Construction", None),
            ("DIPLOMA_BUILDING", "Diploma of Building and Construction", None),
        ]),
        MasterDataKind::Skill => items(&[
            ("MANUAL_HANDLING", "Manual handling", None),
            ("POWER_TOOLS", "Power tools", None),
            ("CONCRETE_FINISHING", "Concrete finishing", None),
            ("BRICKLAYING", "Bricklaying", None),
            ("TILING", "Tiling", None),
            ("PAINTING", "Painting", None),
            ("PLASTERING", "Plastering", None),
            ("EXCAVATION", "Excavation", None),
            ("PLANT_OPERATION", "Plant operation", None),
            ("SITE_SAFETY", "Site safety", None),
        ]),
    }
}

/// Upserts the defaults for `kind` by code. Returns the number of rows written.
pub async fn seed_kind(repo: &dyn MasterDataRepository, kind: MasterDataKind) -> Result<usize> {
    let rows = defaults(kind);
    let count = rows.len();
    for item in rows {
        repo.upsert(kind, item).await?;
    }
    tracing::info!(table = kind.table(), rows = count, "seeded master data");
    Ok(count)
}

pub async fn seed_all(repo: &dyn MasterDataRepository) -> Result<usize> {
    let mut total = 0;
    for kind in MasterDataKind::ALL {
        total += seed_kind(repo, kind).await?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::mocks::MockStore;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique_per_kind() {
        for kind in MasterDataKind::ALL {
            let rows = defaults(kind);
            assert!(!rows.is_empty());
            let codes: HashSet<_> = rows.iter().map(|r| r.code.as_str()).collect();
            assert_eq!(codes.len(), rows.len(), "duplicate code in {:?}", kind);
        }
    }

    #[tokio::test]
    async fn reseeding_does_not_duplicate_rows() {
        let store = MockStore::new();
        let first = seed_all(&store).await.unwrap();
        seed_all(&store).await.unwrap();

        let mut listed = 0;
        for kind in MasterDataKind::ALL {
            listed += store.list(kind).await.unwrap().len();
        }
        assert_eq!(listed, first);
    }
}
