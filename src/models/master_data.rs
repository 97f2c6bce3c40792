use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The five lookup tables that share the `MasterItem` row shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MasterDataKind {
    ExperienceLevel,
    License,
    JobType,
    Qualification,
    Skill,
}

impl MasterDataKind {
    pub const ALL: [MasterDataKind; 5] = [
        MasterDataKind::ExperienceLevel,
        MasterDataKind::License,
        MasterDataKind::JobType,
        MasterDataKind::Qualification,
        MasterDataKind::Skill,
    ];

    pub fn table(&self) -> &'static str {
        match self {
            MasterDataKind::ExperienceLevel => "experience_levels",
            MasterDataKind::License => "licenses",
            MasterDataKind::JobType => "job_types",
            MasterDataKind::Qualification => "qualifications",
            MasterDataKind::Skill => "skills",
        }
    }

    /// Collection segment under `/api/v1`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            MasterDataKind::ExperienceLevel => "experience-levels",
            MasterDataKind::License => "licenses",
            MasterDataKind::JobType => "job-types",
            MasterDataKind::Qualification => "qualifications",
            MasterDataKind::Skill => "skills",
        }
    }

    /// Lowercase singular used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            MasterDataKind::ExperienceLevel => "experience level",
            MasterDataKind::License => "license",
            MasterDataKind::JobType => "job type",
            MasterDataKind::Qualification => "qualification",
            MasterDataKind::Skill => "skill",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MasterItem {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMasterItem {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

impl NewMasterItem {
    pub fn new(code: &str, name: &str, description: Option<&str>, sort_order: i32) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            sort_order,
        }
    }
}
