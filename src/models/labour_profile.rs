use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LabourProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub experience_level_id: Option<Uuid>,
    pub hourly_rate: Option<Decimal>,
    pub has_own_transport: bool,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LabourLicense {
    pub id: Uuid,
    pub labour_profile_id: Uuid,
    pub license_id: Uuid,
    pub license_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LabourSkill {
    pub id: Uuid,
    pub labour_profile_id: Uuid,
    pub skill_id: Uuid,
    pub experience_level_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabourProfileDetails {
    #[serde(flatten)]
    pub profile: LabourProfile,
    pub licenses: Vec<LabourLicense>,
    pub skills: Vec<LabourSkill>,
}

#[derive(Debug, Clone)]
pub struct NewLabourProfile {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub experience_level_id: Option<Uuid>,
    pub hourly_rate: Option<Decimal>,
    pub has_own_transport: bool,
    pub is_available: bool,
}

#[derive(Debug, Clone)]
pub struct NewLabourLicense {
    pub license_id: Uuid,
    pub license_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct NewLabourSkill {
    pub skill_id: Uuid,
    pub experience_level_id: Option<Uuid>,
}

/// Partial update of the scalar profile fields.
#[derive(Debug, Clone, Default)]
pub struct LabourProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub experience_level_id: Option<Uuid>,
    pub hourly_rate: Option<Decimal>,
    pub has_own_transport: Option<bool>,
    pub is_available: Option<bool>,
}
