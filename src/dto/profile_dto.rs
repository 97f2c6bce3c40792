use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::builder_profile::{BuilderProfileUpdate, NewBuilderProfile};
use crate::models::labour_profile::{
    LabourProfileUpdate, NewLabourLicense, NewLabourProfile, NewLabourSkill,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBuilderProfilePayload {
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(length(min = 11, max = 11))]
    pub abn: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateBuilderProfilePayload {
    #[validate(length(min = 1, max = 200))]
    pub company_name: Option<String>,
    #[validate(length(min = 11, max = 11))]
    pub abn: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabourLicenseInput {
    pub license_id: Uuid,
    pub license_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabourSkillInput {
    pub skill_id: Uuid,
    pub experience_level_id: Option<Uuid>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLabourProfilePayload {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    pub phone: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub experience_level_id: Option<Uuid>,
    pub hourly_rate: Option<Decimal>,
    #[serde(default)]
    pub has_own_transport: bool,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub licenses: Vec<LabourLicenseInput>,
    #[serde(default)]
    pub skills: Vec<LabourSkillInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateLabourProfilePayload {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    pub phone: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub experience_level_id: Option<Uuid>,
    pub hourly_rate: Option<Decimal>,
    pub has_own_transport: Option<bool>,
    pub is_available: Option<bool>,
}

impl CreateBuilderProfilePayload {
    pub fn into_new(self, user_id: Uuid) -> NewBuilderProfile {
        NewBuilderProfile {
            user_id,
            company_name: self.company_name,
            abn: self.abn,
            contact_name: self.contact_name,
            phone: self.phone,
            address: self.address,
            suburb: self.suburb,
            state: self.state,
            postcode: self.postcode,
            website: self.website,
            description: self.description,
        }
    }
}

impl From<UpdateBuilderProfilePayload> for BuilderProfileUpdate {
    fn from(value: UpdateBuilderProfilePayload) -> Self {
        Self {
            company_name: value.company_name,
            abn: value.abn,
            contact_name: value.contact_name,
            phone: value.phone,
            address: value.address,
            suburb: value.suburb,
            state: value.state,
            postcode: value.postcode,
            website: value.website,
            description: value.description,
        }
    }
}

impl CreateLabourProfilePayload {
    pub fn into_parts(
        self,
        user_id: Uuid,
    ) -> (NewLabourProfile, Vec<NewLabourLicense>, Vec<NewLabourSkill>) {
        let profile = NewLabourProfile {
            user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            bio: self.bio,
            suburb: self.suburb,
            state: self.state,
            postcode: self.postcode,
            experience_level_id: self.experience_level_id,
            hourly_rate: self.hourly_rate,
            has_own_transport: self.has_own_transport,
            is_available: self.is_available,
        };
        let licenses = self
            .licenses
            .into_iter()
            .map(|l| NewLabourLicense {
                license_id: l.license_id,
                license_number: l.license_number,
                expiry_date: l.expiry_date,
            })
            .collect();
        let skills = self
            .skills
            .into_iter()
            .map(|s| NewLabourSkill {
                skill_id: s.skill_id,
                experience_level_id: s.experience_level_id,
            })
            .collect();
        (profile, licenses, skills)
    }
}

impl From<UpdateLabourProfilePayload> for LabourProfileUpdate {
    fn from(value: UpdateLabourProfilePayload) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            bio: value.bio,
            suburb: value.suburb,
            state: value.state,
            postcode: value.postcode,
            experience_level_id: value.experience_level_id,
            hourly_rate: value.hourly_rate,
            has_own_transport: value.has_own_transport,
            is_available: value.is_available,
        }
    }
}
