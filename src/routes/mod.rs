pub mod applications;
pub mod assignments;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod jobsites;
pub mod master_data;
pub mod profiles;
