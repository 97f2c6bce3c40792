pub mod application;
pub mod assignment;
pub mod builder_profile;
pub mod job;
pub mod jobsite;
pub mod labour_profile;
pub mod master_data;
pub mod user;
