pub mod application_service;
pub mod assignment_service;
pub mod auth_service;
pub mod job_service;
pub mod job_validation_service;
pub mod jobsite_service;
pub mod master_data_service;
pub mod profile_service;
