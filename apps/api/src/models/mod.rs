pub mod applicant;
pub mod application;
pub mod offer;
pub mod position;
pub mod university;
