pub mod commission;
pub mod constants;
pub mod dashboard;
pub mod property;
pub mod user;
