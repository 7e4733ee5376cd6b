pub mod activity;
pub mod publisher;
pub mod user_validation;
