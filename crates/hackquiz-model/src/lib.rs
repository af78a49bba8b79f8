pub mod analytics;
pub mod quiz;
pub mod score;
pub mod session;
pub mod status;
pub mod submission;
