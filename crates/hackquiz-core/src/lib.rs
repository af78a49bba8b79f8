pub mod analytics;
pub mod repository;
pub mod scoring;
pub mod session;
pub mod status;
