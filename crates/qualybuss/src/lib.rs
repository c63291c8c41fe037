pub mod batch;
pub mod calendar;
pub mod collaborator;
pub mod config;
pub mod documents;
pub mod error;
pub mod export;
pub mod leave;
pub mod session;
pub mod telemetry;
