pub mod applicant;
pub mod auth;
pub mod config;
pub mod error;
pub mod quote;
pub mod rating;
pub mod reference;
pub mod settings;
pub mod types;
