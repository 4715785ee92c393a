//! Diesel row models and their conversions into domain entities.

pub mod build;
pub mod component;
#[cfg(feature = "server")]
pub mod config;
pub mod user;
