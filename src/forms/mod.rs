//! HTTP form definitions and their validated payload conversions.

pub mod auth;
pub mod builds;
pub mod components;
pub mod users;
