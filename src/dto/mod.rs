//! Presentation structs handed to templates.

pub mod builds;
