//! The four model-backed flows: each declares its input/output schema and
//! collapses every failure into [`crate::ai::client::AiError`].

pub mod build_pc;
pub mod compatibility;
pub mod find_prices;
pub mod product_details;
