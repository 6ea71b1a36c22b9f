//! Core domain types and logic.

pub mod price;
pub mod series;
pub mod detector;
pub mod summary;
pub mod analysis;
pub mod config_validation;
pub mod error;
