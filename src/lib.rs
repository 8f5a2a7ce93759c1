// src/lib.rs

pub mod config;
pub mod core;
pub mod errors;
pub mod learning;
pub mod persistence;
pub mod report;

pub use crate::config::TrainConfig;
pub use crate::core::engine::Ibm1Model;
pub use crate::core::snapshot::{ModelSnapshot, Translation};
pub use crate::errors::{AlignError, Result};
