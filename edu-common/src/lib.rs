//! # Edu Common Library
//!
//! Shared code for the course planning crates:
//! - Error type and result alias
//! - Layered TOML configuration (CLI → ENV → user config → defaults)
//! - Timestamp and identifier helpers

pub mod config;
pub mod error;
pub mod time;

pub use config::PlannerConfig;
pub use error::{Error, Result};
