//! # Edu Planner
//!
//! Three-stage pipeline for project-based-learning course requests:
//! - `parser`: free-form JSON request → `ParsedRequirement`
//! - `scheduler`: parsed request → phase-by-phase `ScheduleTemplate`
//! - `validators`: generated course document → weighted `QualityReport`
//!
//! Every stage degrades to a documented fallback instead of failing, so a
//! caller always gets a usable value plus warnings.

pub mod parser;
pub mod render;
pub mod scheduler;
pub mod text;
pub mod types;
pub mod validators;

pub use parser::{ParseError, RequirementParser};
pub use scheduler::{ScheduleError, TimeScheduler};
pub use types::{
    AgeGroup, AgeRange, ParsedRequirement, QualityReport, ScheduleTemplate, TimeMode,
    TotalDuration, ValidationResult,
};
pub use validators::{QualityValidator, RuleKind};
