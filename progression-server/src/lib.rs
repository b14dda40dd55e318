//! Progression Server Library
//!
//! Storage boundary and orchestration around `progression_core`:
//! - Repository traits with in-memory and PostgreSQL backends
//! - Schema migrations and badge catalog seeding
//! - `ProgressionService`: atomic XP awards, level-up detection,
//!   idempotent badge awards, profile views
//! - Configuration from environment or JSON

pub mod config;
pub mod error;
pub mod service;
pub mod storage;

pub use config::{ServerConfig, StorageBackend, StorageConfig};
pub use error::{ServiceError, ServiceResult};
pub use service::{AccountContext, AwardResult, ProgressProfile, ProgressionService, XpAward};
pub use storage::repository::{StorageError, StorageManager};
