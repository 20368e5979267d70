//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks over the full route table)
//!     → RoutesConfig (validated, immutable)
//!     → handed to RouterEngine
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → RouterEngine swaps in the new async routes
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults; route tables default to the built-in console
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::ObservabilityConfig;
pub use schema::PermissionConfig;
pub use schema::RouterSettings;
pub use schema::RoutesConfig;
