//! Configuration loading for the tuition ledger.
//!
//! Loads the school settings, the school-year calendar and the tariff
//! schedule from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use tuition_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/school").unwrap();
//! println!("Loaded school: {}", config.school().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{SchoolCalendar, SchoolConfig, UploadLimits};
