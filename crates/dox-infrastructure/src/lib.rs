//! Filesystem concerns of dox: platform paths, the state file holding the
//! saved theme, and the configuration file.

pub mod config_service;
pub mod paths;
pub mod state_file;
pub mod theme_repository;

pub use config_service::ConfigService;
pub use paths::DoxPaths;
pub use state_file::{SavedState, StateFile};
pub use theme_repository::TomlThemeRepository;
