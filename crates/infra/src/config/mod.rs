//! Configuration loading
//!
//! Builds a [`wildwelcome_domain::Config`] from a config file, environment
//! variables and built-in defaults.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    apply_env_overrides_from, load, load_from_env, load_from_file, probe_config_paths,
    probe_config_paths_from, validate,
};
