//! Configuration loading and application.
mod apply;
mod loader;
pub mod types;


pub use apply::{apply_config, resolve_limits};
pub use loader::{load_body_file, load_config, load_config_file};
