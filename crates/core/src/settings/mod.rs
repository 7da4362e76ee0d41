//! Settings module - runtime configuration for the serving layer.

mod settings_model;

// Re-export the public interface
pub use settings_model::Settings;
