//! Configuration loading and schema

mod file_config;
mod loader;

pub use file_config::{
    API_KEY_ENV, AuditSettings, DEFAULT_BASE_URL, DebateSettings, FileConfig, GatewaySettings,
    ModelSettings, ModerationSettings,
};
pub use loader::ConfigLoader;
