pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{AppMode, AuthEndpoints, Settings, SettingsError};
