pub mod manager;


pub use manager::{Settings, SettingsManager, SETTINGS_FILE};
