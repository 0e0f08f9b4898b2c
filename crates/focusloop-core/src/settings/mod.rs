mod model;
mod patch;
mod store;

pub use model::TimerSettings;
pub use patch::{FieldRejection, SettingField, SettingsPatch, UpdateOutcome};
pub use store::{SettingsStore, FOCUS_COUNT_KEY, SETTINGS_KEY};
