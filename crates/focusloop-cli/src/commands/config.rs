use clap::Subcommand;
use focusloop_core::settings::{SettingField, SettingsPatch};

use crate::context::{CliResult, Context};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print all settings as JSON
    Show,
    /// Get a setting (e.g. "pomodoro_minutes", "volume")
    Get {
        /// Setting key
        key: String,
    },
    /// Change a setting
    Set {
        /// Setting key
        key: String,
        /// New value; lists are comma separated, "none" clears a recitation id
        value: String,
    },
    /// Restore default settings
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    let ctx = Context::load()?;
    let mut store = ctx.open_store();

    match action {
        ConfigAction::Show => {
            let json = serde_json::to_string_pretty(store.get())?;
            println!("{json}");
        }
        ConfigAction::Get { key } => {
            let field = SettingField::from_key(&key).ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{}", store.get().get(field));
        }
        ConfigAction::Set { key, value } => {
            let patch = SettingsPatch::from_key_value(&key, &value)?;
            let outcome = store.update(&patch);
            if let Some(rejection) = outcome.rejected.first() {
                return Err(format!("{}: {}", rejection.field.key(), rejection.error).into());
            }
            println!("ok");
        }
        ConfigAction::Reset => {
            store.reset();
            println!("settings reset to defaults");
        }
    }

    if let Some(warning) = store.take_persistence_warning() {
        eprintln!("warning: {warning}");
    }
    Ok(())
}
