use std::error::Error;
use std::path::Path;

use crate::cli::commands::{SettingsAction, SettingsCmd};
use crate::cli::output::{SettingsJson, format_settings};
use crate::io::config_io;
use crate::model::config::LlmProvider;

pub fn cmd_settings(args: SettingsCmd, json: bool, dir: &Path) -> Result<(), Box<dyn Error>> {
    let settings = match args.action.unwrap_or(SettingsAction::Show) {
        SettingsAction::Show => config_io::read_settings(dir)?,
        SettingsAction::Set { key, value } => config_io::set_setting(dir, &key, &value)?,
        SettingsAction::Provider { name } => {
            let provider: LlmProvider = name.parse()?;
            config_io::set_provider(dir, provider)?
        }
        SettingsAction::Reset => config_io::reset_settings(dir)?,
        SettingsAction::Path => {
            println!("{}", config_io::settings_path(dir).display());
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&SettingsJson::from(&settings))?);
    } else {
        println!("{}", format_settings(&settings));
    }
    Ok(())
}
