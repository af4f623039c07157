use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::io::atomic_write;
use crate::model::config::{LlmProvider, Settings};

pub const SETTINGS_FILE: &str = "settings.toml";

/// Error type for settings I/O
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse settings.toml: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not serialize settings.toml: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("could not edit settings.toml: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("unknown setting: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Keys accepted by [`set_setting`]
pub const SETTING_KEYS: &[&str] = &[
    "max_chars_per_post",
    "include_numbering",
    "auto_add_continue",
    "llm.provider",
    "llm.model",
    "llm.api_key",
];

/// Settings directory, respecting XDG_CONFIG_HOME. `override_dir` wins.
pub fn config_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    config_home.join("threader")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILE)
}

/// Read settings from `dir`. A missing file gives defaults; a corrupted file
/// is backed up as `settings.toml.bak` and defaults are returned.
pub fn read_settings(dir: &Path) -> Result<Settings, SettingsError> {
    let path = settings_path(dir);
    if !path.exists() {
        debug!(path = %path.display(), "no settings file, using defaults");
        return Ok(Settings::default());
    }

    let text = fs::read_to_string(&path).map_err(|e| SettingsError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    match toml::from_str::<Settings>(&text) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            let bak = path.with_extension("toml.bak");
            match fs::copy(&path, &bak) {
                Ok(_) => warn!(
                    path = %path.display(),
                    backup = %bak.display(),
                    error = %e,
                    "could not parse settings, using defaults"
                ),
                Err(copy_err) => warn!(
                    path = %path.display(),
                    error = %e,
                    backup_error = %copy_err,
                    "could not parse settings or back them up, using defaults"
                ),
            }
            Ok(Settings::default())
        }
    }
}

/// Write the full settings to `dir`, replacing any existing file.
pub fn write_settings(dir: &Path, settings: &Settings) -> Result<(), SettingsError> {
    fs::create_dir_all(dir)?;
    let text = toml::to_string(settings)?;
    atomic_write(&settings_path(dir), text.as_bytes())?;
    Ok(())
}

/// Restore defaults on disk.
pub fn reset_settings(dir: &Path) -> Result<Settings, SettingsError> {
    let settings = Settings::default();
    write_settings(dir, &settings)?;
    Ok(settings)
}

/// Set one key in the settings file, keeping the rest of the file's
/// formatting and comments. Returns the resulting settings.
pub fn set_setting(dir: &Path, key: &str, value: &str) -> Result<Settings, SettingsError> {
    let mut doc = read_document(dir)?;
    apply_setting(&mut doc, key, value)?;
    write_document(dir, &doc)
}

/// Switch provider and reset the model to that provider's default.
pub fn set_provider(dir: &Path, provider: LlmProvider) -> Result<Settings, SettingsError> {
    let mut doc = read_document(dir)?;
    ensure_llm_table(&mut doc);
    doc["llm"]["provider"] = toml_edit::value(provider.as_str());
    doc["llm"]["model"] = toml_edit::value(provider.default_model());
    write_document(dir, &doc)
}

fn read_document(dir: &Path) -> Result<toml_edit::DocumentMut, SettingsError> {
    let path = settings_path(dir);
    let text = if path.exists() {
        fs::read_to_string(&path).map_err(|e| SettingsError::ReadError {
            path: path.clone(),
            source: e,
        })?
    } else {
        String::new()
    };
    Ok(text.parse::<toml_edit::DocumentMut>()?)
}

/// Validate the edited document against [`Settings`] before writing it.
fn write_document(dir: &Path, doc: &toml_edit::DocumentMut) -> Result<Settings, SettingsError> {
    let text = doc.to_string();
    let settings: Settings = toml::from_str(&text)?;
    fs::create_dir_all(dir)?;
    atomic_write(&settings_path(dir), text.as_bytes())?;
    Ok(settings)
}

fn ensure_llm_table(doc: &mut toml_edit::DocumentMut) {
    if !doc.contains_key("llm") {
        doc["llm"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
}

fn apply_setting(
    doc: &mut toml_edit::DocumentMut,
    key: &str,
    value: &str,
) -> Result<(), SettingsError> {
    let invalid = || SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    };

    match key {
        "max_chars_per_post" => {
            let n: i64 = value.trim().parse().map_err(|_| invalid())?;
            if n <= 0 {
                return Err(invalid());
            }
            doc[key] = toml_edit::value(n);
        }
        "include_numbering" | "auto_add_continue" => {
            let b: bool = value.trim().parse().map_err(|_| invalid())?;
            doc[key] = toml_edit::value(b);
        }
        "llm.provider" => {
            let provider: LlmProvider = value.parse().map_err(|_| invalid())?;
            ensure_llm_table(doc);
            doc["llm"]["provider"] = toml_edit::value(provider.as_str());
        }
        "llm.model" | "llm.api_key" => {
            let field = key.trim_start_matches("llm.");
            ensure_llm_table(doc);
            doc["llm"][field] = toml_edit::value(value);
        }
        _ => return Err(SettingsError::UnknownKey(key.to_string())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_settings() -> &'static str {
        r#"# my thread settings
max_chars_per_post = 200
include_numbering = false

[llm]
provider = "openai"
model = "gpt-4o-mini"
"#
    }

    fn dir_with(text: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(settings_path(tmp.path()), text).unwrap();
        tmp
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(read_settings(tmp.path()).unwrap(), Settings::default());
    }

    #[test]
    fn test_read_partial_file() {
        let tmp = dir_with(sample_settings());
        let settings = read_settings(tmp.path()).unwrap();
        assert_eq!(settings.max_chars_per_post, 200);
        assert!(!settings.include_numbering);
        assert!(settings.auto_add_continue);
        assert_eq!(settings.llm.provider, LlmProvider::OpenAi);
        assert_eq!(settings.llm.api_key, "");
    }

    #[test]
    fn test_corrupt_file_is_backed_up() {
        let tmp = dir_with("max_chars_per_post = [oops");
        let settings = read_settings(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(tmp.path().join("settings.toml.bak").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_corrupt_file_without_backup_still_gives_defaults() {
        let tmp = dir_with("max_chars_per_post = [oops");
        // a directory in the way makes the backup copy fail
        fs::create_dir(tmp.path().join("settings.toml.bak")).unwrap();
        let settings = read_settings(tmp.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(tmp.path().join("settings.toml.bak").is_dir());
    }

    #[test]
    fn test_write_then_read() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested");
        let mut settings = Settings::default();
        settings.max_chars_per_post = 99;
        settings.llm.api_key = "sk-test".into();
        write_settings(&dir, &settings).unwrap();
        assert_eq!(read_settings(&dir).unwrap(), settings);
    }

    #[test]
    fn test_set_setting_preserves_comments() {
        let tmp = dir_with(sample_settings());
        let settings = set_setting(tmp.path(), "max_chars_per_post", "120").unwrap();
        assert_eq!(settings.max_chars_per_post, 120);

        let written = fs::read_to_string(settings_path(tmp.path())).unwrap();
        assert!(written.starts_with("# my thread settings\n"));
        assert!(written.contains("max_chars_per_post = 120"));
        assert!(written.contains("model = \"gpt-4o-mini\""));
    }

    #[test]
    fn test_set_setting_creates_file() {
        let tmp = TempDir::new().unwrap();
        let settings = set_setting(tmp.path(), "llm.api_key", "secret").unwrap();
        assert_eq!(settings.llm.api_key, "secret");
        assert_eq!(read_settings(tmp.path()).unwrap().llm.api_key, "secret");
    }

    #[test]
    fn test_set_setting_rejects_bad_values() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            set_setting(tmp.path(), "max_chars_per_post", "0"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_setting(tmp.path(), "include_numbering", "maybe"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_setting(tmp.path(), "llm.provider", "mistral"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            set_setting(tmp.path(), "theme", "dark"),
            Err(SettingsError::UnknownKey(_))
        ));
        assert!(!settings_path(tmp.path()).exists());
    }

    #[test]
    fn test_set_provider_resets_model() {
        let tmp = dir_with(sample_settings());
        let settings = set_provider(tmp.path(), LlmProvider::Gemini).unwrap();
        assert_eq!(settings.llm.provider, LlmProvider::Gemini);
        assert_eq!(settings.llm.model, "gemini-2.0-flash");
        // other settings survive
        assert_eq!(settings.max_chars_per_post, 200);
    }

    #[test]
    fn test_reset_settings() {
        let tmp = dir_with(sample_settings());
        reset_settings(tmp.path()).unwrap();
        assert_eq!(read_settings(tmp.path()).unwrap(), Settings::default());
    }

    #[test]
    fn test_config_dir_override() {
        let dir = Path::new("/tmp/elsewhere");
        assert_eq!(config_dir(Some(dir)), dir);
    }
}
