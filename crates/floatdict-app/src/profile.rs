use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use floatdict_config::Config;
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "FloatingDictionary";
pub const DEFAULT_PROFILE: &str = "main";

/// Windows Roaming folder
#[cfg(windows)]
fn roaming_dir() -> anyhow::Result<PathBuf> {
    use windows::Win32::System::Com::CoTaskMemFree;
    use windows::Win32::UI::Shell::{FOLDERID_RoamingAppData, KF_FLAG_DEFAULT, SHGetKnownFolderPath};

    unsafe {
        let raw = SHGetKnownFolderPath(&FOLDERID_RoamingAppData, KF_FLAG_DEFAULT, None)
            .context("Failed to get RoamingAppData")?;
        let path = raw.to_string();
        CoTaskMemFree(Some(raw.0 as *const _));
        Ok(PathBuf::from(path.context("RoamingAppData path is not UTF-16")?))
    }
}

/// `$XDG_CONFIG_HOME`, else `~/.config`
#[cfg(not(windows))]
fn roaming_dir() -> anyhow::Result<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".config"))
}

pub fn app_root() -> anyhow::Result<PathBuf> {
    Ok(roaming_dir()?.join(APP_DIR))
}

/// Default location of the lookup history
pub fn history_file() -> anyhow::Result<PathBuf> {
    Ok(app_root()?.join("history.json"))
}

pub fn profiles_dir() -> anyhow::Result<PathBuf> {
    Ok(app_root()?.join("profiles"))
}

/// On-disk shape of a profile file
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

fn read_profile(file: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(file)
        .with_context(|| format!("Failed to read profile {}", file.display()))?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Profile {} is not valid JSON", file.display()))?;
    Ok(profile.value)
}

fn write_profile(file: &Path, name: &str, config: &Config) -> anyhow::Result<()> {
    if let Some(dir) = file.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let profile = Profile {
        name: name.to_string(),
        value: config.clone(),
    };
    fs::write(file, serde_json::to_string_pretty(&profile)?)
        .with_context(|| format!("Failed to write profile {}", file.display()))?;
    Ok(())
}

/// Loads `<dir>/<name>.json`, writing the defaults there on first run
pub fn load_or_create_in(dir: &Path, name: &str) -> anyhow::Result<Config> {
    let file = dir.join(format!("{name}.json"));
    if file.exists() {
        tracing::info!("Loading profile '{name}' from {}", file.display());
        return read_profile(&file);
    }

    let config = Config::default();
    write_profile(&file, name, &config)?;
    tracing::info!("Created profile '{name}' at {}", file.display());
    Ok(config)
}

/// Loads a profile from the roaming profiles folder
pub fn load_or_create(name: &str) -> anyhow::Result<Config> {
    load_or_create_in(&profiles_dir()?, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_create_in(dir.path(), "main").unwrap();
        assert_eq!(config, Config::default());

        let written = fs::read_to_string(dir.path().join("main.json")).unwrap();
        let profile: Profile = serde_json::from_str(&written).unwrap();
        assert_eq!(profile.name, "main");
        assert_eq!(profile.value, Config::default());
    }

    #[test]
    fn test_existing_profile_is_read() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("work.json"),
            r#"{ "name": "work", "value": { "translator": { "target_lang": "en" } } }"#,
        )
        .unwrap();

        let config = load_or_create_in(dir.path(), "work").unwrap();
        assert_eq!(config.translator.target_lang, "en");
        assert_eq!(config.translator.source_lang, "ja");
    }

    #[test]
    fn test_broken_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.json"), "{ not json").unwrap();

        let err = load_or_create_in(dir.path(), "main").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
