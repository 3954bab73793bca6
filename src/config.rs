use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{HelperError, HelperResult};
use crate::strongbox::settings::StrongboxSettings;

pub const CONFIG_FILE_NAME: &str = "strongbox_helper.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelperConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub strongboxes: StrongboxSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Master switch; when off, frames never start a cycle.
    #[serde(default = "default_true")]
    pub enable: bool,
    /// Strongboxes farther from the player than this are left alone.
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    /// Put the cursor back where it was once a cycle is done.
    #[serde(default = "default_true")]
    pub restore_cursor: bool,
    /// Upper bound on clicks for one currency in one cycle.
    #[serde(default = "default_max_clicks")]
    pub max_clicks_per_cycle: u32,
}

fn default_true() -> bool {
    true
}

fn default_max_distance() -> f32 {
    50.0
}

fn default_max_clicks() -> u32 {
    100
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enable: true,
            max_distance: default_max_distance(),
            restore_cursor: true,
            max_clicks_per_cycle: default_max_clicks(),
        }
    }
}

/// Settle delays between pointer sub-steps, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_settle_ms")]
    pub move_settle_ms: u64,
    #[serde(default = "default_settle_ms")]
    pub press_settle_ms: u64,
    /// Pause after a release before looking for the button again; the label
    /// needs a moment to re-render.
    #[serde(default = "default_click_interval_ms")]
    pub click_interval_ms: u64,
}

fn default_settle_ms() -> u64 {
    10
}

fn default_click_interval_ms() -> u64 {
    250
}

impl TimingConfig {
    /// No waiting at all; for tests and replay.
    pub const IMMEDIATE: TimingConfig = TimingConfig {
        move_settle_ms: 0,
        press_settle_ms: 0,
        click_interval_ms: 0,
    };

    pub fn move_settle(&self) -> Duration {
        Duration::from_millis(self.move_settle_ms)
    }

    pub fn press_settle(&self) -> Duration {
        Duration::from_millis(self.press_settle_ms)
    }

    pub fn click_interval(&self) -> Duration {
        Duration::from_millis(self.click_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            move_settle_ms: default_settle_ms(),
            press_settle_ms: default_settle_ms(),
            click_interval_ms: default_click_interval_ms(),
        }
    }
}

/// Shared, externally editable configuration. Cycles read one snapshot at
/// their start; edits made mid-cycle apply from the next cycle.
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    inner: Arc<RwLock<HelperConfig>>,
}

impl ConfigHandle {
    pub fn new(config: HelperConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> HelperConfig {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update<F>(&self, edit: F)
    where
        F: FnOnce(&mut HelperConfig),
    {
        match self.inner.write() {
            Ok(mut guard) => edit(&mut guard),
            Err(poisoned) => edit(&mut poisoned.into_inner()),
        }
    }
}

fn resolve_config_path() -> HelperResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join(CONFIG_FILE_NAME);
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    if let Some(candidate) = user_config_path() {
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "config found in user config directory");
            return Ok(candidate);
        }
    }

    Err(HelperError::Config(format!(
        "{CONFIG_FILE_NAME} not found next to executable, in working directory or user config directory"
    )))
}

/// `<config dir>/strongbox-helper/strongbox_helper.toml`
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("strongbox-helper").join(CONFIG_FILE_NAME))
}

pub fn load_config() -> HelperResult<HelperConfig> {
    let path = resolve_config_path()?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> HelperResult<HelperConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: HelperConfig = toml::from_str(&content)?;
    tracing::info!(
        path = %path.display(),
        enable = config.general.enable,
        max_distance = config.general.max_distance,
        "config loaded"
    );
    Ok(config)
}

/// Saves over the file `load_config` would read, or creates one in the user
/// config directory.
pub fn save_config(config: &HelperConfig) -> HelperResult<()> {
    let path = match resolve_config_path() {
        Ok(path) => path,
        Err(_) => user_config_path()
            .ok_or_else(|| HelperError::Config("no user config directory on this platform".into()))?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    save_config_to(config, &path)
}

pub fn save_config_to(config: &HelperConfig, path: &Path) -> HelperResult<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strongbox::kinds::{ActionKind, ContainerType};

    #[test]
    fn empty_file_gives_defaults() {
        let config: HelperConfig = toml::from_str("").unwrap();
        assert_eq!(config, HelperConfig::default());
        assert!(config.general.enable);
        assert_eq!(config.general.max_distance, 50.0);
        assert_eq!(config.timing.click_interval_ms, 250);
    }

    #[test]
    fn partial_file_keeps_missing_records_at_defaults() {
        let text = r#"
            [general]
            max_distance = 80.0
            restore_cursor = false

            [strongboxes.enabled]
            arcane = false

            [strongboxes.currencies.ornate]
            wisdom = false
            alchemy = true
            augment = false
            regal = false
            exalted = true
        "#;
        let config: HelperConfig = toml::from_str(text).unwrap();
        let boxes = &config.strongboxes;

        assert_eq!(config.general.max_distance, 80.0);
        assert!(!config.general.restore_cursor);
        assert!(config.general.enable);
        assert!(!boxes.is_type_enabled(Some(ContainerType::Arcane)));
        assert!(boxes.is_type_enabled(Some(ContainerType::Ornate)));
        assert_eq!(
            boxes.enabled_actions(ContainerType::Ornate).collect::<Vec<_>>(),
            vec![ActionKind::Alchemy, ActionKind::Exalted]
        );
        assert!(boxes.is_action_enabled(Some(ContainerType::Researcher), ActionKind::Exalted));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = HelperConfig::default();
        config.general.max_clicks_per_cycle = 7;
        config
            .strongboxes
            .set_action_enabled(ContainerType::Blacksmith, ActionKind::Augment, false);
        config.strongboxes.set_type_enabled(ContainerType::Large, false);

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, config);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[strongboxes.currencies.blacksmith]"));
    }

    #[test]
    fn handle_edits_apply_to_later_snapshots() {
        let handle = ConfigHandle::default();
        let before = handle.snapshot();
        handle.update(|c| c.general.enable = false);
        assert!(before.general.enable);
        assert!(!handle.snapshot().general.enable);
    }
}
