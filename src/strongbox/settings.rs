use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::strongbox::kinds::{ActionFlags, ActionKind, ContainerType};

impl ContainerType {
    pub fn config_key(self) -> &'static str {
        self.spec().config_key
    }

    pub fn from_config_key(key: &str) -> Option<ContainerType> {
        ContainerType::ALL
            .into_iter()
            .find(|kind| kind.config_key().eq_ignore_ascii_case(key))
    }
}

/// Whether each strongbox kind is handled at all.
///
/// Persisted as `{ <type key> = bool }`; kinds missing from the file keep
/// their default (enabled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct TypeEnableConfig {
    enabled: [bool; ContainerType::ALL.len()],
}

impl TypeEnableConfig {
    pub fn get(&self, kind: ContainerType) -> bool {
        self.enabled[kind as usize]
    }

    pub fn set(&mut self, kind: ContainerType, value: bool) {
        self.enabled[kind as usize] = value;
    }
}

impl Default for TypeEnableConfig {
    fn default() -> Self {
        Self {
            enabled: [true; ContainerType::ALL.len()],
        }
    }
}

impl From<BTreeMap<String, bool>> for TypeEnableConfig {
    fn from(raw: BTreeMap<String, bool>) -> Self {
        let mut config = Self::default();
        for (key, value) in raw {
            match ContainerType::from_config_key(&key) {
                Some(kind) => config.set(kind, value),
                None => tracing::warn!(key = %key, "unknown strongbox type in enable settings; ignored"),
            }
        }
        config
    }
}

impl From<TypeEnableConfig> for BTreeMap<String, bool> {
    fn from(config: TypeEnableConfig) -> Self {
        ContainerType::ALL
            .into_iter()
            .map(|kind| (kind.config_key().to_string(), config.get(kind)))
            .collect()
    }
}

/// One persisted currency record. Keys left out keep the kind's own default,
/// so an old `researcher` record without `exalted` still applies exalted.
#[derive(Debug, Default, Deserialize)]
pub struct ActionOverrides {
    wisdom: Option<bool>,
    alchemy: Option<bool>,
    augment: Option<bool>,
    regal: Option<bool>,
    exalted: Option<bool>,
}

impl ActionOverrides {
    fn apply_to(self, flags: &mut ActionFlags) {
        let values = [
            (ActionKind::Wisdom, self.wisdom),
            (ActionKind::Alchemy, self.alchemy),
            (ActionKind::Augment, self.augment),
            (ActionKind::Regal, self.regal),
            (ActionKind::Exalted, self.exalted),
        ];
        for (action, value) in values {
            if let Some(value) = value {
                flags.set(action, value);
            }
        }
    }
}

/// Per-kind currency toggles. One record per [`ContainerType`], always.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, ActionOverrides>",
    into = "BTreeMap<String, ActionFlags>"
)]
pub struct TypeActionConfig {
    actions: [ActionFlags; ContainerType::ALL.len()],
}

impl TypeActionConfig {
    pub fn get(&self, kind: ContainerType) -> &ActionFlags {
        &self.actions[kind as usize]
    }

    pub fn get_mut(&mut self, kind: ContainerType) -> &mut ActionFlags {
        &mut self.actions[kind as usize]
    }
}

impl Default for TypeActionConfig {
    fn default() -> Self {
        Self {
            actions: ContainerType::ALL.map(ContainerType::default_actions),
        }
    }
}

impl From<BTreeMap<String, ActionOverrides>> for TypeActionConfig {
    fn from(raw: BTreeMap<String, ActionOverrides>) -> Self {
        let mut config = Self::default();
        for (key, overrides) in raw {
            match ContainerType::from_config_key(&key) {
                Some(kind) => overrides.apply_to(config.get_mut(kind)),
                None => tracing::warn!(key = %key, "unknown strongbox type in currency settings; ignored"),
            }
        }
        config
    }
}

impl From<TypeActionConfig> for BTreeMap<String, ActionFlags> {
    fn from(config: TypeActionConfig) -> Self {
        ContainerType::ALL
            .into_iter()
            .map(|kind| (kind.config_key().to_string(), *config.get(kind)))
            .collect()
    }
}

/// Everything the dispatcher needs to know about which strongboxes to touch
/// and with what.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrongboxSettings {
    #[serde(default)]
    pub enabled: TypeEnableConfig,
    #[serde(default)]
    pub currencies: TypeActionConfig,
}

impl StrongboxSettings {
    /// Unclassified strongboxes are never enabled.
    pub fn is_type_enabled(&self, kind: Option<ContainerType>) -> bool {
        kind.is_some_and(|k| self.enabled.get(k))
    }

    pub fn is_action_enabled(&self, kind: Option<ContainerType>, action: ActionKind) -> bool {
        kind.is_some_and(|k| self.currencies.get(k).get(action))
    }

    /// Enabled actions for `kind` in dispatch priority order.
    pub fn enabled_actions(&self, kind: ContainerType) -> impl Iterator<Item = ActionKind> + '_ {
        self.currencies.get(kind).enabled()
    }

    pub fn set_type_enabled(&mut self, kind: ContainerType, value: bool) {
        self.enabled.set(kind, value);
    }

    pub fn set_action_enabled(&mut self, kind: ContainerType, action: ActionKind, value: bool) {
        self.currencies.get_mut(kind).set(action, value);
    }

    pub fn restore_defaults(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_type() {
        let settings = StrongboxSettings::default();
        for kind in ContainerType::ALL {
            assert!(settings.is_type_enabled(Some(kind)));
            assert!(settings.is_action_enabled(Some(kind), ActionKind::Wisdom));
        }
        assert!(settings.is_action_enabled(Some(ContainerType::Researcher), ActionKind::Exalted));
        assert!(!settings.is_action_enabled(Some(ContainerType::Ornate), ActionKind::Exalted));
    }

    #[test]
    fn unknown_type_is_disabled() {
        let settings = StrongboxSettings::default();
        assert!(!settings.is_type_enabled(None));
        for action in ActionKind::ALL {
            assert!(!settings.is_action_enabled(None, action));
        }
    }

    #[test]
    fn enable_and_action_maps_are_independent() {
        let mut settings = StrongboxSettings::default();
        settings.set_type_enabled(ContainerType::Arcane, false);
        assert!(!settings.is_type_enabled(Some(ContainerType::Arcane)));
        assert!(settings.is_action_enabled(Some(ContainerType::Arcane), ActionKind::Regal));

        settings.set_action_enabled(ContainerType::Large, ActionKind::Regal, false);
        assert!(settings.is_type_enabled(Some(ContainerType::Large)));
        assert!(!settings.is_action_enabled(Some(ContainerType::Large), ActionKind::Regal));

        settings.restore_defaults();
        assert_eq!(settings, StrongboxSettings::default());
    }

    #[test]
    fn missing_currency_keys_fall_back_to_kind_defaults() {
        let json = r#"{
            "currencies": {
                "researcher": { "wisdom": false },
                "blacksmith": { "regal": false }
            }
        }"#;
        let settings: StrongboxSettings = serde_json::from_str(json).unwrap();

        let researcher = settings.currencies.get(ContainerType::Researcher);
        assert!(!researcher.wisdom);
        assert!(researcher.exalted);

        let blacksmith = settings.currencies.get(ContainerType::Blacksmith);
        assert!(!blacksmith.regal);
        assert!(!blacksmith.exalted);
        assert!(blacksmith.alchemy);
    }

    #[test]
    fn json_uses_type_and_currency_keys() {
        let json = r#"{
            "enabled": { "ornate": false, "mystery": true },
            "currencies": { "researcher": { "wisdom": false, "exalted": true } }
        }"#;
        let settings: StrongboxSettings = serde_json::from_str(json).unwrap();

        assert!(!settings.is_type_enabled(Some(ContainerType::Ornate)));
        assert!(settings.is_type_enabled(Some(ContainerType::Large)));
        let researcher = Some(ContainerType::Researcher);
        assert!(!settings.is_action_enabled(researcher, ActionKind::Wisdom));
        assert!(settings.is_action_enabled(researcher, ActionKind::Alchemy));
        assert!(settings.is_action_enabled(researcher, ActionKind::Exalted));

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["enabled"]["ornate"], false);
        assert_eq!(value["currencies"]["cartographer"]["regal"], true);
    }
}
