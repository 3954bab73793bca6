use std::fmt;

use serde::{Deserialize, Serialize};

/// Currency actions that can be applied to a strongbox.
///
/// Declaration order is the dispatch priority: the dispatcher walks
/// [`ActionKind::ALL`] front to back and acts on the first enabled kind whose
/// trigger is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Wisdom,
    Alchemy,
    Augment,
    Regal,
    Exalted,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Wisdom,
        ActionKind::Alchemy,
        ActionKind::Augment,
        ActionKind::Regal,
        ActionKind::Exalted,
    ];

    /// Texture path of the currency icon rendered on the strongbox label.
    pub fn asset_id(self) -> &'static str {
        match self {
            ActionKind::Wisdom => "Art/2DItems/Currency/CurrencyIdentification.dds",
            ActionKind::Alchemy => "Art/2DItems/Currency/CurrencyUpgradeToRare.dds",
            ActionKind::Augment => "Art/2DItems/Currency/CurrencyAddModToMagic.dds",
            ActionKind::Regal => "Art/2DItems/Currency/CurrencyUpgradeMagicToRare.dds",
            ActionKind::Exalted => "Art/2DItems/Currency/CurrencyAddModToRare.dds",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ActionKind::Wisdom => "Wisdom Scroll",
            ActionKind::Alchemy => "Alchemy Orb",
            ActionKind::Augment => "Augment Orb",
            ActionKind::Regal => "Regal Orb",
            ActionKind::Exalted => "Exalted Orb",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Known strongbox kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerType {
    Cartographer,
    Blacksmith,
    Jeweller,
    Ornate,
    Researcher,
    Large,
    Arcane,
    Strongbox,
}

impl ContainerType {
    pub const ALL: [ContainerType; 8] = [
        ContainerType::Cartographer,
        ContainerType::Blacksmith,
        ContainerType::Jeweller,
        ContainerType::Ornate,
        ContainerType::Researcher,
        ContainerType::Large,
        ContainerType::Arcane,
        ContainerType::Strongbox,
    ];

    pub fn spec(self) -> &'static ContainerSpec {
        // CONTAINER_TABLE is indexed in `ALL` order.
        &CONTAINER_TABLE[self as usize]
    }

    pub fn display_name(self) -> &'static str {
        self.spec().display_name
    }

    pub fn keywords(self) -> &'static [&'static str] {
        self.spec().keywords
    }

    pub fn default_actions(self) -> ActionFlags {
        self.spec().default_actions
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Per-type enable flags for every [`ActionKind`].
///
/// Field names double as the persisted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFlags {
    #[serde(default = "default_true")]
    pub wisdom: bool,
    #[serde(default = "default_true")]
    pub alchemy: bool,
    #[serde(default = "default_true")]
    pub augment: bool,
    #[serde(default = "default_true")]
    pub regal: bool,
    #[serde(default)]
    pub exalted: bool,
}

fn default_true() -> bool {
    true
}

impl ActionFlags {
    pub const NONE: ActionFlags = ActionFlags {
        wisdom: false,
        alchemy: false,
        augment: false,
        regal: false,
        exalted: false,
    };

    /// Everything below exalted.
    pub const BASIC: ActionFlags = ActionFlags {
        wisdom: true,
        alchemy: true,
        augment: true,
        regal: true,
        exalted: false,
    };

    pub const WITH_EXALTED: ActionFlags = ActionFlags {
        exalted: true,
        ..ActionFlags::BASIC
    };

    pub fn get(&self, action: ActionKind) -> bool {
        match action {
            ActionKind::Wisdom => self.wisdom,
            ActionKind::Alchemy => self.alchemy,
            ActionKind::Augment => self.augment,
            ActionKind::Regal => self.regal,
            ActionKind::Exalted => self.exalted,
        }
    }

    pub fn set(&mut self, action: ActionKind, value: bool) {
        match action {
            ActionKind::Wisdom => self.wisdom = value,
            ActionKind::Alchemy => self.alchemy = value,
            ActionKind::Augment => self.augment = value,
            ActionKind::Regal => self.regal = value,
            ActionKind::Exalted => self.exalted = value,
        }
    }

    /// Enabled actions in dispatch priority order.
    pub fn enabled(&self) -> impl Iterator<Item = ActionKind> + '_ {
        ActionKind::ALL.into_iter().filter(move |a| self.get(*a))
    }
}

impl Default for ActionFlags {
    fn default() -> Self {
        ActionFlags::BASIC
    }
}

/// Static description of one strongbox kind.
#[derive(Debug)]
pub struct ContainerSpec {
    pub kind: ContainerType,
    pub display_name: &'static str,
    /// Persisted key for this kind's settings records.
    pub config_key: &'static str,
    /// Lowercase substrings that identify the kind in a label's text.
    pub keywords: &'static [&'static str],
    pub default_actions: ActionFlags,
}

/// The only place strongbox kinds, their keywords and defaults are declared.
/// Entries are in [`ContainerType::ALL`] order; the generic kind comes last so
/// it loses every tie against a named kind.
pub static CONTAINER_TABLE: [ContainerSpec; 8] = [
    ContainerSpec {
        kind: ContainerType::Cartographer,
        display_name: "Cartographer's Strongbox",
        config_key: "cartographer",
        keywords: &["cartographer"],
        default_actions: ActionFlags::BASIC,
    },
    ContainerSpec {
        kind: ContainerType::Blacksmith,
        display_name: "Blacksmith's Strongbox",
        config_key: "blacksmith",
        keywords: &["blacksmith"],
        default_actions: ActionFlags::BASIC,
    },
    ContainerSpec {
        kind: ContainerType::Jeweller,
        display_name: "Jeweller's Strongbox",
        config_key: "jeweller",
        keywords: &["jeweller", "jeweler"],
        default_actions: ActionFlags::BASIC,
    },
    ContainerSpec {
        kind: ContainerType::Ornate,
        display_name: "Ornate Strongbox",
        config_key: "ornate",
        keywords: &["ornate"],
        default_actions: ActionFlags::BASIC,
    },
    ContainerSpec {
        kind: ContainerType::Researcher,
        display_name: "Researcher's Strongbox",
        config_key: "researcher",
        keywords: &["researcher", "research"],
        default_actions: ActionFlags::WITH_EXALTED,
    },
    ContainerSpec {
        kind: ContainerType::Large,
        display_name: "Large Strongbox",
        config_key: "large",
        keywords: &["large"],
        default_actions: ActionFlags::BASIC,
    },
    ContainerSpec {
        kind: ContainerType::Arcane,
        display_name: "Arcane Strongbox",
        config_key: "arcane",
        keywords: &["arcane"],
        default_actions: ActionFlags::BASIC,
    },
    ContainerSpec {
        kind: ContainerType::Strongbox,
        display_name: "Strongbox",
        config_key: "strongbox",
        keywords: &["strongbox"],
        default_actions: ActionFlags::BASIC,
    },
];
