//! Player classes offered by the Origins mod

use serde::{Deserialize, Serialize};

/// Namespace the mod prefixes class identifiers with (`origins:cook`)
pub const CLASS_NAMESPACE: &str = "origins";

/// A fixed player role that scopes which objectives and targets are valid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerClass {
    Cook,
    Courier,
    Brewer,
    Blacksmith,
    Miner,
    Warrior,
}

impl PlayerClass {
    /// Every class, in the order the mod lists them
    pub const ALL: [PlayerClass; 6] = [
        PlayerClass::Cook,
        PlayerClass::Courier,
        PlayerClass::Brewer,
        PlayerClass::Blacksmith,
        PlayerClass::Miner,
        PlayerClass::Warrior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cook => "cook",
            Self::Courier => "courier",
            Self::Brewer => "brewer",
            Self::Blacksmith => "blacksmith",
            Self::Miner => "miner",
            Self::Warrior => "warrior",
        }
    }

    /// The namespaced identifier the mod uses, e.g. `origins:miner`
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", CLASS_NAMESPACE, self.as_str())
    }

    /// Parse a `playerClass` value, with or without its namespace
    pub fn from_qualified(value: &str) -> Option<Self> {
        strip_namespace(value).parse().ok()
    }
}

impl std::fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PlayerClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cook" => Ok(PlayerClass::Cook),
            "courier" => Ok(PlayerClass::Courier),
            "brewer" => Ok(PlayerClass::Brewer),
            "blacksmith" => Ok(PlayerClass::Blacksmith),
            "miner" => Ok(PlayerClass::Miner),
            "warrior" => Ok(PlayerClass::Warrior),
            _ => Err(anyhow::anyhow!("Unknown player class: {}", s)),
        }
    }
}

/// Drop a `namespace:` prefix (`minecraft:wheat` -> `wheat`)
pub fn strip_namespace(value: &str) -> &str {
    let value = value.trim();
    match value.rsplit_once(':') {
        Some((_, name)) => name.trim(),
        None => value,
    }
}
