//! Target catalog - per-class allow-lists of objective verbs and targets
//!
//! The catalog constrains both what the prompt offers to the model and what
//! the validator accepts back. It is immutable once built; reloading produces
//! a new catalog rather than mutating an existing one.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::player_class::{strip_namespace, PlayerClass};

/// Allowed objective verbs and target identifiers for one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub objective_types: Vec<String>,
    /// Bare identifiers, without the `minecraft:` namespace
    pub targets: Vec<String>,
}

impl ClassEntry {
    pub fn new<V, T>(objective_types: V, targets: T) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            objective_types: objective_types.into_iter().map(Into::into).collect(),
            targets: targets
                .into_iter()
                .map(|t| strip_namespace(&t.into()).to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

/// Mapping of every player class to its allowed verbs and targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCatalog {
    entries: BTreeMap<PlayerClass, ClassEntry>,
}

impl ClassCatalog {
    /// Build a catalog, enforcing that every class has non-empty lists
    pub fn new(entries: BTreeMap<PlayerClass, ClassEntry>) -> Result<Self, CatalogError> {
        for class in PlayerClass::ALL {
            let entry = entries
                .get(&class)
                .ok_or(CatalogError::MissingClass(class))?;
            if entry.objective_types.is_empty() {
                return Err(CatalogError::EmptyObjectives(class));
            }
            if entry.targets.is_empty() {
                return Err(CatalogError::EmptyTargets(class));
            }
        }
        Ok(Self { entries })
    }

    /// The table shipped with the service, used when no file is configured
    /// or the configured file cannot be used
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            PlayerClass::Cook,
            ClassEntry::new(
                ["collect", "craft"],
                [
                    "wheat", "carrot", "potato", "beetroot", "egg", "milk_bucket", "sugar",
                    "cocoa_beans", "honey_bottle", "bread", "cake", "cookie", "pumpkin_pie",
                    "mushroom_stew", "beetroot_soup", "rabbit_stew", "golden_carrot",
                    "golden_apple",
                ],
            ),
        );
        entries.insert(
            PlayerClass::Courier,
            ClassEntry::new(
                ["collect", "craft"],
                [
                    "paper", "leather", "feather", "sugar", "emerald", "map", "compass",
                    "saddle", "boat", "banner", "firework_rocket",
                ],
            ),
        );
        entries.insert(
            PlayerClass::Brewer,
            ClassEntry::new(
                ["collect", "craft"],
                [
                    "nether_wart", "blaze_powder", "ghast_tear", "spider_eye", "magma_cream",
                    "glowstone_dust", "redstone", "rabbit_foot", "glistering_melon_slice",
                    "pufferfish", "turtle_helmet",
                ],
            ),
        );
        entries.insert(
            PlayerClass::Blacksmith,
            ClassEntry::new(
                ["collect", "craft"],
                [
                    "iron_ingot", "gold_ingot", "diamond", "coal", "flint", "iron_sword",
                    "diamond_pickaxe", "iron_axe", "iron_armor", "anvil", "shield", "crossbow",
                ],
            ),
        );
        entries.insert(
            PlayerClass::Miner,
            ClassEntry::new(
                ["collect", "mine"],
                [
                    "coal", "iron_ore", "gold_ore", "diamond", "redstone", "lapis_lazuli",
                    "emerald", "nether_quartz", "ancient_debris", "obsidian",
                ],
            ),
        );
        entries.insert(
            PlayerClass::Warrior,
            ClassEntry::new(
                ["kill", "collect"],
                [
                    "zombie", "skeleton", "creeper", "spider", "rotten_flesh", "bone",
                    "gunpowder", "string",
                ],
            ),
        );

        Self { entries }
    }

    /// Parse a catalog file.
    ///
    /// Each key is a class name. The value is either a plain list of targets
    /// (objective verbs stay as in the built-in table) or an object with
    /// `targets` and optional `objectives`. Classes absent from the file keep
    /// their built-in entry.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: HashMap<String, CatalogFileEntry> = serde_json::from_str(raw)?;
        let mut entries = Self::builtin().entries;

        for (name, file_entry) in file {
            let class: PlayerClass = name
                .parse()
                .map_err(|_| CatalogError::UnknownClass(name.clone()))?;
            let builtin_objectives = entries
                .get(&class)
                .map(|e| e.objective_types.clone())
                .unwrap_or_default();

            let entry = match file_entry {
                CatalogFileEntry::Targets(targets) => ClassEntry::new(builtin_objectives, targets),
                CatalogFileEntry::Detailed {
                    objectives,
                    targets,
                } => ClassEntry::new(objectives.unwrap_or(builtin_objectives), targets),
            };
            entries.insert(class, entry);
        }

        Self::new(entries)
    }

    pub fn entry(&self, class: PlayerClass) -> &ClassEntry {
        // Construction guarantees every class is present
        &self.entries[&class]
    }

    pub fn objective_types(&self, class: PlayerClass) -> &[String] {
        &self.entry(class).objective_types
    }

    pub fn targets(&self, class: PlayerClass) -> &[String] {
        &self.entry(class).targets
    }

    /// Whether `target` (namespaced or bare, any case) is on the class's allow-list
    pub fn allows_target(&self, class: PlayerClass, target: &str) -> bool {
        let bare = strip_namespace(target).to_lowercase();
        self.targets(class).iter().any(|t| *t == bare)
    }

    /// Total number of targets across all classes
    pub fn target_count(&self) -> usize {
        self.entries.values().map(|e| e.targets.len()).sum()
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFileEntry {
    Targets(Vec<String>),
    Detailed {
        #[serde(default)]
        objectives: Option<Vec<String>>,
        targets: Vec<String>,
    },
}

/// Reasons a catalog cannot be built
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Catalog names an unknown class: {0}")]
    UnknownClass(String),
    #[error("Catalog has no entry for class {0}")]
    MissingClass(PlayerClass),
    #[error("Catalog lists no objective types for class {0}")]
    EmptyObjectives(PlayerClass),
    #[error("Catalog lists no targets for class {0}")]
    EmptyTargets(PlayerClass),
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
}
