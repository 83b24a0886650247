//! Value objects - Immutable objects defined by their attributes

mod catalog;
mod player_class;
mod quest_count;
mod validation_rules;

pub use catalog::{CatalogError, ClassCatalog};
pub use player_class::{strip_namespace, PlayerClass};
pub use quest_count::QuestCount;
pub use validation_rules::{ValidationRules, DEFAULT_FORBIDDEN_TARGET};

// Only needed when building catalogs by hand
#[allow(unused_imports)]
pub use catalog::ClassEntry;
