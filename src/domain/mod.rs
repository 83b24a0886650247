//! Domain layer - Quest model and the catalog that constrains it
//!
//! This layer contains:
//! - Entities: Quest and its objective/reward parts
//! - Value Objects: PlayerClass, ClassCatalog, ValidationRules

pub mod entities;
pub mod value_objects;
