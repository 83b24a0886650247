//! Deny-list applied to objective targets coming back from the model

use super::player_class::strip_namespace;

/// Sentinel the model tends to emit when it has nothing better
pub const DEFAULT_FORBIDDEN_TARGET: &str = "air";

/// Targets that are never acceptable, regardless of class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    forbidden_targets: Vec<String>,
}

impl ValidationRules {
    pub fn new<I, S>(forbidden_targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            forbidden_targets: forbidden_targets
                .into_iter()
                .map(|t| strip_namespace(t.as_ref()).to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated list, e.g. `air,cave_air`
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn forbidden_targets(&self) -> &[String] {
        &self.forbidden_targets
    }

    /// True for empty targets and for anything on the deny-list
    pub fn is_forbidden(&self, target: &str) -> bool {
        let bare = strip_namespace(target).to_lowercase();
        bare.is_empty() || self.forbidden_targets.iter().any(|t| *t == bare)
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::new([DEFAULT_FORBIDDEN_TARGET])
    }
}
