//! Quest extraction - turning free-form model output into validated quests
//!
//! Models wrap their JSON in prose, code fences, or apologies, and sometimes
//! break the JSON itself. Extraction happens in two passes:
//!
//! 1. A greedy span from the first `{` to the last `}`. This is what works for
//!    the overwhelming majority of responses.
//! 2. If that span does not parse, a streaming scan that tries to read one
//!    complete JSON value starting at every `{`. This copes with braces inside
//!    string values and with trailing garbage after the payload.
//!
//! Drafts are kept as `serde_json::Value` until every field has been checked,
//! then promoted to [`Quest`]. Nothing the model sends is trusted, including
//! its ids.

use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde_json::{Map, Value};

use crate::domain::entities::{
    Quest, QuestObjective, QuestReward, AMOUNT_RANGE, EXPERIENCE_RANGE, LEVEL_RANGE,
    SKILL_POINT_REWARD, TIER_RANGE, TIME_LIMIT_RANGE,
};
use crate::domain::value_objects::{strip_namespace, ClassCatalog, PlayerClass, ValidationRules};

/// Top-level key of the single-class response format
pub const QUESTS_KEY: &str = "quests";

// First `{` through last `}`, across lines
static GREEDY_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

const REQUIRED_FIELDS: [&str; 7] = [
    "id",
    "playerClass",
    "level",
    "title",
    "objective",
    "timeLimit",
    "reward",
];

/// Why no JSON payload could be taken from the model output
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("response contains no JSON object")]
    NoJson,
    #[error("response JSON could not be parsed: {0}")]
    Malformed(String),
    #[error("response JSON has no '{0}' array")]
    MissingArray(String),
}

/// Why a single draft was dropped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftRejection {
    #[error("draft is not a JSON object")]
    NotAnObject,
    #[error("missing field '{0}'")]
    MissingField(String),
    #[error("field '{field}' should be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
    #[error("unknown player class '{0}'")]
    UnknownClass(String),
    #[error("quest declares class '{declared}' but '{expected}' was requested")]
    ClassMismatch {
        declared: PlayerClass,
        expected: PlayerClass,
    },
    #[error("target '{0}' is forbidden")]
    ForbiddenTarget(String),
    #[error("target '{target}' is not allowed for class '{class}'")]
    TargetNotAllowed { target: String, class: PlayerClass },
}

/// Find the outermost JSON object in `text`.
///
/// When `expected_keys` is non-empty, the streaming fallback only accepts an
/// object carrying at least one of them; the greedy span is accepted as long
/// as it parses to an object.
pub fn extract_json_object(
    text: &str,
    expected_keys: &[&str],
) -> Result<Map<String, Value>, ExtractionError> {
    let Some(span) = GREEDY_OBJECT_RE.find(text) else {
        return Err(ExtractionError::NoJson);
    };

    let greedy_error = match serde_json::from_str::<Value>(span.as_str()) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(_) => "greedy span is not an object".to_string(),
        Err(e) => e.to_string(),
    };

    tracing::debug!(error = %greedy_error, "Greedy JSON span failed, scanning for embedded objects");

    for (start, _) in text.match_indices('{') {
        if let Some(Value::Object(map)) = read_value_at(text, start) {
            if expected_keys.is_empty() || expected_keys.iter().any(|k| map.contains_key(*k)) {
                return Ok(map);
            }
        }
    }

    Err(ExtractionError::Malformed(greedy_error))
}

/// Find the array that follows `"<key>":` anywhere in `text`
///
/// Used when the enclosing object is broken but an individual section is
/// still well formed.
pub fn extract_keyed_array(text: &str, key: &str) -> Option<Vec<Value>> {
    let pattern = format!(r#""{}"\s*:\s*\["#, regex_lite::escape(key));
    let regex = Regex::new(&pattern).ok()?;

    let found = regex.find_iter(text).find_map(|m| {
        // The match ends just past the opening bracket
        match read_value_at(text, m.end() - 1) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }
    });
    found
}

/// Find the first complete top-level JSON array in `text`
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    text.match_indices('[').find_map(|(start, _)| match read_value_at(text, start) {
        Some(Value::Array(items)) => Some(items),
        _ => None,
    })
}

/// Pull the quest drafts for one class out of a single-class response.
///
/// Accepts `{"quests": [...]}`, `{"<class>": [...]}`, a bare top-level array,
/// or a lone quest object.
pub fn extract_class_drafts(text: &str, class: PlayerClass) -> Result<Vec<Value>, ExtractionError> {
    match extract_json_object(text, &[QUESTS_KEY, class.as_str()]) {
        Ok(mut object) => {
            for key in [QUESTS_KEY, class.as_str()] {
                if let Some(Value::Array(items)) = object.remove(key) {
                    return Ok(items);
                }
            }
            if object.contains_key("objective") {
                return Ok(vec![Value::Object(object)]);
            }
            if let Some(items) = extract_json_array(text) {
                return Ok(items);
            }
            Err(ExtractionError::MissingArray(QUESTS_KEY.to_string()))
        }
        Err(e) => extract_json_array(text).ok_or(e),
    }
}

/// Validates drafts against the catalog and the deny-list
#[derive(Debug, Clone, Copy)]
pub struct QuestValidator<'a> {
    catalog: &'a ClassCatalog,
    rules: &'a ValidationRules,
}

impl<'a> QuestValidator<'a> {
    pub fn new(catalog: &'a ClassCatalog, rules: &'a ValidationRules) -> Self {
        Self { catalog, rules }
    }

    /// Validate drafts in order, keeping at most `limit` survivors
    ///
    /// Rejected drafts are logged and skipped; they never abort the batch.
    pub fn validate_all(&self, drafts: &[Value], class: PlayerClass, limit: usize) -> Vec<Quest> {
        let mut quests = Vec::with_capacity(limit.min(drafts.len()));

        for (index, draft) in drafts.iter().enumerate() {
            if quests.len() >= limit {
                break;
            }
            match self.validate(draft, class) {
                Ok(quest) => quests.push(quest),
                Err(reason) => {
                    tracing::warn!(
                        class = %class,
                        index,
                        reason = %reason,
                        "Dropping invalid quest draft"
                    );
                }
            }
        }

        quests
    }

    /// Check one draft and promote it to a [`Quest`] with a fresh id
    pub fn validate(&self, draft: &Value, class: PlayerClass) -> Result<Quest, DraftRejection> {
        let draft = draft.as_object().ok_or(DraftRejection::NotAnObject)?;

        if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !draft.contains_key(**f)) {
            return Err(DraftRejection::MissingField((*missing).to_string()));
        }

        let declared_raw = string_field(draft, "playerClass")?;
        let declared = PlayerClass::from_qualified(declared_raw)
            .ok_or_else(|| DraftRejection::UnknownClass(declared_raw.to_string()))?;
        if declared != class {
            return Err(DraftRejection::ClassMismatch {
                declared,
                expected: class,
            });
        }

        let objective = object_field(draft, "objective")?;
        for field in ["type", "target", "amount"] {
            if !objective.contains_key(field) {
                return Err(DraftRejection::MissingField(format!("objective.{}", field)));
            }
        }
        let reward = object_field(draft, "reward")?;
        for field in ["type", "tier", "experience"] {
            if !reward.contains_key(field) {
                return Err(DraftRejection::MissingField(format!("reward.{}", field)));
            }
        }

        let target = nested_string(objective, "objective", "target")?;
        if self.rules.is_forbidden(target) {
            return Err(DraftRejection::ForbiddenTarget(target.to_string()));
        }
        if !self.catalog.allows_target(declared, target) {
            return Err(DraftRejection::TargetNotAllowed {
                target: target.to_string(),
                class: declared,
            });
        }

        let description = draft
            .get("description")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        Ok(Quest {
            id: Quest::fresh_id(declared),
            player_class: declared.qualified_name(),
            level: clamped(draft, "level", LEVEL_RANGE)?,
            title: string_field(draft, "title")?.trim().to_string(),
            description,
            objective: QuestObjective {
                objective_type: nested_string(objective, "objective", "type")?.to_string(),
                target: namespaced_target(target),
                amount: nested_clamped(objective, "objective", "amount", AMOUNT_RANGE)?,
            },
            time_limit: clamped(draft, "timeLimit", TIME_LIMIT_RANGE)?,
            reward: QuestReward {
                reward_type: SKILL_POINT_REWARD.to_string(),
                tier: nested_clamped(reward, "reward", "tier", TIER_RANGE)?,
                experience: nested_clamped(reward, "reward", "experience", EXPERIENCE_RANGE)?,
            },
        })
    }
}

/// Read one JSON value starting at byte offset `start`, ignoring what follows
fn read_value_at(text: &str, start: usize) -> Option<Value> {
    serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<Value>()
        .next()
        .and_then(Result::ok)
}

/// `wheat`, `Wheat` and `othermod:wheat` all become `minecraft:wheat`
///
/// Emits exactly the bare id the catalog check accepted.
fn namespaced_target(target: &str) -> String {
    format!("minecraft:{}", strip_namespace(target).to_lowercase())
}

fn string_field<'v>(object: &'v Map<String, Value>, field: &str) -> Result<&'v str, DraftRejection> {
    object
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DraftRejection::WrongType {
            field: field.to_string(),
            expected: "a non-empty string",
        })
}

fn nested_string<'v>(
    object: &'v Map<String, Value>,
    parent: &str,
    field: &str,
) -> Result<&'v str, DraftRejection> {
    string_field(object, field).map_err(|_| DraftRejection::WrongType {
        field: format!("{}.{}", parent, field),
        expected: "a non-empty string",
    })
}

fn object_field<'v>(
    object: &'v Map<String, Value>,
    field: &str,
) -> Result<&'v Map<String, Value>, DraftRejection> {
    object
        .get(field)
        .and_then(Value::as_object)
        .ok_or_else(|| DraftRejection::WrongType {
            field: field.to_string(),
            expected: "an object",
        })
}

/// Integers, integral floats, and numeric strings are accepted
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn clamped(
    object: &Map<String, Value>,
    field: &str,
    range: RangeInclusive<i64>,
) -> Result<i64, DraftRejection> {
    object
        .get(field)
        .and_then(as_integer)
        .map(|v| v.clamp(*range.start(), *range.end()))
        .ok_or_else(|| DraftRejection::WrongType {
            field: field.to_string(),
            expected: "an integer",
        })
}

fn nested_clamped(
    object: &Map<String, Value>,
    parent: &str,
    field: &str,
    range: RangeInclusive<i64>,
) -> Result<i64, DraftRejection> {
    clamped(object, field, range).map_err(|_| DraftRejection::WrongType {
        field: format!("{}.{}", parent, field),
        expected: "an integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(class: &str, target: &str) -> Value {
        json!({
            "id": "model_supplied_id",
            "playerClass": format!("origins:{}", class),
            "level": 2,
            "title": "Пекарь",
            "description": "Испеки хлеб для деревни",
            "objective": {"type": "craft", "target": format!("minecraft:{}", target), "amount": 8},
            "timeLimit": 30,
            "reward": {"type": "skill_point_token", "tier": 2, "experience": 900}
        })
    }

    fn validator_parts() -> (ClassCatalog, ValidationRules) {
        (ClassCatalog::builtin(), ValidationRules::default())
    }

    #[test]
    fn test_extract_json_object_with_surrounding_prose() {
        let text = "Sure! Here are your quests:\n```json\n{\"quests\": []}\n```\nEnjoy!";
        let object = extract_json_object(text, &[QUESTS_KEY]).unwrap();
        assert!(object.contains_key("quests"));
    }

    #[test]
    fn test_extract_json_object_without_json() {
        assert_eq!(
            extract_json_object("I cannot help with that.", &[]),
            Err(ExtractionError::NoJson)
        );
    }

    #[test]
    fn test_extract_json_object_falls_back_to_scan() {
        // The greedy span runs into the stray brace after the payload
        let text = r#"{"quests": [{"title": "a } b"}]} and a trailing } brace"#;
        let object = extract_json_object(text, &[QUESTS_KEY]).unwrap();
        assert_eq!(object["quests"][0]["title"], "a } b");
    }

    #[test]
    fn test_extract_json_object_reports_malformed() {
        let result = extract_json_object(r#"{"quests": [ {"title": "unterminated }"#, &[QUESTS_KEY]);
        assert!(matches!(result, Err(ExtractionError::Malformed(_))));
    }

    #[test]
    fn test_extract_keyed_array_survives_broken_siblings() {
        let text = r#"{"cook": [{"title": "ok"}], "miner": [{"title": oops}], "warrior": []}"#;
        assert_eq!(extract_keyed_array(text, "cook").unwrap().len(), 1);
        assert!(extract_keyed_array(text, "miner").is_none());
        assert_eq!(extract_keyed_array(text, "warrior").unwrap().len(), 0);
        assert!(extract_keyed_array(text, "brewer").is_none());
    }

    #[test]
    fn test_extract_keyed_array_skips_broken_occurrence() {
        let text = r#"{"cook": [oops], "retry": {"cook": [{"title": "ok"}, {"title": "ok 2"}]}}"#;
        let items = extract_keyed_array(text, "cook").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "ok");
    }

    #[test]
    fn test_extract_class_drafts_accepts_several_shapes() {
        let wrapped = json!({"quests": [draft("cook", "bread")]}).to_string();
        let keyed = json!({"cook": [draft("cook", "bread")]}).to_string();
        let bare = json!([draft("cook", "bread"), draft("cook", "cake")]).to_string();
        let single = draft("cook", "bread").to_string();

        assert_eq!(extract_class_drafts(&wrapped, PlayerClass::Cook).unwrap().len(), 1);
        assert_eq!(extract_class_drafts(&keyed, PlayerClass::Cook).unwrap().len(), 1);
        assert_eq!(extract_class_drafts(&bare, PlayerClass::Cook).unwrap().len(), 2);
        assert_eq!(extract_class_drafts(&single, PlayerClass::Cook).unwrap().len(), 1);
    }

    #[test]
    fn test_extract_class_drafts_missing_array() {
        assert_eq!(
            extract_class_drafts(r#"{"message": "no quests today"}"#, PlayerClass::Cook),
            Err(ExtractionError::MissingArray("quests".to_string()))
        );
    }

    #[test]
    fn test_validate_promotes_draft_with_fresh_id() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);

        let quest = validator.validate(&draft("cook", "bread"), PlayerClass::Cook).unwrap();

        assert!(quest.id.starts_with("cook_"));
        assert_ne!(quest.id, "model_supplied_id");
        assert_eq!(quest.player_class, "origins:cook");
        assert_eq!(quest.objective.target, "minecraft:bread");
        assert_eq!(quest.objective.amount, 8);
        assert_eq!(quest.description, "Испеки хлеб для деревни");
    }

    #[test]
    fn test_validate_rejects_forbidden_and_foreign_targets() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);

        assert_eq!(
            validator.validate(&draft("cook", "air"), PlayerClass::Cook),
            Err(DraftRejection::ForbiddenTarget("minecraft:air".to_string()))
        );
        assert!(matches!(
            validator.validate(&draft("cook", ""), PlayerClass::Cook),
            Err(DraftRejection::ForbiddenTarget(_))
        ));
        assert!(matches!(
            validator.validate(&draft("cook", "diamond"), PlayerClass::Cook),
            Err(DraftRejection::TargetNotAllowed { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);

        let mut no_title = draft("cook", "bread");
        no_title.as_object_mut().unwrap().remove("title");
        assert_eq!(
            validator.validate(&no_title, PlayerClass::Cook),
            Err(DraftRejection::MissingField("title".to_string()))
        );

        let mut no_amount = draft("cook", "bread");
        no_amount["objective"].as_object_mut().unwrap().remove("amount");
        assert_eq!(
            validator.validate(&no_amount, PlayerClass::Cook),
            Err(DraftRejection::MissingField("objective.amount".to_string()))
        );

        let mut no_tier = draft("cook", "bread");
        no_tier["reward"].as_object_mut().unwrap().remove("tier");
        assert_eq!(
            validator.validate(&no_tier, PlayerClass::Cook),
            Err(DraftRejection::MissingField("reward.tier".to_string()))
        );

        assert_eq!(
            validator.validate(&json!("quest"), PlayerClass::Cook),
            Err(DraftRejection::NotAnObject)
        );
    }

    #[test]
    fn test_validate_checks_declared_class() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);

        assert!(matches!(
            validator.validate(&draft("wizard", "bread"), PlayerClass::Cook),
            Err(DraftRejection::UnknownClass(_))
        ));
        assert_eq!(
            validator.validate(&draft("miner", "coal"), PlayerClass::Cook),
            Err(DraftRejection::ClassMismatch {
                declared: PlayerClass::Miner,
                expected: PlayerClass::Cook,
            })
        );
    }

    #[test]
    fn test_validate_repairs_numbers_and_reward_type() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);

        let mut loose = draft("miner", "coal");
        loose["level"] = json!(7);
        loose["timeLimit"] = json!("45");
        loose["objective"]["amount"] = json!(3.0);
        loose["objective"]["target"] = json!("coal");
        loose["reward"]["experience"] = json!(99999);
        loose["reward"]["type"] = json!("diamonds");

        let quest = validator.validate(&loose, PlayerClass::Miner).unwrap();

        assert_eq!(quest.level, 3);
        assert_eq!(quest.time_limit, 45);
        assert_eq!(quest.objective.amount, 3);
        assert_eq!(quest.objective.target, "minecraft:coal");
        assert_eq!(quest.reward.experience, 1500);
        assert_eq!(quest.reward.reward_type, SKILL_POINT_REWARD);

        let mut wordy = draft("miner", "coal");
        wordy["level"] = json!("high");
        assert!(matches!(
            validator.validate(&wordy, PlayerClass::Miner),
            Err(DraftRejection::WrongType { .. })
        ));
    }

    #[test]
    fn test_validate_emits_the_target_it_checked() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);

        let mut foreign = draft("cook", "bread");
        foreign["objective"]["target"] = json!("othermod:bread");
        let quest = validator.validate(&foreign, PlayerClass::Cook).unwrap();
        assert_eq!(quest.objective.target, "minecraft:bread");

        let mut shouting = draft("cook", "bread");
        shouting["objective"]["target"] = json!(" minecraft:Bread ");
        let quest = validator.validate(&shouting, PlayerClass::Cook).unwrap();
        assert_eq!(quest.objective.target, "minecraft:bread");

        let mut loud_air = draft("cook", "bread");
        loud_air["objective"]["target"] = json!("minecraft:AIR");
        assert!(matches!(
            validator.validate(&loud_air, PlayerClass::Cook),
            Err(DraftRejection::ForbiddenTarget(_))
        ));
    }

    #[test]
    fn test_validate_keeps_missing_description_as_empty() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);

        let mut silent = draft("cook", "bread");
        silent.as_object_mut().unwrap().remove("description");
        let quest = validator.validate(&silent, PlayerClass::Cook).unwrap();
        assert_eq!(quest.description, "");

        let mut blank = draft("cook", "bread");
        blank["description"] = json!("   ");
        let quest = validator.validate(&blank, PlayerClass::Cook).unwrap();
        assert_eq!(serde_json::to_value(&quest).unwrap()["description"], "");
    }

    #[test]
    fn test_validate_all_skips_invalid_and_truncates() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);
        let drafts = vec![
            draft("cook", "air"),
            draft("cook", "bread"),
            draft("cook", "diamond"),
            draft("cook", "cake"),
            draft("cook", "egg"),
        ];

        let quests = validator.validate_all(&drafts, PlayerClass::Cook, 2);

        let targets: Vec<_> = quests.iter().map(|q| q.objective.target.as_str()).collect();
        assert_eq!(targets, ["minecraft:bread", "minecraft:cake"]);
    }

    #[test]
    fn test_validation_is_idempotent_apart_from_ids() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);
        let drafts = vec![draft("warrior", "zombie"), draft("warrior", "bone")];

        let first = validator.validate_all(&drafts, PlayerClass::Warrior, 10);
        let reencoded: Vec<Value> = first.iter().map(|q| serde_json::to_value(q).unwrap()).collect();
        let second = validator.validate_all(&reencoded, PlayerClass::Warrior, 10);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_ne!(a.id, b.id);
            assert_eq!(Quest { id: b.id.clone(), ..a.clone() }, *b);
        }
    }

    #[test]
    fn test_prose_does_not_change_results() {
        let (catalog, rules) = validator_parts();
        let validator = QuestValidator::new(&catalog, &rules);
        let payload = json!({"quests": [draft("brewer", "nether_wart"), draft("brewer", "air")]}).to_string();
        let wrapped = format!("Вот ваши квесты:\n{}\nУдачи в игре!", payload);

        let bare: Vec<_> = validator
            .validate_all(&extract_class_drafts(&payload, PlayerClass::Brewer).unwrap(), PlayerClass::Brewer, 5)
            .into_iter()
            .map(|q| q.objective)
            .collect();
        let prose: Vec<_> = validator
            .validate_all(&extract_class_drafts(&wrapped, PlayerClass::Brewer).unwrap(), PlayerClass::Brewer, 5)
            .into_iter()
            .map(|q| q.objective)
            .collect();

        assert_eq!(bare.len(), 1);
        assert_eq!(bare, prose);
    }
}
