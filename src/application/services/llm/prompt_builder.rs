//! Prompt building functions for LLM requests

use rand::Rng;

use crate::domain::value_objects::{ClassCatalog, PlayerClass, ValidationRules};

/// Upper bound on targets listed per class, keeps prompts short for big catalogs
pub const MAX_PROMPT_TARGETS: usize = 15;

/// Instruction block describing a single quest object
const QUEST_TEMPLATE: &str = r#"    {
      "id": "class_target_level",
      "playerClass": "origins:{class}",
      "level": <1-3>,
      "title": "<Russian title>",
      "description": "<Russian description>",
      "objective": {
        "type": "<objective_type>",
        "target": "minecraft:<target>",
        "amount": <1-20>
      },
      "timeLimit": <20-50>,
      "reward": {
        "type": "skill_point_token",
        "tier": <1-3>,
        "experience": <500-1500>
      }
    }"#;

/// Build the prompt asking for `quest_count` quests of one class
///
/// The model is told to wrap the quests in a top-level `"quests"` array.
pub fn build_class_prompt<R: Rng + ?Sized>(
    class: PlayerClass,
    quest_count: u8,
    catalog: &ClassCatalog,
    rules: &ValidationRules,
    rng: &mut R,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Generate {} quests for the Minecraft class \"{}\" in JSON format, compatible with the following structure. ",
        quest_count, class
    ));
    prompt.push_str(COMMON_RULES);
    prompt.push_str("\n\nTemplate:\n{\n  \"quests\": [\n");
    prompt.push_str(&QUEST_TEMPLATE.replace("{class}", class.as_str()));
    prompt.push_str("\n  ]\n}\n\n");

    push_class_vocabulary(&mut prompt, class, catalog, rules, rng, "");
    push_forbidden_targets(&mut prompt, rules);

    prompt
}

/// Build one prompt covering every class
///
/// The response format uses one top-level key per class so a broken section
/// for one class does not take the others down with it.
pub fn build_all_classes_prompt<R: Rng + ?Sized>(
    quests_per_class: u8,
    catalog: &ClassCatalog,
    rules: &ValidationRules,
    rng: &mut R,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Generate {} quests for EACH of the Minecraft classes {} in JSON format. ",
        quests_per_class,
        PlayerClass::ALL
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ")
    ));
    prompt.push_str(COMMON_RULES);
    prompt.push_str("\n\nReturn one JSON object with one key per class, each holding an array of quests:\n{\n");
    for (idx, class) in PlayerClass::ALL.iter().enumerate() {
        let separator = if idx + 1 < PlayerClass::ALL.len() { "," } else { "" };
        prompt.push_str(&format!("  \"{}\": [ ... ]{}\n", class, separator));
    }
    prompt.push_str("}\n\nEach quest follows this template:\n");
    prompt.push_str(&QUEST_TEMPLATE.replace("{class}", "<class>"));
    prompt.push_str("\n\n");

    for class in PlayerClass::ALL {
        prompt.push_str(&format!("Class \"{}\":\n", class));
        push_class_vocabulary(&mut prompt, class, catalog, rules, rng, "  ");
    }
    push_forbidden_targets(&mut prompt, rules);

    prompt
}

/// Build the system prompt for the in-game chat assistant
pub fn build_chat_system_prompt(minecraft_version: &str, context: Option<&str>) -> String {
    let mut prompt = format!(
        "You are a helpful Minecraft {} assistant inside a modded server. \
Answer the player's question briefly and accurately, in the language the question was asked in. \
Prefer concrete steps and recipes. If you are not sure, say so instead of inventing items or mechanics.",
        minecraft_version
    );

    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str(&format!("\n\nAdditional context from the game: {}", context));
    }

    prompt
}

/// Pick at most `limit` targets, keeping catalog order
pub fn sample_targets<'a, R: Rng + ?Sized>(
    targets: &'a [String],
    limit: usize,
    rng: &mut R,
) -> Vec<&'a str> {
    if targets.len() <= limit {
        return targets.iter().map(String::as_str).collect();
    }

    let mut indices = rand::seq::index::sample(rng, targets.len(), limit).into_vec();
    indices.sort_unstable();
    indices.into_iter().map(|i| targets[i].as_str()).collect()
}

const COMMON_RULES: &str = "Ensure the quests are unique, have a level from 1 to 3, and use only the provided objective types and targets. \
The title and description must be in Russian, creative, and match the class theme. \
Do not include a separate localization file; title and description are in the JSON. \
Use the provided template and valid values. Return only the JSON, without any additional text or formatting.";

fn push_class_vocabulary<R: Rng + ?Sized>(
    prompt: &mut String,
    class: PlayerClass,
    catalog: &ClassCatalog,
    rules: &ValidationRules,
    rng: &mut R,
    indent: &str,
) {
    // Deny-listed entries in a catalog file are never offered to the model
    let allowed: Vec<String> = catalog
        .targets(class)
        .iter()
        .filter(|t| !rules.is_forbidden(t))
        .cloned()
        .collect();
    let targets = sample_targets(&allowed, MAX_PROMPT_TARGETS, rng);
    prompt.push_str(&format!(
        "{}Valid objective types: {}\n",
        indent,
        catalog.objective_types(class).join(", ")
    ));
    prompt.push_str(&format!("{}Valid targets: {}\n", indent, targets.join(", ")));
}

fn push_forbidden_targets(prompt: &mut String, rules: &ValidationRules) {
    let forbidden: Vec<String> = rules
        .forbidden_targets()
        .iter()
        .map(|t| format!("\"minecraft:{}\"", t))
        .chain(std::iter::once("an empty target".to_string()))
        .collect();

    prompt.push_str(&format!(
        "\nEvery objective target must be one of the valid targets above, written as \"minecraft:<target>\". \
Never use {}.\n",
        forbidden.join(", ")
    ));
}
