//! Data-driven brand classification ruleset.
//!
//! The rules are plain data; evaluation lives in the analysis crate. The
//! built-in [`ClassificationRules::default`] is used unless a YAML file is
//! configured, and tests can construct alternate rulesets directly.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::appearance::PlacementType;
use crate::ConfigError;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationRules {
    /// Names accepted outright on an exact, case-insensitive match.
    pub allow_list: Vec<String>,
    /// Substrings that mark a name as a brand wherever they occur.
    pub known_brand_substrings: Vec<String>,
    /// Single-word place names that are never brands on their own.
    pub generic_places: Vec<String>,
    /// Phrases that keep a name valid unless an institutional term is present.
    pub exempt_phrases: Vec<String>,
    pub institutional_terms: Vec<String>,
    /// First names that flag a two-word Capitalized name as a person.
    pub personal_names: Vec<String>,
    pub blocked_keywords: Vec<String>,
    /// Case-sensitive name endings of schools and similar bodies.
    pub institutional_suffixes: Vec<String>,
    pub ad_placement_types: Vec<String>,
    pub in_game_placement_types: Vec<String>,
    /// Contexts that make an unrecognised placement type an ad placement.
    pub ad_contexts: Vec<String>,
}

impl Default for ClassificationRules {
    fn default() -> Self {
        Self {
            allow_list: strings(&[
                "ford",
                "nike",
                "adidas",
                "coca-cola",
                "pepsi",
                "honda",
                "toyota",
                "microsoft",
                "apple",
                "google",
                "amazon",
                "walmart",
                "target",
                "hon-dah",
                "hondah",
                "state farm",
            ]),
            known_brand_substrings: strings(&["coca-cola", "hon-dah", "hondah"]),
            generic_places: strings(&["berkeley", "cambridge", "oxford", "stanford"]),
            exempt_phrases: strings(&["outdoor sport"]),
            institutional_terms: strings(&["school", "college", "university"]),
            personal_names: strings(&["guy", "john", "mike", "david", "robert"]),
            blocked_keywords: strings(&[
                "high school",
                "college",
                "university",
                "team",
                "football",
                "basketball",
                "baseball",
                "soccer",
                "athletics",
                "sports",
                "club",
                "academy",
                "institute",
                "school",
                "district",
                "county",
                "city",
                "state",
                "national",
                "tournament",
                "championship",
                "league",
                "division",
                "conference",
                "guy",
                "john",
                "mike",
                "david",
                "robert",
                "james",
                "william",
                "richard",
                "charles",
                "joe",
            ]),
            institutional_suffixes: strings(&[
                "College",
                "University",
                "School",
                "Academy",
                "Institute",
            ]),
            ad_placement_types: strings(&[
                "digital_overlay",
                "ctv_ad",
                "overlay_ad",
                "squeeze_ad",
                "commercial",
            ]),
            in_game_placement_types: strings(&[
                "logo",
                "jersey_sponsor",
                "stadium_signage",
                "product_placement",
                "audio_mention",
            ]),
            ad_contexts: strings(&["commercial"]),
        }
    }
}

impl ClassificationRules {
    /// Lowercases every case-insensitive list and checks the placement type
    /// tables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when a placement type label is
    /// unknown or listed as both ad and in-game.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        for list in [
            &mut self.allow_list,
            &mut self.known_brand_substrings,
            &mut self.generic_places,
            &mut self.exempt_phrases,
            &mut self.institutional_terms,
            &mut self.personal_names,
            &mut self.blocked_keywords,
            &mut self.ad_placement_types,
            &mut self.in_game_placement_types,
            &mut self.ad_contexts,
        ] {
            list.retain(|s| !s.trim().is_empty());
            for item in list.iter_mut() {
                *item = item.trim().to_lowercase();
            }
        }
        self.institutional_suffixes.retain(|s| !s.trim().is_empty());

        validate_placement_types(&self)?;
        Ok(self)
    }
}

fn validate_placement_types(rules: &ClassificationRules) -> Result<(), ConfigError> {
    let mut ad = HashSet::new();
    for label in &rules.ad_placement_types {
        if PlacementType::from_label(label).is_none() {
            return Err(ConfigError::Validation(format!(
                "unknown ad placement type '{label}'"
            )));
        }
        ad.insert(label.as_str());
    }

    for label in &rules.in_game_placement_types {
        if PlacementType::from_label(label).is_none() {
            return Err(ConfigError::Validation(format!(
                "unknown in-game placement type '{label}'"
            )));
        }
        if ad.contains(label.as_str()) {
            return Err(ConfigError::Validation(format!(
                "placement type '{label}' is listed as both ad and in-game"
            )));
        }
    }

    Ok(())
}

/// Load and validate a classification ruleset from a YAML file. Lists
/// omitted from the file keep their built-in defaults.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_rules(path: &Path) -> Result<ClassificationRules, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let rules: ClassificationRules =
        serde_yaml::from_str(&content).map_err(ConfigError::RulesFileParse)?;

    rules.normalized()
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
