//! Brand-name filtering and placement categorisation.
//!
//! Both functions always return a definite answer. Ambiguous names are
//! accepted and ambiguous placements default to in-game.

use sponsorlens_core::{ClassificationRules, SponsorshipCategory};

/// Returns `false` for names that look like schools, teams, people, or
/// places rather than commercial brands.
///
/// Checks run in a fixed order and the first decisive rule wins:
/// empty, exact allow-list, generic single-word place, known-brand
/// substring, exempt phrase, personal name, blocked keyword, institutional
/// suffix. Anything left is accepted.
#[must_use]
pub fn is_valid_brand(name: &str, rules: &ClassificationRules) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }

    let lower = name.to_lowercase();
    let words: Vec<&str> = name.split_whitespace().collect();

    if rules.allow_list.iter().any(|b| *b == lower) {
        return true;
    }

    if words.len() == 1 && rules.generic_places.iter().any(|p| *p == lower) {
        return false;
    }

    if rules
        .known_brand_substrings
        .iter()
        .any(|b| lower.contains(b.as_str()))
    {
        return true;
    }

    if rules.exempt_phrases.iter().any(|p| lower.contains(p.as_str()))
        && !rules
            .institutional_terms
            .iter()
            .any(|t| lower.contains(t.as_str()))
    {
        return true;
    }

    if looks_like_person(&words, rules) {
        return false;
    }

    if rules
        .blocked_keywords
        .iter()
        .any(|k| lower.contains(k.as_str()))
    {
        return false;
    }

    if rules
        .institutional_suffixes
        .iter()
        .any(|s| name.ends_with(s.as_str()))
    {
        return false;
    }

    true
}

/// Two Capitalized words where either is a listed first name.
fn looks_like_person(words: &[&str], rules: &ClassificationRules) -> bool {
    if words.len() != 2 {
        return false;
    }
    let capitalized = words
        .iter()
        .all(|w| w.chars().next().is_some_and(char::is_uppercase));
    capitalized
        && words.iter().any(|w| {
            let w = w.to_lowercase();
            rules.personal_names.iter().any(|n| *n == w)
        })
}

/// Maps a raw placement type and context onto a sponsorship category.
///
/// Known ad types win, then known in-game types, then an ad context, and
/// everything else is in-game.
#[must_use]
pub fn categorize_sponsorship_placement(
    placement_type: &str,
    context: &str,
    rules: &ClassificationRules,
) -> SponsorshipCategory {
    let placement_type = placement_type.trim().to_lowercase();
    let context = context.trim().to_lowercase();

    if rules.ad_placement_types.contains(&placement_type) {
        return SponsorshipCategory::AdPlacement;
    }
    if rules.in_game_placement_types.contains(&placement_type) {
        return SponsorshipCategory::InGamePlacement;
    }
    if rules.ad_contexts.contains(&context) {
        return SponsorshipCategory::AdPlacement;
    }
    SponsorshipCategory::InGamePlacement
}
