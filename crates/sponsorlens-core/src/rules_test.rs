use std::path::Path;

use super::*;

#[test]
fn default_rules_pass_validation() {
    let rules = ClassificationRules::default().normalized().unwrap();
    assert!(rules.allow_list.contains(&"nike".to_string()));
    assert!(rules.ad_placement_types.contains(&"ctv_ad".to_string()));
}

#[test]
fn normalized_lowercases_and_drops_blank_entries() {
    let rules = ClassificationRules {
        allow_list: vec!["  Red Bull ".to_string(), String::new()],
        ..ClassificationRules::default()
    }
    .normalized()
    .unwrap();
    assert_eq!(rules.allow_list, vec!["red bull".to_string()]);
}

#[test]
fn normalized_keeps_suffix_case() {
    let rules = ClassificationRules::default().normalized().unwrap();
    assert!(rules
        .institutional_suffixes
        .contains(&"University".to_string()));
}

#[test]
fn unknown_placement_type_is_rejected() {
    let rules = ClassificationRules {
        ad_placement_types: vec!["blimp".to_string()],
        ..ClassificationRules::default()
    };
    let err = rules.normalized().unwrap_err();
    assert!(err.to_string().contains("blimp"), "got: {err}");
}

#[test]
fn overlapping_placement_types_are_rejected() {
    let rules = ClassificationRules {
        ad_placement_types: vec!["logo".to_string()],
        ..ClassificationRules::default()
    };
    let err = rules.normalized().unwrap_err();
    assert!(err.to_string().contains("both ad and in-game"), "got: {err}");
}

#[test]
fn partial_yaml_keeps_defaults_for_missing_lists() {
    let yaml = "allow_list:\n  - Gatorade\n";
    let rules: ClassificationRules = serde_yaml::from_str(yaml).unwrap();
    let rules = rules.normalized().unwrap();
    assert_eq!(rules.allow_list, vec!["gatorade".to_string()]);
    assert_eq!(
        rules.generic_places,
        ClassificationRules::default().generic_places
    );
}

#[test]
fn load_rules_missing_file_reports_path() {
    let err = load_rules(Path::new("/definitely/not/here/rules.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::RulesFileIo { ref path, .. } if path.contains("rules.yaml")));
}

#[test]
fn load_rules_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("rules.yaml");
    assert!(path.exists(), "rules.yaml missing at {path:?}");
    let rules = load_rules(&path).expect("failed to load rules.yaml");
    assert!(rules.allow_list.contains(&"nike".to_string()));
    assert!(rules.blocked_keywords.contains(&"high school".to_string()));
}
