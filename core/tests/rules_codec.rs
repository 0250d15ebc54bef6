//! Escalation-rule storage codec tests.

use deskops_core::{
    policy::EscalationRule,
    rules_codec::{decode_rules, encode_rules},
    sla_config::SlaConfiguration,
    SlaError,
};

/// Rows written by the old dashboard use camelCase field names.
#[test]
fn decodes_legacy_camel_case_rows() {
    let raw = r#"[
        {"level": 2, "triggerAfterHours": 4, "assignToRole": "director", "notifyUsers": ["u-7"]},
        {"level": 1, "triggerAfterHours": 1, "assignToRole": "manager", "name": "First line"}
    ]"#;

    let rules = decode_rules(raw).unwrap().expect("rules present");
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].level, 1, "decoded ladder is sorted by level");
    assert_eq!(rules[0].name.as_deref(), Some("First line"));
    assert_eq!(rules[1].notify_users, vec!["u-7".to_string()]);
}

#[test]
fn encode_then_decode_preserves_ladder() {
    let rules = vec![
        EscalationRule::new(2, 4.0, "director"),
        EscalationRule::new(1, 1.0, "manager").named("First line"),
    ];
    let stored = encode_rules(&rules).unwrap();
    assert!(stored.contains("trigger_after_hours"), "stored form is snake_case: {stored}");

    let decoded = decode_rules(&stored).unwrap().unwrap();
    assert_eq!(decoded[0], rules[1]);
    assert_eq!(decoded[1], rules[0]);
}

#[test]
fn malformed_json_is_a_serialization_error() {
    let err = decode_rules("[{\"level\": 1,").unwrap_err();
    assert!(matches!(err, SlaError::Serialization(_)), "got {err:?}");
}

#[test]
fn inconsistent_ladders_are_rejected() {
    let duplicate = r#"[{"level":1,"trigger_after_hours":1,"assign_to_role":"a"},
                        {"level":1,"trigger_after_hours":2,"assign_to_role":"b"}]"#;
    let backwards = r#"[{"level":1,"trigger_after_hours":5,"assign_to_role":"a"},
                        {"level":2,"trigger_after_hours":2,"assign_to_role":"b"}]"#;
    let level_zero = r#"[{"level":0,"trigger_after_hours":1,"assign_to_role":"a"}]"#;
    let negative = r#"[{"level":1,"trigger_after_hours":-1,"assign_to_role":"a"}]"#;

    for raw in [duplicate, backwards, level_zero, negative] {
        let err = decode_rules(raw).unwrap_err();
        assert!(matches!(err, SlaError::InvalidPolicy { .. }), "{raw}: got {err:?}");
    }
}

#[test]
fn stored_configuration_round_trip() {
    let config = SlaConfiguration::from_stored(
        Some("Gold support".into()),
        2.0,
        12.0,
        Some(r#"[{"level":1,"trigger_after_hours":3,"assign_to_role":"manager"}]"#),
    )
    .unwrap();
    assert_eq!(config.escalation_rules.as_ref().map(Vec::len), Some(1));

    let stored = config.stored_rules().unwrap().expect("ladder stored");
    let again = SlaConfiguration::from_stored(config.name.clone(), 2.0, 12.0, Some(&stored)).unwrap();
    assert_eq!(again, config);

    let no_ladder = SlaConfiguration::from_stored(None, 2.0, 12.0, Some("")).unwrap();
    assert!(no_ladder.escalation_rules.is_none());
    assert!(no_ladder.stored_rules().unwrap().is_none());
}

/// Configurations arriving as JSON go through the same ladder checks as
/// stored rule text, so a later level can never trigger before an earlier one.
#[test]
fn configuration_json_with_decreasing_ladder_is_rejected() {
    let raw = r#"{
        "response_time_hours": 1,
        "resolution_time_hours": 8,
        "escalation_rules": [
            {"level": 1, "trigger_after_hours": 5, "assign_to_role": "manager"},
            {"level": 2, "trigger_after_hours": 1, "assign_to_role": "director"}
        ]
    }"#;
    let err = serde_json::from_str::<SlaConfiguration>(raw).unwrap_err();
    assert!(err.to_string().contains("level 2"), "got {err}");

    let unsorted = r#"{
        "response_time_hours": 1,
        "resolution_time_hours": 8,
        "escalation_rules": [
            {"level": 2, "trigger_after_hours": 4, "assign_to_role": "director"},
            {"level": 1, "trigger_after_hours": 1, "assign_to_role": "manager"}
        ]
    }"#;
    let config: SlaConfiguration = serde_json::from_str(unsorted).unwrap();
    let levels: Vec<u32> = config
        .escalation_rules
        .unwrap()
        .iter()
        .map(|r| r.level)
        .collect();
    assert_eq!(levels, vec![1, 2]);

    let absent: SlaConfiguration =
        serde_json::from_str(r#"{"response_time_hours": 1, "resolution_time_hours": 8}"#).unwrap();
    assert!(absent.escalation_rules.is_none());
}

#[test]
fn builder_rejects_decreasing_ladder() {
    let err = SlaConfiguration::new(1.0, 8.0)
        .named("Gold support")
        .with_escalation_rules(vec![
            EscalationRule::new(1, 5.0, "manager"),
            EscalationRule::new(2, 1.0, "director"),
        ])
        .unwrap_err();
    assert!(
        matches!(err, SlaError::InvalidPolicy { ref key, .. } if key == "Gold support"),
        "got {err:?}"
    );
}
