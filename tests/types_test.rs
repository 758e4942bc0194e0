use refsplice::errors::ResolveError;
use refsplice::types::*;
use serde_json::json;

#[test]
fn splice_mode_as_str_roundtrip() {
    for mode in [SpliceMode::Replace, SpliceMode::Augment] {
        let s = mode.as_str();
        let parsed =
            SpliceMode::from_str(s).unwrap_or_else(|| panic!("failed to parse SpliceMode from '{}'", s));
        assert_eq!(mode, parsed, "roundtrip failed for SpliceMode::{}", s);
    }
    assert!(SpliceMode::from_str("merge").is_none());
}

#[test]
fn plural_policy_as_str_roundtrip() {
    for policy in [PluralPolicy::Omit, PluralPolicy::Abort] {
        let s = policy.as_str();
        let parsed = PluralPolicy::from_str(s)
            .unwrap_or_else(|| panic!("failed to parse PluralPolicy from '{}'", s));
        assert_eq!(policy, parsed, "roundtrip failed for PluralPolicy::{}", s);
    }
    assert!(PluralPolicy::from_str("").is_none());
}

#[test]
fn defect_messages_name_entity_and_id() {
    let mut defect = Defect {
        kind: DefectKind::NonObjectFetchResult,
        entity: "students".to_string(),
        id: "4".to_string(),
    };
    assert_eq!(defect.to_string(), "fetched a non-object for students id '4'");

    defect.kind = DefectKind::MalformedFetchResult;
    assert_eq!(
        defect.to_string(),
        "fetched a malformed object for students id '4'"
    );

    let err = ResolveError::Defect(defect);
    assert!(err.to_string().contains("students id '4'"));
}

#[test]
fn value_kind_names_every_variant() {
    assert_eq!(value_kind(&json!(null)), "null");
    assert_eq!(value_kind(&json!(false)), "bool");
    assert_eq!(value_kind(&json!(1)), "number");
    assert_eq!(value_kind(&json!("x")), "string");
    assert_eq!(value_kind(&json!([])), "array");
    assert_eq!(value_kind(&json!({})), "object");
}

#[test]
fn error_messages_are_descriptive() {
    let err = ResolveError::UnsupportedRootShape { found: '4' };
    assert_eq!(
        err.to_string(),
        "unsupported root shape: document must start with '{' or '[', found '4'"
    );
    let err = ResolveError::InvalidIdentifierType {
        key: "teacher_id".to_string(),
        found: "bool",
    };
    assert!(err.to_string().contains("teacher_id"));
    assert_eq!(ResolveError::EmptyInput.to_string(), "input is empty");
}
