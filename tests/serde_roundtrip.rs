//! Serialization of scripts and options, behind the `serde` feature.

#![cfg(feature = "serde")]

use reconcile::{reconcile_by_key, EditScript, Notification, ReconcileOptions};

#[test]
fn owned_script_survives_json() {
    let old = vec!["a".to_string(), "b".to_string()];
    let new = vec!["b".to_string(), "c".to_string()];
    let script = reconcile_by_key(&old, &new, |record| record.clone(), |a, b| a == b).cloned();

    let json = serde_json::to_string(&script).unwrap();
    let restored: EditScript<String> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, script);
    assert_eq!(restored.apply(&old).unwrap(), new);
}

#[test]
fn options_fill_in_defaults() {
    let options: ReconcileOptions = serde_json::from_str(r#"{"detect_moves": false}"#).unwrap();
    assert_eq!(options, ReconcileOptions::new().detect_moves(false));

    let options: ReconcileOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, ReconcileOptions::default());
}

#[test]
fn notifications_serialize_by_name() {
    let json = serde_json::to_string(&Notification::Moved { from: 3, to: 0 }).unwrap();
    assert_eq!(json, r#"{"Moved":{"from":3,"to":0}}"#);
}
