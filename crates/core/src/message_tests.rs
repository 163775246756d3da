// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::schema::Version;

fn data_message(items: &[&str]) -> MessageContent {
    let mut map = IndexMap::new();
    map.insert(
        "data".to_string(),
        MessageContent::Sequence(items.iter().map(|s| MessageContent::Text(s.to_string())).collect()),
    );
    MessageContent::Mapping(map)
}

#[test]
fn concatenate_preserves_declaration_order() {
    let a = data_message(&["a1", "a2"]);
    let b = data_message(&["b1"]);
    let merged = MessageContent::concatenate_data_sequences(&[&a, &b]);
    let MessageContent::Mapping(map) = merged else { panic!("expected mapping") };
    let MessageContent::Sequence(items) = &map["data"] else { panic!("expected sequence") };
    let texts: Vec<&str> = items
        .iter()
        .map(|i| match i {
            MessageContent::Text(s) => s.as_str(),
            _ => panic!("expected text"),
        })
        .collect();
    assert_eq!(texts, vec!["a1", "a2", "b1"]);
}

#[test]
fn json_roundtrip_preserves_shape() {
    let json = serde_json::json!({
        "data": ["x", "y"],
        "count": 2,
        "ok": true,
        "nested": {"k": null},
    });
    let content = MessageContent::from_json(json.clone());
    assert_eq!(content.clone().into_json(), json);
}

#[test]
fn message_serializes_with_schema_and_content() {
    let schema = Schema::new("indicator", Version::new(1, 0, 0));
    let msg = Message::new("m1", schema, MessageContent::Text("hi".into()));
    let json = serde_json::to_value(&msg).unwrap();
    assert_eq!(json["id"], "m1");
    assert_eq!(json["schema"]["name"], "indicator");
}
