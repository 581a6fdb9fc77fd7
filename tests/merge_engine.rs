use entity_engine::merge::{apply_add, apply_clear, apply_delete, apply_get, apply_update};
use entity_engine::{combine, needs_indicator, Envelope, OperationDescriptor, Slice, Status};
use serde_json::{json, Value};

fn success(payload: Value) -> Slice {
    Slice::Enveloped(Envelope::success(payload))
}

#[test]
fn add_then_delete_restores_map_slice() {
    let add = OperationDescriptor::add().key("list").id_path(["id"]);
    let delete = OperationDescriptor::delete().key("list").id_path(["id"]);
    let before = success(json!({"1": {"id": 1, "name": "A"}}));

    let added = apply_add(&before, &success(json!({"id": 2, "name": "B"})), &add);
    assert_eq!(added.payload()["2"]["name"], "B");

    let restored = apply_delete(&added, &success(json!({"id": 2})), &delete);
    assert_eq!(restored, before);
}

#[test]
fn add_then_delete_restores_nested_map_slice() {
    let add = OperationDescriptor::add().id_path(["groups", "items", "id"]);
    let delete = OperationDescriptor::delete().id_path(["groups", "items", "id"]);
    let before = success(json!({"groups": {"items": {"a": {"id": "a"}}}, "total": 1}));

    let added = apply_add(&before, &success(json!({"id": "b"})), &add);
    assert_eq!(added.payload()["groups"]["items"]["b"], json!({"id": "b"}));

    let restored = apply_delete(&added, &success(json!("b")), &delete);
    assert_eq!(restored, before);
}

#[test]
fn update_of_missing_array_record_is_equal_clone() {
    let op = OperationDescriptor::update().id_path(["id"]);
    let before = success(json!([{"id": 1, "v": 1}, {"id": 2, "v": 2}]));
    let after = apply_update(&before, &success(json!({"id": 3, "v": 9})), &op);
    assert_eq!(after, before);
}

#[test]
fn nested_update_merges_only_the_terminal_record() {
    let op = OperationDescriptor::update().id_path(["items", "id"]);
    let before = success(json!({
        "items": {"1": {"id": 1, "name": "A", "tags": {"x": 1}}, "2": {"id": 2, "name": "B"}},
        "total": 2
    }));

    let after = apply_update(&before, &success(json!({"id": 1, "tags": {"y": 2}})), &op);

    assert_eq!(
        after.payload(),
        &json!({
            "items": {
                "1": {"id": 1, "name": "A", "tags": {"x": 1, "y": 2}},
                "2": {"id": 2, "name": "B"}
            },
            "total": 2
        })
    );
}

#[test]
fn nested_update_of_array_target_merges_matching_element() {
    let op = OperationDescriptor::update().id_path(["page", "rows", "id"]);
    let before = success(json!({
        "page": {"rows": [{"id": "a", "done": false}, {"id": "b", "done": false}], "n": 1}
    }));

    let after = apply_update(&before, &success(json!({"id": "b", "done": true})), &op);

    assert_eq!(
        after.payload(),
        &json!({
            "page": {"rows": [{"id": "a", "done": false}, {"id": "b", "done": true}], "n": 1}
        })
    );
}

#[test]
fn nested_delete_removes_only_at_terminal_level() {
    let op = OperationDescriptor::delete().id_path(["page", "rows", "id"]);
    let before = success(json!({
        "page": {"rows": [{"id": "a"}, {"id": "b"}], "n": 1}
    }));

    let after = apply_delete(&before, &success(json!([{"id": "a"}])), &op);

    assert_eq!(after.payload(), &json!({"page": {"rows": [{"id": "b"}], "n": 1}}));
}

#[test]
fn clear_yields_action_payload_for_any_shape() {
    let op = OperationDescriptor::clear();
    let incoming = success(json!({"fresh": true}));
    for before in [json!({"1": {"id": 1}}), json!([1, 2, 3]), json!("scalar"), Value::Null] {
        let after = apply_clear(&success(before), &incoming, &op);
        assert_eq!(after.payload(), &json!({"fresh": true}));
        assert_eq!(after.status(), Some(Status::Success));
    }
}

#[test]
fn combine_and_indicator() {
    assert_eq!(combine(&[Status::Pending, Status::Success, Status::Success]), Status::Pending);
    assert_eq!(combine(&[Status::Success, Status::Success]), Status::Success);
    assert_eq!(combine(&[]), Status::Success);
    assert_eq!(combine(&[Status::Error, Status::Success]), Status::Success);
    assert!(needs_indicator(Status::Pending));
    assert!(!needs_indicator(Status::Error));
}

#[test]
fn update_replaces_name_in_map_slice() {
    let op = OperationDescriptor::update().key("list").id_path(["id"]);
    let before = success(json!({"1": {"id": 1, "name": "A"}}));
    let after = apply_update(&before, &success(json!({"id": 1, "name": "B"})), &op);
    assert_eq!(after.payload(), &json!({"1": {"id": 1, "name": "B"}}));
}

#[test]
fn duplicate_add_to_empty_array_keeps_one_record() {
    let op = OperationDescriptor::add().id_path(["id"]);
    let once = apply_add(&success(json!([])), &success(json!({"id": 5})), &op);
    let twice = apply_add(&once, &success(json!({"id": 5})), &op);
    assert_eq!(twice.payload(), &json!([{"id": 5}]));
}

#[test]
fn pending_never_overwrites_payload() {
    let before = success(json!({"1": {"id": 1}}));
    let pending = Slice::Enveloped(Envelope::pending());
    let descriptors = [
        OperationDescriptor::get().id_path(["id"]),
        OperationDescriptor::add().id_path(["id"]),
        OperationDescriptor::update().id_path(["id"]),
        OperationDescriptor::delete().id_path(["id"]),
    ];

    let after = apply_get(&before, &pending, &descriptors[0]);
    assert_eq!(after.payload(), before.payload());
    let after = apply_add(&before, &pending, &descriptors[1]);
    assert_eq!(after.payload(), before.payload());
    let after = apply_update(&before, &pending, &descriptors[2]);
    assert_eq!(after.payload(), before.payload());
    let after = apply_delete(&before, &pending, &descriptors[3]);
    assert_eq!(after.status(), Some(Status::Pending));
    assert_eq!(after.payload(), before.payload());
}

#[test]
fn bare_slices_merge_without_envelope() {
    let op = OperationDescriptor::update().suppress_envelope();
    let before = Slice::Bare(json!({"theme": "dark"}));
    let after = apply_update(&before, &Slice::Bare(json!({"lang": "en"})), &op);
    assert_eq!(after, Slice::Bare(json!({"theme": "dark", "lang": "en"})));

    let failed = apply_update(&after, &Slice::Enveloped(Envelope::failure("x")), &op);
    assert_eq!(failed, after);
}

#[test]
fn inputs_are_not_mutated() {
    let op = OperationDescriptor::update().id_path(["id"]);
    let before = success(json!({"1": {"id": 1, "tags": {"a": true}}}));
    let incoming = success(json!({"id": 1, "tags": {"b": true}}));
    let snapshot = (before.clone(), incoming.clone());

    let after = apply_update(&before, &incoming, &op);
    assert_eq!((before, incoming), snapshot);
    assert_eq!(after.payload()["1"]["tags"], json!({"a": true, "b": true}));
}
