//! Helpers over the nested value snapshot shared by the schema compiler and
//! the component binder. Fields are addressed by dot paths ("group.field");
//! validation errors arrive as JSON pointers and are converted here.

use serde_json::{Map, Value};

/// Reads a dot-addressed path out of a nested value tree. An empty path
/// yields the root; a path that crosses a non-object yields `None`.
pub fn value_at_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(root);
    }
    let mut current = root;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Writes `value` at a dot-addressed path, creating intermediate objects and
/// replacing non-object intermediates.
pub fn insert_at_path(root: &mut Value, path: &str, value: Value) {
    let segments: Vec<&str> = path.split('.').collect();
    insert_segments(root, &segments, value);
}

fn insert_segments(root: &mut Value, segments: &[&str], value: Value) {
    if segments.is_empty() {
        *root = value;
        return;
    }

    if !root.is_object() {
        *root = Value::Object(Map::new());
    }

    if let Value::Object(map) = root {
        if segments.len() == 1 {
            map.insert(segments[0].to_string(), value);
            return;
        }

        let entry = map
            .entry(segments[0].to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        insert_segments(entry, &segments[1..], value);
    }
}

/// Removes the value at a dot-addressed path, returning it when present.
pub fn remove_at_path(root: &mut Value, path: &str) -> Option<Value> {
    let (parent_path, key) = match path.rsplit_once('.') {
        Some((parent, key)) => (parent, key),
        None => ("", path),
    };
    let parent = if parent_path.is_empty() {
        root
    } else {
        value_at_path_mut(root, parent_path)?
    };
    match parent {
        Value::Object(map) => map.remove(key),
        _ => None,
    }
}

fn value_at_path_mut<'a>(root: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => current = map.get_mut(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// True for the values the requirement refinement treats as "no answer":
/// absent, null, empty string, empty array, empty object. Booleans and
/// numbers always count as answered, as does the not-applicable sentinel.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => false,
    }
}

/// Converts a JSON-pointer instance path ("/a/b") to a dot path ("a.b").
pub fn pointer_to_path(pointer: &str) -> String {
    pointer
        .trim_start_matches('/')
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}
