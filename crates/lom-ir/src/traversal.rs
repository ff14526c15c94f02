//! Traversal helpers for JSON trees

use crate::path::{FieldPath, Segment};
use serde_json::Value;

/// Trait for traversing a JSON tree
pub trait Traversal {
    /// Visit a value
    fn visit(&mut self, value: &Value, path: &FieldPath);

    /// Called when entering a non-empty object or array
    fn enter(&mut self, _value: &Value, _path: &FieldPath) {}

    /// Called when leaving a non-empty object or array
    fn leave(&mut self, _value: &Value, _path: &FieldPath) {}

    /// Returns true if traversal should continue
    fn should_continue(&self) -> bool {
        true
    }
}

/// Walk the tree depth-first using a visitor
pub fn walk<T: Traversal>(value: &Value, visitor: &mut T) {
    walk_recursive(value, visitor, &mut FieldPath::root());
}

fn walk_recursive<T: Traversal>(value: &Value, visitor: &mut T, path: &mut FieldPath) {
    if !visitor.should_continue() {
        return;
    }

    visitor.visit(value, path);

    let has_children = match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    };
    if !has_children {
        return;
    }

    visitor.enter(value, path);
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(Segment::Key(key.clone()));
                walk_recursive(child, visitor, path);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(Segment::Index(index));
                walk_recursive(child, visitor, path);
                path.pop();
            }
        }
        _ => {}
    }
    visitor.leave(value, path);
}

/// Remove `key` from every object that is an element of an array, at any
/// depth. Returns how many keys were removed.
///
/// Editing UIs tag list rows with a tracking key so rows can be reordered;
/// it must never reach the persisted record.
pub fn strip_list_item_keys(value: &mut Value, key: &str) -> usize {
    match value {
        Value::Object(map) => map
            .values_mut()
            .map(|child| strip_list_item_keys(child, key))
            .sum(),
        Value::Array(items) => items
            .iter_mut()
            .map(|item| {
                let own = match item {
                    Value::Object(map) => usize::from(map.remove(key).is_some()),
                    _ => 0,
                };
                own + strip_list_item_keys(item, key)
            })
            .sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Test visitor for traversal tests
    struct TestVisitor {
        visited: Vec<String>,
        entered: Vec<String>,
        left: Vec<String>,
        max_visits: usize,
    }

    impl TestVisitor {
        fn new() -> Self {
            Self::with_max_visits(usize::MAX)
        }

        fn with_max_visits(max: usize) -> Self {
            Self {
                visited: Vec::new(),
                entered: Vec::new(),
                left: Vec::new(),
                max_visits: max,
            }
        }
    }

    impl Traversal for TestVisitor {
        fn visit(&mut self, _value: &Value, path: &FieldPath) {
            self.visited.push(path.to_string());
        }

        fn enter(&mut self, _value: &Value, path: &FieldPath) {
            self.entered.push(path.to_string());
        }

        fn leave(&mut self, _value: &Value, path: &FieldPath) {
            self.left.push(path.to_string());
        }

        fn should_continue(&self) -> bool {
            self.visited.len() < self.max_visits
        }
    }

    #[test]
    fn test_traversal_walk() {
        let doc = json!({"general": {"keyword": ["a", "b"]}, "id": 1});

        let mut visitor = TestVisitor::new();
        walk(&doc, &mut visitor);

        assert_eq!(
            visitor.visited,
            vec![
                "",
                "general",
                "general.keyword",
                "general.keyword.0",
                "general.keyword.1",
                "id"
            ]
        );
    }

    #[test]
    fn test_traversal_enter_leave() {
        let doc = json!({"a": {"b": [1]}, "empty": {}});

        let mut visitor = TestVisitor::new();
        walk(&doc, &mut visitor);

        assert_eq!(visitor.entered, vec!["", "a", "a.b"]);
        assert_eq!(visitor.left, vec!["a.b", "a", ""]);
        assert!(!visitor.entered.contains(&"empty".to_string()));
    }

    #[test]
    fn test_traversal_should_continue() {
        let doc = json!({"a": 1, "b": 2, "c": 3});

        let mut visitor = TestVisitor::with_max_visits(2);
        walk(&doc, &mut visitor);

        assert_eq!(visitor.visited, vec!["", "a"]);
    }

    #[test]
    fn test_traversal_leaf() {
        let mut visitor = TestVisitor::new();
        walk(&json!("leaf"), &mut visitor);

        assert_eq!(visitor.visited, vec![""]);
        assert!(visitor.entered.is_empty());
    }

    #[test]
    fn test_strip_list_item_keys() {
        let mut doc = json!({
            "__key": "top-level objects keep it",
            "form": {
                "contributor": [
                    {"__key": 1, "name": "Ada", "role": {"value": "Author"}},
                    {"__key": 2, "name": "Bob"}
                ],
                "tag": [{"__key": 3, "value": "x", "nested": [{"__key": 4}]}]
            }
        });

        let removed = strip_list_item_keys(&mut doc, "__key");

        assert_eq!(removed, 4);
        assert_eq!(
            doc,
            json!({
                "__key": "top-level objects keep it",
                "form": {
                    "contributor": [
                        {"name": "Ada", "role": {"value": "Author"}},
                        {"name": "Bob"}
                    ],
                    "tag": [{"value": "x", "nested": [{}]}]
                }
            })
        );
    }
}
