//! Deep merge of configuration tiers.
//!
//! Tiers are parsed from YAML into JSON values and folded together; a higher
//! tier only needs to mention the keys it changes.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans are replaced entirely
/// - A null overlay keeps the base value (an empty YAML key means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use taskbot::config::deep_merge;
///
/// let base = json!({ "replies": { "greeting": "Hello", "help": "..." } });
/// let overlay = json!({ "replies": { "greeting": "Hi" } });
/// let merged = deep_merge(base, overlay);
/// assert_eq!(merged, json!({ "replies": { "greeting": "Hi", "help": "..." } }));
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Merge tiers in order, later values taking precedence.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_section_merges_per_key() {
        let base = json!({
            "store": {"db_path": "taskbot/tasks.db"},
            "replies": {"greeting": "Hello", "task_created": "Task added"}
        });
        let overlay = json!({"replies": {"task_created": "Задание добавлено"}});
        assert_eq!(
            deep_merge(base, overlay),
            json!({
                "store": {"db_path": "taskbot/tasks.db"},
                "replies": {"greeting": "Hello", "task_created": "Задание добавлено"}
            })
        );
    }

    #[test]
    fn test_null_preserves_base() {
        let base = json!({"telegram": {"token": "123:abc"}});
        let overlay = json!({"telegram": {"token": null}});
        assert_eq!(deep_merge(base.clone(), overlay), base);
        assert_eq!(deep_merge(base.clone(), Value::Null), base);
    }

    #[test]
    fn test_scalar_replaces_object() {
        let base = json!({"replies": {"greeting": "Hello"}});
        let overlay = json!({"replies": false});
        assert_eq!(deep_merge(base, overlay), json!({"replies": false}));
    }

    #[test]
    fn test_merge_all_later_tiers_win() {
        let tiers = vec![
            json!({"replies": {"report_missing": false, "greeting": "a"}}),
            json!({"replies": {"greeting": "b"}}),
            json!({"replies": {"report_missing": true}}),
        ];
        assert_eq!(
            deep_merge_all(tiers),
            json!({"replies": {"report_missing": true, "greeting": "b"}})
        );
    }
}
