//! Dot-path resolution over raw items
//!
//! Paths are `.`-separated keys. The segment `[]` flattens one level of
//! sequences into the working set, so `Reservations.[].Instances.[]` yields
//! every instance of every reservation.
//!
//! Shape mismatches never fail: a key applied to a non-mapping, a missing key,
//! or `[]` applied to a non-sequence just drops that candidate.

use super::item::RawItem;

/// Path segment that flattens one level of sequences.
pub const FLATTEN: &str = "[]";

/// Resolve `path` against `root`, returning every matching value in order.
pub fn resolve<'a>(root: &'a RawItem, path: &str) -> Vec<&'a RawItem> {
    let mut working: Vec<&RawItem> = vec![root];

    for segment in path.split('.') {
        working = if segment == FLATTEN {
            working
                .into_iter()
                .flat_map(|item| match item {
                    RawItem::Sequence(seq) => seq.iter().collect(),
                    other => {
                        tracing::trace!("flatten skipped non-sequence: {:?}", other);
                        Vec::new()
                    }
                })
                .collect()
        } else {
            working
                .into_iter()
                .filter_map(|item| item.get(segment))
                .collect()
        };

        if working.is_empty() {
            break;
        }
    }

    working
}

/// Resolve `path` expecting a single value: the first match, if any.
pub fn resolve_first<'a>(root: &'a RawItem, path: &str) -> Option<&'a RawItem> {
    resolve(root, path).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> RawItem {
        RawItem::from(value)
    }

    #[test]
    fn test_simple_path() {
        let root = item(json!({"State": {"Name": "running"}}));
        let resolved = resolve(&root, "State.Name");
        assert_eq!(resolved, vec![&item(json!("running"))]);
    }

    #[test]
    fn test_missing_key_is_empty() {
        let root = item(json!({"State": {"Code": 16}}));
        assert!(resolve(&root, "State.Name").is_empty());
        assert!(resolve(&root, "Missing.Name").is_empty());
    }

    #[test]
    fn test_flatten_one_level() {
        let root = item(json!({"a": [[1, 2], [3]]}));
        let resolved = resolve(&root, "a.[]");
        assert_eq!(resolved, vec![&item(json!([1, 2])), &item(json!([3]))]);

        let resolved = resolve(&root, "a.[].[]");
        assert_eq!(
            resolved,
            vec![&item(json!(1)), &item(json!(2)), &item(json!(3))]
        );
    }

    #[test]
    fn test_nested_flatten() {
        let root = item(json!({
            "Reservations": [
                {"Instances": [{"InstanceId": "i-1"}, {"InstanceId": "i-2"}]},
                {"Instances": [{"InstanceId": "i-3"}]},
                {"OwnerId": "no-instances"}
            ]
        }));

        let ids: Vec<_> = resolve(&root, "Reservations.[].Instances.[].InstanceId")
            .into_iter()
            .filter_map(RawItem::as_str)
            .collect();
        assert_eq!(ids, vec!["i-1", "i-2", "i-3"]);
    }

    #[test]
    fn test_flatten_skips_non_sequences() {
        let root = item(json!({"a": [[1], "text", {"k": 1}, [2]]}));
        let resolved = resolve(&root, "a.[].[]");
        assert_eq!(resolved, vec![&item(json!(1)), &item(json!(2))]);
    }

    #[test]
    fn test_key_on_scalar_is_dropped() {
        let root = item(json!({"a": "text"}));
        assert!(resolve(&root, "a.b").is_empty());
    }

    #[test]
    fn test_non_list_value_is_single_element() {
        let root = item(json!({"Account": "123456789012"}));
        let resolved = resolve(&root, "Account");
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].as_str(), Some("123456789012"));
    }

    #[test]
    fn test_resolve_first() {
        let root = item(json!({"a": [{"b": 1}, {"b": 2}]}));
        assert_eq!(resolve_first(&root, "a.[].b"), Some(&item(json!(1))));
        assert_eq!(resolve_first(&root, "a.[].c"), None);
    }
}
