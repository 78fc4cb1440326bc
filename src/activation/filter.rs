use super::{ActivationRecord, SeenSet};

/// Keep the records of `action_name` that have not been shown yet, in input
/// order. Records without logs are kept; the presenter decides about those.
pub fn filter_new_activations(
    records: &[ActivationRecord],
    action_name: &str,
    seen: &SeenSet,
) -> Vec<ActivationRecord> {
    records
        .iter()
        .filter(|record| record.name == action_name && !seen.contains(&record.activation_id))
        .cloned()
        .collect()
}

/// Name activations of a deployed action carry: the action name without
/// its package (`pkg/action` runs as `action`).
pub fn activation_name(deployed_action: &str) -> &str {
    deployed_action
        .rsplit('/')
        .next()
        .unwrap_or(deployed_action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, lines: usize) -> ActivationRecord {
        ActivationRecord {
            activation_id: id.to_string(),
            name: name.to_string(),
            logs: (0..lines)
                .map(|i| format!("2017-05-09T15:50:0{}.000Z stdout: line {}", i, i))
                .collect(),
        }
    }

    fn ids(records: &[ActivationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.activation_id.as_str()).collect()
    }

    #[test]
    fn test_keeps_only_target_function() {
        let records = vec![
            record("a", "hello", 1),
            record("b", "other", 1),
            record("c", "hello", 1),
        ];
        let kept = filter_new_activations(&records, "hello", &SeenSet::new());
        assert_eq!(ids(&kept), vec!["a", "c"]);
    }

    #[test]
    fn test_drops_seen_and_preserves_order() {
        let records = vec![
            record("c", "hello", 1),
            record("b", "hello", 1),
            record("a", "hello", 1),
        ];
        let mut seen = SeenSet::new();
        seen.insert("b");
        let kept = filter_new_activations(&records, "hello", &seen);
        assert_eq!(ids(&kept), vec!["c", "a"]);
    }

    #[test]
    fn test_keeps_records_without_logs() {
        let records = vec![record("a", "hello", 0)];
        let kept = filter_new_activations(&records, "hello", &SeenSet::new());
        assert_eq!(ids(&kept), vec!["a"]);
    }

    #[test]
    fn test_activation_name_strips_package() {
        assert_eq!(activation_name("shop_hello"), "shop_hello");
        assert_eq!(activation_name("payments/checkout"), "checkout");
    }

    #[test]
    fn test_filter_is_pure() {
        let records = vec![record("a", "hello", 1), record("b", "hello", 2)];
        let mut seen = SeenSet::new();
        seen.insert("a");
        let first = filter_new_activations(&records, "hello", &seen);
        let second = filter_new_activations(&records, "hello", &seen);
        assert_eq!(first, second);
        assert_eq!(seen.len(), 1);
    }
}
