//! Property-based tests for env file parsing

use devup::config::parse_env;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_parse_doesnt_panic(s in "\\PC*") {
        let _ = parse_env(&s);
    }

    #[test]
    fn test_lines_without_equals_are_ignored(
        garbage in prop::collection::vec("[^=\\r\\n]{0,30}", 0..10),
    ) {
        let content = garbage.join("\n");
        prop_assert!(parse_env(&content).is_empty());
    }

    #[test]
    fn test_garbage_does_not_hide_real_keys(
        key in "[A-Z][A-Z0-9_]{0,15}",
        value in "[a-zA-Z0-9:/@?&._-]{0,40}",
        garbage in prop::collection::vec("[^=\\r\\n]{0,30}", 0..10),
    ) {
        let mut lines = garbage.clone();
        lines.insert(garbage.len() / 2, format!("{}={}", key, value));
        let env = parse_env(&lines.join("\n"));

        prop_assert_eq!(env.len(), 1);
        prop_assert_eq!(env.get(&key), Some(&value));
    }

    #[test]
    fn test_last_assignment_wins(
        key in "[A-Z]{1,10}",
        values in prop::collection::vec("[a-z0-9]{0,10}", 1..5),
    ) {
        let content: Vec<String> = values.iter().map(|v| format!("{}={}", key, v)).collect();
        let env = parse_env(&content.join("\n"));
        prop_assert_eq!(env.get(&key), values.last());
    }

    #[test]
    fn test_commented_assignments_are_ignored(
        key in "[A-Z]{1,10}",
        value in "[a-z0-9]{0,10}",
        indent in " {0,4}",
    ) {
        let env = parse_env(&format!("{}# {}={}", indent, key, value));
        prop_assert!(env.is_empty());
    }
}
