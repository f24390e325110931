use super::*;
use crate::category::CategoryRegistry;

#[test]
fn test_default_suppresses_exact_repeats_only() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let mut dedup = DedupRegistry::new();
    let at = SourceLocation::new("m", 10);

    assert!(!dedup.should_suppress_repeat(Action::Default, builtins.user, &at));
    assert!(dedup.should_suppress_repeat(Action::Default, builtins.user, &at));

    // Different line, module, or category: not a repeat.
    let other_line = SourceLocation::new("m", 11);
    assert!(!dedup.should_suppress_repeat(Action::Default, builtins.user, &other_line));
    let other_module = SourceLocation::new("n", 10);
    assert!(!dedup.should_suppress_repeat(Action::Default, builtins.user, &other_module));
    assert!(!dedup.should_suppress_repeat(Action::Default, builtins.runtime, &at));
}

#[test]
fn test_module_suppresses_across_lines() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let mut dedup = DedupRegistry::new();

    let first = SourceLocation::new("m", 10);
    let second = SourceLocation::new("m", 99);
    assert!(!dedup.should_suppress_repeat(Action::Module, builtins.user, &first));
    assert!(dedup.should_suppress_repeat(Action::Module, builtins.user, &second));

    let elsewhere = SourceLocation::new("n", 10);
    assert!(!dedup.should_suppress_repeat(Action::Module, builtins.user, &elsewhere));
}

#[test]
fn test_once_is_per_category() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let mut dedup = DedupRegistry::new();

    let here = SourceLocation::new("m", 10);
    let there = SourceLocation::new("n", 20);
    assert!(!dedup.should_suppress_repeat(Action::Once, builtins.user, &here));
    assert!(dedup.should_suppress_repeat(Action::Once, builtins.user, &there));

    // A different category gets its own first occurrence.
    assert!(!dedup.should_suppress_repeat(Action::Once, builtins.runtime, &here));
}

#[test]
fn test_always_never_suppresses_or_records() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let mut dedup = DedupRegistry::new();
    let at = SourceLocation::new("m", 10);

    for _ in 0..3 {
        assert!(!dedup.should_suppress_repeat(Action::Always, builtins.user, &at));
    }
    assert!(dedup.is_empty());
}

#[test]
fn test_granularities_do_not_collide() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let mut dedup = DedupRegistry::new();
    let at = SourceLocation::new("m", 10);

    assert!(!dedup.should_suppress_repeat(Action::Default, builtins.user, &at));
    // Same category and location under coarser actions still get their
    // own first occurrence.
    assert!(!dedup.should_suppress_repeat(Action::Module, builtins.user, &at));
    assert!(!dedup.should_suppress_repeat(Action::Once, builtins.user, &at));
    assert_eq!(dedup.len(), 3);
}
