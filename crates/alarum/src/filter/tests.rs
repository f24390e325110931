use super::*;
use pretty_assertions::assert_eq;

fn location(module: &str, line: u32) -> SourceLocation {
    SourceLocation::new(module, line)
}

#[test]
fn test_empty_chain_falls_through_to_default() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let chain = FilterChain::empty();

    let action = chain.evaluate("anything", builtins.user, &location("m", 1), &registry);
    assert_eq!(action, Action::Default);
}

#[test]
fn test_first_match_wins() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();

    let mut chain = FilterChain::empty();
    chain.push_back(FilterRule::simple(Action::Ignore, Some(builtins.user), 0));
    chain.push_back(FilterRule::simple(Action::Error, Some(builtins.user), 0));

    let action = chain.evaluate("msg", builtins.user, &location("m", 1), &registry);
    assert_eq!(action, Action::Ignore);
}

#[test]
fn test_front_insertion_takes_precedence() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();

    let mut chain = FilterChain::empty();
    chain.insert_front(FilterRule::simple(Action::Ignore, Some(builtins.user), 0));
    // More specific rule, inserted later, must win.
    chain.insert_front(
        FilterRule::filtered(Action::Error, Some("unstable"), Some(builtins.user), None, 0)
            .unwrap(),
    );

    let action = chain.evaluate(
        "unstable results ahead",
        builtins.user,
        &location("m", 1),
        &registry,
    );
    assert_eq!(action, Action::Error);

    // Non-matching message falls through to the older rule.
    let action = chain.evaluate("all good", builtins.user, &location("m", 1), &registry);
    assert_eq!(action, Action::Ignore);
}

#[test]
fn test_message_match_is_prefix_and_case_insensitive() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let rule =
        FilterRule::filtered(Action::Ignore, Some("value might"), None, None, 0).unwrap();

    assert!(rule.matches(
        "Value MIGHT be unstable",
        builtins.runtime,
        &location("m", 1),
        &registry
    ));
    // Prefix anchored: a match later in the message does not count.
    assert!(!rule.matches(
        "warning: value might be unstable",
        builtins.runtime,
        &location("m", 1),
        &registry
    ));
}

#[test]
fn test_module_match_is_case_sensitive() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let rule = FilterRule::filtered(Action::Ignore, None, None, Some("myapp"), 0).unwrap();

    assert!(rule.matches("msg", builtins.user, &location("myapp::net", 1), &registry));
    assert!(!rule.matches("msg", builtins.user, &location("MyApp::net", 1), &registry));
}

#[test]
fn test_category_matches_subtypes() {
    let mut registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let numeric = registry
        .register("NumericWarning", builtins.runtime)
        .unwrap();

    let rule = FilterRule::simple(Action::Error, Some(builtins.runtime), 0);
    assert!(rule.matches("msg", numeric, &location("m", 1), &registry));
    assert!(!rule.matches("msg", builtins.user, &location("m", 1), &registry));

    // Root category as rule field matches everything.
    let root_rule = FilterRule::simple(Action::Ignore, Some(builtins.warning), 0);
    assert!(root_rule.matches("msg", numeric, &location("m", 1), &registry));
}

#[test]
fn test_line_zero_is_wildcard() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();

    let any_line = FilterRule::simple(Action::Ignore, None, 0);
    assert!(any_line.matches("msg", builtins.user, &location("m", 7), &registry));

    let exact = FilterRule::simple(Action::Ignore, None, 7);
    assert!(exact.matches("msg", builtins.user, &location("m", 7), &registry));
    assert!(!exact.matches("msg", builtins.user, &location("m", 8), &registry));
}

#[test]
fn test_default_chain_ignores_noisy_categories() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();
    let chain = FilterChain::with_defaults(&builtins);
    let at = location("m", 1);

    for category in [
        builtins.pending_deprecation,
        builtins.import,
        builtins.resource,
        builtins.bytes,
    ] {
        assert_eq!(chain.evaluate("msg", category, &at, &registry), Action::Ignore);
    }
    assert_eq!(chain.evaluate("msg", builtins.user, &at, &registry), Action::Default);
    assert_eq!(
        chain.evaluate("msg", builtins.deprecation, &at, &registry),
        Action::Default
    );
}

#[test]
fn test_bad_pattern_is_config_error() {
    let err = FilterRule::filtered(Action::Ignore, Some("("), None, None, 0);
    assert!(matches!(err, Err(ConfigError::BadPattern { .. })));
}

#[test]
fn test_action_round_trips_through_strings() {
    for action in [
        Action::Ignore,
        Action::Error,
        Action::Always,
        Action::Default,
        Action::Module,
        Action::Once,
    ] {
        assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
    }
    assert!(matches!(
        "explode".parse::<Action>(),
        Err(ConfigError::UnknownAction { .. })
    ));
}

#[test]
fn test_parse_spec_full() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();

    let rule = parse_spec("error:unstable:RuntimeWarning:myapp:12", &registry).unwrap();
    assert_eq!(rule.action(), Action::Error);
    assert_eq!(rule.category(), Some(builtins.runtime));
    assert!(rule.matches(
        "Unstable computation",
        builtins.runtime,
        &location("myapp", 12),
        &registry
    ));
    assert!(!rule.matches(
        "Unstable computation",
        builtins.runtime,
        &location("myapp", 13),
        &registry
    ));
}

#[test]
fn test_parse_spec_action_only() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();

    let rule = parse_spec("ignore", &registry).unwrap();
    assert_eq!(rule.action(), Action::Ignore);
    assert!(rule.matches("anything", builtins.resource, &location("m", 3), &registry));
}

#[test]
fn test_parse_spec_message_is_literal() {
    let registry = CategoryRegistry::new();
    let builtins = registry.builtins();

    // `.*` in a spec is a literal, not a regex.
    let rule = parse_spec("ignore:.*", &registry).unwrap();
    assert!(rule.matches(".* literally", builtins.user, &location("m", 1), &registry));
    assert!(!rule.matches("anything", builtins.user, &location("m", 1), &registry));
}

#[test]
fn test_parse_spec_errors() {
    let registry = CategoryRegistry::new();

    assert!(matches!(
        parse_spec("explode", &registry),
        Err(ConfigError::UnknownAction { .. })
    ));
    assert!(matches!(
        parse_spec("ignore::NoSuchWarning", &registry),
        Err(ConfigError::UnknownCategory { .. })
    ));
    assert!(matches!(
        parse_spec("ignore:::m:notaline", &registry),
        Err(ConfigError::BadLine { .. })
    ));
    assert!(matches!(
        parse_spec("ignore:a:b:c:1:extra", &registry),
        Err(ConfigError::MalformedSpec { .. })
    ));
}

#[test]
fn test_parse_specs_list() {
    let registry = CategoryRegistry::new();

    let rules = parse_specs("ignore, error::ResourceWarning", &registry).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].action(), Action::Ignore);
    assert_eq!(rules[1].action(), Action::Error);

    assert!(parse_specs("", &registry).unwrap().is_empty());
}
