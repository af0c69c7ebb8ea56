// Unit tests for locator module

use super::*;

#[test]
fn test_bind_replaces_placeholder_once() {
    let locator = Locator::xpath("//h3/span[text()='<REPLACE>']");
    let bound = locator.bind("Duck - Wikipedia");

    assert_eq!(bound.selector, "//h3/span[text()='Duck - Wikipedia']");
    assert_eq!(bound.strategy, Strategy::XPath);
    assert_eq!(bound.selector.matches("Duck - Wikipedia").count(), 1);
    assert!(!bound.has_placeholder());
}

#[test]
fn test_bind_leaves_original_unchanged() {
    let locator = Locator::xpath("//span[text()='<REPLACE>']");
    let before = locator.clone();

    let _ = locator.bind("anything");

    assert_eq!(locator, before);
    assert!(locator.has_placeholder());
}

#[test]
fn test_bind_replaces_every_occurrence() {
    let locator = Locator::xpath("//a[@title='<REPLACE>' and text()='<REPLACE>']");
    let bound = locator.bind("Wiki");

    assert_eq!(bound.selector, "//a[@title='Wiki' and text()='Wiki']");
}

#[test]
fn test_bind_without_placeholder_is_identity_on_selector() {
    let locator = Locator::css("input[name=\"q\"]");
    let bound = locator.bind("ducks");

    assert_eq!(bound, locator);
}

#[test]
fn test_as_webdriver_mapping() {
    let css = Locator::css("input[name=\"q\"]");
    assert!(matches!(css.as_webdriver(), fantoccini::Locator::Css(_)));

    let xpath = Locator::xpath("//a[text()='Wikipedia']");
    assert!(matches!(
        xpath.as_webdriver(),
        fantoccini::Locator::XPath(_)
    ));
}

#[test]
fn test_locator_display() {
    let locator = Locator::css("button.submit");
    assert_eq!(locator.to_string(), "css=button.submit");

    let locator = Locator::xpath("//h1");
    assert_eq!(locator.to_string(), "xpath=//h1");
}

#[test]
fn test_registry_lookup() {
    let mut registry = LocatorRegistry::new();
    assert!(registry.is_empty());

    registry.insert("SEARCH_BOX", Locator::css("input[name=\"q\"]"));
    assert_eq!(registry.len(), 1);

    let found = registry.get("SEARCH_BOX").unwrap();
    assert_eq!(found.strategy, Strategy::Css);

    assert!(registry.get("MISSING").is_none());
}

#[test]
fn test_registry_require_missing_entry() {
    let registry = LocatorRegistry::new();
    let err = registry.require("NOT_THERE").unwrap_err();
    assert!(err.to_string().contains("NOT_THERE"));
}

#[test]
fn test_registry_insert_replaces() {
    let mut registry = LocatorRegistry::new();
    registry.insert("BOX", Locator::css("input.old"));
    registry.insert("BOX", Locator::css("input.new"));

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("BOX").unwrap().selector, "input.new");
}
