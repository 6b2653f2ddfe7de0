//! Element locators.
//!
//! A [`Locator`] names both the lookup strategy and the strategy-specific
//! query. Every strategy maps to exactly one W3C `using` value, so a lookup
//! always has a defined dispatch path.

use std::fmt;

use serde_json::{json, Value};

/// How to find a UI element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// XPath expression over the page source.
    XPath(String),
    /// CSS selector (web contexts).
    Css(String),
    /// Resource id (Android) or element id.
    Id(String),
    /// Element name.
    Name(String),
    /// Accessibility id (`content-desc` on Android, accessibility identifier on iOS).
    AccessibilityId(String),
    /// Widget class name.
    ClassName(String),
}

impl Locator {
    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }

    pub fn accessibility_id(value: impl Into<String>) -> Self {
        Locator::AccessibilityId(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        Locator::ClassName(value.into())
    }

    /// The W3C `using` strategy for this locator.
    pub fn using(&self) -> &'static str {
        match self {
            Locator::XPath(_) => "xpath",
            Locator::Css(_) => "css selector",
            Locator::Id(_) => "id",
            Locator::Name(_) => "name",
            Locator::AccessibilityId(_) => "accessibility id",
            Locator::ClassName(_) => "class name",
        }
    }

    /// The strategy-specific query string.
    pub fn value(&self) -> &str {
        match self {
            Locator::XPath(v)
            | Locator::Css(v)
            | Locator::Id(v)
            | Locator::Name(v)
            | Locator::AccessibilityId(v)
            | Locator::ClassName(v) => v,
        }
    }

    /// The body of a find-element command.
    pub fn to_query(&self) -> Value {
        json!({"using": self.using(), "value": self.value()})
    }

    /// Returns this locator if it may be used for a dynamic lookup.
    ///
    /// Dynamic lookups build their query at runtime and only accept XPath
    /// and CSS; other strategies yield `None`.
    pub fn dynamic_lookup(&self) -> Option<&Self> {
        match self {
            Locator::XPath(_) | Locator::Css(_) => Some(self),
            Locator::Id(_)
            | Locator::Name(_)
            | Locator::AccessibilityId(_)
            | Locator::ClassName(_) => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.using(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_strategy_maps_to_its_own_using_value() {
        let cases = [
            (Locator::xpath("//a"), "xpath"),
            (Locator::css("#a"), "css selector"),
            (Locator::id("a"), "id"),
            (Locator::name("a"), "name"),
            (Locator::accessibility_id("a"), "accessibility id"),
            (Locator::class_name("a"), "class name"),
        ];
        for (locator, using) in cases {
            assert_eq!(locator.using(), using);
            assert_eq!(locator.to_query()["using"], using);
        }
    }

    #[test]
    fn query_carries_value() {
        let locator = Locator::accessibility_id("test-LOGOUT");
        assert_eq!(
            locator.to_query(),
            json!({"using": "accessibility id", "value": "test-LOGOUT"})
        );
    }

    #[test]
    fn dynamic_lookup_admits_only_xpath_and_css() {
        assert!(Locator::xpath("//a").dynamic_lookup().is_some());
        assert!(Locator::css("a").dynamic_lookup().is_some());
        assert!(Locator::id("a").dynamic_lookup().is_none());
        assert!(Locator::name("a").dynamic_lookup().is_none());
        assert!(Locator::accessibility_id("a").dynamic_lookup().is_none());
        assert!(Locator::class_name("a").dynamic_lookup().is_none());
    }

    #[test]
    fn display_for_logs() {
        assert_eq!(Locator::id("menu").to_string(), "id=menu");
    }
}
