//! Tag whitelist and attribute policy tables.
//!
//! The table is static data plus plain function pointers: one transform per
//! tag that needs special attribute handling (currently only `a`) and a
//! default for everything else. Lookups are exact matches on the lowercased
//! names the tokenizer produces.

use crate::types::AttrMap;
use crate::value::{coerce_url, neutralize_style};

/// Rewrites an attribute map in place after whitelist filtering.
pub type AttrTransform = fn(&mut AttrMap);

/// Policy entry for one permitted tag.
#[derive(Clone, Copy, Debug)]
pub struct TagRule {
    pub name: &'static str,
    /// Whether the tag takes a matching close tag. Tags that do not
    /// (`img`, `hr`, `br`) serialize self-closing and never enter the
    /// open-tag stack.
    pub requires_close: bool,
    /// Attribute names allowed beyond [`COMMON_ATTRS`].
    pub extra_attrs: &'static [&'static str],
    /// Per-tag attribute transform; `None` means the default transform.
    pub transform: Option<AttrTransform>,
}

/// Attributes allowed on every permitted tag.
pub const COMMON_ATTRS: &[&str] = &["style", "class", "name"];

const PERMITTED_TAGS: &[&str] = &[
    "a", "img", "br", "strong", "b", "code", "pre", "p", "div", "em", "span", "h1", "h2", "h3",
    "h4", "h5", "h6", "blockquote", "ul", "ol", "tr", "th", "td", "hr", "li", "u", "s", "table",
    "thead", "tbody", "caption", "small", "q", "sup", "sub", "cite", "i",
];

const NO_CLOSE_TAGS: &[&str] = &["img", "hr", "br"];

fn extra_attrs(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "target", "rel", "title"],
        "img" => &["src", "width", "height", "alt", "align"],
        "blockquote" => &["type"],
        "table" => &["border", "cellpadding", "cellspacing"],
        _ => &[],
    }
}

/// The whitelist: tag rules shared immutably across all sanitizer calls.
#[derive(Clone, Debug)]
pub struct Policy {
    rules: Vec<TagRule>,
}

impl Policy {
    /// Build the default table.
    pub fn new() -> Self {
        let rules = PERMITTED_TAGS
            .iter()
            .map(|&name| TagRule {
                name,
                requires_close: !NO_CLOSE_TAGS.contains(&name),
                extra_attrs: extra_attrs(name),
                transform: (name == "a").then_some(anchor_attrs as AttrTransform),
            })
            .collect();
        Self { rules }
    }

    pub fn rule(&self, name: &str) -> Option<&TagRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Register a rule, replacing any existing rule with the same name.
    /// Callers extend the table before constructing a `Sanitizer`; rules
    /// never change underneath in-flight invocations.
    pub fn register(&mut self, rule: TagRule) {
        match self.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Whether `attr` survives whitelist filtering for `rule`'s tag.
    pub fn allows_attr(&self, rule: &TagRule, attr: &str) -> bool {
        COMMON_ATTRS.contains(&attr) || rule.extra_attrs.contains(&attr)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}

/// Default transform: style neutralization only.
pub(crate) fn default_attrs(attrs: &mut AttrMap) {
    let neutralized = attrs.get("style").map(neutralize_style);
    if let Some(style) = neutralized {
        attrs.insert("style", style);
    }
}

/// Anchor transform: style neutralization, then `href` scheme coercion,
/// then `target` defaulting and restriction — in that order.
pub(crate) fn anchor_attrs(attrs: &mut AttrMap) {
    default_attrs(attrs);
    let coerced = attrs.get("href").map(coerce_url);
    if let Some(href) = coerced {
        attrs.insert("href", href);
    }
    if !attrs.contains("target") {
        attrs.insert("target", "_blank");
    }
    limit_attr(attrs, "target", &["_blank", "_self"]);
}

/// Delete `name` when its value is outside `allowed`. No default is
/// substituted after deletion.
fn limit_attr(attrs: &mut AttrMap, name: &str, allowed: &[&str]) {
    if attrs.get(name).is_some_and(|value| !allowed.contains(&value)) {
        attrs.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_contains_the_permitted_tags_only() {
        let policy = Policy::new();
        for tag in ["a", "img", "h6", "blockquote", "cite"] {
            assert!(policy.rule(tag).is_some(), "expected {tag} to be permitted");
        }
        for tag in ["script", "iframe", "svg", "style", "html", "body"] {
            assert!(policy.rule(tag).is_none(), "expected {tag} to be rejected");
        }
    }

    #[test]
    fn only_void_tags_skip_the_close_requirement() {
        let policy = Policy::new();
        for tag in ["img", "hr", "br"] {
            let rule = policy.rule(tag).expect("whitelisted");
            assert!(!rule.requires_close, "{tag} must not require a close");
        }
        for tag in ["a", "div", "table"] {
            let rule = policy.rule(tag).expect("whitelisted");
            assert!(rule.requires_close, "{tag} must require a close");
        }
    }

    #[test]
    fn attribute_allowance_is_common_union_extras() {
        let policy = Policy::new();
        let a = policy.rule("a").expect("whitelisted");
        let div = policy.rule("div").expect("whitelisted");
        assert!(policy.allows_attr(a, "href"));
        assert!(policy.allows_attr(a, "style"));
        assert!(policy.allows_attr(div, "class"));
        assert!(!policy.allows_attr(div, "href"));
        assert!(!policy.allows_attr(a, "onclick"));
    }

    #[test]
    fn anchor_transform_coerces_href_and_defaults_target() {
        let mut attrs = AttrMap::new();
        attrs.insert("href", "javascript:alert(1)");
        anchor_attrs(&mut attrs);
        assert_eq!(attrs.get("href"), Some("http://javascript:alert(1)"));
        assert_eq!(attrs.get("target"), Some("_blank"));
    }

    #[test]
    fn anchor_transform_deletes_disallowed_target_without_substitute() {
        let mut attrs = AttrMap::new();
        attrs.insert("href", "http://x");
        attrs.insert("target", "_parent");
        anchor_attrs(&mut attrs);
        assert_eq!(attrs.get("href"), Some("http://x"));
        assert_eq!(attrs.get("target"), None);
    }

    #[test]
    fn anchor_transform_keeps_self_target() {
        let mut attrs = AttrMap::new();
        attrs.insert("target", "_self");
        anchor_attrs(&mut attrs);
        assert_eq!(attrs.get("target"), Some("_self"));
    }

    #[test]
    fn default_transform_neutralizes_style_only() {
        let mut attrs = AttrMap::new();
        attrs.insert("style", "width:expression(alert(1))");
        attrs.insert("class", "left");
        default_attrs(&mut attrs);
        assert_eq!(attrs.get("style"), Some("width:_(alert(1))"));
        assert_eq!(attrs.get("class"), Some("left"));
    }

    #[test]
    fn register_replaces_existing_rule() {
        let mut policy = Policy::new();
        policy.register(TagRule {
            name: "a",
            requires_close: true,
            extra_attrs: &["href"],
            transform: None,
        });
        let a = policy.rule("a").expect("still present");
        assert_eq!(a.extra_attrs, &["href"]);
        assert!(a.transform.is_none());
        assert_eq!(
            policy.rule("a").map(|r| r.name),
            Some("a"),
            "no duplicate entry expected"
        );
    }
}
