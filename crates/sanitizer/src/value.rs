//! Output escaping and value neutralization.
//!
//! Everything written to the output buffer — text events and serialized
//! attribute values alike — passes through [`escape_output`]. Style values
//! additionally go through [`neutralize_style`] and anchor URLs through
//! [`coerce_url`] before that final escape.

use regex::Regex;
use std::sync::LazyLock;

/// Replacement for neutralized style fragments.
const PLACEHOLDER: &str = "_";

// Escape sequences, comment fences, and `&#` re-encoding tricks inside a
// style value; each whole match collapses to the placeholder.
static STYLE_ESCAPE_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\\|&#|/\*|\*/").expect("static pattern compiles"));

// The letters of `expression` with arbitrary filler, catching obfuscated CSS
// expression() injection. Known over-broad: prose containing the ordered
// letters also matches. Greedy `.*` makes one pass collapse the entire run
// from the first usable `e` to the last completing `n`.
static OBFUSCATED_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)e.*x.*p.*r.*e.*s.*s.*i.*o.*n").expect("static pattern compiles")
});

// Approved URL schemes; anything else gets the safe prefix instead.
static APPROVED_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:http|https|ftp)://").expect("static pattern compiles"));

/// Neutralize CSS expression-injection vectors in a `style` value.
/// Substitution order matters: escape tokens first, then the obfuscated
/// `expression` pattern.
pub(crate) fn neutralize_style(style: &str) -> String {
    let pass = STYLE_ESCAPE_TOKENS.replace_all(style, PLACEHOLDER);
    OBFUSCATED_EXPRESSION
        .replace_all(&pass, PLACEHOLDER)
        .into_owned()
}

/// Coerce a URL to an approved scheme. Values already carrying one are kept
/// verbatim; everything else is prefixed with `http://`, turning any embedded
/// scheme into inert path text rather than rejecting the value.
pub(crate) fn coerce_url(url: &str) -> String {
    if APPROVED_SCHEME.is_match(url) {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

/// Escape a value for the output buffer: the five HTML specials, then every
/// literal colon as `&#58;`. The colon pass is defense in depth against
/// scheme injection surviving the URL coercion, and runs uniformly on text
/// and attribute values. `'` becomes the decimal `&#39;` so a second
/// sanitization pass re-emits it unchanged.
pub(crate) fn escape_output(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace(':', "&#58;")
}
