//! Whitelist-based sanitizer for untrusted user markup.
//!
//! Turns user-supplied text (profile bios, names, interest fields) into a
//! restricted safe subset of markup before it is stored and re-rendered:
//! a hand-built streaming tokenizer feeds a policy engine that enforces a
//! tag whitelist, an attribute whitelist, URL-scheme coercion, CSS
//! `expression` neutralization, entity handling, and tag-balance repair.
//!
//! The pipeline is a pure synchronous transform with no I/O. Malformed
//! markup never fails a call — it degrades to escaped text — while
//! disallowed content is dropped or neutralized.
//!
//! ```
//! assert_eq!(sanitizer::sanitize("<script>alert(1)</script>"), "alert(1)");
//! assert_eq!(sanitizer::sanitize("<b>bold"), "<b>bold</b>");
//! ```

mod entities;
mod policy;
mod sanitize;
mod tokenizer;
mod types;
mod value;

pub use crate::policy::{AttrTransform, COMMON_ATTRS, Policy, TagRule};
pub use crate::sanitize::{SanitizeError, Sanitizer};
pub use crate::tokenizer::tokenize;
pub use crate::types::{AttrMap, Event};

use std::sync::LazyLock;

static SHARED: LazyLock<Sanitizer> = LazyLock::new(Sanitizer::new);

/// Sanitize with the default policy. Total function: never panics for any
/// input, however malformed.
pub fn sanitize(raw: &str) -> String {
    SHARED.sanitize(raw)
}

/// Byte-slice variant of [`sanitize`]; fails only on invalid UTF-8.
pub fn sanitize_bytes(raw: &[u8]) -> Result<String, SanitizeError> {
    SHARED.sanitize_bytes(raw)
}
