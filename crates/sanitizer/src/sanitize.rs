//! The sanitization pipeline: events in, safe markup out.

use crate::entities;
use crate::policy::{Policy, default_attrs};
use crate::tokenizer::tokenize;
use crate::types::{AttrMap, Event};
use crate::value::escape_output;

/// Error surface for callers holding raw bytes. `&str` entry points are
/// total and never produce one.
#[derive(Debug)]
pub enum SanitizeError {
    InvalidUtf8(std::str::Utf8Error),
}

impl std::fmt::Display for SanitizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SanitizeError::InvalidUtf8(err) => write!(f, "input is not valid UTF-8: {err}"),
        }
    }
}

impl std::error::Error for SanitizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SanitizeError::InvalidUtf8(err) => Some(err),
        }
    }
}

/// Per-invocation state: the output buffer and the open-tag stack. Built
/// fresh for every call so one `Sanitizer` serves concurrent callers.
struct Context {
    out: String,
    /// Open permitted close-requiring tags, innermost last.
    open_tags: Vec<&'static str>,
}

/// Whitelist-based markup sanitizer.
///
/// Holds only the immutable policy table; `sanitize` threads its own
/// per-call context, so sharing one instance across threads needs no
/// locking and no reset.
#[derive(Clone, Debug, Default)]
pub struct Sanitizer {
    policy: Policy,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self {
            policy: Policy::new(),
        }
    }

    pub fn with_policy(policy: Policy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Sanitize untrusted markup. Total: malformed input degrades, it never
    /// fails. Output is closed under the policy, so a second pass over the
    /// result returns it unchanged, with one repair: an anchor whose invalid
    /// `target` was deleted gains the default `target="_blank"` on the next
    /// pass, after which the output is stable.
    pub fn sanitize(&self, raw: &str) -> String {
        let mut ctx = Context {
            out: String::with_capacity(raw.len()),
            open_tags: Vec::new(),
        };
        for event in tokenize(raw) {
            match event {
                Event::Text(text) => ctx.out.push_str(&escape_output(&text)),
                Event::CharRef(body) => char_ref(&mut ctx, &body),
                Event::EntityRef(name) => entity_ref(&mut ctx, &name),
                Event::Comment(text) => {
                    // Comments are shown, never re-emitted as live markup.
                    ctx.out.push_str(&escape_output(&format!("<!--{text}-->")));
                }
                Event::StartTag { name, attrs } | Event::StartEndTag { name, attrs } => {
                    self.start_tag(&mut ctx, &name, attrs);
                }
                Event::EndTag(name) => end_tag(&mut ctx, &name),
            }
        }
        // Balance repair: anything still open closes deepest-nested first.
        while let Some(name) = ctx.open_tags.pop() {
            log::trace!(target: "sanitizer.policy", "auto-closing <{name}> left open at end of input");
            ctx.out.push_str("</");
            ctx.out.push_str(name);
            ctx.out.push('>');
        }
        ctx.out
    }

    /// Byte-slice wrapper around [`Sanitizer::sanitize`] for callers that
    /// have not yet validated their input as text.
    pub fn sanitize_bytes(&self, raw: &[u8]) -> Result<String, SanitizeError> {
        let text = std::str::from_utf8(raw).map_err(SanitizeError::InvalidUtf8)?;
        Ok(self.sanitize(text))
    }

    fn start_tag(&self, ctx: &mut Context, name: &str, attrs: Vec<(String, String)>) {
        let Some(rule) = self.policy.rule(name) else {
            // Drop the wrapper, keep whatever was nested inside it.
            log::trace!(target: "sanitizer.policy", "dropping disallowed tag <{name}>");
            return;
        };
        if rule.requires_close {
            ctx.open_tags.push(rule.name);
        }

        let mut filtered = AttrMap::new();
        for (attr_name, value) in attrs {
            if self.policy.allows_attr(rule, &attr_name) {
                filtered.insert(attr_name, value);
            } else {
                log::trace!(
                    target: "sanitizer.policy",
                    "dropping attribute {attr_name} on <{name}>"
                );
            }
        }
        (rule.transform.unwrap_or(default_attrs))(&mut filtered);

        ctx.out.push('<');
        ctx.out.push_str(rule.name);
        for (attr_name, value) in filtered.iter() {
            ctx.out.push(' ');
            ctx.out.push_str(attr_name);
            ctx.out.push_str("=\"");
            ctx.out.push_str(&escape_output(value));
            ctx.out.push('"');
        }
        if !rule.requires_close {
            ctx.out.push_str(" /");
        }
        ctx.out.push('>');
    }
}

fn end_tag(ctx: &mut Context, name: &str) {
    // Pop only on an exact match with the innermost open tag; crafted close
    // tags cannot break nesting.
    if ctx.open_tags.last().is_some_and(|&top| top == name) {
        ctx.open_tags.pop();
        ctx.out.push_str("</");
        ctx.out.push_str(name);
        ctx.out.push('>');
    } else {
        log::trace!(target: "sanitizer.policy", "discarding unmatched </{name}>");
    }
}

fn char_ref(ctx: &mut Context, body: &str) {
    // Short decimal references pass through re-wrapped; hex or overlong
    // bodies degrade to escaped text of the original reference.
    if body.len() < 7 && !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) {
        ctx.out.push_str("&#");
        ctx.out.push_str(body);
        ctx.out.push(';');
    } else {
        ctx.out.push_str(&escape_output(&format!("&#{body}")));
    }
}

fn entity_ref(ctx: &mut Context, name: &str) {
    if entities::is_known(name) {
        ctx.out.push('&');
        ctx.out.push_str(name);
        ctx.out.push(';');
    } else {
        ctx.out.push_str(&escape_output(&format!("&{name}")));
    }
}
