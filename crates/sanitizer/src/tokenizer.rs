//! Event tokenizer for untrusted markup, with a constrained ASCII name set.
//!
//! Tag and attribute names accept ASCII `[A-Za-z0-9:_-]` (attributes also
//! `.`) and are lowercased as encountered. This is not an HTML5 state
//! machine and does not try to be: the consumer is a whitelist policy, so
//! anything ambiguous must come out as plain text, never as half a tag.
//!
//! Recovery rules:
//! - `<` that does not open a tag, comment, declaration, or PI is text.
//! - Any construct left unterminated at end of input is re-emitted verbatim
//!   as one text event covering the raw remainder.
//! - `&` that does not start a character/entity reference is text.
//! - Declarations (`<!doctype ...>`, `<!...>`) and PIs (`<?...>`) are
//!   consumed silently and produce no event.

use crate::entities::decode_references;
use crate::types::Event;
use memchr::{memchr, memchr2};

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':')
}

fn is_attr_name_byte(b: u8) -> bool {
    is_name_byte(b) || b == b'.'
}

/// Tokenize the full input into events, in document order. Never fails.
pub fn tokenize(input: &str) -> Vec<Event> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut out = Vec::new();
    let mut i = 0;
    // Invariant: slice endpoints always land on UTF-8 char boundaries because
    // every cut happens at an ASCII structural byte (`<`, `&`, quotes, `>`)
    // or after a run of ASCII name/digit bytes.
    while i < len {
        match bytes[i] {
            b'<' => match scan_markup(input, i, &mut out) {
                Some(next) => i = next,
                None => {
                    // Unterminated construct at end of input: degrade the
                    // raw remainder to text.
                    out.push(Event::Text(input[i..].to_string()));
                    break;
                }
            },
            b'&' => i = scan_reference(input, i, &mut out),
            _ => {
                let start = i;
                i = memchr2(b'<', b'&', &bytes[i..]).map_or(len, |rel| i + rel);
                out.push(Event::Text(input[start..i].to_string()));
            }
        }
    }
    out
}

/// Scan the construct opened by `<` at `i`. Returns the index after it, or
/// `None` when it runs off the end of input.
fn scan_markup(input: &str, i: usize, out: &mut Vec<Event>) -> Option<usize> {
    let bytes = input.as_bytes();
    let rest = &input[i..];
    if rest.starts_with(COMMENT_START) {
        let body_start = i + COMMENT_START.len();
        let end = input[body_start..].find(COMMENT_END)?;
        out.push(Event::Comment(input[body_start..body_start + end].to_string()));
        return Some(body_start + end + COMMENT_END.len());
    }
    if rest.starts_with("<!") || rest.starts_with("<?") {
        // Declarations and processing instructions vanish without an event.
        let close = memchr(b'>', &bytes[i..])?;
        return Some(i + close + 1);
    }
    if bytes.get(i + 1) == Some(&b'/') {
        if !bytes.get(i + 2).is_some_and(|b| b.is_ascii_alphabetic()) {
            out.push(Event::Text("<".to_string()));
            return Some(i + 1);
        }
        return scan_end_tag(input, i, out);
    }
    if bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic()) {
        return scan_start_tag(input, i, out);
    }
    // Stray `<` (`1 < 2`, `<<`, trailing `<`): plain text.
    out.push(Event::Text("<".to_string()));
    Some(i + 1)
}

fn scan_end_tag(input: &str, i: usize, out: &mut Vec<Event>) -> Option<usize> {
    let bytes = input.as_bytes();
    let name_start = i + 2;
    let mut j = name_start;
    while j < bytes.len() && is_name_byte(bytes[j]) {
        j += 1;
    }
    let name = input[name_start..j].to_ascii_lowercase();
    // Anything between the name and `>` is discarded (`</b foo>`).
    let close = memchr(b'>', &bytes[j..])?;
    out.push(Event::EndTag(name));
    Some(j + close + 1)
}

fn scan_start_tag(input: &str, i: usize, out: &mut Vec<Event>) -> Option<usize> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let name_start = i + 1;
    let mut j = name_start;
    while j < len && is_name_byte(bytes[j]) {
        j += 1;
    }
    let name = input[name_start..j].to_ascii_lowercase();

    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut self_closing = false;
    let mut k = j;
    loop {
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k >= len {
            return None;
        }
        if bytes[k] == b'>' {
            k += 1;
            break;
        }
        if bytes[k] == b'/' {
            if k + 1 < len && bytes[k + 1] == b'>' {
                self_closing = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }
        let attr_start = k;
        while k < len && is_attr_name_byte(bytes[k]) {
            k += 1;
        }
        if attr_start == k {
            // Byte that is neither a name byte nor structural: skip it.
            k += 1;
            continue;
        }
        let attr_name = input[attr_start..k].to_ascii_lowercase();

        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        let mut value = String::new();
        if k < len && bytes[k] == b'=' {
            k += 1;
            while k < len && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let value_start = k;
                while k < len && bytes[k] != quote {
                    k += 1;
                }
                if k >= len {
                    return None;
                }
                value = decode_references(&input[value_start..k]);
                k += 1;
            } else {
                let value_start = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                        break;
                    }
                    k += 1;
                }
                value = decode_references(&input[value_start..k]);
            }
        }
        attrs.push((attr_name, value));
    }

    out.push(if self_closing {
        Event::StartEndTag { name, attrs }
    } else {
        Event::StartTag { name, attrs }
    });
    Some(k)
}

/// Scan the reference opened by `&` at `i`. Always makes progress; a `&`
/// that opens nothing becomes a one-byte text event.
fn scan_reference(input: &str, i: usize, out: &mut Vec<Event>) -> usize {
    let bytes = input.as_bytes();
    let len = bytes.len();
    if bytes.get(i + 1) == Some(&b'#') {
        let mut j = i + 2;
        let is_hex = bytes.get(j).is_some_and(|&b| b == b'x' || b == b'X');
        if is_hex {
            j += 1;
        }
        let digits_start = j;
        while j < len {
            let ok = if is_hex {
                bytes[j].is_ascii_hexdigit()
            } else {
                bytes[j].is_ascii_digit()
            };
            if !ok {
                break;
            }
            j += 1;
        }
        if j > digits_start {
            // Body keeps the `x` marker so the policy can tell hex from
            // decimal; the terminator is consumed and not carried.
            out.push(Event::CharRef(input[i + 2..j].to_string()));
            if bytes.get(j) == Some(&b';') {
                j += 1;
            }
            return j;
        }
    } else if bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic()) {
        let mut j = i + 2;
        while j < len
            && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-' || bytes[j] == b'.')
        {
            j += 1;
        }
        out.push(Event::EntityRef(input[i + 1..j].to_string()));
        if bytes.get(j) == Some(&b';') {
            j += 1;
        }
        return j;
    }
    out.push(Event::Text("&".to_string()));
    i + 1
}
