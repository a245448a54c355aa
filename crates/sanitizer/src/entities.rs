//! Named character references and attribute-value reference decoding.
//!
//! The recognition table is the classic HTML 4 set (Latin-1, special, and
//! symbol blocks), checked case-sensitively. Notably `apos` is absent from
//! HTML 4 and is therefore *not* recognized. Decoding is intentionally not
//! HTML5-spec-complete; keep the behavior narrow and stable.

use memchr::memchr;

/// HTML 4 named character references, grouped by DTD block.
#[rustfmt::skip]
const NAMED_ENTITIES: &[(&str, char)] = &[
    // HTMLlat1
    ("nbsp", '\u{A0}'), ("iexcl", '\u{A1}'), ("cent", '\u{A2}'), ("pound", '\u{A3}'),
    ("curren", '\u{A4}'), ("yen", '\u{A5}'), ("brvbar", '\u{A6}'), ("sect", '\u{A7}'),
    ("uml", '\u{A8}'), ("copy", '\u{A9}'), ("ordf", '\u{AA}'), ("laquo", '\u{AB}'),
    ("not", '\u{AC}'), ("shy", '\u{AD}'), ("reg", '\u{AE}'), ("macr", '\u{AF}'),
    ("deg", '\u{B0}'), ("plusmn", '\u{B1}'), ("sup2", '\u{B2}'), ("sup3", '\u{B3}'),
    ("acute", '\u{B4}'), ("micro", '\u{B5}'), ("para", '\u{B6}'), ("middot", '\u{B7}'),
    ("cedil", '\u{B8}'), ("sup1", '\u{B9}'), ("ordm", '\u{BA}'), ("raquo", '\u{BB}'),
    ("frac14", '\u{BC}'), ("frac12", '\u{BD}'), ("frac34", '\u{BE}'), ("iquest", '\u{BF}'),
    ("Agrave", '\u{C0}'), ("Aacute", '\u{C1}'), ("Acirc", '\u{C2}'), ("Atilde", '\u{C3}'),
    ("Auml", '\u{C4}'), ("Aring", '\u{C5}'), ("AElig", '\u{C6}'), ("Ccedil", '\u{C7}'),
    ("Egrave", '\u{C8}'), ("Eacute", '\u{C9}'), ("Ecirc", '\u{CA}'), ("Euml", '\u{CB}'),
    ("Igrave", '\u{CC}'), ("Iacute", '\u{CD}'), ("Icirc", '\u{CE}'), ("Iuml", '\u{CF}'),
    ("ETH", '\u{D0}'), ("Ntilde", '\u{D1}'), ("Ograve", '\u{D2}'), ("Oacute", '\u{D3}'),
    ("Ocirc", '\u{D4}'), ("Otilde", '\u{D5}'), ("Ouml", '\u{D6}'), ("times", '\u{D7}'),
    ("Oslash", '\u{D8}'), ("Ugrave", '\u{D9}'), ("Uacute", '\u{DA}'), ("Ucirc", '\u{DB}'),
    ("Uuml", '\u{DC}'), ("Yacute", '\u{DD}'), ("THORN", '\u{DE}'), ("szlig", '\u{DF}'),
    ("agrave", '\u{E0}'), ("aacute", '\u{E1}'), ("acirc", '\u{E2}'), ("atilde", '\u{E3}'),
    ("auml", '\u{E4}'), ("aring", '\u{E5}'), ("aelig", '\u{E6}'), ("ccedil", '\u{E7}'),
    ("egrave", '\u{E8}'), ("eacute", '\u{E9}'), ("ecirc", '\u{EA}'), ("euml", '\u{EB}'),
    ("igrave", '\u{EC}'), ("iacute", '\u{ED}'), ("icirc", '\u{EE}'), ("iuml", '\u{EF}'),
    ("eth", '\u{F0}'), ("ntilde", '\u{F1}'), ("ograve", '\u{F2}'), ("oacute", '\u{F3}'),
    ("ocirc", '\u{F4}'), ("otilde", '\u{F5}'), ("ouml", '\u{F6}'), ("divide", '\u{F7}'),
    ("oslash", '\u{F8}'), ("ugrave", '\u{F9}'), ("uacute", '\u{FA}'), ("ucirc", '\u{FB}'),
    ("uuml", '\u{FC}'), ("yacute", '\u{FD}'), ("thorn", '\u{FE}'), ("yuml", '\u{FF}'),
    // HTMLspecial
    ("quot", '"'), ("amp", '&'), ("lt", '<'), ("gt", '>'),
    ("OElig", '\u{152}'), ("oelig", '\u{153}'), ("Scaron", '\u{160}'), ("scaron", '\u{161}'),
    ("Yuml", '\u{178}'), ("circ", '\u{2C6}'), ("tilde", '\u{2DC}'),
    ("ensp", '\u{2002}'), ("emsp", '\u{2003}'), ("thinsp", '\u{2009}'),
    ("zwnj", '\u{200C}'), ("zwj", '\u{200D}'), ("lrm", '\u{200E}'), ("rlm", '\u{200F}'),
    ("ndash", '\u{2013}'), ("mdash", '\u{2014}'),
    ("lsquo", '\u{2018}'), ("rsquo", '\u{2019}'), ("sbquo", '\u{201A}'),
    ("ldquo", '\u{201C}'), ("rdquo", '\u{201D}'), ("bdquo", '\u{201E}'),
    ("dagger", '\u{2020}'), ("Dagger", '\u{2021}'), ("permil", '\u{2030}'),
    ("lsaquo", '\u{2039}'), ("rsaquo", '\u{203A}'), ("euro", '\u{20AC}'),
    // HTMLsymbol
    ("fnof", '\u{192}'),
    ("Alpha", '\u{391}'), ("Beta", '\u{392}'), ("Gamma", '\u{393}'), ("Delta", '\u{394}'),
    ("Epsilon", '\u{395}'), ("Zeta", '\u{396}'), ("Eta", '\u{397}'), ("Theta", '\u{398}'),
    ("Iota", '\u{399}'), ("Kappa", '\u{39A}'), ("Lambda", '\u{39B}'), ("Mu", '\u{39C}'),
    ("Nu", '\u{39D}'), ("Xi", '\u{39E}'), ("Omicron", '\u{39F}'), ("Pi", '\u{3A0}'),
    ("Rho", '\u{3A1}'), ("Sigma", '\u{3A3}'), ("Tau", '\u{3A4}'), ("Upsilon", '\u{3A5}'),
    ("Phi", '\u{3A6}'), ("Chi", '\u{3A7}'), ("Psi", '\u{3A8}'), ("Omega", '\u{3A9}'),
    ("alpha", '\u{3B1}'), ("beta", '\u{3B2}'), ("gamma", '\u{3B3}'), ("delta", '\u{3B4}'),
    ("epsilon", '\u{3B5}'), ("zeta", '\u{3B6}'), ("eta", '\u{3B7}'), ("theta", '\u{3B8}'),
    ("iota", '\u{3B9}'), ("kappa", '\u{3BA}'), ("lambda", '\u{3BB}'), ("mu", '\u{3BC}'),
    ("nu", '\u{3BD}'), ("xi", '\u{3BE}'), ("omicron", '\u{3BF}'), ("pi", '\u{3C0}'),
    ("rho", '\u{3C1}'), ("sigmaf", '\u{3C2}'), ("sigma", '\u{3C3}'), ("tau", '\u{3C4}'),
    ("upsilon", '\u{3C5}'), ("phi", '\u{3C6}'), ("chi", '\u{3C7}'), ("psi", '\u{3C8}'),
    ("omega", '\u{3C9}'), ("thetasym", '\u{3D1}'), ("upsih", '\u{3D2}'), ("piv", '\u{3D6}'),
    ("bull", '\u{2022}'), ("hellip", '\u{2026}'), ("prime", '\u{2032}'), ("Prime", '\u{2033}'),
    ("oline", '\u{203E}'), ("frasl", '\u{2044}'),
    ("weierp", '\u{2118}'), ("image", '\u{2111}'), ("real", '\u{211C}'),
    ("trade", '\u{2122}'), ("alefsym", '\u{2135}'),
    ("larr", '\u{2190}'), ("uarr", '\u{2191}'), ("rarr", '\u{2192}'), ("darr", '\u{2193}'),
    ("harr", '\u{2194}'), ("crarr", '\u{21B5}'),
    ("lArr", '\u{21D0}'), ("uArr", '\u{21D1}'), ("rArr", '\u{21D2}'), ("dArr", '\u{21D3}'),
    ("hArr", '\u{21D4}'),
    ("forall", '\u{2200}'), ("part", '\u{2202}'), ("exist", '\u{2203}'), ("empty", '\u{2205}'),
    ("nabla", '\u{2207}'), ("isin", '\u{2208}'), ("notin", '\u{2209}'), ("ni", '\u{220B}'),
    ("prod", '\u{220F}'), ("sum", '\u{2211}'), ("minus", '\u{2212}'), ("lowast", '\u{2217}'),
    ("radic", '\u{221A}'), ("prop", '\u{221D}'), ("infin", '\u{221E}'), ("ang", '\u{2220}'),
    ("and", '\u{2227}'), ("or", '\u{2228}'), ("cap", '\u{2229}'), ("cup", '\u{222A}'),
    ("int", '\u{222B}'), ("there4", '\u{2234}'), ("sim", '\u{223C}'), ("cong", '\u{2245}'),
    ("asymp", '\u{2248}'), ("ne", '\u{2260}'), ("equiv", '\u{2261}'), ("le", '\u{2264}'),
    ("ge", '\u{2265}'), ("sub", '\u{2282}'), ("sup", '\u{2283}'), ("nsub", '\u{2284}'),
    ("sube", '\u{2286}'), ("supe", '\u{2287}'), ("oplus", '\u{2295}'), ("otimes", '\u{2297}'),
    ("perp", '\u{22A5}'), ("sdot", '\u{22C5}'),
    ("lceil", '\u{2308}'), ("rceil", '\u{2309}'), ("lfloor", '\u{230A}'), ("rfloor", '\u{230B}'),
    ("lang", '\u{2329}'), ("rang", '\u{232A}'), ("loz", '\u{25CA}'),
    ("spades", '\u{2660}'), ("clubs", '\u{2663}'), ("hearts", '\u{2665}'), ("diams", '\u{2666}'),
];

pub(crate) fn lookup(name: &str) -> Option<char> {
    NAMED_ENTITIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, c)| c)
}

/// Whether `name` is a recognized HTML named reference (case-sensitive).
pub(crate) fn is_known(name: &str) -> bool {
    lookup(name).is_some()
}

// Digit caps bound the scan so adversarial references stay linear:
// 0x10FFFF is six hex digits, 1114111 is seven decimal digits.
const MAX_HEX_DIGITS: usize = 6;
const MAX_DEC_DIGITS: usize = 7;

/// Decode character and entity references inside an attribute value.
///
/// Contract:
/// - `&#123;` / `&#x1F4A9;` decode when in range; the trailing `;` is
///   optional for numeric references.
/// - `&name;` decodes only for recognized HTML 4 names, `;` required.
/// - Everything malformed (unknown names, overlong digit runs, invalid
///   scalars, bare `&`) passes through unchanged.
pub(crate) fn decode_references(raw: &str) -> String {
    let bytes = raw.as_bytes();
    if memchr(b'&', bytes).is_none() {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'&' {
            let start = i;
            i = memchr(b'&', &bytes[i..]).map_or(bytes.len(), |rel| i + rel);
            out.push_str(&raw[start..i]);
            continue;
        }
        if let Some(next) = decode_one(raw, i, &mut out) {
            i = next;
        } else {
            out.push('&');
            i += 1;
        }
    }
    out
}

/// Decode the single reference starting at `i` (which points at `&`),
/// pushing its replacement onto `out`. Returns the index just past the
/// consumed reference, or `None` when the text is not a decodable reference.
fn decode_one(raw: &str, i: usize, out: &mut String) -> Option<usize> {
    let bytes = raw.as_bytes();
    if bytes.get(i + 1) == Some(&b'#') {
        let is_hex = bytes
            .get(i + 2)
            .is_some_and(|&b| b == b'x' || b == b'X');
        let digits_start = if is_hex { i + 3 } else { i + 2 };
        let max_digits = if is_hex { MAX_HEX_DIGITS } else { MAX_DEC_DIGITS };
        let mut j = digits_start;
        while j < bytes.len() {
            let ok = if is_hex {
                bytes[j].is_ascii_hexdigit()
            } else {
                bytes[j].is_ascii_digit()
            };
            if !ok {
                break;
            }
            if j - digits_start == max_digits {
                return None;
            }
            j += 1;
        }
        if j == digits_start {
            return None;
        }
        let radix = if is_hex { 16 } else { 10 };
        let value = u32::from_str_radix(&raw[digits_start..j], radix).ok()?;
        let decoded = char::from_u32(value)?;
        out.push(decoded);
        if bytes.get(j) == Some(&b';') {
            j += 1;
        }
        return Some(j);
    }
    if bytes.get(i + 1).is_some_and(|b| b.is_ascii_alphabetic()) {
        let mut j = i + 2;
        while j < bytes.len()
            && (bytes[j].is_ascii_alphanumeric() || bytes[j] == b'-' || bytes[j] == b'.')
        {
            j += 1;
        }
        if bytes.get(j) != Some(&b';') {
            return None;
        }
        let decoded = lookup(&raw[i + 1..j])?;
        out.push(decoded);
        return Some(j + 1);
    }
    None
}
