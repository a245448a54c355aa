/// Markup event produced by the tokenizer, in document order.
///
/// The set is closed on purpose: the sanitizer consumes events through a
/// single `match`, so anything the tokenizer cannot classify must degrade to
/// `Text` rather than grow a new variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Text(String),
    /// Numeric character reference body after `&#`, e.g. `39` or `x27`.
    /// Any trailing `;` is consumed during tokenization and not carried.
    CharRef(String),
    /// Named entity reference, e.g. `amp`. Trailing `;` consumed likewise.
    EntityRef(String),
    /// Comment interior, without the `<!--`/`-->` delimiters.
    Comment(String),
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
    },
    /// Self-closing start tag (`<br />`).
    StartEndTag {
        name: String,
        attrs: Vec<(String, String)>,
    },
    EndTag(String),
}

/// Insertion-ordered attribute map with unique keys.
///
/// Backed by a `Vec`: attribute counts are tiny and serialization order must
/// be the encounter order. A repeated name overwrites the earlier value in
/// place instead of moving to the back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrMap {
    entries: Vec<(String, String)>,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}
