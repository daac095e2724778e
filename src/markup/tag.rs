//! Minimal `<img>` start-tag tokenizer.
//!
//! Attribute values are consumed as whole tokens, so text such as `//` or
//! `src=` inside another attribute's value is never mistaken for markup.
//! Attributes that are not edited keep their exact original bytes.
//!
//! Parsing is as forgiving as browsers are: attributes may follow a quoted
//! value without whitespace, and stray `/`, `=`, backticks or orphaned quoted
//! strings between attributes are skipped over.

use crate::utils::starts_with_ignore_case;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// An `<img ...>` start tag up to the first `>` outside quotes. An unbalanced
/// quote falls back to ending at the next `>`.
pub(crate) static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b(?:"[^"]*"|'[^']*'|[^>])*>"#).expect("img tag pattern is valid")
});

/// One attribute at the start of the remaining tag text, with whatever
/// whitespace or junk precedes it.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:\s|[/=`]|"[^"]*"|'[^']*')*([^\s"'>/=`]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'<>`]+)))?"#,
    )
    .expect("attribute pattern is valid")
});

#[derive(Debug, Clone)]
pub(crate) struct Attribute<'a> {
    name: Cow<'a, str>,
    value: Option<Cow<'a, str>>,
    /// Original source text; `None` once the attribute has been edited.
    raw: Option<&'a str>,
}

impl Attribute<'_> {
    #[cfg(test)]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Attribute value; a bare attribute has no value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn render_into(&self, out: &mut String) {
        if let Some(raw) = self.raw {
            out.push_str(raw);
            return;
        }

        out.push(' ');
        out.push_str(&self.name);
        if let Some(value) = &self.value {
            let quote = if value.contains('"') { '\'' } else { '"' };
            out.push('=');
            out.push(quote);
            out.push_str(value);
            out.push(quote);
        }
    }
}

/// A parsed `<img>` start tag.
#[derive(Debug, Clone)]
pub(crate) struct ImgTag<'a> {
    opening: &'a str,
    attributes: Vec<Attribute<'a>>,
    tail: &'a str,
    modified: bool,
}

impl<'a> ImgTag<'a> {
    /// Parses text matched by [`IMG_TAG`]. Returns `None` for anything that
    /// does not start with `<img`.
    pub fn parse(tag: &'a str) -> Option<Self> {
        if !starts_with_ignore_case(tag, "<img") {
            return None;
        }

        let (opening, mut rest) = tag.split_at(4);
        let mut attributes = Vec::new();

        while let Some(caps) = ATTRIBUTE.captures(rest) {
            let Some(whole) = caps.get(0) else { break };
            let name = caps.get(1).map_or("", |m| m.as_str());
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| Cow::Borrowed(m.as_str()));

            attributes.push(Attribute {
                name: Cow::Borrowed(name),
                value,
                raw: Some(whole.as_str()),
            });
            rest = &rest[whole.end()..];
        }

        Some(Self {
            opening,
            attributes,
            tail: rest,
            modified: false,
        })
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute<'a>> {
        self.attributes.get(index)
    }

    /// Index of the first attribute called `name` (ASCII case-insensitive).
    pub fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.is(name))
    }

    /// Value of the first attribute called `name`. Bare attributes yield `""`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name)
            .map(|i| self.attributes[i].value().unwrap_or(""))
    }

    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).and_then(Attribute::value)
    }

    pub fn set_value(&mut self, index: usize, value: String) {
        let Some(attr) = self.attributes.get_mut(index) else {
            return;
        };
        if attr.raw.is_some() && attr.value.as_deref() == Some(value.as_str()) {
            return;
        }
        attr.value = Some(Cow::Owned(value));
        attr.raw = None;
        self.modified = true;
    }

    pub fn rename(&mut self, index: usize, name: &'static str) {
        if let Some(attr) = self.attributes.get_mut(index) {
            attr.name = Cow::Borrowed(name);
            attr.raw = None;
            self.modified = true;
        }
    }

    /// Removes every attribute called `name`, returning how many were dropped.
    pub fn remove_all(&mut self, name: &str) -> usize {
        let before = self.attributes.len();
        self.attributes.retain(|a| !a.is(name));
        let removed = before - self.attributes.len();
        if removed > 0 {
            self.modified = true;
        }
        removed
    }

    pub fn insert_first(&mut self, name: &'static str, value: &'static str) {
        self.attributes.insert(
            0,
            Attribute {
                name: Cow::Borrowed(name),
                value: Some(Cow::Borrowed(value)),
                raw: None,
            },
        );
        self.modified = true;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.opening.len() + self.tail.len() + self.attributes.len() * 24,
        );
        out.push_str(self.opening);
        for attr in &self.attributes {
            attr.render_into(&mut out);
        }
        out.push_str(self.tail);
        out
    }
}
