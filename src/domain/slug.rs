use std::fmt;
use std::str::FromStr;

use regex::Regex;

/// URL-safe identifier of a blog post
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from free text: lowercase, runs of anything outside `[a-z0-9]`
    /// collapse into one hyphen, and hyphens are trimmed from both ends.
    pub fn derive(text: &str) -> Result<Self, String> {
        lazy_static::lazy_static! {
            static ref SEPARATORS: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
        }

        let lowered = text.to_lowercase();
        let slug = SEPARATORS.replace_all(&lowered, "-");
        let slug = slug.trim_matches('-');

        if slug.is_empty() {
            Err("Slug must contain at least one letter or digit".into())
        } else {
            Ok(Self(slug.to_string()))
        }
    }
}

impl FromStr for Slug {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::derive(value)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> String {
        value.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
