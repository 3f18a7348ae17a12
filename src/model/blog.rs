use chrono::{DateTime, Utc};

use serde::{Deserialize, Serialize};

use unicode_segmentation::UnicodeSegmentation;

use uuid::Uuid;

use crate::domain::PostStatus;
use crate::repo::Document;

const EXCERPT_LEN: usize = 160;

/// Search engine metadata of a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Stored blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: Option<String>,
    pub cover_image_alt: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub seo: Seo,
    /// Set the first time the post is published, kept if it goes back to draft
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    /// Change the publication state. Publishing stamps `published_at` once.
    pub fn set_status(&mut self, status: PostStatus) {
        self.status = status;
        if status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for BlogPost {
    const COLLECTION: &'static str = "blog_posts";
    const UNIQUE: &'static [&'static str] = &["slug"];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Excerpt used when an author does not write one: the first words of the
/// content, cut on a word boundary.
pub fn derive_excerpt(content: &str) -> String {
    let content = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if content.graphemes(true).count() <= EXCERPT_LEN {
        return content;
    }

    let mut excerpt = String::new();
    for word in content.split(' ') {
        let next_len = excerpt.graphemes(true).count() + word.graphemes(true).count() + 1;
        if next_len > EXCERPT_LEN {
            break;
        }
        if !excerpt.is_empty() {
            excerpt.push(' ');
        }
        excerpt.push_str(word);
    }
    excerpt.push('…');
    excerpt
}

/// Normalize a tag list: trimmed, lowercased, without blanks or duplicates
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}
