use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use site_common::error::CommonError;
use site_common::sqlite::decode_tags;

/// Skill level a guide is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

/// A guide article.
#[derive(Debug, Clone, PartialEq)]
pub struct Guide {
    pub id: i64,
    /// URL-safe identifier, unique across guides, e.g. "getting-started"
    pub slug: String,
    pub title: String,
    pub description: String,
    /// Markdown body
    pub content: String,
    pub difficulty: Difficulty,
    /// Free-form label, e.g. "Combat", "Farming"
    pub category: String,
    /// Ordered as authored
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A short gameplay tip. Seeded alongside guides; not served.
#[derive(Debug, Clone, PartialEq)]
pub struct Tip {
    pub title: String,
    pub content: String,
    pub category: String,
    pub difficulty: Difficulty,
}

/// A `guides` row as stored: difficulty as text, tags as JSON text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GuideRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub difficulty: String,
    pub category: String,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<GuideRow> for Guide {
    type Error = CommonError;

    fn try_from(row: GuideRow) -> Result<Self, Self::Error> {
        let tags = decode_tags(&row.slug, row.tags.as_deref())?;
        let difficulty = row
            .difficulty
            .parse::<Difficulty>()
            .map_err(CommonError::UnknownDifficulty)?;
        Ok(Guide {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            content: row.content,
            difficulty,
            category: row.category,
            tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Lowercase ASCII words joined by single hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_PATTERN.is_match(slug)
}
