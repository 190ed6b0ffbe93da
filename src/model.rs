use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<QuizOption>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Wire tags match the quiz JSON files authored alongside posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "multiple-choice")]
    SingleChoice,
    #[serde(rename = "multiple-select")]
    MultiSelect,
    #[serde(rename = "true-false")]
    TrueFalse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizOption {
    pub id: String,
    pub text: String,
    pub correct: bool,
}

/// Post frontmatter. Fields the publishing workflow touches are typed;
/// everything else round-trips through `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub draft: bool,
    #[serde(
        rename = "publishedAt",
        default,
        with = "fm_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<NaiveDate>,
    #[serde(
        rename = "scheduledPublishAt",
        default,
        with = "fm_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub scheduled_publish_at: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Md,
    Mdx,
}

impl SourceFormat {
    pub fn ext(self) -> &'static str {
        match self {
            SourceFormat::Md => "md",
            SourceFormat::Mdx => "mdx",
        }
    }
}

/// One content item: frontmatter plus raw body, keyed by slug.
#[derive(Debug, Clone)]
pub struct Document {
    pub slug: String,
    pub format: SourceFormat,
    pub meta: PostMeta,
    pub body: String,
}

/// Accepts a plain date or a full timestamp; the scheduling policy compares
/// days, so time-of-day is discarded on read.
pub fn parse_fm_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

mod fm_date {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => ser.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(de)?;
        match raw {
            None => Ok(None),
            Some(s) => super::parse_fm_date(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date `{s}`"))),
        }
    }
}
