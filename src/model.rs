use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Job-search task category. Persisted under its Korean label; unknown or
/// null labels read back as [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Category {
    #[serde(rename = "자소서")]
    CoverLetter,
    #[serde(rename = "포폴")]
    Portfolio,
    #[serde(rename = "면접")]
    Interview,
    #[serde(rename = "기업분석")]
    CompanyResearch,
    #[serde(rename = "AI활용")]
    AiUsage,
    #[default]
    #[serde(rename = "기타")]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::CoverLetter,
        Self::Portfolio,
        Self::Interview,
        Self::CompanyResearch,
        Self::AiUsage,
        Self::Other,
    ];

    /// Accepts the stored label or the English slug.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s || c.slug() == s.to_ascii_lowercase())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CoverLetter => "자소서",
            Self::Portfolio => "포폴",
            Self::Interview => "면접",
            Self::CompanyResearch => "기업분석",
            Self::AiUsage => "AI활용",
            Self::Other => "기타",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::CoverLetter => "cover-letter",
            Self::Portfolio => "portfolio",
            Self::Interview => "interview",
            Self::CompanyResearch => "company",
            Self::AiUsage => "ai",
            Self::Other => "other",
        }
    }
}

impl From<Option<String>> for Category {
    fn from(label: Option<String>) -> Self {
        label.as_deref().and_then(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered high > medium > low. Anything unrecognized on disk ranks as low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Priority {
    #[serde(rename = "상")]
    High,
    #[default]
    #[serde(rename = "중")]
    Medium,
    #[serde(rename = "하")]
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label() == s || p.slug() == s.to_ascii_lowercase())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "상",
            Self::Medium => "중",
            Self::Low => "하",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Sort rank: high=0, medium=1, low=2.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    fn unrecognized() -> Self {
        Self::Low
    }
}

impl From<Option<String>> for Priority {
    fn from(label: Option<String>) -> Self {
        label
            .as_deref()
            .and_then(Self::parse)
            .unwrap_or_else(Self::unrecognized)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "Priority::unrecognized")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "due_date::deserialize")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub done: bool,
    #[serde(with = "minute_stamp")]
    pub created_at: NaiveDateTime,
    #[serde(default, with = "minute_stamp::option")]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: String,
}

impl Task {
    pub fn marker(&self) -> &'static str {
        if self.done {
            "[x]"
        } else {
            "[ ]"
        }
    }
}

/// Fields for a task that does not exist yet.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub notes: String,
}

/// How an edit treats the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DueDateEdit {
    #[default]
    Keep,
    Clear,
    Set(NaiveDate),
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub due_date: DueDateEdit,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            done: tasks.iter().filter(|t| t.done).count(),
            total: tasks.len(),
        }
    }

    /// Percentage done rounded to one decimal, or `None` with no tasks.
    pub fn percent(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let ratio = self.done as f64 / self.total as f64;
        Some((ratio * 1000.0).round() / 10.0)
    }
}

/// `YYYY-MM-DD HH:MM` local timestamps.
pub(crate) mod minute_stamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&dt.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            dt: &Option<NaiveDateTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => super::serialize(dt, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => NaiveDateTime::parse_from_str(&raw, super::FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

/// Stored due dates must be zero-padded `YYYY-MM-DD`, the same shape the
/// input prompts accept.
mod due_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => {
                crate::validate::parse_due_date(&raw).map_err(serde::de::Error::custom)
            }
            None => Ok(None),
        }
    }
}
