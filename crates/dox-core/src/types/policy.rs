//! Policy records as served by the policy store.

use crate::error::{DoxError, Result};
use crate::types::{PolicyCategory, Sport};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static POLICY_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]+-[A-Z]+-\d{3}$").expect("valid policy number regex"));

/// Structured policy number such as `BSB-OFF-001`.
///
/// Ordering is plain string ordering, which is how manuals order their content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PolicyNumber(String);

impl PolicyNumber {
    /// Validate and wrap a policy number.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] unless the value matches
    /// `UPPER-UPPER-NNN`.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if POLICY_NUMBER_RE.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(DoxError::InvalidParams(format!(
                "Invalid policy number format: {value}"
            )))
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PolicyNumber {
    type Error = DoxError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<PolicyNumber> for String {
    fn from(number: PolicyNumber) -> Self {
        number.0
    }
}

impl fmt::Display for PolicyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Semantic `major.minor` policy version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const INITIAL: Self = Self { major: 1, minor: 0 };

    /// Next version after a content change. Only the minor component moves.
    ///
    /// # Errors
    ///
    /// `InvalidParams` when the minor component is already at its maximum.
    pub fn bump_minor(self) -> Result<Self> {
        let minor = self
            .minor
            .checked_add(1)
            .ok_or_else(|| DoxError::InvalidParams(format!("Version overflow: {self}")))?;
        Ok(Self {
            major: self.major,
            minor,
        })
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl FromStr for Version {
    type Err = DoxError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || DoxError::InvalidParams(format!("Invalid version: {s}"));
        let (major, minor) = s.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl TryFrom<String> for Version {
    type Error = DoxError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Lifecycle status of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Draft,
    #[default]
    Current,
    Archived,
    PendingApproval,
}

impl PolicyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Current => "current",
            Self::Archived => "archived",
            Self::PendingApproval => "pending_approval",
        }
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single governance document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub title: String,
    pub short_name: String,
    pub category: PolicyCategory,
    /// Owning sport; `None` means the policy is multi-sport.
    #[serde(default)]
    pub sport_id: Option<i64>,
    pub policy_number: PolicyNumber,
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub status: PolicyStatus,
    pub content_text: String,
    #[serde(default)]
    pub content_html: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub effective_date: NaiveDate,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub applies_to_sports: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Policy {
    /// Current, multi-sport policy at version 1.0 with the remaining fields empty.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        policy_number: PolicyNumber,
        title: impl Into<String>,
        category: PolicyCategory,
        content_text: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let title = title.into();
        Self {
            id: id.into(),
            short_name: title.clone(),
            title,
            category,
            sport_id: None,
            policy_number,
            version: Version::INITIAL,
            status: PolicyStatus::Current,
            content_text: content_text.into(),
            content_html: None,
            summary: None,
            effective_date: now.date_naive(),
            expiration_date: None,
            tags: Vec::new(),
            keywords: Vec::new(),
            applies_to_sports: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_sport(mut self, sport_id: i64) -> Self {
        self.sport_id = Some(sport_id);
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: PolicyStatus) -> Self {
        self.status = status;
        self
    }

    #[inline]
    #[must_use]
    pub const fn is_multi_sport(&self) -> bool {
        self.sport_id.is_none()
    }

    /// Owned by `sport`, or multi-sport and either unrestricted or naming
    /// the sport (by name or abbreviation) in `applies_to_sports`.
    #[must_use]
    pub fn applies_to(&self, sport: &Sport) -> bool {
        if !self.is_multi_sport() {
            return self.sport_id == Some(sport.id);
        }
        self.applies_to_sports.is_empty()
            || self.applies_to_sports.iter().any(|s| {
                s.eq_ignore_ascii_case(&sport.name) || s.eq_ignore_ascii_case(&sport.abbreviation)
            })
    }

    /// Snapshot of the current revision, taken before an update.
    #[must_use]
    pub fn snapshot(&self, change_summary: impl Into<String>, at: DateTime<Utc>) -> PolicyVersion {
        PolicyVersion {
            policy_id: self.id.clone(),
            version: self.version,
            title: self.title.clone(),
            content_text: self.content_text.clone(),
            content_html: self.content_html.clone(),
            summary: self.summary.clone(),
            change_summary: change_summary.into(),
            created_at: at,
        }
    }

    /// Replace the content body, bumping the minor version when it changed.
    ///
    /// # Errors
    ///
    /// Version overflow; the policy is left untouched.
    pub fn revise_content(&mut self, content_text: impl Into<String>, at: DateTime<Utc>) -> Result<()> {
        let content_text = content_text.into();
        if content_text != self.content_text {
            self.version = self.version.bump_minor()?;
            self.content_text = content_text;
        }
        self.updated_at = at;
        Ok(())
    }
}

/// A superseded revision of a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyVersion {
    pub policy_id: String,
    pub version: Version,
    pub title: String,
    pub content_text: String,
    #[serde(default)]
    pub content_html: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub change_summary: String,
    pub created_at: DateTime<Utc>,
}
