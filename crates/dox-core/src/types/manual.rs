//! Manual selection input and the persisted manual registry records.

use crate::error::{DoxError, Result};
use crate::types::PolicyCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output mode of an assembly request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Render the binary document and record it in the registry.
    #[default]
    Pdf,
    /// Return the structure only; no document, no side effects.
    Preview,
}

/// The ephemeral input to manual assembly.
///
/// `include_toc` / `include_index` are optional so that a named template can
/// supply them; [`ManualSelection::resolve_flags`] applies the precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualSelection {
    pub title: String,
    #[serde(default)]
    pub sport_id: Option<i64>,
    /// Explicit policy ids. When non-empty, category and sport filters are ignored.
    #[serde(default)]
    pub policy_ids: Option<Vec<String>>,
    #[serde(default)]
    pub categories: Option<Vec<PolicyCategory>>,
    #[serde(default)]
    pub include_toc: Option<bool>,
    #[serde(default)]
    pub include_index: Option<bool>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub format: OutputFormat,
}

impl ManualSelection {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sport_id: None,
            policy_ids: None,
            categories: None,
            include_toc: None,
            include_index: None,
            template: None,
            format: OutputFormat::Pdf,
        }
    }

    /// Parse tool arguments into a selection.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] for missing/blank titles, unknown
    /// categories or wrong value types. Unrecognised keys are ignored.
    pub fn from_value(args: serde_json::Value) -> Result<Self> {
        let selection: Self = serde_json::from_value(args)
            .map_err(|e| DoxError::InvalidParams(format!("Invalid manual selection: {e}")))?;
        selection.validate()?;
        Ok(selection)
    }

    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] when the title is blank.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(DoxError::InvalidParams("title must not be empty".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_sport(mut self, sport_id: i64) -> Self {
        self.sport_id = Some(sport_id);
        self
    }

    #[must_use]
    pub fn with_policy_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = PolicyCategory>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    #[must_use]
    pub const fn with_toc(mut self, include: bool) -> Self {
        self.include_toc = Some(include);
        self
    }

    #[must_use]
    pub const fn with_index(mut self, include: bool) -> Self {
        self.include_index = Some(include);
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Explicit policy ids, if any were given.
    #[must_use]
    pub fn explicit_policy_ids(&self) -> Option<&[String]> {
        self.policy_ids.as_deref().filter(|ids| !ids.is_empty())
    }

    /// Resolve `(include_toc, include_index)`: explicit flags, then the
    /// template's configuration, then `true`.
    #[must_use]
    pub fn resolve_flags(&self, template: Option<&TemplateConfig>) -> (bool, bool) {
        let toc = self
            .include_toc
            .or_else(|| template.and_then(|t| t.include_toc))
            .unwrap_or(true);
        let index = self
            .include_index
            .or_else(|| template.and_then(|t| t.include_index))
            .unwrap_or(true);
        (toc, index)
    }
}

/// Snapshot of the options that produced (or will produce) a manual.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<PolicyCategory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_toc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_index: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_appendices: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl TemplateConfig {
    /// Snapshot of a selection after flag resolution.
    #[must_use]
    pub fn from_selection(selection: &ManualSelection, include_toc: bool, include_index: bool) -> Self {
        Self {
            categories: selection.categories.clone(),
            policy_ids: selection.policy_ids.clone(),
            include_toc: Some(include_toc),
            include_index: Some(include_index),
            include_appendices: None,
            template: selection.template.clone(),
            style: None,
        }
    }
}

/// Registry visibility of a manual descriptor.
///
/// Descriptors are written `Pending` and flipped to `Complete` once their
/// sections are stored; readers ignore pending descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualStatus {
    Pending,
    #[default]
    Complete,
}

impl fmt::Display for ManualStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
        })
    }
}

/// Persisted record of a generated manual or a reusable template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualDescriptor {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sport_id: Option<i64>,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub template_config: TemplateConfig,
    #[serde(default)]
    pub status: ManualStatus,
    pub created_at: DateTime<Utc>,
}

impl ManualDescriptor {
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.status == ManualStatus::Complete
    }
}

/// Insert payload for a manual descriptor; the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewManual {
    pub title: String,
    pub description: Option<String>,
    pub sport_id: Option<i64>,
    pub is_template: bool,
    pub template_config: TemplateConfig,
}

/// Binding of one policy to one position within one manual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualSection {
    pub manual_id: String,
    pub policy_id: String,
    /// 1-based, contiguous within a manual.
    pub section_order: u32,
    pub section_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_selection_defaults() {
        let selection = ManualSelection::from_value(json!({"title": "Handbook"})).unwrap();
        assert_eq!(selection.format, OutputFormat::Pdf);
        assert_eq!(selection.resolve_flags(None), (true, true));
        assert!(selection.explicit_policy_ids().is_none());
    }

    #[test]
    fn test_selection_rejects_blank_title() {
        let err = ManualSelection::from_value(json!({"title": "   "})).unwrap_err();
        assert!(matches!(err, DoxError::InvalidParams(_)));
    }

    #[test]
    fn test_selection_rejects_missing_title() {
        assert!(ManualSelection::from_value(json!({"format": "preview"})).is_err());
    }

    #[test]
    fn test_selection_rejects_unknown_category() {
        let err = ManualSelection::from_value(json!({
            "title": "T",
            "categories": ["officiating", "curling"]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("curling"));
    }

    #[test]
    fn test_selection_parses_full_arguments() {
        let selection = ManualSelection::from_value(json!({
            "title": "Baseball",
            "sport_id": 3,
            "categories": ["officiating", "playing_rules"],
            "include_toc": false,
            "format": "preview"
        }))
        .unwrap();
        assert_eq!(selection.sport_id, Some(3));
        assert_eq!(
            selection.categories,
            Some(vec![PolicyCategory::Officiating, PolicyCategory::PlayingRules])
        );
        assert_eq!(selection.format, OutputFormat::Preview);
        assert_eq!(selection.resolve_flags(None), (false, true));
    }

    #[test]
    fn test_empty_policy_id_list_is_not_explicit() {
        let selection = ManualSelection::new("T").with_policy_ids(Vec::<String>::new());
        assert!(selection.explicit_policy_ids().is_none());
    }

    #[test]
    fn test_template_flags_fill_gaps_but_explicit_wins() {
        let compact = TemplateConfig {
            include_toc: Some(false),
            include_index: Some(false),
            ..TemplateConfig::default()
        };
        let selection = ManualSelection::new("T").with_index(true);
        assert_eq!(selection.resolve_flags(Some(&compact)), (false, true));
    }

    #[test]
    fn test_template_config_skips_absent_fields() {
        let config = TemplateConfig {
            include_toc: Some(true),
            ..TemplateConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, json!({"include_toc": true}));
    }
}
