//! Policy store abstraction.
//!
//! The assembly service talks to the backing repository only through
//! [`PolicyStore`]; a handle is injected at construction so tests can swap in
//! failing or instrumented stores.

mod memory;

pub use memory::{InMemoryStore, StoreSeed};

use crate::error::Result;
use crate::types::{
    ManualDescriptor, ManualSection, NewManual, Policy, PolicyCategory, PolicyStatus,
    PolicyVersion, Sport,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::cmp::Ordering;

/// Sport predicate of a policy query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SportFilter {
    /// `sport_id = X`
    Exactly(i64),
    /// `sport_id = X OR sport_id IS NULL`
    OrMultiSport(i64),
}

impl SportFilter {
    #[must_use]
    pub fn matches(self, sport_id: Option<i64>) -> bool {
        match self {
            Self::Exactly(id) => sport_id == Some(id),
            Self::OrMultiSport(id) => sport_id.is_none() || sport_id == Some(id),
        }
    }
}

/// Column a policy query is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    PolicyNumber,
    Title,
    UpdatedAt,
    EffectiveDate,
}

/// Result ordering of a policy query. Ties fall back to policy number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyOrder {
    pub key: SortKey,
    pub descending: bool,
}

impl PolicyOrder {
    pub const UPDATED_AT_DESC: Self = Self::new(SortKey::UpdatedAt, true);

    #[must_use]
    pub const fn new(key: SortKey, descending: bool) -> Self {
        Self { key, descending }
    }

    #[must_use]
    pub fn compare(self, a: &Policy, b: &Policy) -> Ordering {
        let primary = match self.key {
            SortKey::PolicyNumber => a.policy_number.cmp(&b.policy_number),
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortKey::EffectiveDate => a.effective_date.cmp(&b.effective_date),
        };
        let primary = if self.descending { primary.reverse() } else { primary };
        primary.then_with(|| a.policy_number.cmp(&b.policy_number))
    }
}

/// Offset/limit window applied after filtering and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub offset: usize,
    pub limit: usize,
}

/// Keyword predicate: overlap or containment of `Policy::keywords`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordMatch {
    Any(Vec<String>),
    All(Vec<String>),
}

impl KeywordMatch {
    #[must_use]
    pub fn matches(&self, keywords: &[String]) -> bool {
        let has = |wanted: &String| keywords.iter().any(|k| k.eq_ignore_ascii_case(wanted));
        match self {
            Self::Any(wanted) => wanted.iter().any(has),
            Self::All(wanted) => wanted.iter().all(has),
        }
    }
}

/// Conjunction of equality, set-membership, range and sport predicates.
///
/// `None` means "no constraint" for every field. `text` requires every
/// whitespace-separated term to occur, case-insensitively, in the title,
/// summary or content body; matches are not ranked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PolicyQuery {
    pub status: Option<PolicyStatus>,
    pub ids: Option<Vec<String>>,
    pub sport: Option<SportFilter>,
    pub sport_ids: Option<Vec<i64>>,
    pub categories: Option<Vec<PolicyCategory>>,
    pub tags: Option<Vec<String>>,
    pub keywords: Option<KeywordMatch>,
    pub text: Option<String>,
    pub effective_after: Option<NaiveDate>,
    pub effective_before: Option<NaiveDate>,
    pub order: PolicyOrder,
    pub range: Option<Range>,
}

impl PolicyQuery {
    /// Current policies only.
    #[must_use]
    pub fn current() -> Self {
        Self {
            status: Some(PolicyStatus::Current),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_status(mut self, status: PolicyStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_ids(mut self, ids: Vec<String>) -> Self {
        self.ids = Some(ids);
        self
    }

    #[must_use]
    pub const fn with_sport(mut self, sport: SportFilter) -> Self {
        self.sport = Some(sport);
        self
    }

    #[must_use]
    pub fn with_sport_ids(mut self, sport_ids: Vec<i64>) -> Self {
        self.sport_ids = Some(sport_ids);
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: Vec<PolicyCategory>) -> Self {
        self.categories = Some(categories);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: KeywordMatch) -> Self {
        self.keywords = Some(keywords);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub const fn with_effective_range(
        mut self,
        after: Option<NaiveDate>,
        before: Option<NaiveDate>,
    ) -> Self {
        self.effective_after = after;
        self.effective_before = before;
        self
    }

    #[must_use]
    pub const fn with_order(mut self, order: PolicyOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub const fn with_range(mut self, offset: usize, limit: usize) -> Self {
        self.range = Some(Range { offset, limit });
        self
    }

    /// Whether `policy` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, policy: &Policy) -> bool {
        self.status.map_or(true, |s| policy.status == s)
            && self
                .ids
                .as_ref()
                .map_or(true, |ids| ids.iter().any(|id| *id == policy.id))
            && self.sport.map_or(true, |s| s.matches(policy.sport_id))
            && self
                .sport_ids
                .as_ref()
                .map_or(true, |ids| policy.sport_id.is_some_and(|id| ids.contains(&id)))
            && self
                .categories
                .as_ref()
                .map_or(true, |cats| cats.contains(&policy.category))
            && self
                .tags
                .as_ref()
                .map_or(true, |tags| tags.iter().any(|t| policy.tags.contains(t)))
            && self
                .keywords
                .as_ref()
                .map_or(true, |k| k.matches(&policy.keywords))
            && self.text.as_deref().map_or(true, |text| text_matches(policy, text))
            && self.effective_after.map_or(true, |d| policy.effective_date >= d)
            && self.effective_before.map_or(true, |d| policy.effective_date <= d)
    }
}

fn text_matches(policy: &Policy, text: &str) -> bool {
    let haystack = format!(
        "{}\n{}\n{}",
        policy.title,
        policy.summary.as_deref().unwrap_or_default(),
        policy.content_text
    )
    .to_lowercase();
    text.split_whitespace()
        .all(|term| haystack.contains(&term.to_lowercase()))
}

/// Backing repository for policies, sports and the manual registry.
pub trait PolicyStore: Send + Sync {
    /// Filtered, ordered, windowed policies plus the unwindowed match count.
    fn fetch_policies(&self, query: &PolicyQuery) -> Result<(Vec<Policy>, usize)>;

    fn get_policy(&self, id: &str) -> Result<Option<Policy>>;

    fn find_policy_by_number(&self, policy_number: &str) -> Result<Option<Policy>>;

    /// Add a policy whose number is not yet taken.
    fn create_policy(&self, policy: Policy) -> Result<()>;

    /// Replace the stored policy with the same id. The policy number must
    /// stay unique across all other policies.
    fn update_policy(&self, policy: Policy) -> Result<()>;

    fn insert_policy_version(&self, version: PolicyVersion) -> Result<()>;

    /// Superseded revisions of a policy, newest first, at most `limit`.
    fn policy_versions(&self, policy_id: &str, limit: usize) -> Result<Vec<PolicyVersion>>;

    /// Sports ordered by name.
    fn list_sports(&self, active_only: bool) -> Result<Vec<Sport>>;

    fn get_sport(&self, id: i64) -> Result<Option<Sport>>;

    /// Insert a descriptor with a fresh id in `pending` state.
    fn insert_manual(&self, manual: NewManual) -> Result<ManualDescriptor>;

    fn insert_sections(&self, sections: &[ManualSection]) -> Result<()>;

    fn mark_manual_complete(&self, manual_id: &str) -> Result<()>;

    /// A descriptor by id, regardless of status.
    fn get_manual(&self, id: &str) -> Result<Option<ManualDescriptor>>;

    /// Every stored descriptor, regardless of status or kind.
    fn list_manuals(&self) -> Result<Vec<ManualDescriptor>>;

    /// Sections of a manual ordered by `section_order`.
    fn manual_sections(&self, manual_id: &str) -> Result<Vec<ManualSection>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PolicyNumber;

    fn policy(id: &str, category: PolicyCategory, sport: Option<i64>) -> Policy {
        let number = PolicyNumber::parse(format!("GEN-QRY-{:03}", id.len())).unwrap();
        let mut policy = Policy::new(id, number, id, category, "text");
        policy.sport_id = sport;
        policy
    }

    #[test]
    fn test_sport_filter_or_multi_sport() {
        assert!(SportFilter::OrMultiSport(3).matches(None));
        assert!(SportFilter::OrMultiSport(3).matches(Some(3)));
        assert!(!SportFilter::OrMultiSport(3).matches(Some(4)));
        assert!(!SportFilter::Exactly(3).matches(None));
    }

    #[test]
    fn test_query_conjunction() {
        let query = PolicyQuery::current()
            .with_sport(SportFilter::OrMultiSport(1))
            .with_categories(vec![PolicyCategory::Officiating]);

        assert!(query.matches(&policy("a", PolicyCategory::Officiating, None)));
        assert!(query.matches(&policy("b", PolicyCategory::Officiating, Some(1))));
        assert!(!query.matches(&policy("c", PolicyCategory::Governance, Some(1))));
        assert!(!query.matches(
            &policy("d", PolicyCategory::Officiating, Some(1)).with_status(PolicyStatus::Draft)
        ));
    }

    #[test]
    fn test_keyword_match_any_and_all() {
        let keywords = vec!["heat".to_string(), "Hydration".to_string()];
        assert!(KeywordMatch::Any(vec!["heat".into(), "wind".into()]).matches(&keywords));
        assert!(!KeywordMatch::All(vec!["heat".into(), "wind".into()]).matches(&keywords));
        assert!(KeywordMatch::All(vec!["hydration".into(), "HEAT".into()]).matches(&keywords));
    }

    #[test]
    fn test_text_terms_must_all_occur() {
        let mut p = policy("a", PolicyCategory::SafetyProtocols, Some(2));
        p.title = "Heat Illness Protocol".to_string();
        p.content_text = "Cooling tubs are required on site.".to_string();

        assert!(PolicyQuery::current().with_text("heat tubs").matches(&p));
        assert!(PolicyQuery::current().with_text("  ILLNESS  ").matches(&p));
        assert!(!PolicyQuery::current().with_text("heat lightning").matches(&p));
    }

    #[test]
    fn test_effective_range_and_sport_ids() {
        let p = policy("a", PolicyCategory::Governance, Some(2));
        let day = p.effective_date;
        assert!(PolicyQuery::default().with_effective_range(Some(day), Some(day)).matches(&p));
        assert!(!PolicyQuery::default()
            .with_effective_range(day.succ_opt(), None)
            .matches(&p));

        assert!(PolicyQuery::default().with_sport_ids(vec![1, 2]).matches(&p));
        assert!(!PolicyQuery::default()
            .with_sport_ids(vec![1])
            .matches(&policy("b", PolicyCategory::Governance, None)));
    }

    #[test]
    fn test_order_descending_ties_on_number() {
        let mut a = policy("a", PolicyCategory::Governance, None);
        let mut b = policy("bb", PolicyCategory::Governance, None);
        a.title = "Same".to_string();
        b.title = "Same".to_string();
        assert_eq!(PolicyOrder::new(SortKey::Title, false).compare(&a, &b), Ordering::Less);
        let desc = PolicyOrder::new(SortKey::Title, true);
        assert_eq!(desc.compare(&a, &b), Ordering::Less);
        let key: SortKey = serde_json::from_str("\"updated_at\"").unwrap();
        assert_eq!(key, SortKey::UpdatedAt);
        assert!(serde_json::from_str::<SortKey>("\"rank\"").is_err());
    }

    #[test]
    fn test_query_ids() {
        let query = PolicyQuery::current().with_ids(vec!["x".to_string()]);
        assert!(query.matches(&policy("x", PolicyCategory::Governance, Some(9))));
        assert!(!query.matches(&policy("y", PolicyCategory::Governance, None)));
    }
}
