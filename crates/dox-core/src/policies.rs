//! Policy management, listing and filter-based search.
//!
//! Every operation takes its arguments as a request type deserialised from
//! tool arguments with [`from_args`]. Searches are plain conjunctions of
//! store predicates; results come back paginated, never ranked.

use crate::catalog::find_sport_by_abbreviation;
use crate::error::{DoxError, Result};
use crate::store::{KeywordMatch, PolicyOrder, PolicyQuery, PolicyStore, SortKey, SportFilter};
use crate::types::{Policy, PolicyCategory, PolicyNumber, PolicyStatus, PolicyVersion, Version};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub const DEFAULT_PAGE_LIMIT: usize = 20;
pub const MAX_PAGE_LIMIT: usize = 100;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
pub const MAX_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_TAG_LIMIT: usize = 50;

const MAX_TITLE_CHARS: usize = 255;
const MAX_SHORT_NAME_CHARS: usize = 100;
const DEFAULT_CHANGE_SUMMARY: &str = "Policy updated";

/// Deserialise tool arguments into a request type.
///
/// # Errors
///
/// Returns [`DoxError::InvalidParams`] for missing fields or wrong types.
pub fn from_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|e| DoxError::InvalidParams(e.to_string()))
}

/// Accept a policy id given as either a JSON string or number.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(id) => id,
        Id::Number(id) => id.to_string(),
    })
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent key (`None`).
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn check_text(field: &str, value: &str, max_chars: Option<usize>) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DoxError::InvalidParams(format!("{field} must not be empty")));
    }
    if let Some(max) = max_chars {
        if value.chars().count() > max {
            return Err(DoxError::InvalidParams(format!(
                "{field} must be at most {max} characters"
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Pagination
// ============================================================================

/// One-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] for page 0 or a limit outside
    /// `1..=MAX_PAGE_LIMIT`.
    pub fn validate(self) -> Result<Self> {
        if self.page == 0 {
            return Err(DoxError::InvalidParams("page must be positive".to_string()));
        }
        if self.limit == 0 || self.limit > MAX_PAGE_LIMIT {
            return Err(DoxError::InvalidParams(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}"
            )));
        }
        Ok(self)
    }

    #[must_use]
    pub const fn offset(self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
}

/// One window of a policy query plus its unwindowed total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyPage {
    pub policies: Vec<Policy>,
    pub pagination: Pagination,
}

fn fetch_page(store: &dyn PolicyStore, query: PolicyQuery, page: PageRequest) -> Result<PolicyPage> {
    let page = page.validate()?;
    let query = query.with_range(page.offset(), page.limit);
    let (policies, total) = store.fetch_policies(&query)?;
    Ok(PolicyPage {
        policies,
        pagination: Pagination {
            page: page.page,
            limit: page.limit,
            total,
            total_pages: total.div_ceil(page.limit),
        },
    })
}

// ============================================================================
// Management
// ============================================================================

/// Arguments of `create_policy`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPolicy {
    pub title: String,
    pub short_name: String,
    pub category: PolicyCategory,
    #[serde(default)]
    pub sport_id: Option<i64>,
    pub policy_number: PolicyNumber,
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
}

impl NewPolicy {
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] for blank or overlong text fields.
    pub fn validate(&self) -> Result<()> {
        check_text("title", &self.title, Some(MAX_TITLE_CHARS))?;
        check_text("short_name", &self.short_name, Some(MAX_SHORT_NAME_CHARS))?;
        check_text("content_text", &self.content_text, None)
    }

    /// A draft at version 1.0.
    #[must_use]
    pub fn into_policy(self, id: String, at: DateTime<Utc>) -> Policy {
        let mut policy = Policy::new(
            id,
            self.policy_number,
            self.title,
            self.category,
            self.content_text,
        )
        .with_status(PolicyStatus::Draft);
        policy.short_name = self.short_name;
        policy.sport_id = self.sport_id;
        policy.content_html = self.content_html;
        policy.summary = self.summary;
        policy.effective_date = self.effective_date;
        policy.expiration_date = self.expiration_date;
        policy.tags = self.tags;
        policy.keywords = self.keywords;
        policy.applies_to_sports = self.applies_to_sports;
        policy.created_at = at;
        policy.updated_at = at;
        policy
    }
}

/// Response of a management operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyChange {
    pub policy: Policy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub message: &'static str,
}

/// Store a new draft policy under a fresh id.
///
/// # Errors
///
/// Returns [`DoxError::InvalidParams`] when validation fails or the policy
/// number is taken, plus store failures.
pub fn create_policy(store: &dyn PolicyStore, new: NewPolicy) -> Result<PolicyChange> {
    new.validate()?;
    ensure_number_free(store, &new.policy_number, None)?;
    let policy = new.into_policy(Uuid::new_v4().to_string(), Utc::now());
    store.create_policy(policy.clone())?;
    info!("Created policy {} ({})", policy.policy_number, policy.id);
    Ok(PolicyChange {
        policy,
        notes: None,
        message: "Policy created successfully",
    })
}

fn ensure_number_free(
    store: &dyn PolicyStore,
    number: &PolicyNumber,
    owner: Option<&str>,
) -> Result<()> {
    match store.find_policy_by_number(number.as_str())? {
        Some(existing) if Some(existing.id.as_str()) != owner => Err(DoxError::InvalidParams(
            format!("Policy with number {number} already exists"),
        )),
        _ => Ok(()),
    }
}

fn require_policy(store: &dyn PolicyStore, id: &str) -> Result<Policy> {
    store
        .get_policy(id)?
        .ok_or_else(|| DoxError::not_found("Policy", id))
}

/// Field changes of `update_policy`. Absent keys are left untouched; an
/// explicit `null` clears `sport_id` or `expiration_date`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PolicyUpdate {
    pub title: Option<String>,
    pub short_name: Option<String>,
    pub category: Option<PolicyCategory>,
    #[serde(deserialize_with = "nullable")]
    pub sport_id: Option<Option<i64>>,
    pub policy_number: Option<PolicyNumber>,
    pub content_text: Option<String>,
    pub content_html: Option<String>,
    pub summary: Option<String>,
    pub effective_date: Option<NaiveDate>,
    #[serde(deserialize_with = "nullable")]
    pub expiration_date: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub applies_to_sports: Option<Vec<String>>,
    pub status: Option<PolicyStatus>,
}

impl PolicyUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the changes to `policy`. The version moves only when the
    /// content body changes.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] for blank or overlong text and on
    /// version overflow.
    pub fn apply(self, policy: &mut Policy, at: DateTime<Utc>) -> Result<()> {
        if let Some(title) = self.title {
            check_text("title", &title, Some(MAX_TITLE_CHARS))?;
            policy.title = title;
        }
        if let Some(short_name) = self.short_name {
            check_text("short_name", &short_name, Some(MAX_SHORT_NAME_CHARS))?;
            policy.short_name = short_name;
        }
        if let Some(category) = self.category {
            policy.category = category;
        }
        if let Some(sport_id) = self.sport_id {
            policy.sport_id = sport_id;
        }
        if let Some(number) = self.policy_number {
            policy.policy_number = number;
        }
        if let Some(html) = self.content_html {
            policy.content_html = Some(html);
        }
        if let Some(summary) = self.summary {
            policy.summary = Some(summary);
        }
        if let Some(date) = self.effective_date {
            policy.effective_date = date;
        }
        if let Some(date) = self.expiration_date {
            policy.expiration_date = date;
        }
        if let Some(tags) = self.tags {
            policy.tags = tags;
        }
        if let Some(keywords) = self.keywords {
            policy.keywords = keywords;
        }
        if let Some(sports) = self.applies_to_sports {
            policy.applies_to_sports = sports;
        }
        if let Some(status) = self.status {
            policy.status = status;
        }
        match self.content_text {
            Some(text) => {
                check_text("content_text", &text, None)?;
                policy.revise_content(text, at)
            }
            None => {
                policy.updated_at = at;
                Ok(())
            }
        }
    }
}

/// Arguments of `update_policy`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub updates: PolicyUpdate,
    #[serde(default)]
    pub change_summary: Option<String>,
}

/// Response of `update_policy`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyRevision {
    pub policy: Policy,
    pub previous_version: Version,
    pub new_version: Version,
    pub message: &'static str,
}

/// Apply an update, recording the prior revision in the policy history.
///
/// # Errors
///
/// Returns [`DoxError::NotFound`] for an unknown id,
/// [`DoxError::InvalidParams`] when the new policy number is taken or a
/// field is invalid, plus store failures. Nothing is written on error.
pub fn update_policy(store: &dyn PolicyStore, request: UpdateRequest) -> Result<PolicyRevision> {
    let current = require_policy(store, &request.id)?;
    if let Some(number) = &request.updates.policy_number {
        ensure_number_free(store, number, Some(current.id.as_str()))?;
    }

    let now = Utc::now();
    let record = request.change_summary.is_some() || !request.updates.is_empty();
    let mut updated = current.clone();
    request.updates.apply(&mut updated, now)?;

    if record {
        let summary = request
            .change_summary
            .unwrap_or_else(|| DEFAULT_CHANGE_SUMMARY.to_string());
        store.insert_policy_version(current.snapshot(summary, now))?;
    }
    store.update_policy(updated.clone())?;
    info!(
        "Updated policy {} {} -> {}",
        updated.policy_number, current.version, updated.version
    );

    Ok(PolicyRevision {
        previous_version: current.version,
        new_version: updated.version,
        policy: updated,
        message: "Policy updated successfully",
    })
}

/// Arguments of `archive_policy`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveRequest {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Move a policy to `archived`.
///
/// # Errors
///
/// Returns [`DoxError::NotFound`] for an unknown id, plus store failures.
pub fn archive_policy(store: &dyn PolicyStore, request: ArchiveRequest) -> Result<PolicyChange> {
    let mut policy = require_policy(store, &request.id)?;
    policy.status = PolicyStatus::Archived;
    policy.updated_at = Utc::now();
    store.update_policy(policy.clone())?;
    info!(
        "Archived policy {}: {}",
        policy.policy_number,
        request.reason.as_deref().unwrap_or("no reason given")
    );
    Ok(PolicyChange {
        policy,
        notes: request.reason,
        message: "Policy archived successfully",
    })
}

/// Arguments of `approve_policy`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveRequest {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub approver_notes: Option<String>,
}

/// Move a draft or pending policy to `current`.
///
/// # Errors
///
/// Returns [`DoxError::NotFound`] for an unknown id and
/// [`DoxError::InvalidParams`] for any other starting status.
pub fn approve_policy(store: &dyn PolicyStore, request: ApproveRequest) -> Result<PolicyChange> {
    let mut policy = require_policy(store, &request.id)?;
    if !matches!(
        policy.status,
        PolicyStatus::PendingApproval | PolicyStatus::Draft
    ) {
        return Err(DoxError::InvalidParams(format!(
            "Cannot approve policy with status: {}",
            policy.status
        )));
    }
    policy.status = PolicyStatus::Current;
    policy.updated_at = Utc::now();
    store.update_policy(policy.clone())?;
    info!("Approved policy {}", policy.policy_number);
    Ok(PolicyChange {
        policy,
        notes: request.approver_notes,
        message: "Policy approved and set to current",
    })
}

// ============================================================================
// Retrieval
// ============================================================================

const fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Arguments of `get_policy_history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRequest {
    #[serde(deserialize_with = "id_string")]
    pub policy_id: String,
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryHead {
    pub id: String,
    pub title: String,
    pub policy_number: PolicyNumber,
    pub current_version: Version,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyHistory {
    pub policy: HistoryHead,
    pub versions: Vec<PolicyVersion>,
}

/// Superseded revisions of a policy, newest first.
///
/// # Errors
///
/// Returns [`DoxError::NotFound`] for an unknown id and
/// [`DoxError::InvalidParams`] for a limit outside `1..=MAX_HISTORY_LIMIT`.
pub fn get_policy_history(store: &dyn PolicyStore, request: HistoryRequest) -> Result<PolicyHistory> {
    if request.limit == 0 || request.limit > MAX_HISTORY_LIMIT {
        return Err(DoxError::InvalidParams(format!(
            "limit must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }
    let policy = require_policy(store, &request.policy_id)?;
    let versions = store.policy_versions(&policy.id, request.limit)?;
    Ok(PolicyHistory {
        policy: HistoryHead {
            id: policy.id,
            title: policy.title,
            policy_number: policy.policy_number,
            current_version: policy.version,
        },
        versions,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListFilters {
    pub sport_id: Option<i64>,
    pub category: Option<PolicyCategory>,
    /// Defaults to `current`.
    pub status: Option<PolicyStatus>,
    pub effective_after: Option<NaiveDate>,
    pub effective_before: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Arguments of `list_policies`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListRequest {
    pub filters: ListFilters,
    pub sort_by: SortKey,
    pub sort_order: SortDirection,
    pub page: usize,
    pub limit: usize,
}

impl Default for ListRequest {
    fn default() -> Self {
        let page = PageRequest::default();
        Self {
            filters: ListFilters::default(),
            sort_by: SortKey::default(),
            sort_order: SortDirection::default(),
            page: page.page,
            limit: page.limit,
        }
    }
}

/// Filtered, sorted, paginated policy listing.
///
/// # Errors
///
/// Returns [`DoxError::InvalidParams`] for a bad page window, plus store
/// failures.
pub fn list_policies(store: &dyn PolicyStore, request: ListRequest) -> Result<PolicyPage> {
    let filters = request.filters;
    let mut query = PolicyQuery::default()
        .with_status(filters.status.unwrap_or(PolicyStatus::Current))
        .with_effective_range(filters.effective_after, filters.effective_before)
        .with_order(PolicyOrder::new(
            request.sort_by,
            request.sort_order == SortDirection::Desc,
        ));
    if let Some(id) = filters.sport_id {
        query = query.with_sport(SportFilter::Exactly(id));
    }
    if let Some(category) = filters.category {
        query = query.with_categories(vec![category]);
    }
    fetch_page(
        store,
        query,
        PageRequest {
            page: request.page,
            limit: request.limit,
        },
    )
}

const fn default_tag_limit() -> usize {
    DEFAULT_TAG_LIMIT
}

/// Arguments of `list_tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagRequest {
    #[serde(default)]
    pub sport_id: Option<i64>,
    #[serde(default = "default_tag_limit")]
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagList {
    pub tags: Vec<TagCount>,
    /// Distinct tags before the limit is applied.
    pub total: usize,
}

/// Tags of current policies by descending use, ties by tag.
///
/// # Errors
///
/// Returns [`DoxError::InvalidParams`] for a limit outside
/// `1..=MAX_PAGE_LIMIT`, plus store failures.
pub fn list_tags(store: &dyn PolicyStore, request: TagRequest) -> Result<TagList> {
    if request.limit == 0 || request.limit > MAX_PAGE_LIMIT {
        return Err(DoxError::InvalidParams(format!(
            "limit must be between 1 and {MAX_PAGE_LIMIT}"
        )));
    }
    let mut query = PolicyQuery::current();
    if let Some(id) = request.sport_id {
        query = query.with_sport(SportFilter::Exactly(id));
    }
    let (policies, _) = store.fetch_policies(&query)?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in policies.iter().flat_map(|p| p.tags.iter()) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }
    let total = counts.len();
    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount {
            tag: tag.to_string(),
            count,
        })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    tags.truncate(request.limit);
    Ok(TagList { tags, total })
}

// ============================================================================
// Search
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub sport_ids: Option<Vec<i64>>,
    pub categories: Option<Vec<PolicyCategory>>,
    /// Defaults to `current`.
    pub status: Option<PolicyStatus>,
    pub tags: Option<Vec<String>>,
}

/// Arguments of `search_policies`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub pagination: PageRequest,
}

/// Policies containing every term of the query, most recently updated first.
///
/// # Errors
///
/// Returns [`DoxError::InvalidParams`] for a blank query or bad page
/// window, plus store failures.
pub fn search_policies(store: &dyn PolicyStore, request: SearchRequest) -> Result<PolicyPage> {
    if request.query.trim().is_empty() {
        return Err(DoxError::InvalidParams("Search query is required".to_string()));
    }
    let filters = request.filters;
    let mut query = PolicyQuery::default()
        .with_status(filters.status.unwrap_or(PolicyStatus::Current))
        .with_text(request.query)
        .with_order(PolicyOrder::UPDATED_AT_DESC);
    if let Some(ids) = filters.sport_ids.filter(|ids| !ids.is_empty()) {
        query = query.with_sport_ids(ids);
    }
    if let Some(categories) = filters.categories.filter(|c| !c.is_empty()) {
        query = query.with_categories(categories);
    }
    if let Some(tags) = filters.tags.filter(|t| !t.is_empty()) {
        query = query.with_tags(tags);
    }
    fetch_page(store, query, request.pagination)
}

const fn yes() -> bool {
    true
}

/// Arguments of `search_by_sport`.
#[derive(Debug, Clone, Deserialize)]
pub struct SportSearchRequest {
    #[serde(default)]
    pub sport_id: Option<i64>,
    #[serde(default)]
    pub sport_abbreviation: Option<String>,
    #[serde(default = "yes")]
    pub include_multi_sport: bool,
    #[serde(default)]
    pub pagination: PageRequest,
}

/// Current policies of a sport, by id or abbreviation, in policy-number
/// order. Without either, every current policy.
///
/// # Errors
///
/// Returns [`DoxError::NotFound`] for an unknown abbreviation, plus the
/// errors of a page fetch.
pub fn search_by_sport(store: &dyn PolicyStore, request: SportSearchRequest) -> Result<PolicyPage> {
    let sport_id = match (request.sport_id, request.sport_abbreviation.as_deref()) {
        (Some(id), _) => Some(id),
        (None, Some(abbreviation)) => Some(find_sport_by_abbreviation(store, abbreviation)?.id),
        (None, None) => None,
    };
    let mut query = PolicyQuery::current();
    if let Some(id) = sport_id {
        query = query.with_sport(if request.include_multi_sport {
            SportFilter::OrMultiSport(id)
        } else {
            SportFilter::Exactly(id)
        });
    }
    fetch_page(store, query, request.pagination)
}

/// Arguments of `search_by_category`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySearchRequest {
    pub category: PolicyCategory,
    #[serde(default)]
    pub sport_id: Option<i64>,
    #[serde(default)]
    pub pagination: PageRequest,
}

/// Current policies of one category, optionally owned by one sport.
///
/// # Errors
///
/// The errors of a page fetch.
pub fn search_by_category(
    store: &dyn PolicyStore,
    request: CategorySearchRequest,
) -> Result<PolicyPage> {
    let mut query = PolicyQuery::current().with_categories(vec![request.category]);
    if let Some(id) = request.sport_id {
        query = query.with_sport(SportFilter::Exactly(id));
    }
    fetch_page(store, query, request.pagination)
}

/// Arguments of `search_by_keywords`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordSearchRequest {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub match_all: bool,
    #[serde(default)]
    pub pagination: PageRequest,
}

/// Current policies sharing any (or every) keyword, most recently updated
/// first.
///
/// # Errors
///
/// Returns [`DoxError::InvalidParams`] for an empty keyword list, plus the
/// errors of a page fetch.
pub fn search_by_keywords(
    store: &dyn PolicyStore,
    request: KeywordSearchRequest,
) -> Result<PolicyPage> {
    if request.keywords.is_empty() {
        return Err(DoxError::InvalidParams(
            "At least one keyword is required".to_string(),
        ));
    }
    let keywords = if request.match_all {
        KeywordMatch::All(request.keywords)
    } else {
        KeywordMatch::Any(request.keywords)
    };
    let query = PolicyQuery::current()
        .with_keywords(keywords)
        .with_order(PolicyOrder::UPDATED_AT_DESC);
    fetch_page(store, query, request.pagination)
}
