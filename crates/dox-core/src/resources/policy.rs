//! `policy://` resources: single policies and per-sport or per-category
//! digests of current policies.

use super::{ResourceContent, ResourceDescriptor};
use crate::assembly::MULTI_SPORT;
use crate::catalog::find_sport_by_abbreviation;
use crate::error::{DoxError, Result};
use crate::store::{PolicyQuery, PolicyStore, SportFilter};
use crate::types::{Policy, PolicyCategory, PolicyStatus};
use std::fmt;

pub const POLICY_SCHEME: &str = "policy://";
const SPORT_SEGMENT: &str = "sport/";
const CATEGORY_SEGMENT: &str = "category/";

/// Maximum number of policies listed.
pub const POLICY_RESOURCE_LIMIT: usize = 100;

/// Parsed `policy://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyUri {
    /// `policy://{policy_number}`
    Number(String),
    /// `policy://sport/{abbreviation}`
    Sport(String),
    /// `policy://category/{category}`
    Category(PolicyCategory),
}

impl PolicyUri {
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] for another scheme, an empty
    /// identifier or an unknown category.
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = || DoxError::InvalidParams(format!("Invalid policy URI format: {uri}"));
        let rest = uri.strip_prefix(POLICY_SCHEME).ok_or_else(invalid)?;
        let parsed = if let Some(abbreviation) = rest.strip_prefix(SPORT_SEGMENT) {
            Self::Sport(abbreviation.to_string())
        } else if let Some(category) = rest.strip_prefix(CATEGORY_SEGMENT) {
            if category.is_empty() {
                return Err(invalid());
            }
            Self::Category(category.parse()?)
        } else {
            Self::Number(rest.to_string())
        };
        if matches!(&parsed, Self::Number(id) | Self::Sport(id) if id.is_empty()) {
            return Err(invalid());
        }
        Ok(parsed)
    }
}

impl fmt::Display for PolicyUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{POLICY_SCHEME}{number}"),
            Self::Sport(abbreviation) => write!(f, "{POLICY_SCHEME}{SPORT_SEGMENT}{abbreviation}"),
            Self::Category(category) => write!(f, "{POLICY_SCHEME}{CATEGORY_SEGMENT}{category}"),
        }
    }
}

/// Current policies in policy-number order, at most [`POLICY_RESOURCE_LIMIT`].
///
/// # Errors
///
/// Propagates store failures.
pub fn list_policy_resources(store: &dyn PolicyStore) -> Result<Vec<ResourceDescriptor>> {
    let query = PolicyQuery::current().with_range(0, POLICY_RESOURCE_LIMIT);
    let (policies, _) = store.fetch_policies(&query)?;
    Ok(policies
        .into_iter()
        .map(|p| {
            ResourceDescriptor::text(
                PolicyUri::Number(p.policy_number.to_string()).to_string(),
                p.title,
                format!("Policy {} - Category: {}", p.policy_number, p.category),
            )
        })
        .collect())
}

/// # Errors
///
/// Returns [`DoxError::NotFound`] for a policy number with no current
/// policy or an unknown sport, plus store failures.
pub fn read_policy_resource(store: &dyn PolicyStore, uri: &PolicyUri) -> Result<ResourceContent> {
    let text = match uri {
        PolicyUri::Number(number) => {
            let policy = store
                .find_policy_by_number(number)?
                .filter(|p| p.status == PolicyStatus::Current)
                .ok_or_else(|| DoxError::not_found("Policy", number.as_str()))?;
            let sport = match policy.sport_id {
                Some(id) => store.get_sport(id)?.map(|s| s.name),
                None => None,
            };
            format_policy(&policy, sport.as_deref())
        }
        PolicyUri::Sport(abbreviation) => {
            let sport = find_sport_by_abbreviation(store, abbreviation)?;
            let query = PolicyQuery::current().with_sport(SportFilter::OrMultiSport(sport.id));
            let (policies, _) = store.fetch_policies(&query)?;
            format_digest(&sport.name, &policies)
        }
        PolicyUri::Category(category) => {
            let query = PolicyQuery::current().with_categories(vec![*category]);
            let (policies, _) = store.fetch_policies(&query)?;
            format_digest(&category.label(), &policies)
        }
    };
    Ok(ResourceContent::text(uri.to_string(), text))
}

fn list_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

/// Markdown rendition of one policy.
#[must_use]
pub fn format_policy(policy: &Policy, sport_name: Option<&str>) -> String {
    format!(
        "# {title}\n\n\
         **Policy Number:** {number}  \n\
         **Category:** {category}  \n\
         **Sport:** {sport}  \n\
         **Version:** {version}  \n\
         **Effective Date:** {effective}  \n\
         **Status:** {status}\n\n\
         ## Summary\n{summary}\n\n\
         ## Content\n{content}\n\n\
         ## Tags\n{tags}\n\n\
         ## Keywords\n{keywords}\n\n\
         ## Applies to Sports\n{applies}\n\n\
         ---\n*Last Updated: {updated}*",
        title = policy.title,
        number = policy.policy_number,
        category = policy.category,
        sport = sport_name.unwrap_or(MULTI_SPORT),
        version = policy.version,
        effective = policy.effective_date,
        status = policy.status,
        summary = policy.summary.as_deref().unwrap_or("No summary available"),
        content = policy.content_text,
        tags = list_or(&policy.tags, "None"),
        keywords = list_or(&policy.keywords, "None"),
        applies = list_or(&policy.applies_to_sports, "All Sports"),
        updated = policy.updated_at.format("%-m/%-d/%Y"),
    )
}

fn format_digest(heading: &str, policies: &[Policy]) -> String {
    let mut out = format!("# {heading} Policies\n\nTotal Policies: {}\n\n", policies.len());
    let summaries: Vec<String> = policies
        .iter()
        .map(|p| {
            format!(
                "## {}\n**Policy Number:** {}  \n**Summary:** {}",
                p.title,
                p.policy_number,
                p.summary.as_deref().unwrap_or("No summary available")
            )
        })
        .collect();
    out.push_str(&summaries.join("\n---\n\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::{PolicyNumber, Sport};

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.insert_sport(Sport::new(1, "Baseball", "BSB")).unwrap();
        let add = |id: &str, number: &str, category, sport: Option<i64>, status| {
            let mut policy = Policy::new(
                id,
                PolicyNumber::parse(number).unwrap(),
                format!("Title {id}"),
                category,
                "Body.",
            )
            .with_status(status);
            policy.sport_id = sport;
            store.insert_policy(policy).unwrap();
        };
        add("a", "BSB-OFF-001", PolicyCategory::Officiating, Some(1), PolicyStatus::Current);
        add("b", "GEN-GOV-001", PolicyCategory::Governance, None, PolicyStatus::Current);
        add("c", "BSB-OFF-002", PolicyCategory::Officiating, Some(1), PolicyStatus::Draft);
        add("d", "FB-OFF-001", PolicyCategory::Officiating, Some(2), PolicyStatus::Current);
        store
    }

    #[test]
    fn test_parse_policy_uris() {
        assert_eq!(
            PolicyUri::parse("policy://BSB-OFF-001").unwrap(),
            PolicyUri::Number("BSB-OFF-001".to_string())
        );
        assert_eq!(
            PolicyUri::parse("policy://sport/BSB").unwrap(),
            PolicyUri::Sport("BSB".to_string())
        );
        assert_eq!(
            PolicyUri::parse("policy://category/officiating").unwrap(),
            PolicyUri::Category(PolicyCategory::Officiating)
        );
        assert_eq!(
            PolicyUri::Category(PolicyCategory::SafetyProtocols).to_string(),
            "policy://category/safety_protocols"
        );
        for uri in ["policy://", "policy://sport/", "policy://category/", "policy://category/curling", "sport://BSB"] {
            let err = PolicyUri::parse(uri).unwrap_err();
            assert!(matches!(err, DoxError::InvalidParams(_)), "{uri}");
        }
    }

    #[test]
    fn test_list_policy_resources_current_only() {
        let resources = list_policy_resources(&store()).unwrap();
        let uris: Vec<&str> = resources.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris, vec!["policy://BSB-OFF-001", "policy://FB-OFF-001", "policy://GEN-GOV-001"]);
        assert_eq!(resources[0].name, "Title a");
        assert_eq!(resources[0].description, "Policy BSB-OFF-001 - Category: officiating");
    }

    #[test]
    fn test_read_single_policy() {
        let store = store();
        let read = read_policy_resource(&store, &PolicyUri::Number("GEN-GOV-001".into())).unwrap();
        assert_eq!(read.uri, "policy://GEN-GOV-001");
        assert!(read.text.starts_with("# Title b\n\n**Policy Number:** GEN-GOV-001  \n"));
        assert!(read.text.contains("**Sport:** Multi-Sport"));
        assert!(read.text.contains("## Tags\nNone"));
        assert!(read.text.contains("## Applies to Sports\nAll Sports"));

        let draft = read_policy_resource(&store, &PolicyUri::Number("BSB-OFF-002".into())).unwrap_err();
        assert_eq!(draft.to_string(), "Policy not found: BSB-OFF-002");
    }

    #[test]
    fn test_read_sport_digest_includes_multi_sport() {
        let read = read_policy_resource(&store(), &PolicyUri::Sport("BSB".into())).unwrap();
        assert!(read.text.starts_with("# Baseball Policies\n\nTotal Policies: 2\n\n## Title a"));
        assert!(read.text.contains("\n---\n\n## Title b"));

        let err = read_policy_resource(&store(), &PolicyUri::Sport("XC".into())).unwrap_err();
        assert!(matches!(err, DoxError::NotFound { .. }));
    }

    #[test]
    fn test_read_category_digest() {
        let uri = PolicyUri::Category(PolicyCategory::Officiating);
        let read = read_policy_resource(&store(), &uri).unwrap();
        assert!(read.text.starts_with("# Officiating Policies\n\nTotal Policies: 2\n\n"));
        assert!(read.text.contains("**Summary:** No summary available"));
    }
}
