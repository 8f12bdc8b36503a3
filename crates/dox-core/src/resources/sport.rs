//! `sport://` resources: per-sport overviews grouped by category.

use super::{ResourceContent, ResourceDescriptor};
use crate::catalog::find_sport_by_abbreviation;
use crate::error::{DoxError, Result};
use crate::grouping::CategoryGroups;
use crate::store::{PolicyQuery, PolicyStore, SportFilter};
use crate::types::{Policy, Sport};
use std::fmt::{self, Write as _};

pub const SPORT_SCHEME: &str = "sport://";

/// Parsed `sport://{abbreviation}` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SportUri(pub String);

impl SportUri {
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] for another scheme or an empty
    /// abbreviation.
    pub fn parse(uri: &str) -> Result<Self> {
        match uri.strip_prefix(SPORT_SCHEME) {
            Some(abbreviation) if !abbreviation.is_empty() => Ok(Self(abbreviation.to_string())),
            _ => Err(DoxError::InvalidParams(format!(
                "Invalid sport URI format: {uri}"
            ))),
        }
    }
}

impl fmt::Display for SportUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SPORT_SCHEME}{}", self.0)
    }
}

/// One entry per active sport, by name.
///
/// # Errors
///
/// Propagates store failures.
pub fn list_sport_resources(store: &dyn PolicyStore) -> Result<Vec<ResourceDescriptor>> {
    Ok(store
        .list_sports(true)?
        .into_iter()
        .map(|s| {
            ResourceDescriptor::text(
                SportUri(s.abbreviation).to_string(),
                format!("{} Policies", s.name),
                format!("All policies for {}", s.name),
            )
        })
        .collect())
}

/// Overview of the current policies that apply to a sport, ordered by
/// category tag then policy number.
///
/// # Errors
///
/// Returns [`DoxError::NotFound`] for an unknown abbreviation, plus store
/// failures.
pub fn read_sport_resource(store: &dyn PolicyStore, uri: &SportUri) -> Result<ResourceContent> {
    let sport = find_sport_by_abbreviation(store, &uri.0)?;
    let query = PolicyQuery::current().with_sport(SportFilter::OrMultiSport(sport.id));
    let (policies, _) = store.fetch_policies(&query)?;
    let mut policies: Vec<Policy> = policies
        .into_iter()
        .filter(|p| p.applies_to(&sport))
        .collect();
    policies.sort_by(|a, b| {
        a.category
            .as_str()
            .cmp(b.category.as_str())
            .then_with(|| a.policy_number.cmp(&b.policy_number))
    });
    Ok(ResourceContent::text(
        uri.to_string(),
        format_overview(&sport, &policies),
    ))
}

fn format_overview(sport: &Sport, policies: &[Policy]) -> String {
    let groups = CategoryGroups::build(policies);
    let mut out = format!(
        "# {} Administrative Policies\n\n\
         **Abbreviation:** {}  \n\
         **Status:** {}  \n\
         **Total Policies:** {}\n\n\
         ## Policy Distribution by Category\n",
        sport.name,
        sport.abbreviation,
        if sport.active { "Active" } else { "Inactive" },
        policies.len()
    );
    for group in &groups {
        let noun = if group.len() == 1 { "policy" } else { "policies" };
        let _ = writeln!(out, "- **{}:** {} {noun}", group.category.label(), group.len());
    }
    out.push_str("\n---\n\n");

    for group in &groups {
        let _ = write!(out, "## {}\n\n", group.category.label());
        for policy in &group.policies {
            let _ = write!(
                out,
                "### {}\n**Policy Number:** {}  \n**Effective Date:** {}  \n**Summary:** {}\n\n",
                policy.title,
                policy.policy_number,
                policy.effective_date,
                policy.summary.as_deref().unwrap_or("No summary available")
            );
            if !policy.tags.is_empty() {
                let _ = write!(out, "**Tags:** {}\n\n", policy.tags.join(", "));
            }
            out.push_str("---\n\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PolicyCategory, PolicyNumber};
    use crate::store::InMemoryStore;

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.insert_sport(Sport::new(1, "Baseball", "BSB")).unwrap();
        store.insert_sport(Sport::new(2, "Football", "FB")).unwrap();
        let mut inactive = Sport::new(3, "Wrestling", "WRE");
        inactive.active = false;
        store.insert_sport(inactive).unwrap();

        let fixtures = [
            ("a", "BSB-SCH-001", PolicyCategory::SchedulingPolicies, Some(1), vec![]),
            ("b", "BSB-OFF-002", PolicyCategory::Officiating, Some(1), vec!["crews"]),
            ("c", "BSB-OFF-001", PolicyCategory::Officiating, Some(1), vec![]),
            ("d", "GEN-GOV-001", PolicyCategory::Governance, None, vec![]),
            ("e", "GEN-ELG-001", PolicyCategory::Eligibility, None, vec![]),
        ];
        for (id, number, category, sport, tags) in fixtures {
            let mut policy = Policy::new(
                id,
                PolicyNumber::parse(number).unwrap(),
                format!("Title {id}"),
                category,
                "Body.",
            );
            policy.sport_id = sport;
            policy.tags = tags.into_iter().map(String::from).collect();
            if id == "e" {
                policy.applies_to_sports = vec!["Football".to_string()];
            }
            store.insert_policy(policy).unwrap();
        }
        store
    }

    #[test]
    fn test_list_active_sports() {
        let resources = list_sport_resources(&store()).unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].uri, "sport://BSB");
        assert_eq!(resources[0].name, "Baseball Policies");
        assert_eq!(resources[0].description, "All policies for Baseball");
    }

    #[test]
    fn test_overview_groups_by_category_tag() {
        let read = read_sport_resource(&store(), &SportUri("BSB".into())).unwrap();
        let text = read.text;
        assert_eq!(read.uri, "sport://BSB");
        assert!(text.starts_with("# Baseball Administrative Policies\n\n**Abbreviation:** BSB  \n**Status:** Active  \n**Total Policies:** 4\n"));
        // the eligibility policy is restricted to football
        assert!(!text.contains("Title e"));
        assert!(text.contains("- **Governance:** 1 policy\n- **Officiating:** 2 policies\n- **Scheduling Policies:** 1 policy\n"));

        let c = text.find("### Title c").unwrap();
        let b = text.find("### Title b").unwrap();
        assert!(c < b);
        assert!(text.contains("**Tags:** crews\n\n---\n\n"));
    }

    #[test]
    fn test_inactive_and_unknown_sports() {
        let store = store();
        let read = read_sport_resource(&store, &SportUri("WRE".into())).unwrap();
        assert!(read.text.contains("**Status:** Inactive"));
        assert!(read.text.contains("**Total Policies:** 1"));

        let err = read_sport_resource(&store, &SportUri("XC".into())).unwrap_err();
        assert_eq!(err.to_string(), "Sport not found: XC");
        assert!(SportUri::parse("sport://").is_err());
        assert_eq!(SportUri::parse("sport://FB").unwrap(), SportUri("FB".into()));
    }
}
