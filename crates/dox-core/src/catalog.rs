//! Read-only lookups over the policy store: categories, sports, policies.

use crate::error::{DoxError, Result};
use crate::store::{PolicyQuery, PolicyStore, SportFilter};
use crate::types::{Policy, PolicyCategory, PolicyNumber, Sport};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// A category tag with its label and, on request, its current policy count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub value: PolicyCategory,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// All categories in declaration order.
///
/// Counts consider current policies only; a sport filter counts policies
/// owned by that sport (multi-sport policies are not included).
///
/// # Errors
///
/// Propagates store failures.
pub fn list_categories(
    store: &dyn PolicyStore,
    include_counts: bool,
    sport_id: Option<i64>,
) -> Result<Vec<CategoryInfo>> {
    let counts = if include_counts {
        let mut query = PolicyQuery::current();
        if let Some(id) = sport_id {
            query = query.with_sport(SportFilter::Exactly(id));
        }
        let (policies, _) = store.fetch_policies(&query)?;
        let mut counts: HashMap<PolicyCategory, usize> = HashMap::new();
        for policy in &policies {
            *counts.entry(policy.category).or_default() += 1;
        }
        Some(counts)
    } else {
        None
    };

    Ok(PolicyCategory::ALL
        .iter()
        .map(|&category| CategoryInfo {
            value: category,
            label: category.label(),
            count: counts
                .as_ref()
                .map(|c| c.get(&category).copied().unwrap_or(0)),
        })
        .collect())
}

/// Sports ordered by name.
///
/// # Errors
///
/// Propagates store failures.
pub fn list_sports(store: &dyn PolicyStore, active_only: bool) -> Result<Vec<Sport>> {
    store.list_sports(active_only)
}

/// The sport with abbreviation `abbreviation`, active or not.
///
/// # Errors
///
/// Returns [`DoxError::NotFound`] when no sport carries it.
pub fn find_sport_by_abbreviation(store: &dyn PolicyStore, abbreviation: &str) -> Result<Sport> {
    store
        .list_sports(false)?
        .into_iter()
        .find(|s| s.abbreviation == abbreviation)
        .ok_or_else(|| DoxError::not_found("Sport", abbreviation))
}

/// How a single policy is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyLookup {
    Id(String),
    Number(PolicyNumber),
}

impl PolicyLookup {
    /// Parse `{"id": ...}` or `{"policy_number": ...}` tool arguments.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] when neither key is usable.
    pub fn from_value(args: &Value) -> Result<Self> {
        match (args.get("id"), args.get("policy_number")) {
            (Some(Value::String(id)), _) if !id.is_empty() => Ok(Self::Id(id.clone())),
            (Some(Value::Number(id)), _) => Ok(Self::Id(id.to_string())),
            (_, Some(Value::String(number))) => Ok(Self::Number(PolicyNumber::parse(number.as_str())?)),
            _ => Err(DoxError::InvalidParams(
                "Either id or policy_number is required".to_string(),
            )),
        }
    }
}

/// A policy together with its owning sport, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyDetail {
    #[serde(flatten)]
    pub policy: Policy,
    pub sport: Option<Sport>,
}

/// # Errors
///
/// Returns [`DoxError::NotFound`] when no policy matches.
pub fn get_policy(store: &dyn PolicyStore, lookup: &PolicyLookup) -> Result<PolicyDetail> {
    let policy = match lookup {
        PolicyLookup::Id(id) => store
            .get_policy(id)?
            .ok_or_else(|| DoxError::not_found("Policy", id.as_str()))?,
        PolicyLookup::Number(number) => store
            .find_policy_by_number(number.as_str())?
            .ok_or_else(|| DoxError::not_found("Policy", number.as_str()))?,
    };
    let sport = match policy.sport_id {
        Some(id) => store.get_sport(id)?,
        None => None,
    };
    Ok(PolicyDetail { policy, sport })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::PolicyStatus;
    use serde_json::json;

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.insert_sport(Sport::new(1, "Baseball", "BSB")).unwrap();
        let add = |id: &str, number: &str, category, sport: Option<i64>, status| {
            let mut policy = Policy::new(
                id,
                PolicyNumber::parse(number).unwrap(),
                id,
                category,
                "text",
            )
            .with_status(status);
            policy.sport_id = sport;
            store.insert_policy(policy).unwrap();
        };
        add("a", "BSB-OFF-001", PolicyCategory::Officiating, Some(1), PolicyStatus::Current);
        add("b", "BSB-OFF-002", PolicyCategory::Officiating, None, PolicyStatus::Current);
        add("c", "BSB-OFF-003", PolicyCategory::Officiating, Some(1), PolicyStatus::Draft);
        store
    }

    #[test]
    fn test_categories_without_counts() {
        let categories = list_categories(&store(), false, None).unwrap();
        assert_eq!(categories.len(), 17);
        assert_eq!(categories[0].label, "Scheduling Policies");
        assert!(categories.iter().all(|c| c.count.is_none()));
    }

    #[test]
    fn test_category_counts() {
        let store = store();
        let all = list_categories(&store, true, None).unwrap();
        let officiating = all.iter().find(|c| c.value == PolicyCategory::Officiating).unwrap();
        assert_eq!(officiating.count, Some(2));

        let baseball = list_categories(&store, true, Some(1)).unwrap();
        let officiating = baseball
            .iter()
            .find(|c| c.value == PolicyCategory::Officiating)
            .unwrap();
        assert_eq!(officiating.count, Some(1));
        assert_eq!(baseball[0].count, Some(0));
    }

    #[test]
    fn test_find_sport_by_abbreviation() {
        let store = store();
        assert_eq!(find_sport_by_abbreviation(&store, "BSB").unwrap().id, 1);
        let err = find_sport_by_abbreviation(&store, "bsb").unwrap_err();
        assert_eq!(err.to_string(), "Sport not found: bsb");
    }

    #[test]
    fn test_policy_lookup_parsing() {
        assert_eq!(
            PolicyLookup::from_value(&json!({"id": "a"})).unwrap(),
            PolicyLookup::Id("a".to_string())
        );
        assert_eq!(
            PolicyLookup::from_value(&json!({"id": 7})).unwrap(),
            PolicyLookup::Id("7".to_string())
        );
        assert!(PolicyLookup::from_value(&json!({"policy_number": "bad"})).is_err());
        assert!(PolicyLookup::from_value(&json!({})).is_err());
    }

    #[test]
    fn test_get_policy_joins_sport() {
        let store = store();
        let lookup = PolicyLookup::from_value(&json!({"policy_number": "BSB-OFF-001"})).unwrap();
        let detail = get_policy(&store, &lookup).unwrap();
        assert_eq!(detail.sport.unwrap().name, "Baseball");

        let value = serde_json::to_value(get_policy(&store, &PolicyLookup::Id("b".into())).unwrap())
            .unwrap();
        assert_eq!(value["policy_number"], "BSB-OFF-002");
        assert!(value["sport"].is_null());
    }

    #[test]
    fn test_get_policy_not_found() {
        let err = get_policy(&store(), &PolicyLookup::Id("zzz".into())).unwrap_err();
        assert_eq!(err.to_string(), "Policy not found: zzz");
    }
}
