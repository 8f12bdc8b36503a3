//! Grouping of a flat policy list into category sections.
//!
//! Groups are exposed in the order their category is first encountered in the
//! input, and each group keeps the input's relative order. Both orders drive
//! the table of contents and the body, so grouping the same input twice always
//! yields the same structure.

use crate::types::{Policy, PolicyCategory};
use std::collections::HashMap;

/// One category and its policies, borrowed from the flat list.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: PolicyCategory,
    pub policies: Vec<&'a Policy>,
}

impl CategoryGroup<'_> {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// Ordered category groups built from one assembly request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryGroups<'a> {
    groups: Vec<CategoryGroup<'a>>,
}

impl<'a> CategoryGroups<'a> {
    /// Group `policies` by category in first-seen order.
    ///
    /// Categories with no policies never appear.
    #[must_use]
    pub fn build(policies: &'a [Policy]) -> Self {
        let mut groups: Vec<CategoryGroup<'a>> = Vec::new();
        let mut slots: HashMap<PolicyCategory, usize> = HashMap::new();

        for policy in policies {
            let slot = *slots.entry(policy.category).or_insert_with(|| {
                groups.push(CategoryGroup {
                    category: policy.category,
                    policies: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].policies.push(policy);
        }

        Self { groups }
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, CategoryGroup<'a>> {
        self.groups.iter()
    }

    /// Number of categories.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of grouped policies.
    #[must_use]
    pub fn policy_count(&self) -> usize {
        self.groups.iter().map(CategoryGroup::len).sum()
    }

    /// Categories in group order.
    #[must_use]
    pub fn categories(&self) -> Vec<PolicyCategory> {
        self.groups.iter().map(|g| g.category).collect()
    }

    /// `(category, group size)` pairs in group order.
    #[must_use]
    pub fn sizes(&self) -> Vec<(PolicyCategory, usize)> {
        self.groups.iter().map(|g| (g.category, g.len())).collect()
    }

    #[must_use]
    pub fn get(&self, category: PolicyCategory) -> Option<&CategoryGroup<'a>> {
        self.groups.iter().find(|g| g.category == category)
    }
}

impl<'g, 'a> IntoIterator for &'g CategoryGroups<'a> {
    type Item = &'g CategoryGroup<'a>;
    type IntoIter = std::slice::Iter<'g, CategoryGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PolicyNumber;

    fn policy(n: u32, category: PolicyCategory) -> Policy {
        let number = PolicyNumber::parse(format!("GEN-TST-{n:03}")).unwrap();
        Policy::new(n.to_string(), number, format!("Policy {n}"), category, "body")
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        let groups = CategoryGroups::build(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.policy_count(), 0);
    }

    #[test]
    fn test_groups_follow_first_seen_order() {
        let policies = vec![
            policy(1, PolicyCategory::Officiating),
            policy(2, PolicyCategory::Administrative),
            policy(3, PolicyCategory::Officiating),
            policy(4, PolicyCategory::Eligibility),
            policy(5, PolicyCategory::Administrative),
        ];
        let groups = CategoryGroups::build(&policies);

        assert_eq!(
            groups.categories(),
            vec![
                PolicyCategory::Officiating,
                PolicyCategory::Administrative,
                PolicyCategory::Eligibility
            ]
        );
        let officiating: Vec<&str> = groups
            .get(PolicyCategory::Officiating)
            .unwrap()
            .policies
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(officiating, vec!["1", "3"]);
        assert_eq!(
            groups.sizes(),
            vec![
                (PolicyCategory::Officiating, 2),
                (PolicyCategory::Administrative, 2),
                (PolicyCategory::Eligibility, 1)
            ]
        );
    }

    #[test]
    fn test_absent_categories_are_not_created() {
        let policies = vec![policy(1, PolicyCategory::Governance)];
        let groups = CategoryGroups::build(&policies);
        assert_eq!(groups.len(), 1);
        assert!(groups.get(PolicyCategory::Officiating).is_none());
    }
}
