//! Common test fixtures

#![allow(dead_code)]

use dox_core::{
    DoxError, InMemoryStore, ManualDescriptor, ManualSection, NewManual, Policy, PolicyCategory,
    PolicyNumber, PolicyQuery, PolicyStore, PolicyVersion, Result, Sport,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A policy whose content is `lines` short paragraphs.
pub fn policy(
    id: &str,
    number: &str,
    title: &str,
    category: PolicyCategory,
    lines: usize,
) -> Policy {
    let content = (1..=lines)
        .map(|i| format!("Paragraph {i} of {title}."))
        .collect::<Vec<_>>()
        .join("\n");
    Policy::new(
        id,
        PolicyNumber::parse(number).expect("fixture policy number"),
        title,
        category,
        content,
    )
    .with_summary(format!("Summary of {title}"))
}

/// Store with 4 officiating policies and nothing else.
pub fn officiating_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    for n in 1..=4 {
        store
            .insert_policy(policy(
                &format!("off-{n}"),
                &format!("BSB-OFF-{n:03}"),
                &format!("Officiating Rule {n}"),
                PolicyCategory::Officiating,
                12,
            ))
            .expect("insert fixture policy");
    }
    store
}

/// Store spanning several sports and categories.
pub fn mixed_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .insert_sport(Sport::new(1, "Baseball", "BSB"))
        .expect("insert sport");
    store
        .insert_sport(Sport::new(2, "Football", "FB"))
        .expect("insert sport");

    let fixtures = [
        ("b1", "BSB-OFF-001", "Umpire Assignments", PolicyCategory::Officiating, Some(1)),
        ("b2", "BSB-SCH-001", "Series Scheduling", PolicyCategory::SchedulingPolicies, Some(1)),
        ("f1", "FB-OFF-001", "Replay Officials", PolicyCategory::Officiating, Some(2)),
        ("g1", "GEN-GOV-001", "Board Voting", PolicyCategory::Governance, None),
        ("g2", "GEN-ELG-001", "Transfer Eligibility", PolicyCategory::Eligibility, None),
    ];
    for (id, number, title, category, sport) in fixtures {
        let mut p = policy(id, number, title, category, 3);
        p.sport_id = sport;
        store.insert_policy(p).expect("insert fixture policy");
    }
    store
}

/// Store decorator that fails chosen operations and counts fetches.
pub struct FaultyStore {
    pub inner: InMemoryStore,
    pub fail_fetch: bool,
    pub fetches: AtomicUsize,
}

impl FaultyStore {
    pub fn failing_fetch(inner: InMemoryStore) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_fetch: true,
            fetches: AtomicUsize::new(0),
        })
    }
}

impl PolicyStore for FaultyStore {
    fn fetch_policies(&self, query: &PolicyQuery) -> Result<(Vec<Policy>, usize)> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(DoxError::Upstream("connection refused".to_string()));
        }
        self.inner.fetch_policies(query)
    }

    fn get_policy(&self, id: &str) -> Result<Option<Policy>> {
        self.inner.get_policy(id)
    }

    fn find_policy_by_number(&self, policy_number: &str) -> Result<Option<Policy>> {
        self.inner.find_policy_by_number(policy_number)
    }

    fn create_policy(&self, policy: Policy) -> Result<()> {
        self.inner.create_policy(policy)
    }

    fn update_policy(&self, policy: Policy) -> Result<()> {
        self.inner.update_policy(policy)
    }

    fn insert_policy_version(&self, version: PolicyVersion) -> Result<()> {
        self.inner.insert_policy_version(version)
    }

    fn policy_versions(&self, policy_id: &str, limit: usize) -> Result<Vec<PolicyVersion>> {
        self.inner.policy_versions(policy_id, limit)
    }

    fn list_sports(&self, active_only: bool) -> Result<Vec<Sport>> {
        self.inner.list_sports(active_only)
    }

    fn get_sport(&self, id: i64) -> Result<Option<Sport>> {
        self.inner.get_sport(id)
    }

    fn insert_manual(&self, manual: NewManual) -> Result<ManualDescriptor> {
        self.inner.insert_manual(manual)
    }

    fn insert_sections(&self, sections: &[ManualSection]) -> Result<()> {
        self.inner.insert_sections(sections)
    }

    fn mark_manual_complete(&self, manual_id: &str) -> Result<()> {
        self.inner.mark_manual_complete(manual_id)
    }

    fn get_manual(&self, id: &str) -> Result<Option<ManualDescriptor>> {
        self.inner.get_manual(id)
    }

    fn list_manuals(&self) -> Result<Vec<ManualDescriptor>> {
        self.inner.list_manuals()
    }

    fn manual_sections(&self, manual_id: &str) -> Result<Vec<ManualSection>> {
        self.inner.manual_sections(manual_id)
    }
}
