//! In-process [`PolicyStore`] backed by `RwLock`-guarded collections.

use super::{PolicyQuery, PolicyStore};
use crate::error::{DoxError, Result};
use crate::types::{
    ManualDescriptor, ManualSection, ManualStatus, NewManual, Policy, PolicyVersion, Sport,
};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// JSON seed document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSeed {
    pub sports: Vec<Sport>,
    pub policies: Vec<Policy>,
    pub manuals: Vec<ManualDescriptor>,
    pub sections: Vec<ManualSection>,
    pub policy_versions: Vec<PolicyVersion>,
}

#[derive(Debug, Default)]
struct Tables {
    sports: Vec<Sport>,
    policies: Vec<Policy>,
    manuals: Vec<ManualDescriptor>,
    sections: Vec<ManualSection>,
    versions: Vec<PolicyVersion>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    fail_section_writes: AtomicBool,
}

impl InMemoryStore {
    #[inline]
    #[must_use = "creates an empty store"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a seed, enforcing unique policy numbers.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] on a duplicate policy number.
    pub fn from_seed(seed: StoreSeed) -> Result<Self> {
        let store = Self::new();
        {
            let mut tables = store.write()?;
            tables.sports = seed.sports;
            tables.manuals = seed.manuals;
            tables.sections = seed.sections;
            tables.versions = seed.policy_versions;
        }
        for policy in seed.policies {
            store.insert_policy(policy)?;
        }
        Ok(store)
    }

    /// Parse a JSON seed string.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::Json`] on malformed JSON and the errors of
    /// [`InMemoryStore::from_seed`].
    pub fn from_seed_json(json: &str) -> Result<Self> {
        let seed: StoreSeed = serde_json::from_str(json)?;
        Self::from_seed(seed)
    }

    /// Load a JSON seed file.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::Io`] if the file cannot be read, plus the errors of
    /// [`InMemoryStore::from_seed_json`].
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_seed_json(&json)?;
        if let Ok(tables) = store.read() {
            info!(
                "Loaded seed {}: {} sports, {} policies, {} manuals",
                path.display(),
                tables.sports.len(),
                tables.policies.len(),
                tables.manuals.len()
            );
        }
        Ok(store)
    }

    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] if the policy number is taken.
    pub fn insert_policy(&self, policy: Policy) -> Result<()> {
        let mut tables = self.write()?;
        if tables
            .policies
            .iter()
            .any(|p| p.policy_number == policy.policy_number)
        {
            return Err(DoxError::InvalidParams(format!(
                "Duplicate policy number: {}",
                policy.policy_number
            )));
        }
        tables.policies.push(policy);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`DoxError::Upstream`] if the lock is poisoned.
    pub fn insert_sport(&self, sport: Sport) -> Result<()> {
        self.write()?.sports.push(sport);
        Ok(())
    }

    /// Make subsequent `insert_sections` calls fail with an upstream error.
    pub fn fail_section_writes(&self, fail: bool) {
        self.fail_section_writes.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| DoxError::Upstream("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| DoxError::Upstream("store lock poisoned".to_string()))
    }
}

impl PolicyStore for InMemoryStore {
    fn fetch_policies(&self, query: &PolicyQuery) -> Result<(Vec<Policy>, usize)> {
        let tables = self.read()?;
        let mut matched: Vec<Policy> = tables
            .policies
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();

        matched.sort_by(|a, b| query.order.compare(a, b));

        let total = matched.len();
        if let Some(range) = query.range {
            matched = matched
                .into_iter()
                .skip(range.offset)
                .take(range.limit)
                .collect();
        }
        debug!("fetch_policies matched {total}, returning {}", matched.len());
        Ok((matched, total))
    }

    fn get_policy(&self, id: &str) -> Result<Option<Policy>> {
        Ok(self.read()?.policies.iter().find(|p| p.id == id).cloned())
    }

    fn find_policy_by_number(&self, policy_number: &str) -> Result<Option<Policy>> {
        Ok(self
            .read()?
            .policies
            .iter()
            .find(|p| p.policy_number.as_str() == policy_number)
            .cloned())
    }

    fn create_policy(&self, policy: Policy) -> Result<()> {
        self.insert_policy(policy)
    }

    fn update_policy(&self, policy: Policy) -> Result<()> {
        let mut tables = self.write()?;
        if tables
            .policies
            .iter()
            .any(|p| p.policy_number == policy.policy_number && p.id != policy.id)
        {
            return Err(DoxError::InvalidParams(format!(
                "Duplicate policy number: {}",
                policy.policy_number
            )));
        }
        let slot = tables
            .policies
            .iter_mut()
            .find(|p| p.id == policy.id)
            .ok_or_else(|| DoxError::not_found("Policy", policy.id.as_str()))?;
        *slot = policy;
        Ok(())
    }

    fn insert_policy_version(&self, version: PolicyVersion) -> Result<()> {
        self.write()?.versions.push(version);
        Ok(())
    }

    fn policy_versions(&self, policy_id: &str, limit: usize) -> Result<Vec<PolicyVersion>> {
        let tables = self.read()?;
        // insertion order breaks timestamp ties, later wins
        let mut versions: Vec<(usize, &PolicyVersion)> = tables
            .versions
            .iter()
            .enumerate()
            .filter(|(_, v)| v.policy_id == policy_id)
            .collect();
        versions.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        Ok(versions
            .into_iter()
            .take(limit)
            .map(|(_, v)| v.clone())
            .collect())
    }

    fn list_sports(&self, active_only: bool) -> Result<Vec<Sport>> {
        let mut sports: Vec<Sport> = self
            .read()?
            .sports
            .iter()
            .filter(|s| !active_only || s.active)
            .cloned()
            .collect();
        sports.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sports)
    }

    fn get_sport(&self, id: i64) -> Result<Option<Sport>> {
        Ok(self.read()?.sports.iter().find(|s| s.id == id).cloned())
    }

    fn insert_manual(&self, manual: NewManual) -> Result<ManualDescriptor> {
        let descriptor = ManualDescriptor {
            id: Uuid::new_v4().to_string(),
            title: manual.title,
            description: manual.description,
            sport_id: manual.sport_id,
            is_template: manual.is_template,
            template_config: manual.template_config,
            status: ManualStatus::Pending,
            created_at: Utc::now(),
        };
        self.write()?.manuals.push(descriptor.clone());
        Ok(descriptor)
    }

    fn insert_sections(&self, sections: &[ManualSection]) -> Result<()> {
        if self.fail_section_writes.load(Ordering::SeqCst) {
            return Err(DoxError::Upstream(
                "section insert rejected by store".to_string(),
            ));
        }
        let mut tables = self.write()?;
        let known: HashSet<&str> = tables.manuals.iter().map(|m| m.id.as_str()).collect();
        if let Some(orphan) = sections.iter().find(|s| !known.contains(s.manual_id.as_str())) {
            return Err(DoxError::Upstream(format!(
                "section references unknown manual {}",
                orphan.manual_id
            )));
        }
        tables.sections.extend_from_slice(sections);
        Ok(())
    }

    fn mark_manual_complete(&self, manual_id: &str) -> Result<()> {
        let mut tables = self.write()?;
        let manual = tables
            .manuals
            .iter_mut()
            .find(|m| m.id == manual_id)
            .ok_or_else(|| DoxError::not_found("Manual", manual_id))?;
        manual.status = ManualStatus::Complete;
        Ok(())
    }

    fn get_manual(&self, id: &str) -> Result<Option<ManualDescriptor>> {
        Ok(self.read()?.manuals.iter().find(|m| m.id == id).cloned())
    }

    fn list_manuals(&self) -> Result<Vec<ManualDescriptor>> {
        Ok(self.read()?.manuals.clone())
    }

    fn manual_sections(&self, manual_id: &str) -> Result<Vec<ManualSection>> {
        let mut sections: Vec<ManualSection> = self
            .read()?
            .sections
            .iter()
            .filter(|s| s.manual_id == manual_id)
            .cloned()
            .collect();
        sections.sort_by_key(|s| s.section_order);
        Ok(sections)
    }
}
