//! Manual registry writes.
//!
//! A generated manual is recorded in three steps: the descriptor is inserted
//! as `pending`, the section links are batch-inserted, and the descriptor is
//! flipped to `complete`. Readers only list complete descriptors, so a
//! manual's sections are visible exactly when the manual is.

use crate::error::Result;
use crate::store::PolicyStore;
use crate::types::{ManualSection, ManualStatus, NewManual, Policy};
use log::{info, warn};

/// Result of a registry write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryOutcome {
    pub manual_id: String,
    pub status: ManualStatus,
    pub sections_written: usize,
}

/// One section per policy, numbered from 1 in list order and titled with the
/// policy's category tag.
#[must_use]
pub fn sections_for(manual_id: &str, policies: &[Policy]) -> Vec<ManualSection> {
    policies
        .iter()
        .zip(1u32..)
        .map(|(policy, order)| ManualSection {
            manual_id: manual_id.to_string(),
            policy_id: policy.id.clone(),
            section_order: order,
            section_title: policy.category.as_str().to_string(),
        })
        .collect()
}

/// Writes manual descriptors and their section links.
pub struct RegistryWriter<'s> {
    store: &'s dyn PolicyStore,
}

impl<'s> RegistryWriter<'s> {
    #[must_use]
    pub fn new(store: &'s dyn PolicyStore) -> Self {
        Self { store }
    }

    /// Record `manual` with one section per policy.
    ///
    /// A failed section insert or completion flip is logged and reported as a
    /// `Pending` outcome; the descriptor stays hidden from readers.
    ///
    /// # Errors
    ///
    /// Returns the store's error only if the descriptor insert itself fails.
    pub fn record(&self, manual: NewManual, policies: &[Policy]) -> Result<RegistryOutcome> {
        let descriptor = self.store.insert_manual(manual)?;
        let sections = sections_for(&descriptor.id, policies);

        if let Err(e) = self.store.insert_sections(&sections) {
            warn!(
                "Manual {} left pending: failed to write {} section(s): {e}",
                descriptor.id,
                sections.len()
            );
            return Ok(RegistryOutcome {
                manual_id: descriptor.id,
                status: ManualStatus::Pending,
                sections_written: 0,
            });
        }

        if let Err(e) = self.store.mark_manual_complete(&descriptor.id) {
            warn!("Manual {} left pending: failed to mark complete: {e}", descriptor.id);
            return Ok(RegistryOutcome {
                manual_id: descriptor.id,
                status: ManualStatus::Pending,
                sections_written: sections.len(),
            });
        }

        info!(
            "Registered manual {} with {} section(s)",
            descriptor.id,
            sections.len()
        );
        Ok(RegistryOutcome {
            manual_id: descriptor.id,
            status: ManualStatus::Complete,
            sections_written: sections.len(),
        })
    }
}
