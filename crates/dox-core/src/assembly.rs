//! Manual assembly: selection, grouping, estimation, rendering and
//! registration.

use crate::error::{DoxError, Result};
use crate::estimate::PageEstimate;
use crate::grouping::CategoryGroups;
use crate::registry::RegistryWriter;
use crate::render::{Branding, ManualMetadata, ManualRenderer, PageSize, RenderOptions, RenderRequest};
use crate::store::{PolicyQuery, PolicyStore, SportFilter};
use crate::templates::resolve_template;
use crate::types::{
    ManualSelection, ManualStatus, NewManual, OutputFormat, Policy, PolicyCategory, PolicyNumber,
    TemplateConfig,
};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use std::sync::Arc;

/// Sport label used when a manual is not narrowed to one sport.
pub const MULTI_SPORT: &str = "Multi-Sport";

/// Policy line of a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewPolicy {
    pub policy_number: PolicyNumber,
    pub title: String,
    pub summary: Option<String>,
}

/// One category of a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSection {
    pub category: PolicyCategory,
    pub policy_count: usize,
    pub policies: Vec<PreviewPolicy>,
}

/// Structure of a manual without the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualPreview {
    pub metadata: ManualMetadata,
    pub structure: Vec<PreviewSection>,
}

impl ManualPreview {
    fn new(metadata: ManualMetadata, groups: &CategoryGroups<'_>) -> Self {
        let structure = groups
            .iter()
            .map(|group| PreviewSection {
                category: group.category,
                policy_count: group.len(),
                policies: group
                    .policies
                    .iter()
                    .map(|p| PreviewPolicy {
                        policy_number: p.policy_number.clone(),
                        title: p.title.clone(),
                        summary: p.summary.clone(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            metadata,
            structure,
        }
    }
}

/// A rendered and registered manual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedManual {
    pub manual_id: String,
    pub title: String,
    pub document_size_bytes: usize,
    pub page_count: usize,
    pub policy_count: usize,
    pub categories: Vec<PolicyCategory>,
    /// `complete` once the section links are stored, `pending` otherwise.
    pub registry_status: ManualStatus,
    pub message: String,
    #[serde(skip)]
    pub document: Vec<u8>,
}

/// Result of [`ManualService::generate_manual`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ManualOutcome {
    Generated(GeneratedManual),
    Preview(ManualPreview),
}

impl ManualOutcome {
    #[must_use]
    pub fn policy_count(&self) -> usize {
        match self {
            Self::Generated(m) => m.policy_count,
            Self::Preview(p) => p.metadata.total_policies,
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[PolicyCategory] {
        match self {
            Self::Generated(m) => &m.categories,
            Self::Preview(p) => &p.metadata.categories,
        }
    }
}

/// Store predicate for a selection.
///
/// Explicit policy ids override the sport and category filters. A sport
/// filter also admits multi-sport policies.
#[must_use]
pub fn policy_query(selection: &ManualSelection) -> PolicyQuery {
    let mut query = PolicyQuery::current();
    if let Some(ids) = selection.explicit_policy_ids() {
        return query.with_ids(ids.to_vec());
    }

    if let Some(sport_id) = selection.sport_id {
        query = query.with_sport(SportFilter::OrMultiSport(sport_id));
    }
    if let Some(categories) = selection.categories.as_ref().filter(|c| !c.is_empty()) {
        query = query.with_categories(categories.clone());
    }
    query
}

/// Assembles manuals from an injected [`PolicyStore`].
pub struct ManualService {
    store: Arc<dyn PolicyStore>,
    renderer: ManualRenderer,
    branding: Branding,
    page_size: PageSize,
}

impl ManualService {
    #[must_use]
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self {
            store,
            renderer: ManualRenderer::new(),
            branding: Branding::default(),
            page_size: PageSize::default(),
        }
    }

    #[must_use]
    pub fn with_branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &dyn PolicyStore {
        self.store.as_ref()
    }

    /// Assemble a manual in the selection's output format.
    ///
    /// # Errors
    ///
    /// - [`DoxError::InvalidParams`] for a blank title
    /// - [`DoxError::NotFound`] for an unknown template or sport
    /// - [`DoxError::EmptySelection`] when no policy matches
    /// - store and render failures
    pub fn generate_manual(&self, selection: &ManualSelection) -> Result<ManualOutcome> {
        self.generate_manual_at(selection, Utc::now())
    }

    /// [`ManualService::generate_manual`] with format forced to preview.
    ///
    /// # Errors
    ///
    /// Same as [`ManualService::generate_manual`].
    pub fn preview_manual(&self, selection: &ManualSelection) -> Result<ManualPreview> {
        let selection = selection.clone().with_format(OutputFormat::Preview);
        match self.generate_manual(&selection)? {
            ManualOutcome::Preview(preview) => Ok(preview),
            ManualOutcome::Generated(_) => Err(DoxError::InvalidParams(
                "preview requested but a document was generated".to_string(),
            )),
        }
    }

    /// [`ManualService::generate_manual`] with a fixed generation time.
    ///
    /// # Errors
    ///
    /// Same as [`ManualService::generate_manual`].
    pub fn generate_manual_at(
        &self,
        selection: &ManualSelection,
        generated_at: DateTime<Utc>,
    ) -> Result<ManualOutcome> {
        selection.validate()?;

        let template = selection
            .template
            .as_deref()
            .map(|name| resolve_template(self.store(), name))
            .transpose()?;
        let (include_toc, include_index) = selection.resolve_flags(template.as_ref());

        let (policies, _) = self.store.fetch_policies(&policy_query(selection))?;
        if policies.is_empty() {
            return Err(DoxError::EmptySelection);
        }
        debug!(
            "Selection '{}' matched {} policies",
            selection.title,
            policies.len()
        );

        let groups = CategoryGroups::build(&policies);
        let metadata = ManualMetadata {
            title: selection.title.clone(),
            generated_at,
            total_policies: policies.len(),
            categories: groups.categories(),
            sport: self.sport_name(selection.sport_id)?,
        };

        match selection.format {
            OutputFormat::Preview => Ok(ManualOutcome::Preview(ManualPreview::new(
                metadata, &groups,
            ))),
            OutputFormat::Pdf => self
                .render_and_register(selection, &policies, &groups, metadata, include_toc, include_index)
                .map(ManualOutcome::Generated),
        }
    }

    fn render_and_register(
        &self,
        selection: &ManualSelection,
        policies: &[Policy],
        groups: &CategoryGroups<'_>,
        metadata: ManualMetadata,
        include_toc: bool,
        include_index: bool,
    ) -> Result<GeneratedManual> {
        let estimate = PageEstimate::from_groups(groups, include_toc, include_index);
        let options = RenderOptions {
            include_toc,
            include_index,
            template: selection.template.clone(),
            page_size: self.page_size,
            branding: self.branding.clone(),
        };
        let rendered = self.renderer.render(&RenderRequest {
            metadata: &metadata,
            groups,
            estimate: &estimate,
            options: &options,
        })?;

        let registry = RegistryWriter::new(self.store()).record(
            NewManual {
                title: selection.title.clone(),
                description: Some(format!(
                    "Generated manual containing {} policies",
                    policies.len()
                )),
                sport_id: selection.sport_id,
                is_template: false,
                template_config: TemplateConfig::from_selection(selection, include_toc, include_index),
            },
            policies,
        )?;

        info!(
            "Generated manual '{}' ({}): {} policies in {} categories, {} pages, {} bytes",
            selection.title,
            registry.manual_id,
            policies.len(),
            groups.len(),
            rendered.page_count(),
            rendered.bytes.len()
        );

        Ok(GeneratedManual {
            manual_id: registry.manual_id,
            title: selection.title.clone(),
            document_size_bytes: rendered.bytes.len(),
            page_count: rendered.page_count(),
            policy_count: policies.len(),
            categories: metadata.categories,
            registry_status: registry.status,
            message: "Manual generated successfully".to_string(),
            document: rendered.bytes,
        })
    }

    fn sport_name(&self, sport_id: Option<i64>) -> Result<String> {
        let Some(id) = sport_id else {
            return Ok(MULTI_SPORT.to_string());
        };
        self.store
            .get_sport(id)?
            .map(|sport| sport.name)
            .ok_or_else(|| DoxError::not_found("Sport", id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use crate::types::{PolicyNumber, Sport};
    use chrono::TimeZone;

    fn store() -> Arc<InMemoryStore> {
        let store = InMemoryStore::new();
        store.insert_sport(Sport::new(1, "Baseball", "BSB")).unwrap();
        for (id, number, category, sport) in [
            ("p1", "BSB-OFF-001", PolicyCategory::Officiating, Some(1)),
            ("p2", "GEN-GOV-001", PolicyCategory::Governance, None),
            ("p3", "FB-OFF-001", PolicyCategory::Officiating, Some(2)),
        ] {
            let mut policy = Policy::new(
                id,
                PolicyNumber::parse(number).unwrap(),
                format!("Policy {id}"),
                category,
                "content",
            );
            policy.sport_id = sport;
            store.insert_policy(policy).unwrap();
        }
        Arc::new(store)
    }

    #[test]
    fn test_policy_query_ids_override_filters() {
        let selection = ManualSelection::new("T")
            .with_sport(1)
            .with_categories([PolicyCategory::Officiating])
            .with_policy_ids(["p2"]);
        let query = policy_query(&selection);
        assert_eq!(query.ids, Some(vec!["p2".to_string()]));
        assert!(query.sport.is_none());
        assert!(query.categories.is_none());
    }

    #[test]
    fn test_preview_groups_and_names_sport() {
        let service = ManualService::new(store());
        let preview = service
            .preview_manual(&ManualSelection::new("Baseball").with_sport(1))
            .unwrap();
        assert_eq!(preview.metadata.sport, "Baseball");
        assert_eq!(preview.metadata.total_policies, 2);
        // BSB-OFF-001 sorts before GEN-GOV-001
        assert_eq!(
            preview.metadata.categories,
            vec![PolicyCategory::Officiating, PolicyCategory::Governance]
        );
        assert_eq!(preview.structure[0].policies[0].title, "Policy p1");
    }

    #[test]
    fn test_unknown_sport_is_not_found() {
        let service = ManualService::new(store());
        let err = service
            .preview_manual(&ManualSelection::new("T").with_sport(99))
            .unwrap_err();
        assert_eq!(err.to_string(), "Sport not found: 99");
    }

    #[test]
    fn test_empty_selection() {
        let service = ManualService::new(store());
        let err = service
            .generate_manual(&ManualSelection::new("T").with_categories([PolicyCategory::Eligibility]))
            .unwrap_err();
        assert!(matches!(err, DoxError::EmptySelection));
    }

    #[test]
    fn test_unknown_template_is_not_found() {
        let service = ManualService::new(store());
        let err = service
            .generate_manual(&ManualSelection::new("T").with_template("glossy"))
            .unwrap_err();
        assert!(matches!(err, DoxError::NotFound { kind: "Template", .. }));
    }

    #[test]
    fn test_generate_records_template_config() {
        let store = store();
        let service = ManualService::new(store.clone());
        let at = Utc.with_ymd_and_hms(2026, 5, 4, 10, 0, 0).unwrap();
        let outcome = service
            .generate_manual_at(&ManualSelection::new("Compact").with_template("compact"), at)
            .unwrap();
        let ManualOutcome::Generated(manual) = outcome else {
            panic!("expected a generated manual");
        };
        assert_eq!(manual.registry_status, ManualStatus::Complete);
        assert_eq!(manual.policy_count, 3);
        assert_eq!(manual.document_size_bytes, manual.document.len());

        let stored = store.get_manual(&manual.manual_id).unwrap().unwrap();
        assert_eq!(stored.template_config.include_toc, Some(false));
        assert_eq!(stored.template_config.include_index, Some(false));
        assert_eq!(stored.template_config.template.as_deref(), Some("compact"));
        assert_eq!(
            stored.description.as_deref(),
            Some("Generated manual containing 3 policies")
        );
    }

    #[test]
    fn test_generated_serializes_without_document() {
        let service = ManualService::new(store());
        let outcome = service.generate_manual(&ManualSelection::new("All")).unwrap();
        let value = serde_json::to_value(&outcome).unwrap();
        assert!(value.get("document").is_none());
        assert_eq!(value["registry_status"], "complete");
        assert_eq!(value["message"], "Manual generated successfully");
    }
}
