//! Built-in and stored manual templates.

use crate::error::{DoxError, Result};
use crate::store::PolicyStore;
use crate::types::{ManualDescriptor, TemplateConfig};
use serde::{Deserialize, Serialize};

/// A named, reusable manual configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualTemplate {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub template_config: TemplateConfig,
}

impl From<ManualDescriptor> for ManualTemplate {
    fn from(descriptor: ManualDescriptor) -> Self {
        Self {
            id: descriptor.id,
            title: descriptor.title,
            description: descriptor.description,
            template_config: descriptor.template_config,
        }
    }
}

fn builtin(
    id: &str,
    title: &str,
    description: &str,
    toc: bool,
    index: bool,
    appendices: bool,
    style: &str,
) -> ManualTemplate {
    ManualTemplate {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        template_config: TemplateConfig {
            include_toc: Some(toc),
            include_index: Some(index),
            include_appendices: appendices.then_some(true),
            style: Some(style.to_string()),
            ..TemplateConfig::default()
        },
    }
}

/// The templates every deployment offers.
#[must_use]
pub fn builtin_templates() -> Vec<ManualTemplate> {
    vec![
        builtin(
            "default",
            "Standard Manual",
            "Standard Big 12 manual format with TOC and index",
            true,
            true,
            false,
            "standard",
        ),
        builtin(
            "compact",
            "Compact Manual",
            "Condensed format without TOC or index",
            false,
            false,
            false,
            "compact",
        ),
        builtin(
            "detailed",
            "Detailed Manual",
            "Comprehensive format with all sections and appendices",
            true,
            true,
            true,
            "detailed",
        ),
    ]
}

/// Visible stored template descriptors ordered by title.
///
/// # Errors
///
/// Propagates store failures.
pub fn stored_templates(store: &dyn PolicyStore) -> Result<Vec<ManualDescriptor>> {
    let mut templates: Vec<ManualDescriptor> = store
        .list_manuals()?
        .into_iter()
        .filter(|m| m.is_template && m.is_visible())
        .collect();
    templates.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(templates)
}

/// Built-ins followed by stored templates.
///
/// # Errors
///
/// Propagates store failures.
pub fn all_templates(store: &dyn PolicyStore) -> Result<Vec<ManualTemplate>> {
    let mut templates = builtin_templates();
    templates.extend(stored_templates(store)?.into_iter().map(ManualTemplate::from));
    Ok(templates)
}

/// Configuration of the template named `name`, matched by id among the
/// built-ins and then by id or title among stored templates.
///
/// # Errors
///
/// Returns [`DoxError::NotFound`] if nothing matches.
pub fn resolve_template(store: &dyn PolicyStore, name: &str) -> Result<TemplateConfig> {
    if let Some(template) = builtin_templates().into_iter().find(|t| t.id == name) {
        return Ok(template.template_config);
    }
    stored_templates(store)?
        .into_iter()
        .find(|t| t.id == name || t.title == name)
        .map(|t| t.template_config)
        .ok_or_else(|| DoxError::not_found("Template", name))
}
