//! `manual://` resources: listing and text renditions of stored manuals and
//! templates.

use super::{ResourceContent, ResourceDescriptor};
use crate::assembly::MULTI_SPORT;
use crate::error::{DoxError, Result};
use crate::store::PolicyStore;
use crate::templates::{builtin_templates, stored_templates, ManualTemplate};
use crate::types::{ManualDescriptor, Policy, TemplateConfig};
use std::fmt::{self, Write as _};

pub const MANUAL_SCHEME: &str = "manual://";
const TEMPLATE_SEGMENT: &str = "template/";

/// Maximum number of generated manuals listed.
pub const RECENT_MANUAL_LIMIT: usize = 50;

/// Parsed `manual://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualUri {
    /// `manual://{id}`
    Manual(String),
    /// `manual://template/{id}`
    Template(String),
}

impl ManualUri {
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`] for another scheme or an empty id.
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = || DoxError::InvalidParams(format!("Invalid manual URI format: {uri}"));
        let rest = uri.strip_prefix(MANUAL_SCHEME).ok_or_else(invalid)?;
        let parsed = match rest.strip_prefix(TEMPLATE_SEGMENT) {
            Some(id) => Self::Template(id.to_string()),
            None => Self::Manual(rest.to_string()),
        };
        if parsed.id().is_empty() {
            return Err(invalid());
        }
        Ok(parsed)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Manual(id) | Self::Template(id) => id,
        }
    }
}

impl fmt::Display for ManualUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual(id) => write!(f, "{MANUAL_SCHEME}{id}"),
            Self::Template(id) => write!(f, "{MANUAL_SCHEME}{TEMPLATE_SEGMENT}{id}"),
        }
    }
}

/// Recent complete manuals, newest first, then stored templates by title.
///
/// # Errors
///
/// Propagates store failures.
pub fn list_manual_resources(store: &dyn PolicyStore) -> Result<Vec<ResourceDescriptor>> {
    let mut manuals: Vec<ManualDescriptor> = store
        .list_manuals()?
        .into_iter()
        .filter(|m| !m.is_template && m.is_visible())
        .collect();
    manuals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    manuals.truncate(RECENT_MANUAL_LIMIT);

    let mut resources: Vec<ResourceDescriptor> = manuals
        .into_iter()
        .map(|m| {
            let description = m.description.unwrap_or_else(|| {
                format!("Manual created on {}", m.created_at.format("%-m/%-d/%Y"))
            });
            ResourceDescriptor::text(ManualUri::Manual(m.id).to_string(), m.title, description)
        })
        .collect();

    resources.extend(stored_templates(store)?.into_iter().map(|t| {
        ResourceDescriptor::text(
            ManualUri::Template(t.id).to_string(),
            format!("Template: {}", t.title),
            t.description
                .unwrap_or_else(|| "Manual template".to_string()),
        )
    }));

    Ok(resources)
}

/// Read a manual or template resource.
///
/// # Errors
///
/// Returns [`DoxError::NotFound`] for unknown or pending manuals and unknown
/// templates, plus store failures.
pub fn read_manual_resource(store: &dyn PolicyStore, uri: &ManualUri) -> Result<ResourceContent> {
    let text = match uri {
        ManualUri::Manual(id) => read_manual(store, id)?,
        ManualUri::Template(id) => format_template(&find_template(store, id)?),
    };
    Ok(ResourceContent::text(uri.to_string(), text))
}

fn find_template(store: &dyn PolicyStore, id: &str) -> Result<ManualTemplate> {
    if let Some(template) = builtin_templates().into_iter().find(|t| t.id == id) {
        return Ok(template);
    }
    stored_templates(store)?
        .into_iter()
        .find(|t| t.id == id)
        .map(ManualTemplate::from)
        .ok_or_else(|| DoxError::not_found("Template", id))
}

fn read_manual(store: &dyn PolicyStore, id: &str) -> Result<String> {
    let manual = store
        .get_manual(id)?
        .filter(|m| !m.is_template && m.is_visible())
        .ok_or_else(|| DoxError::not_found("Manual", id))?;

    let sport_name = match manual.sport_id {
        Some(sport_id) => store.get_sport(sport_id)?.map(|s| s.name),
        None => None,
    };

    // sections keyed by title in first-seen order
    let mut sections: Vec<(String, Vec<Policy>)> = Vec::new();
    for section in store.manual_sections(id)? {
        let Some(policy) = store.get_policy(&section.policy_id)? else {
            continue;
        };
        let title = if section.section_title.is_empty() {
            policy.category.as_str().to_string()
        } else {
            section.section_title
        };
        match sections.iter_mut().find(|(t, _)| *t == title) {
            Some((_, policies)) => policies.push(policy),
            None => sections.push((title, vec![policy])),
        }
    }

    Ok(format_manual(&manual, sport_name.as_deref(), &sections))
}

/// Markdown rendition of a stored manual.
#[must_use]
pub fn format_manual(
    manual: &ManualDescriptor,
    sport_name: Option<&str>,
    sections: &[(String, Vec<Policy>)],
) -> String {
    let total: usize = sections.iter().map(|(_, p)| p.len()).sum();
    let mut out = String::new();

    let _ = write!(
        out,
        "# {}\n\n**Sport:** {}  \n**Created:** {}  \n**Total Policies:** {}\n\n",
        manual.title,
        sport_name.unwrap_or(MULTI_SPORT),
        manual.created_at.format("%-m/%-d/%Y"),
        total
    );
    let _ = write!(
        out,
        "## Description\n{}\n\n## Table of Contents\n",
        manual
            .description
            .as_deref()
            .unwrap_or("No description available")
    );
    for (i, (title, policies)) in sections.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({} policies)", i + 1, title, policies.len());
    }
    out.push_str("\n---\n\n");

    for (title, policies) in sections {
        let _ = write!(out, "## {title}\n\n");
        for policy in policies {
            let _ = write!(
                out,
                "### {}\n**Policy Number:** {}\n\n{}\n\n#### Content\n{}\n\n---\n\n",
                policy.title,
                policy.policy_number,
                policy.summary.as_deref().unwrap_or("No summary available"),
                policy.content_text
            );
        }
    }
    out
}

/// Markdown description of a template and its configuration.
#[must_use]
pub fn format_template(template: &ManualTemplate) -> String {
    let config = serde_json::to_string_pretty(&template.template_config)
        .unwrap_or_else(|_| String::from("{}"));
    format!(
        "# Manual Template: {title}\n\n\
         ## Description\n{description}\n\n\
         ## Template Configuration\n```json\n{config}\n```\n\n\
         ## Usage\n\
         This template can be used when generating manuals to apply consistent formatting and structure.\n\n\
         ### Configuration Options:\n{options}\n\n\
         ---\n*Template ID: {id}*",
        title = template.title,
        description = template
            .description
            .as_deref()
            .unwrap_or("No description available"),
        options = format_template_options(&template.template_config),
        id = template.id,
    )
}

fn format_template_options(config: &TemplateConfig) -> String {
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    let mut options = String::new();
    if let Some(toc) = config.include_toc {
        let _ = writeln!(options, "- **Include Table of Contents:** {}", yes_no(toc));
    }
    if let Some(index) = config.include_index {
        let _ = writeln!(options, "- **Include Index:** {}", yes_no(index));
    }
    if let Some(style) = &config.style {
        let _ = writeln!(options, "- **Style:** {style}");
    }
    if let Some(categories) = &config.categories {
        let tags: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        let _ = writeln!(options, "- **Default Categories:** {}", tags.join(", "));
    }
    if options.is_empty() {
        String::from("Standard configuration")
    } else {
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PolicyCategory, PolicyNumber};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_uris() {
        assert_eq!(
            ManualUri::parse("manual://abc").unwrap(),
            ManualUri::Manual("abc".to_string())
        );
        assert_eq!(
            ManualUri::parse("manual://template/default").unwrap(),
            ManualUri::Template("default".to_string())
        );
        assert_eq!(
            ManualUri::parse("manual://template/x").unwrap().to_string(),
            "manual://template/x"
        );
    }

    #[test]
    fn test_malformed_uris() {
        for uri in ["manual://", "manual://template/", "policy://1", "MANUAL://abc", ""] {
            let err = ManualUri::parse(uri).unwrap_err();
            assert!(matches!(err, DoxError::InvalidParams(_)), "{uri}");
        }
    }

    #[test]
    fn test_format_manual() {
        let manual = ManualDescriptor {
            id: "m1".to_string(),
            title: "Baseball Manual".to_string(),
            description: None,
            sport_id: None,
            is_template: false,
            template_config: TemplateConfig::default(),
            status: crate::types::ManualStatus::Complete,
            created_at: Utc.with_ymd_and_hms(2026, 2, 3, 0, 0, 0).unwrap(),
        };
        let policy = Policy::new(
            "p1",
            PolicyNumber::parse("BSB-OFF-001").unwrap(),
            "Umpires",
            PolicyCategory::Officiating,
            "Umpires report early.",
        );
        let text = format_manual(
            &manual,
            None,
            &[("officiating".to_string(), vec![policy])],
        );
        assert!(text.starts_with("# Baseball Manual\n"));
        assert!(text.contains("**Sport:** Multi-Sport"));
        assert!(text.contains("**Created:** 2/3/2026"));
        assert!(text.contains("No description available"));
        assert!(text.contains("1. officiating (1 policies)"));
        assert!(text.contains("**Policy Number:** BSB-OFF-001"));
        assert!(text.contains("No summary available"));
        assert!(text.contains("#### Content\nUmpires report early."));
    }

    #[test]
    fn test_format_template() {
        let template = builtin_templates().remove(1);
        let text = format_template(&template);
        assert!(text.starts_with("# Manual Template: Compact Manual"));
        assert!(text.contains("- **Include Table of Contents:** No"));
        assert!(text.contains("- **Style:** compact"));
        assert!(text.contains("\"include_toc\": false"));
        assert!(text.ends_with("*Template ID: compact*"));
    }
}
