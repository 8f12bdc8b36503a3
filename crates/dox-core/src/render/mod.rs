//! Manual rendering.
//!
//! A manual is laid out as a cover page, an optional table of contents, one
//! body section per category group and an optional alphabetical index. Pages
//! are composed in points on a fixed geometry, then serialized as PDF with
//! `lopdf`.
//!
//! Rendering is pure: the same request always produces the same bytes.

mod compose;
pub mod index;
mod pdf;
pub mod text;

pub use index::{index_buckets, IndexBucket};

use crate::error::Result;
use crate::estimate::PageEstimate;
use crate::grouping::CategoryGroups;
use crate::types::PolicyCategory;
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

/// Physical page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// `(width, height)` in points.
    #[must_use]
    pub const fn dimensions(self) -> (f32, f32) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::A4 => (595.0, 842.0),
        }
    }
}

/// Organization lines printed on the cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub organization: String,
    pub manual_kind: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            organization: String::from("Big 12 Conference"),
            manual_kind: String::from("Administrative Manual"),
        }
    }
}

/// Layout switches for one render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub include_toc: bool,
    pub include_index: bool,
    /// Template id, recorded as the document subject.
    pub template: Option<String>,
    pub page_size: PageSize,
    pub branding: Branding,
}

/// Descriptive summary of an assembled manual.
///
/// Shared verbatim by the rendered cover and the preview response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualMetadata {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub total_policies: usize,
    /// Categories in group order.
    pub categories: Vec<PolicyCategory>,
    /// Sport name, or `"Multi-Sport"` when no sport filter applies.
    pub sport: String,
}

/// Everything needed to lay out one manual.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub metadata: &'a ManualMetadata,
    pub groups: &'a CategoryGroups<'a>,
    pub estimate: &'a PageEstimate,
    pub options: &'a RenderOptions,
}

/// What a rendered page holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRole {
    Cover,
    Toc,
    Body(PolicyCategory),
    Index,
}

/// A rendered document and the role of each of its pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedManual {
    pub bytes: Vec<u8>,
    pub pages: Vec<PageRole>,
}

impl RenderedManual {
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based page numbers where each body section begins.
    #[must_use]
    pub fn section_starts(&self) -> Vec<(PolicyCategory, usize)> {
        let mut starts: Vec<(PolicyCategory, usize)> = Vec::new();
        for (i, role) in self.pages.iter().enumerate() {
            if let PageRole::Body(category) = role {
                if starts.last().map(|&(c, _)| c) != Some(*category) {
                    starts.push((*category, i + 1));
                }
            }
        }
        starts
    }
}

/// PDF manual renderer.
#[derive(Debug, Clone)]
pub struct ManualRenderer {
    producer: String,
}

impl Default for ManualRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            producer: format!("dox-core {}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Lay out and serialize the manual.
    ///
    /// Callers must reject empty selections beforehand; an empty group list
    /// renders a cover with nothing behind it.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::Render`](crate::DoxError::Render) if the PDF
    /// writer fails.
    pub fn render(&self, request: &RenderRequest<'_>) -> Result<RenderedManual> {
        let geometry = compose::PageGeometry::from(request.options.page_size);
        let pages = compose::compose(request, geometry);
        let roles: Vec<PageRole> = pages.iter().map(|p| p.role).collect();

        let info = pdf::DocumentInfo {
            title: &request.metadata.title,
            subject: request
                .options
                .template
                .as_deref()
                .unwrap_or(&request.options.branding.manual_kind),
            producer: &self.producer,
            created: request.metadata.generated_at,
        };
        let bytes = pdf::write_pdf(&pages, geometry, &info)?;

        debug!(
            "Rendered '{}': {} page(s), {} bytes",
            request.metadata.title,
            roles.len(),
            bytes.len()
        );

        Ok(RenderedManual {
            bytes,
            pages: roles,
        })
    }
}
