//! # dox-core
//!
//! Policy manual assembly for a sports-governance policy repository.
//!
//! A [`ManualSelection`] picks policies from a [`PolicyStore`]; the policies
//! are grouped by category ([`CategoryGroups`]), the table of contents page
//! numbers are estimated ([`PageEstimate`]), and the manual is rendered to PDF
//! ([`ManualRenderer`]) and recorded in the manual registry
//! ([`RegistryWriter`]). [`ManualService`] runs the whole pipeline.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use dox_core::{
//!     InMemoryStore, ManualOutcome, ManualSelection, ManualService, Policy, PolicyCategory,
//!     PolicyNumber,
//! };
//!
//! let store = InMemoryStore::new();
//! store.insert_policy(Policy::new(
//!     "p1",
//!     PolicyNumber::parse("BSB-OFF-001")?,
//!     "Umpire Assignments",
//!     PolicyCategory::Officiating,
//!     "Umpires are assigned by the conference office.",
//! ))?;
//!
//! let service = ManualService::new(Arc::new(store));
//! let selection = ManualSelection::new("Officiating Manual")
//!     .with_categories([PolicyCategory::Officiating]);
//!
//! if let ManualOutcome::Generated(manual) = service.generate_manual(&selection)? {
//!     assert!(manual.document.starts_with(b"%PDF"));
//!     assert_eq!(manual.policy_count, 1);
//! }
//! # Ok::<(), dox_core::DoxError>(())
//! ```

pub mod assembly;
pub mod catalog;
pub mod config;
pub mod error;
pub mod estimate;
pub mod grouping;
pub mod policies;
pub mod registry;
pub mod render;
pub mod resources;
pub mod store;
pub mod templates;
pub mod types;

pub use assembly::{
    policy_query, GeneratedManual, ManualOutcome, ManualPreview, ManualService, PreviewPolicy,
    PreviewSection, MULTI_SPORT,
};
pub use catalog::{
    find_sport_by_abbreviation, get_policy, list_categories, list_sports, CategoryInfo,
    PolicyDetail, PolicyLookup,
};
pub use config::{DoxConfig, Settings};
pub use error::{DoxError, Result, RPC_INTERNAL_ERROR, RPC_INVALID_PARAMS};
pub use estimate::PageEstimate;
pub use grouping::{CategoryGroup, CategoryGroups};
pub use registry::{RegistryOutcome, RegistryWriter};
pub use render::{
    index_buckets, Branding, IndexBucket, ManualMetadata, ManualRenderer, PageRole, PageSize,
    RenderOptions, RenderRequest, RenderedManual,
};
pub use policies::{
    approve_policy, archive_policy, create_policy, get_policy_history, list_policies, list_tags,
    search_by_category, search_by_keywords, search_by_sport, search_policies, update_policy,
    PolicyChange, PolicyHistory, PolicyPage, PolicyRevision, TagList,
};
pub use resources::{
    list_manual_resources, list_resources, read_manual_resource, read_resource, ManualUri,
    PolicyUri, ResourceContent, ResourceDescriptor, ResourceUri, SportUri,
};
pub use store::{
    InMemoryStore, KeywordMatch, PolicyOrder, PolicyQuery, PolicyStore, SortKey, SportFilter,
    StoreSeed,
};
pub use templates::{all_templates, builtin_templates, resolve_template, stored_templates, ManualTemplate};
pub use types::{
    title_case, ManualDescriptor, ManualSection, ManualSelection, ManualStatus, NewManual,
    OutputFormat, Policy, PolicyCategory, PolicyNumber, PolicyStatus, PolicyVersion, Sport,
    TemplateConfig, Version,
};
