//! Domain types for policies, sports and manuals.

mod category;
mod manual;
mod policy;
mod sport;

pub use category::{title_case, PolicyCategory};
pub use manual::{
    ManualDescriptor, ManualSection, ManualSelection, ManualStatus, NewManual, OutputFormat,
    TemplateConfig,
};
pub use policy::{Policy, PolicyNumber, PolicyStatus, PolicyVersion, Version};
pub use sport::Sport;
