//! Text resources addressed by `policy://`, `manual://` and `sport://` URIs.

mod manual;
mod policy;
mod sport;

pub use manual::{
    format_manual, format_template, list_manual_resources, read_manual_resource, ManualUri,
    MANUAL_SCHEME, RECENT_MANUAL_LIMIT,
};
pub use policy::{
    format_policy, list_policy_resources, read_policy_resource, PolicyUri, POLICY_RESOURCE_LIMIT,
    POLICY_SCHEME,
};
pub use sport::{list_sport_resources, read_sport_resource, SportUri, SPORT_SCHEME};

use crate::error::Result;
use crate::store::PolicyStore;
use serde::Serialize;

const MIME_TEXT: &str = "text/plain";

/// Entry of a resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl ResourceDescriptor {
    fn text(uri: String, name: String, description: String) -> Self {
        Self {
            uri,
            name,
            description,
            mime_type: MIME_TEXT.to_string(),
        }
    }
}

/// Body of a resource read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceContent {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

impl ResourceContent {
    fn text(uri: String, text: String) -> Self {
        Self {
            uri,
            mime_type: MIME_TEXT.to_string(),
            text,
        }
    }
}

/// A parsed resource URI of any served scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceUri {
    Policy(PolicyUri),
    Manual(ManualUri),
    Sport(SportUri),
}

impl ResourceUri {
    /// `Ok(None)` when the scheme is not served here.
    ///
    /// # Errors
    ///
    /// Returns [`DoxError::InvalidParams`](crate::DoxError::InvalidParams)
    /// for a served scheme with a malformed remainder.
    pub fn parse(uri: &str) -> Result<Option<Self>> {
        let parsed = if uri.starts_with(POLICY_SCHEME) {
            Self::Policy(PolicyUri::parse(uri)?)
        } else if uri.starts_with(MANUAL_SCHEME) {
            Self::Manual(ManualUri::parse(uri)?)
        } else if uri.starts_with(SPORT_SCHEME) {
            Self::Sport(SportUri::parse(uri)?)
        } else {
            return Ok(None);
        };
        Ok(Some(parsed))
    }
}

/// Policy resources, then manuals and templates, then sports.
///
/// # Errors
///
/// Propagates store failures.
pub fn list_resources(store: &dyn PolicyStore) -> Result<Vec<ResourceDescriptor>> {
    let mut resources = list_policy_resources(store)?;
    resources.extend(list_manual_resources(store)?);
    resources.extend(list_sport_resources(store)?);
    Ok(resources)
}

/// # Errors
///
/// The errors of the scheme's reader.
pub fn read_resource(store: &dyn PolicyStore, uri: &ResourceUri) -> Result<ResourceContent> {
    match uri {
        ResourceUri::Policy(uri) => read_policy_resource(store, uri),
        ResourceUri::Manual(uri) => read_manual_resource(store, uri),
        ResourceUri::Sport(uri) => read_sport_resource(store, uri),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DoxError;
    use crate::store::InMemoryStore;
    use crate::types::{Policy, PolicyCategory, PolicyNumber, Sport};

    #[test]
    fn test_parse_dispatches_on_scheme() {
        assert!(matches!(
            ResourceUri::parse("policy://BSB-OFF-001").unwrap(),
            Some(ResourceUri::Policy(PolicyUri::Number(_)))
        ));
        assert!(matches!(
            ResourceUri::parse("manual://template/default").unwrap(),
            Some(ResourceUri::Manual(ManualUri::Template(_)))
        ));
        assert!(matches!(
            ResourceUri::parse("sport://BSB").unwrap(),
            Some(ResourceUri::Sport(_))
        ));
        assert_eq!(ResourceUri::parse("file:///etc/passwd").unwrap(), None);

        let err = ResourceUri::parse("sport://").unwrap_err();
        assert!(matches!(err, DoxError::InvalidParams(_)));
    }

    #[test]
    fn test_list_resources_orders_schemes() {
        let store = InMemoryStore::new();
        store.insert_sport(Sport::new(1, "Baseball", "BSB")).unwrap();
        store
            .insert_policy(Policy::new(
                "p1",
                PolicyNumber::parse("BSB-OFF-001").unwrap(),
                "Umpires",
                PolicyCategory::Officiating,
                "text",
            ))
            .unwrap();

        let uris: Vec<String> = list_resources(&store)
            .unwrap()
            .into_iter()
            .map(|r| r.uri)
            .collect();
        assert_eq!(uris, vec!["policy://BSB-OFF-001", "sport://BSB"]);
    }
}
