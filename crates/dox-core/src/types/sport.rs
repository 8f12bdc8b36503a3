use serde::{Deserialize, Serialize};

/// A sport that policies can be scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sport {
    pub id: i64,
    pub name: String,
    pub abbreviation: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

impl Sport {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            abbreviation: abbreviation.into(),
            active: true,
        }
    }
}
