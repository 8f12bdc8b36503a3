//! The closed set of governance topic tags.

use crate::error::DoxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy category. Serialized as its snake_case tag (`"playing_rules"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyCategory {
    SchedulingPolicies,
    Officiating,
    PlayingRules,
    EquipmentSpecifications,
    FacilityStandards,
    TravelProcedures,
    MediaRelations,
    SafetyProtocols,
    AwardsRecognition,
    ChampionshipProcedures,
    VenueRequirements,
    BroadcastingStandards,
    Governance,
    GameManagement,
    CrowdControl,
    Eligibility,
    Administrative,
}

impl PolicyCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::SchedulingPolicies,
        Self::Officiating,
        Self::PlayingRules,
        Self::EquipmentSpecifications,
        Self::FacilityStandards,
        Self::TravelProcedures,
        Self::MediaRelations,
        Self::SafetyProtocols,
        Self::AwardsRecognition,
        Self::ChampionshipProcedures,
        Self::VenueRequirements,
        Self::BroadcastingStandards,
        Self::Governance,
        Self::GameManagement,
        Self::CrowdControl,
        Self::Eligibility,
        Self::Administrative,
    ];

    /// The snake_case tag stored in the repository.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SchedulingPolicies => "scheduling_policies",
            Self::Officiating => "officiating",
            Self::PlayingRules => "playing_rules",
            Self::EquipmentSpecifications => "equipment_specifications",
            Self::FacilityStandards => "facility_standards",
            Self::TravelProcedures => "travel_procedures",
            Self::MediaRelations => "media_relations",
            Self::SafetyProtocols => "safety_protocols",
            Self::AwardsRecognition => "awards_recognition",
            Self::ChampionshipProcedures => "championship_procedures",
            Self::VenueRequirements => "venue_requirements",
            Self::BroadcastingStandards => "broadcasting_standards",
            Self::Governance => "governance",
            Self::GameManagement => "game_management",
            Self::CrowdControl => "crowd_control",
            Self::Eligibility => "eligibility",
            Self::Administrative => "administrative",
        }
    }

    /// Human-readable label, e.g. `"Playing Rules"`.
    #[must_use]
    pub fn label(self) -> String {
        title_case(self.as_str())
    }
}

impl fmt::Display for PolicyCategory {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyCategory {
    type Err = DoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DoxError::InvalidParams(format!("Unknown policy category: {s}")))
    }
}

/// Convert an underscore tag to title case: `"crowd_control"` -> `"Crowd Control"`.
///
/// Only the first character of each word is upper-cased; the rest is kept as is.
#[must_use]
pub fn title_case(tag: &str) -> String {
    tag.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tags_round_trip_through_from_str() {
        for category in PolicyCategory::ALL {
            assert_eq!(category.as_str().parse::<PolicyCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = "hockey_rules".parse::<PolicyCategory>().unwrap_err();
        assert!(matches!(err, DoxError::InvalidParams(_)));
        assert!(err.to_string().contains("hockey_rules"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(PolicyCategory::Officiating.label(), "Officiating");
        assert_eq!(PolicyCategory::SchedulingPolicies.label(), "Scheduling Policies");
        assert_eq!(
            PolicyCategory::EquipmentSpecifications.label(),
            "Equipment Specifications"
        );
    }

    #[test]
    fn test_title_case_edge_cases() {
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("a__b"), "A  B");
        assert_eq!(title_case("already_Upper"), "Already Upper");
    }

    #[test]
    fn test_serde_uses_snake_case_tags() {
        let json = serde_json::to_string(&PolicyCategory::GameManagement).unwrap();
        assert_eq!(json, "\"game_management\"");
        let parsed: PolicyCategory = serde_json::from_str("\"crowd_control\"").unwrap();
        assert_eq!(parsed, PolicyCategory::CrowdControl);
    }
}
