use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Waste category reported by the classification service.
///
/// The five known categories carry a reward in the reward table. Any other
/// label the service returns is kept verbatim in `Unrecognized` and rewarded
/// like `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WasteCategory {
    BioDegradable,
    Plastic,
    EWaste,
    Hazardous,
    Other,
    Unrecognized(String),
}

impl WasteCategory {
    /// The five categories the classifier is trained to emit
    pub const KNOWN: [WasteCategory; 5] = [
        WasteCategory::BioDegradable,
        WasteCategory::Plastic,
        WasteCategory::EWaste,
        WasteCategory::Hazardous,
        WasteCategory::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            WasteCategory::BioDegradable => "bio-degradable",
            WasteCategory::Plastic => "plastic",
            WasteCategory::EWaste => "e-waste",
            WasteCategory::Hazardous => "hazardous",
            WasteCategory::Other => "other",
            WasteCategory::Unrecognized(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, WasteCategory::Unrecognized(_))
    }

    /// Coins credited for an item of this category
    pub fn reward(&self) -> u32 {
        crate::reward::reward_for(self.as_str())
    }
}

impl From<&str> for WasteCategory {
    fn from(label: &str) -> Self {
        match label {
            "bio-degradable" => WasteCategory::BioDegradable,
            "plastic" => WasteCategory::Plastic,
            "e-waste" => WasteCategory::EWaste,
            "hazardous" => WasteCategory::Hazardous,
            "other" => WasteCategory::Other,
            _ => WasteCategory::Unrecognized(label.to_string()),
        }
    }
}

impl From<String> for WasteCategory {
    fn from(label: String) -> Self {
        match WasteCategory::from(label.as_str()) {
            WasteCategory::Unrecognized(_) => WasteCategory::Unrecognized(label),
            known => known,
        }
    }
}

impl From<WasteCategory> for String {
    fn from(category: WasteCategory) -> Self {
        match category {
            WasteCategory::Unrecognized(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for WasteCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_round_trip_through_display() {
        for category in WasteCategory::KNOWN {
            assert!(category.is_known());
            assert_eq!(WasteCategory::from(category.to_string()), category);
        }
    }

    #[test]
    fn unknown_labels_are_kept_verbatim() {
        let category = WasteCategory::from("Glass");
        assert_eq!(category, WasteCategory::Unrecognized("Glass".to_string()));
        assert!(!category.is_known());
        assert_eq!(category.as_str(), "Glass");
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!(!WasteCategory::from("Plastic").is_known());
    }

    #[test]
    fn serializes_as_plain_label() {
        let json = serde_json::to_value(WasteCategory::EWaste).unwrap();
        assert_eq!(json, serde_json::json!("e-waste"));
        let parsed: WasteCategory = serde_json::from_value(serde_json::json!("hazardous")).unwrap();
        assert_eq!(parsed, WasteCategory::Hazardous);
    }
}
