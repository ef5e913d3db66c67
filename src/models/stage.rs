//! Pipeline stage identifiers.
//!
//! The remote pipeline iterates (assessment may send work back to research or
//! refinement), so stages carry no ordering guarantee beyond `Complete` and
//! `Error` being terminal.

use serde::{Deserialize, Serialize};

/// One named phase of the remote generation pipeline.
///
/// The aliases are the short names the pipeline emits on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Orchestrating,
    #[serde(alias = "research")]
    Researching,
    #[serde(alias = "write")]
    Writing,
    #[serde(alias = "personalize")]
    Personalizing,
    #[serde(alias = "assess")]
    Assessing,
    #[serde(alias = "refine")]
    Refining,
    #[serde(alias = "analyze")]
    Analyzing,
    #[serde(alias = "save")]
    Saving,
    Complete,
    Error,
}

impl StageId {
    /// Every stage, in nominal pipeline order.
    pub const ALL: [StageId; 10] = [
        StageId::Orchestrating,
        StageId::Researching,
        StageId::Writing,
        StageId::Personalizing,
        StageId::Assessing,
        StageId::Refining,
        StageId::Analyzing,
        StageId::Saving,
        StageId::Complete,
        StageId::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Orchestrating => "orchestrating",
            StageId::Researching => "researching",
            StageId::Writing => "writing",
            StageId::Personalizing => "personalizing",
            StageId::Assessing => "assessing",
            StageId::Refining => "refining",
            StageId::Analyzing => "analyzing",
            StageId::Saving => "saving",
            StageId::Complete => "complete",
            StageId::Error => "error",
        }
    }

    /// Human readable label for status displays
    pub fn label(&self) -> &'static str {
        match self {
            StageId::Orchestrating => "Orchestrating",
            StageId::Researching => "Researching",
            StageId::Writing => "Writing",
            StageId::Personalizing => "Personalizing",
            StageId::Assessing => "Assessing quality",
            StageId::Refining => "Refining",
            StageId::Analyzing => "Analyzing gaps",
            StageId::Saving => "Saving",
            StageId::Complete => "Complete",
            StageId::Error => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StageId::Complete | StageId::Error)
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_roundtrip_names() {
        for stage in StageId::ALL {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{}\"", stage.as_str()));
            let back: StageId = serde_json::from_str(&json).unwrap();
            assert_eq!(back, stage);
        }
    }

    #[test]
    fn test_stage_wire_aliases() {
        let cases = [
            ("research", StageId::Researching),
            ("write", StageId::Writing),
            ("personalize", StageId::Personalizing),
            ("assess", StageId::Assessing),
            ("refine", StageId::Refining),
            ("analyze", StageId::Analyzing),
            ("save", StageId::Saving),
        ];
        for (wire, expected) in cases {
            let stage: StageId = serde_json::from_str(&format!("\"{}\"", wire)).unwrap();
            assert_eq!(stage, expected);
        }
    }

    #[test]
    fn test_unknown_stage_rejected() {
        assert!(serde_json::from_str::<StageId>("\"drafting\"").is_err());
    }

    #[test]
    fn test_terminal_stages() {
        assert!(StageId::Complete.is_terminal());
        assert!(StageId::Error.is_terminal());
        assert!(!StageId::Refining.is_terminal());
    }

    #[test]
    fn test_stage_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(StageId::Writing, 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"writing":1}"#);
    }
}
