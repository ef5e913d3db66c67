use serde::{Deserialize, Serialize};

/// Final status reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Completed,
    Processing,
    Failed,
}

/// Scores produced by the quality assessment stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub overall_score: f64,
    pub coherence: f64,
    pub naturalness: f64,
    pub grammar_accuracy: f64,
    pub completeness: f64,
    pub lexical_quality: f64,
    pub personalization: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub word_count: u32,
    pub character_count: u32,
    pub character_count_no_spaces: u32,
    pub paragraph_count: u32,
    pub line_count: u32,
    pub estimated_pages: f64,
}

/// The artifact carried by a completion event.
///
/// Owned by the session once received and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub request_id: String,
    pub status: GenerationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Assessment details, kept opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_metrics: Option<QualityMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_stats: Option<TextStats>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub iterations: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResult {
    pub fn is_completed(&self) -> bool {
        self.status == GenerationStatus::Completed
    }

    /// A failed result is a resolved outcome, not an error
    pub fn is_failed(&self) -> bool {
        !self.is_completed()
    }

    /// Human readable failure cause, if the service gave one
    pub fn failure_message(&self) -> Option<&str> {
        if self.is_completed() {
            return None;
        }
        Some(self.error.as_deref().unwrap_or("Generation failed"))
    }
}
