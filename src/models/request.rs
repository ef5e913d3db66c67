use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Smallest `max_words` the service accepts.
pub const MIN_WORD_LIMIT: u32 = 50;
/// Largest `max_words` the service accepts.
pub const MAX_WORD_LIMIT: u32 = 5000;
/// Largest `max_pages` the service accepts.
pub const MAX_PAGE_LIMIT: u32 = 20;

/// Category of content to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingType {
    CoverLetter,
    MotivationalLetter,
    SocialResponse,
    Email,
}

impl WritingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WritingType::CoverLetter => "cover_letter",
            WritingType::MotivationalLetter => "motivational_letter",
            WritingType::SocialResponse => "social_response",
            WritingType::Email => "email",
        }
    }
}

impl std::fmt::Display for WritingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation mode trading quality against latency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Quality,
    #[default]
    Balanced,
    Fast,
}

/// Context fields for each writing type.
///
/// Serialized without a tag; the variant is recovered from which fields are
/// present, so variant order matters for deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WritingContext {
    CoverLetter {
        job_title: String,
        company: String,
    },
    MotivationalLetter {
        program_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scholarship_name: Option<String>,
    },
    SocialResponse {
        post_content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reply_to: Option<String>,
    },
    Email {
        reply_to: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subject: Option<String>,
    },
}

impl WritingContext {
    /// The writing type this context belongs to
    pub fn writing_type(&self) -> WritingType {
        match self {
            WritingContext::CoverLetter { .. } => WritingType::CoverLetter,
            WritingContext::MotivationalLetter { .. } => WritingType::MotivationalLetter,
            WritingContext::SocialResponse { .. } => WritingType::SocialResponse,
            WritingContext::Email { .. } => WritingType::Email,
        }
    }
}

/// Length, tone and quality requirements for a generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_words: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_words: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    /// Minimum overall quality score (0-100) before the pipeline stops refining
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,
    #[serde(default)]
    pub mode: GenerationMode,
}

fn default_quality_threshold() -> f64 {
    85.0
}

impl Default for WritingRequirements {
    fn default() -> Self {
        Self {
            max_words: None,
            min_words: None,
            max_pages: None,
            format: None,
            tone: None,
            quality_threshold: default_quality_threshold(),
            mode: GenerationMode::default(),
        }
    }
}

impl WritingRequirements {
    pub fn with_max_words(mut self, max_words: u32) -> Self {
        self.max_words = Some(max_words);
        self
    }

    pub fn with_quality_threshold(mut self, threshold: f64) -> Self {
        self.quality_threshold = threshold;
        self
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Body of a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub user_id: String,
    #[serde(rename = "type")]
    pub writing_type: WritingType,
    pub context: WritingContext,
    #[serde(default)]
    pub requirements: WritingRequirements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl RequestPayload {
    /// Create a request whose type is taken from the context variant
    pub fn new(user_id: impl Into<String>, context: WritingContext) -> Self {
        Self {
            user_id: user_id.into(),
            writing_type: context.writing_type(),
            context,
            requirements: WritingRequirements::default(),
            additional_info: None,
        }
    }

    pub fn with_requirements(mut self, requirements: WritingRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }

    /// Check local preconditions before anything is sent.
    ///
    /// The service stays authoritative and may still reject a request that
    /// passes here; that surfaces as a failed result, not as an error.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.user_id.trim().is_empty() {
            return Err(SessionError::validation("user_id", "must not be empty"));
        }

        if self.context.writing_type() != self.writing_type {
            return Err(SessionError::validation(
                "context",
                format!(
                    "{} context does not match request type {}",
                    self.context.writing_type(),
                    self.writing_type
                ),
            ));
        }

        let req = &self.requirements;
        if let Some(max) = req.max_words {
            if !(MIN_WORD_LIMIT..=MAX_WORD_LIMIT).contains(&max) {
                return Err(SessionError::validation(
                    "requirements.max_words",
                    format!("must be between {} and {}", MIN_WORD_LIMIT, MAX_WORD_LIMIT),
                ));
            }
            if let Some(min) = req.min_words {
                if min > max {
                    return Err(SessionError::validation(
                        "requirements.min_words",
                        "must not exceed max_words",
                    ));
                }
            }
        }

        if let Some(pages) = req.max_pages {
            if pages == 0 || pages > MAX_PAGE_LIMIT {
                return Err(SessionError::validation(
                    "requirements.max_pages",
                    format!("must be between 1 and {}", MAX_PAGE_LIMIT),
                ));
            }
        }

        if !req.quality_threshold.is_finite() || !(0.0..=100.0).contains(&req.quality_threshold) {
            return Err(SessionError::validation(
                "requirements.quality_threshold",
                "must be between 0 and 100",
            ));
        }

        Ok(())
    }
}
