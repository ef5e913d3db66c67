mod health;
mod request;
mod result;
mod stage;

pub use health::{HealthReport, HealthStatus};
pub use request::{
    GenerationMode, RequestPayload, WritingContext, WritingRequirements, WritingType,
    MAX_PAGE_LIMIT, MAX_WORD_LIMIT, MIN_WORD_LIMIT,
};
pub use result::{GenerationResult, GenerationStatus, QualityMetrics, TextStats};
pub use stage::StageId;
