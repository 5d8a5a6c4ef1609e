//! Validation of customer submissions and AI output

pub mod input;
pub mod response;

pub use input::{validate_submission, ReviewSubmission, SubmitReviewRequest};
pub use response::{parse_analysis, AiAnalysis, AnalysisError};

/// The fixed tag vocabulary the AI may label a review with.
///
/// Shared between the structured-output schema sent to the model and the
/// validation of what comes back.
pub const TAG_VOCABULARY: [&str; 5] = ["Quality", "Price", "Service", "Delivery", "App Experience"];

/// Maximum number of tags per analysis
pub const MAX_TAGS: usize = 3;
