//! Service-layer components: admission control, the Gemini client, and
//! report generation.

pub mod gemini;
pub mod rate_limiter;
pub mod reporting;

pub use gemini::{AiError, GeminiClient, GenerationOptions, RawAnalysis, ReviewAnalyzer};
pub use rate_limiter::{Admission, SlidingWindowLimiter};
