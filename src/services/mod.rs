// Service exports
pub mod cache;
pub mod catalog;
pub mod gemini;
pub mod openai;
pub mod provider;

pub use cache::{CacheStats, CachedBatch, ResultCache};
pub use catalog::ReferenceCatalog;
pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;
pub use provider::{
    build_backend, build_prompt, parse_score, GenerationParams, ProviderError, ScoreProvider, TextBackend,
};
