pub mod analyzer;
pub mod client;
pub mod gemini;
pub mod mock;

pub use analyzer::Analyzer;
pub use client::ModelClient;
pub use gemini::GeminiClient;
pub use mock::MockClient;
