//! AI backend implementations

pub mod gemini;

pub use gemini::GeminiService;
