pub mod gemini;

pub use gemini::GeminiAdapter;
