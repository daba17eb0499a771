pub mod client;
pub mod gemini;
pub mod prompt;
pub mod provider;
