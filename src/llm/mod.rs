pub mod ollama;
pub mod prompt;
