pub mod config;
pub mod fallback;
pub mod graph;
pub mod interpreter;
pub mod llm;
pub mod prompt;
pub mod sanitize;
