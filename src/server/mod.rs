mod docs;
mod error;
mod handler;

pub mod init;
pub mod routes;

// Re-export AppState for convenience
pub use handler::AppState;
