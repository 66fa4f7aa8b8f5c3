pub mod api_tests;
pub mod fallback_tests;
pub mod sanitize_tests;
