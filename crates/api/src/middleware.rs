/// Mapping of engine errors to HTTP responses
pub mod error_handling;
