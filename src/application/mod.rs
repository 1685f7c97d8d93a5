/// Application layer - Use cases, services and DTOs
///
/// This layer orchestrates the release-tracking domain and reaches the
/// outside world only through the outbound ports.
pub mod dto;
pub mod services;
pub mod use_cases;
