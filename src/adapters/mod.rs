/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports,
/// providing the actual integration with GitHub, container registries,
/// the file system and the test runner.
pub mod outbound;
