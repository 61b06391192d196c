/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the ports,
/// providing the actual integration with docker, the file system
/// and the terminal.
pub mod outbound;
