/// Domain layer - SBOM artifacts and the pure services that act on them
///
/// Nothing in here performs I/O: sources, catalogers and writers live behind
/// the ports in `crate::ports`.
pub mod domain;
pub mod services;
