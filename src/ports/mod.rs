/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports (driven ports) describe the external collaborators the
/// orchestration core depends on: sources, catalogers, report writers and
/// the terminal UI.
pub mod outbound;
