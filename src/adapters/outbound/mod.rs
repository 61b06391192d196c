/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod catalogers;
pub mod console;
pub mod docker;
pub mod filesystem;
pub mod formatters;
