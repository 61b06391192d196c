/// Application layer - orchestration of a run
///
/// This layer wires the domain to infrastructure through ports: the event
/// bus, cataloging tasks and their runner, the background worker, the UI
/// driver and the event loop that coordinates them.
pub mod context;
pub mod dto;
pub mod event_loop;
pub mod events;
pub mod factories;
pub mod runner;
pub mod signals;
pub mod tasks;
pub mod ui;
pub mod worker;
