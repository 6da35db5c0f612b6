// [apps/server/src/services/mod.rs]
pub mod authorization;
pub mod color;
pub mod command_dispatcher;
pub mod presence_sweeper;
pub mod status_machine;
