pub mod engine;
pub mod event_bus;
pub mod loop_control;
pub mod state;
