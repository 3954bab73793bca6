pub mod coordinator;
pub mod dispatcher;
pub mod input;
