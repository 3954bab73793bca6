pub mod classifier;
pub mod kinds;
pub mod settings;
