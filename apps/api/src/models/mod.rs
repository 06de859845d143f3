pub mod profile;
pub mod progress;
pub mod task;
