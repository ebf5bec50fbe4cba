mod tracker;

pub use tracker::{elapsed_seconds, TaskTracker};
