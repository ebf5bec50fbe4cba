pub mod http;
pub mod jobs;
pub mod markdown;
pub mod settings;
pub mod tasks;

// Wire and snapshot types live in askbox-types and are imported from there directly
