pub mod client;
pub mod messages;

pub use client::ClientSettings;
pub use messages::Messages;
