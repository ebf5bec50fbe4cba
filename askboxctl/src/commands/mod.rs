pub mod ask;
pub mod render;
pub mod status;
