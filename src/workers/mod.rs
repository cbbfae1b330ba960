pub mod encoder;
pub mod error;
pub mod manifest;
pub mod planner;
pub mod publisher;
pub mod transcoder;
pub mod workspace;
