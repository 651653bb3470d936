//! Runner configuration helpers.

pub mod duration;

pub use duration::parse_duration;
