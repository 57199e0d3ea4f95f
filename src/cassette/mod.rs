//! Cassette format for recording and replaying port traffic.

pub mod format;
pub mod recorder;
pub mod replayer;
