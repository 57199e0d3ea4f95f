//! Port implementations.
//!
//! `live` talks to the real world, `recording` wraps live adapters and
//! captures their traffic into a cassette, `replaying` serves a cassette back.

pub mod live;
pub mod recording;
pub mod replaying;
