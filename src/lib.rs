//! Boss-battle simulation engine for a vertical bullet-hell encounter.
//!
//! The library is presentation-free: a front-end feeds held inputs into a
//! [`engine::Battle`], calls `advance` from its frame loop and reads state
//! back for drawing.

pub mod assets;
pub mod bomb;
pub mod collision;
pub mod compute;
pub mod config;
pub mod director;
pub mod engine;
pub mod entities;
pub mod error;
pub mod phase;
pub mod physics;
pub mod player;
