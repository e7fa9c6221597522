//! Electrical Compliance Module
//!
//! Implements conductor resistance and voltage-drop math, standby battery
//! sizing, conduit fill against NEC Chapter 9 areas, and the wirepath
//! bundle/fill label shown on drawings.

pub mod wire;
pub mod battery;
pub mod conduit;
pub mod wirepath;

pub use wire::*;
pub use battery::*;
pub use conduit::*;
pub use wirepath::*;
