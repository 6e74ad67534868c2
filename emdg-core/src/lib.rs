//! This library is the foundation for the `emdg-in` and `emdg-out`
//! crates. It can be built either with serialization support, or in a
//! slightly more lightweight manner without it (see features).
#![allow(clippy::derive_partial_eq_without_eq)]
#[macro_use]
extern crate num_derive;

#[cfg(any(feature = "to_json", feature = "serde"))]
extern crate serde;
#[cfg(feature = "to_json")]
extern crate serde_json;

pub mod enums;
pub mod errors;
pub mod interp;
pub mod ping;
pub mod projection;
pub mod records;
pub mod settings;
pub mod store;
#[cfg(test)]
mod tests;

pub use enums::*;
pub use errors::EmdgError;
pub use ping::Ping;
pub use settings::EngineSettings;
pub use store::Store;

/// Physical record envelope bytes (§3, §6.4).
pub const START_BYTE: u8 = 0x02;
pub const STOP_BYTE: u8 = 0x03;

/// Beams and transmit sectors, §3 invariants; confirmed against
/// `MBSYS_SIMRAD3_MAXBEAMS`/`MBSYS_SIMRAD3_MAXTX` in the original source.
pub const MAX_BEAMS: usize = 512;
pub const MAX_TX: usize = 19;
/// Max samples in a `Heading`/`Attitude`/`NetworkAttitude` block (§3).
pub const MAX_ATTITUDE_SAMPLES: usize = 256;
/// Regridded sidescan swath width (§4.8).
pub const SIDESCAN_PIXELS: usize = 1024;
/// Ping ring length (§4.4: "typically 4 slots").
pub const NUM_PING_STRUCTURES: usize = 4;
/// Max length of the `Position` ASCII payload (§6.4).
pub const POSITION_ASCII_MAX: usize = 256;
