//! Small numeric enums used throughout the record model.
//!
//! Follows the same shape the rest of the corpus uses for wire-coded
//! enumerations: `#[repr(C)]`, `FromPrimitive`/`ToPrimitive` via
//! `num-derive`, and a `new()` constructor that either returns a `Result`
//! or falls back to an `Invalid`/`Unknown` variant, depending on whether
//! an invalid code is itself meaningful to callers.
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

/// Recognised sonar models (the `model` field of the record envelope).
/// Endianness is detected by checking whether the raw `model` value is a
/// known model natively or only after a byte swap (see the framer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[repr(C)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum SonarModel {
    Em120 = 120,
    Em122 = 122,
    Em300 = 300,
    Em302 = 302,
    Em710 = 710,
    Em712 = 712,
    Em1002 = 1002,
    Em2000 = 2000,
    Em2040 = 2040,
    Em3000 = 3000,
    Em3002 = 3002,
    Em3000D = 3001,
    Em1000 = 1000,
    M3 = 20,
}

impl SonarModel {
    pub fn new(code: u16) -> Option<Self> {
        Self::from_u16(code)
    }

    /// `true` for the handheld M3, which the ping assembler treats
    /// specially (no sidescan wait, different beamflag rule).
    pub fn is_m3(&self) -> bool {
        matches!(self, SonarModel::M3)
    }

    /// The default tx beamwidth (degrees) used by the sidescan regridder
    /// when no runtime-parameter value is available.
    pub fn default_tx_beamwidth_deg(&self) -> f64 {
        match self {
            SonarModel::Em1000 => 2.5,
            _ => 1.5,
        }
    }
}

/// The system transducer configuration (`par_stc`), which selects
/// whether a ping's geometry uses array 1's or array 2's mount offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(C)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum TransducerConfiguration {
    SingleHead = 0,
    DualHeadPort = 1,
    DualHeadStarboard = 2,
    Em3000Hull = 3,
    Em3000DHull = 4,
    Invalid = -1,
}

impl TransducerConfiguration {
    pub fn new(code: i32) -> Self {
        Self::from_i32(code).unwrap_or(Self::Invalid)
    }
}

/// `par_dsh`: whether sensor depth replaces or augments heave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum DepthSensorHeave {
    /// `"IN"` — sensor depth replaces heave.
    In,
    /// `"NI"` — sensor depth augments heave.
    Ni,
}

impl DepthSensorHeave {
    pub fn from_ascii(bytes: [u8; 2]) -> Self {
        if &bytes == b"IN" {
            Self::In
        } else {
            Self::Ni
        }
    }

    pub fn to_ascii(self) -> [u8; 2] {
        match self {
            Self::In => *b"IN",
            Self::Ni => *b"NI",
        }
    }
}

/// Installation record flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum InstallationKind {
    Start,
    Stop,
    /// A `Start` with a zero date, used to carry free-text comments.
    Comment,
}

/// Per-beam flag, derived in §4.7. `beamflag` in the source is a packed
/// byte (qualifier bits over a base state); this is modeled as a base
/// state plus a qualifier bitflag, matching how the derivation order
/// is specified (flag, then optionally a qualifier).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum BeamState {
    None,
    Flag,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum BeamQualifier {
    /// No qualifier bit set.
    None,
    /// Flagged by the sonar's own real-time cleaning.
    Sonar,
    /// Flagged for post-processing interpolation.
    Interpolate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub struct BeamFlag {
    pub state: BeamState,
    pub qualifier: BeamQualifier,
}

impl BeamFlag {
    pub const fn none() -> Self {
        Self { state: BeamState::None, qualifier: BeamQualifier::None }
    }
    pub const fn null() -> Self {
        Self { state: BeamState::Null, qualifier: BeamQualifier::None }
    }
    pub const fn flagged(qualifier: BeamQualifier) -> Self {
        Self { state: BeamState::Flag, qualifier }
    }

    pub fn is_null(&self) -> bool {
        self.state == BeamState::Null
    }

    pub fn is_valid(&self) -> bool {
        self.state == BeamState::None
    }
}

/// The assembly state of a ping ring slot (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum AssemblyState {
    NoData,
    Partial,
    Complete,
}

/// Endian polarity of the stream, resolved once and frozen (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndianPolarity {
    Unknown,
    Native,
    Swapped,
}

impl EndianPolarity {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    pub fn swap(&self) -> bool {
        matches!(self, Self::Swapped)
    }
}

/// The logical record kind, i.e. the tag of the store's tagged union
/// (§3, "Logical record kinds"). Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum RecordKind {
    Installation,
    RuntimeParameters,
    Clock,
    Tide,
    Height,
    Heading,
    Attitude,
    NetworkAttitude,
    Ssv,
    Tilt,
    Position,
    Svp,
    Svp2,
    ExtraParameters,
    Ping,
    WaterColumn,
    PuId,
    PuStatus,
    /// A recognised-but-uninteresting id (legacy `Bath`/`RawBeam`, or any
    /// id for which only length-skip is specified) — carried so that
    /// `read_ping` has something to report for §7's `Unsupported` taxon
    /// without losing stream position information.
    Skipped,
}
