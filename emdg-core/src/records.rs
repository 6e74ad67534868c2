//! The closed set of logical record kinds (§3). Field names mirror the
//! wire vocabulary (`png_*`, `par_*`, …) rather than inventing new
//! terminology, since the numeric scalings documented in §4.2 are part
//! of the field's identity.
use crate::enums::{DepthSensorHeave, InstallationKind, TransducerConfiguration};
use crate::{MAX_ATTITUDE_SAMPLES, MAX_BEAMS, MAX_TX, SIDESCAN_PIXELS};

/// Common temporal key carried by almost every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub struct TimeStamp {
    /// `YYYY*10000 + MM*100 + DD`.
    pub date: u32,
    /// Milliseconds since midnight.
    pub msec: u32,
}

/// A transmit- or receive-array mounting offset triple (`par_s1h/r/p` or
/// `par_s2h/r/p` in the source's installation-parameter vocabulary).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub struct MountOffsets {
    pub heading_deg: f64,
    pub roll_deg: f64,
    pub pitch_deg: f64,
}

/// `Installation` — ASCII key/value installation parameters (§3).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub struct Installation {
    pub kind: InstallationKind,
    pub time: TimeStamp,
    pub line_number: u32,
    pub serial: u16,
    /// Mount offsets for array 1 (`par_s1h/par_s1r/par_s1p`).
    pub array1_offsets: MountOffsets,
    /// Mount offsets for array 2 (`par_s2h/par_s2r/par_s2p`);
    /// dual-head sonars' second head.
    pub array2_offsets: MountOffsets,
    pub depth_sensor_heave: DepthSensorHeave,
    /// Raw, unparsed key/value pairs, preserved for round-trip fidelity
    /// and so `extract`'s `comment` projection can recover free text.
    pub raw_pairs: Vec<(String, String)>,
}

impl Installation {
    /// Selects array 1's or array 2's mount offsets depending on which
    /// head the transducer configuration says owns the second array
    /// (dual-head-starboard sonars steer array 2; everything else uses
    /// array 1).
    pub fn mount_offsets(&self, stc: TransducerConfiguration) -> MountOffsets {
        match stc {
            TransducerConfiguration::DualHeadStarboard => self.array2_offsets,
            _ => self.array1_offsets,
        }
    }
}

/// `RuntimeParameters`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(any(feature = "to_json", feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub struct RuntimeParameters {
    pub time: TimeStamp,
    pub serial: u16,
    pub mode: u8,
    pub filter_bits: u8,
    pub min_depth_m: f32,
    pub max_depth_m: f32,
    pub transmit_power_db: i8,
    pub tx_beamwidth_deg: f32,
    pub rx_beamwidth_deg: f32,
    pub max_swath_deg: u16,
    pub stabilisation_mode: u8,
    pub transducer_configuration: TransducerConfiguration,
}

/// `Clock`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clock {
    pub time: TimeStamp,
    pub serial: u16,
    pub external_time: TimeStamp,
    pub pps_in_use: bool,
}

/// `Tide`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tide {
    pub time: TimeStamp,
    pub serial: u16,
    pub tide_m: f32,
}

/// `Height`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Height {
    pub time: TimeStamp,
    pub serial: u16,
    pub height_m: f32,
    pub height_type: u8,
}

/// One `(t_ms, heading_0.01deg)` sample inside a `Heading` block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeadingSample {
    pub t_ms: u16,
    pub heading_centideg: i16,
}

/// `Heading` — up to 256 samples plus a status byte.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub time: TimeStamp,
    pub serial: u16,
    /// On-disk sample count, preserved verbatim even if it exceeds the
    /// compile-time maximum (the clamped count is `samples.len()`).
    pub ndata_on_disk: u16,
    pub samples: Vec<HeadingSample>,
    pub status: u8,
}

/// One motion sample inside an `Attitude`/`NetworkAttitude` block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttitudeSample {
    pub t_ms: u16,
    pub status: u16,
    pub roll_centideg: i16,
    pub pitch_centideg: i16,
    pub heave_centim: i16,
    pub heading_centideg: u16,
}

/// `Attitude` / `NetworkAttitude`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attitude {
    pub time: TimeStamp,
    pub serial: u16,
    pub ndata_on_disk: u16,
    pub samples: Vec<AttitudeSample>,
    /// `sensordescriptor & 0x0E == 0` means "active" (§4.6).
    pub sensor_descriptor: u8,
    /// Present only for `NetworkAttitude`: the raw NMEA-style bytes that
    /// produced each sample, one blob per sample.
    pub raw_nmea: Option<Vec<Vec<u8>>>,
}

impl Attitude {
    pub fn is_active(&self) -> bool {
        self.sensor_descriptor & 0x0E == 0
    }
}

/// One `(t_ms, value)` sample, used by `Ssv` and `Tilt`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScalarSample {
    pub t_ms: u16,
    pub value: i16,
}

/// `SSV` — sound speed at vehicle, 0.1 m/s units.
#[derive(Debug, Clone, PartialEq)]
pub struct Ssv {
    pub time: TimeStamp,
    pub serial: u16,
    pub samples: Vec<ScalarSample>,
}

/// `Tilt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tilt {
    pub time: TimeStamp,
    pub serial: u16,
    pub samples: Vec<ScalarSample>,
}

/// `Position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub time: TimeStamp,
    pub serial: u16,
    /// Latitude × 2e7. `i32::MAX` (`0x7FFFFFFF`) means "invalid".
    pub lat_raw: i32,
    /// Longitude × 1e7.
    pub lon_raw: i32,
    pub fix_quality_cm: u16,
    pub speed_cm_s: u16,
    pub course_centideg: u16,
    pub heading_centideg: u16,
    /// Bit 7 set means this fix is the "active" one (§4.6).
    pub system: u8,
    pub input_bytes: u8,
    pub source: String,
}

impl Position {
    pub fn is_active(&self) -> bool {
        self.system & 0x80 != 0
    }

    pub fn lat_deg(&self) -> Option<f64> {
        if self.lat_raw == i32::MAX {
            None
        } else {
            Some(self.lat_raw as f64 / 2.0e7)
        }
    }

    pub fn lon_deg(&self) -> Option<f64> {
        if self.lon_raw == i32::MAX {
            None
        } else {
            Some(self.lon_raw as f64 / 1.0e7)
        }
    }
}

/// One `(depth, speed)` pair in a sound-velocity profile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SvpPoint {
    pub depth_cm: u32,
    pub speed_decim_s: u32,
}

/// `SVP` / `SVP2` — two different on-wire scalings of the same concept.
#[derive(Debug, Clone, PartialEq)]
pub struct Svp {
    pub time: TimeStamp,
    pub serial: u16,
    pub profile_time: TimeStamp,
    pub points: Vec<SvpPoint>,
}

/// `ExtraParameters` — free-form blob; only sub-id 2 is parsed (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraParameters {
    pub time: TimeStamp,
    pub serial: u16,
    pub sub_id: u16,
    /// Parsed per-positioning-system quality factors (sub-id 2).
    pub quality_factors: Option<Vec<f32>>,
    /// The raw blob, preserved so unrecognised sub-ids still round-trip.
    pub raw: Vec<u8>,
}

/// `PuId` — processing-unit identity (version strings).
#[derive(Debug, Clone, PartialEq)]
pub struct PuId {
    pub time: TimeStamp,
    pub serial: u16,
    pub software_version: String,
    pub cpu_version: String,
    pub transceiver_version: String,
}

/// `PuStatus` — processing-unit status scalars.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PuStatus {
    pub time: TimeStamp,
    pub serial: u16,
    pub ping_rate_centihz: u16,
    pub ping_count: u32,
    pub load: u8,
    pub sensor_status: u32,
    pub achieved_port_coverage_deg: u8,
    pub achieved_stbd_coverage_deg: u8,
    pub yaw_stabilisation_deg: i16,
}

/// One transmit-sector entry, 19 max per ping (`MAX_TX`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TxSector {
    pub tiltangle_centideg: i16,
    pub focus_decim: i16,
    pub signallength_s: f32,
    pub offset_s: f32,
    pub center_hz: f32,
    pub absorption_centidb_km: i16,
    pub waveform: u8,
    pub sector: u8,
    pub bandwidth_hz: f32,
}

/// One receive-beam entry, `MAX_BEAMS` max per ping. 16 bytes on the
/// wire: `spare1`/`spare2` are the two reserved bytes the wire layout
/// carries either side of the range/reflectivity fields and are not
/// otherwise interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RxBeam {
    pub pointangle_centideg: i16,
    pub sector: u8,
    pub detection: u8,
    pub window: u16,
    pub quality: u8,
    pub spare1: u8,
    pub range_s: f32,
    pub amp_halfdb: i16,
    pub cleaning: u8,
    pub spare2: u8,
}

/// `Bath2` — primary bathymetry sub-record.
#[derive(Debug, Clone, PartialEq)]
pub struct Bath2 {
    pub time: TimeStamp,
    pub count: u16,
    pub serial: u16,
    pub lat_raw: i32,
    pub lon_raw: i32,
    pub heading_centideg: u16,
    pub heave_centim: i16,
    pub roll_centideg: i16,
    pub pitch_centideg: i16,
    pub ssv_decim_s: u16,
    pub xducer_depth_m: f32,
    pub nbeams: u16,
    pub nbeams_valid: u16,
    pub sample_rate_hz: f32,
    pub depth_m: Vec<f32>,
    pub acrosstrack_m: Vec<f32>,
    pub alongtrack_m: Vec<f32>,
    pub window_samples: Vec<u16>,
    pub quality: Vec<u8>,
    pub iba_centideg: Vec<i8>,
    pub detection_info: Vec<u8>,
    pub clean: Vec<i8>,
    pub amp_halfdb: Vec<i8>,
}

/// `RawBeam4` — raw transmit-sector + receive-beam angles/ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBeam4 {
    pub time: TimeStamp,
    pub count: u16,
    pub serial: u16,
    pub ssv_decim_s: u16,
    pub ntx: u16,
    pub nbeams: u16,
    pub ndetections: u16,
    pub sample_rate_hz: f32,
    pub tx: Vec<TxSector>,
    pub rx: Vec<RxBeam>,
}

/// `Quality` — per-beam quality factors, merged opportunistically.
#[derive(Debug, Clone, PartialEq)]
pub struct Quality {
    pub time: TimeStamp,
    pub count: u16,
    pub serial: u16,
    pub quality_factor: Vec<f32>,
}

/// One beam's raw sidescan snippet plus its placement in `SS2`. Only
/// `sort_direction`/`detection_info`/`beam_samples`/`start_sample` are
/// on the wire (6 bytes); `center_sample` is not transmitted and is
/// always derived as `start_sample + beam_samples / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SsBeam {
    pub sort_direction: i8,
    pub detection_info: u8,
    pub beam_samples: u16,
    pub start_sample: u16,
    pub center_sample: u16,
}

impl SsBeam {
    /// Builds a beam entry from the four wire fields, filling in the
    /// derived `center_sample`.
    pub fn from_wire(sort_direction: i8, detection_info: u8, beam_samples: u16, start_sample: u16) -> Self {
        let center_sample = start_sample + beam_samples / 2;
        SsBeam { sort_direction, detection_info, beam_samples, start_sample, center_sample }
    }
}

/// `SS2` — sidescan snippets.
#[derive(Debug, Clone, PartialEq)]
pub struct Ss2 {
    pub time: TimeStamp,
    pub count: u16,
    pub serial: u16,
    pub sample_rate_hz: f32,
    pub r_zero: u16,
    pub bsn_decidb: i16,
    pub bso_decidb: i16,
    pub tx_decideg: u16,
    pub tvg_crossover_decideg: u16,
    pub nbeams: u16,
    pub npixels: u16,
    pub beams: Vec<SsBeam>,
    /// Raw 0.5 dB snippet samples, concatenated in beam order
    /// (`start_sample[i]..start_sample[i]+beam_samples[i]`).
    pub raw_samples: Vec<i16>,
}

/// `WaterColumn` — one page of water-column samples; a full ping's
/// worth is split across `ndatagrams` records sharing `(count, serial)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterColumn {
    pub time: TimeStamp,
    pub count: u16,
    pub serial: u16,
    pub ndatagrams: u16,
    pub datagram_number: u16,
    pub ntx: u16,
    pub nbeams_total: u16,
    pub nbeams_this_datagram: u16,
    pub sound_speed_decim_s: u16,
    pub sample_rate_hz: u32,
    pub tx_tilt_centideg: Vec<i16>,
    pub beam_pointangle_centideg: Vec<i16>,
    pub beam_start_range_samples: Vec<u16>,
    pub beam_samples: Vec<Vec<i8>>,
}

pub const MAX_TX_CAP: usize = MAX_TX;
pub const MAX_BEAMS_CAP: usize = MAX_BEAMS;
pub const MAX_ATTITUDE_CAP: usize = MAX_ATTITUDE_SAMPLES;
pub const SIDESCAN_PIXELS_CAP: usize = SIDESCAN_PIXELS;
