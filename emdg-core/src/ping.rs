//! The `Ping` composite entity (§3, "Ping entity").
use crate::enums::BeamFlag;
use crate::records::{Bath2, RawBeam4, RxBeam, Ss2, TxSector};
use crate::SIDESCAN_PIXELS;

/// Which sub-records have been installed into this slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadStatus {
    pub bath_read: bool,
    pub raw_read: bool,
    pub quality_read: bool,
    pub ss_read: bool,
}

impl ReadStatus {
    pub fn any(&self) -> bool {
        self.bath_read || self.raw_read || self.quality_read || self.ss_read
    }
}

/// A fully- or partially-assembled ping, keyed by `(count, serial)`.
///
/// Mirrors the source's flat `png_*` field vocabulary; `nbeams` is the
/// bathymetry beam count and is the array length shared by every
/// per-beam field listed below.
#[derive(Debug, Clone, PartialEq)]
pub struct Ping {
    pub date: u32,
    pub msec: u32,
    pub count: u16,
    pub serial: u16,

    pub nbeams: u16,
    pub nbeams_valid: u16,
    pub heading_centideg: u16,
    pub ssv_decim_s: u16,
    pub xducer_depth_m: f32,
    pub sample_rate_hz: f32,

    pub heave_centim: i16,
    pub roll_centideg: i16,
    pub pitch_centideg: i16,
    pub navlon: f64,
    pub navlat: f64,
    pub speed_cm_s: u16,

    pub depth_m: Vec<f32>,
    pub acrosstrack_m: Vec<f32>,
    pub alongtrack_m: Vec<f32>,
    pub window_samples: Vec<u16>,
    pub quality_0_254: Vec<u8>,
    pub iba_centideg: Vec<i8>,
    pub detection_info: Vec<u8>,
    pub clean: Vec<i8>,
    pub amp_halfdb: Vec<i8>,
    pub beamflag: Vec<BeamFlag>,
    pub depression_deg: Vec<f64>,
    pub azimuth_deg: Vec<f64>,
    pub range_sec: Vec<f32>,
    pub beam_heave_m: Vec<f32>,

    pub tx: Vec<TxSector>,
    pub rx: Vec<RxBeam>,

    pub ss_raw: Vec<i16>,
    pub ss_beam_samples: Vec<u16>,
    pub ss_start_sample: Vec<u16>,
    pub ss_center_sample: Vec<u16>,
    /// Regridded sidescan, fixed length `SIDESCAN_PIXELS`. `None` entries
    /// are "outside swath" pixels (§4.8's `ss[i] = NULL` sentinel).
    pub ss: [Option<f64>; SIDESCAN_PIXELS],
    pub ss_alongtrack: [f64; SIDESCAN_PIXELS],

    pub read_status: ReadStatus,
    pub assembly_state: crate::enums::AssemblyState,
}

impl Ping {
    /// A freshly zeroed slot, as produced by the ring's reset (§4.5).
    pub fn empty() -> Self {
        Self {
            date: 0,
            msec: 0,
            count: 0,
            serial: 0,
            nbeams: 0,
            nbeams_valid: 0,
            heading_centideg: 0,
            ssv_decim_s: 0,
            xducer_depth_m: 0.0,
            sample_rate_hz: 0.0,
            heave_centim: 0,
            roll_centideg: 0,
            pitch_centideg: 0,
            navlon: 0.0,
            navlat: 0.0,
            speed_cm_s: 0,
            depth_m: Vec::new(),
            acrosstrack_m: Vec::new(),
            alongtrack_m: Vec::new(),
            window_samples: Vec::new(),
            quality_0_254: Vec::new(),
            iba_centideg: Vec::new(),
            detection_info: Vec::new(),
            clean: Vec::new(),
            amp_halfdb: Vec::new(),
            beamflag: Vec::new(),
            depression_deg: Vec::new(),
            azimuth_deg: Vec::new(),
            range_sec: Vec::new(),
            beam_heave_m: Vec::new(),
            tx: Vec::new(),
            rx: Vec::new(),
            ss_raw: Vec::new(),
            ss_beam_samples: Vec::new(),
            ss_start_sample: Vec::new(),
            ss_center_sample: Vec::new(),
            ss: [None; SIDESCAN_PIXELS],
            ss_alongtrack: [0.0; SIDESCAN_PIXELS],
            read_status: ReadStatus::default(),
            assembly_state: crate::enums::AssemblyState::NoData,
        }
    }

    pub fn key(&self) -> (u16, u16) {
        (self.count, self.serial)
    }

    /// Install a `Bath2` sub-record, per the assembler's pseudocode.
    pub fn install_bath(&mut self, b: &Bath2) {
        self.date = b.time.date;
        self.msec = b.time.msec;
        self.count = b.count;
        self.serial = b.serial;
        self.heading_centideg = b.heading_centideg;
        self.heave_centim = b.heave_centim;
        self.roll_centideg = b.roll_centideg;
        self.pitch_centideg = b.pitch_centideg;
        self.ssv_decim_s = b.ssv_decim_s;
        self.xducer_depth_m = b.xducer_depth_m;
        self.nbeams = b.nbeams;
        self.nbeams_valid = b.nbeams_valid;
        self.sample_rate_hz = b.sample_rate_hz;
        self.depth_m = b.depth_m.clone();
        self.acrosstrack_m = b.acrosstrack_m.clone();
        self.alongtrack_m = b.alongtrack_m.clone();
        self.window_samples = b.window_samples.clone();
        self.quality_0_254 = b.quality.clone();
        self.iba_centideg = b.iba_centideg.clone();
        self.detection_info = b.detection_info.clone();
        self.clean = b.clean.clone();
        self.amp_halfdb = b.amp_halfdb.clone();
        self.read_status.bath_read = true;
    }

    pub fn install_raw(&mut self, r: &RawBeam4) {
        self.date = r.time.date;
        self.msec = r.time.msec;
        self.count = r.count;
        self.serial = r.serial;
        self.tx = r.tx.clone();
        self.rx = r.rx.clone();
        self.read_status.raw_read = true;
    }

    pub fn install_quality(&mut self, q: &crate::records::Quality) {
        self.date = q.time.date;
        self.msec = q.time.msec;
        self.count = q.count;
        self.serial = q.serial;
        // Quality is merged opportunistically; not part of completeness.
        for (i, qf) in q.quality_factor.iter().enumerate() {
            if i < self.quality_0_254.len() {
                self.quality_0_254[i] = (*qf).clamp(0.0, 254.0) as u8;
            }
        }
        self.read_status.quality_read = true;
    }

    pub fn install_ss(&mut self, ss: &Ss2) {
        self.date = ss.time.date;
        self.msec = ss.time.msec;
        self.count = ss.count;
        self.serial = ss.serial;
        self.ss_raw = ss.raw_samples.clone();
        self.ss_beam_samples = ss.beams.iter().map(|b| b.beam_samples).collect();
        self.ss_start_sample = ss.beams.iter().map(|b| b.start_sample).collect();
        self.ss_center_sample = ss.beams.iter().map(|b| b.center_sample).collect();
        self.read_status.ss_read = true;
    }

    /// Zero-initialize for reuse, per the §4.5 reset semantics: clears all
    /// sub-record-read flags and goes back to `NoData`.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }
}
