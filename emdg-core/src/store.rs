//! The store (C4): an owning container keyed by record kind, plus the
//! ping ring (§4.4, §4.5).
use crate::interp::InterpolationSeries;
use crate::ping::Ping;
use crate::records::*;
use crate::settings::EngineSettings;
use crate::NUM_PING_STRUCTURES;

/// An owning container holding the latest instance of each non-ping
/// record kind, plus a small ring of partially-assembled pings.
///
/// Sub-blocks for the optional record kinds are `Option`-wrapped so that
/// streams which never carry them pay no allocation cost (§4.4's "lazy
/// allocation"; the source's `*_alloc` helpers become this `Option`).
pub struct Store {
    pub installation: Option<Installation>,
    pub runtime_parameters: Option<RuntimeParameters>,
    pub clock: Option<Clock>,
    pub tide: Option<Tide>,
    pub height: Option<Height>,
    pub heading: Option<Heading>,
    pub attitude: Option<Attitude>,
    pub network_attitude: Option<Attitude>,
    pub ssv: Option<Ssv>,
    pub tilt: Option<Tilt>,
    pub position: Option<Position>,
    pub svp: Option<Svp>,
    pub svp2: Option<Svp>,
    pub extra_parameters: Option<ExtraParameters>,
    pub water_column: Vec<WaterColumn>,
    pub pu_id: Option<PuId>,
    pub pu_status: Option<PuStatus>,

    /// Fixed-length ring of ping assembly slots (`NUM_PING_STRUCTURES`).
    pub ping_ring: [Ping; NUM_PING_STRUCTURES],

    /// `(lat_deg, lon_deg, speed_m_s)`, pushed from active `Position`
    /// fixes (§4.6).
    pub positions: InterpolationSeries<(f64, f64, f64)>,
    pub heading_series: InterpolationSeries<f64>,
    /// `(heave_m, roll_deg, pitch_deg)`, pushed from active
    /// `Attitude`/`NetworkAttitude` samples (§4.6).
    pub attitude_series: InterpolationSeries<(f64, f64, f64)>,
    pub depth_series: InterpolationSeries<f64>,

    /// Sidescan pixel size carried across pings for the regridder's
    /// 5%-per-ping smoothing (§4.8 step 2). `None` before the first ping.
    pub sidescan_pixel_size_m: Option<f64>,

    pub settings: EngineSettings,

    pub statistics: Statistics,
}

/// §7's "first occurrence only" warning bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct Statistics {
    pub bytes_skipped_total: u64,
    pub bytes_skipped_warned: bool,
    pub broken_datagrams: u64,
    pub broken_datagram_warned: bool,
    pub sidescan_mismatches: u64,
    pub sidescan_mismatch_warned: bool,
    pub unsupported_ids: u64,
    pub misplaced_trailers: u64,
    pub misplaced_trailer_warned: bool,
}

impl Store {
    pub fn new(settings: EngineSettings) -> Self {
        let cap = settings.interpolation_history_cap();
        Store {
            installation: None,
            runtime_parameters: None,
            clock: None,
            tide: None,
            height: None,
            heading: None,
            attitude: None,
            network_attitude: None,
            ssv: None,
            tilt: None,
            position: None,
            svp: None,
            svp2: None,
            extra_parameters: None,
            water_column: Vec::new(),
            pu_id: None,
            pu_status: None,
            ping_ring: std::array::from_fn(|_| Ping::empty()),
            positions: InterpolationSeries::new(cap),
            heading_series: InterpolationSeries::new(cap),
            attitude_series: InterpolationSeries::new(cap),
            depth_series: InterpolationSeries::new(cap),
            sidescan_pixel_size_m: None,
            settings,
            statistics: Statistics::default(),
        }
    }

    /// Find the ring slot already assembling this key, if any.
    pub fn find_slot(&mut self, key: (u16, u16)) -> Option<&mut Ping> {
        self.ping_ring
            .iter_mut()
            .find(|p| p.read_status.any() && p.key() == key)
    }

    /// Pick a slot to (re)use for a new key: prefer an empty slot, else
    /// the slot with the smallest `count` (oldest), per §4.5.
    pub fn pick_slot_for_new_key(&mut self) -> usize {
        if let Some(idx) = self.ping_ring.iter().position(|p| !p.read_status.any()) {
            return idx;
        }
        self.ping_ring
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| p.count)
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}
