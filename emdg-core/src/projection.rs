//! Generic store/ping projections (§6.2's `extract`/`insert`): converts
//! between the engine's internal record shapes and the flat
//! caller-facing arrays, independent of whether a read or a write is
//! driving.
use crate::enums::BeamFlag;
use crate::records::Installation;
use crate::{Ping, SIDESCAN_PIXELS};

/// One beam's positioned depth, the bathymetry half of `extract`/`insert`.
#[derive(Debug, Clone, Default)]
pub struct Bathymetry {
    pub depth_m: Vec<f32>,
    pub acrosstrack_m: Vec<f32>,
    pub alongtrack_m: Vec<f32>,
    pub beamflag: Vec<BeamFlag>,
}

#[derive(Debug, Clone)]
pub struct Sidescan {
    pub ss: [Option<f64>; SIDESCAN_PIXELS],
    pub ss_alongtrack: [f64; SIDESCAN_PIXELS],
}

impl Default for Sidescan {
    fn default() -> Self {
        Sidescan { ss: [None; SIDESCAN_PIXELS], ss_alongtrack: [0.0; SIDESCAN_PIXELS] }
    }
}

/// The caller-facing projection of one record (§6.2): whichever fields
/// apply to the record's kind are populated, the rest left `None`.
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    pub times: Option<(u32, u32)>,
    pub nav: Option<(f64, f64, f64)>,
    pub bathymetry: Option<Bathymetry>,
    pub amplitude: Option<Vec<i8>>,
    pub sidescan: Option<Sidescan>,
    pub comment: Option<String>,
}

/// Projects a completed ping into `extract`'s flat arrays.
pub fn extract_ping(ping: &Ping) -> Extracted {
    Extracted {
        times: Some((ping.date, ping.msec)),
        nav: Some((ping.navlon, ping.navlat, ping.speed_cm_s as f64 / 100.0)),
        bathymetry: Some(Bathymetry {
            depth_m: ping.depth_m.clone(),
            acrosstrack_m: ping.acrosstrack_m.clone(),
            alongtrack_m: ping.alongtrack_m.clone(),
            beamflag: ping.beamflag.clone(),
        }),
        amplitude: Some(ping.amp_halfdb.clone()),
        sidescan: Some(Sidescan { ss: ping.ss, ss_alongtrack: ping.ss_alongtrack }),
        comment: None,
    }
}

/// Projects an `Installation` record's free text (§3's `CMT` key) into
/// `extract`'s `comment` field.
pub fn extract_installation(rec: &Installation) -> Extracted {
    let comment = rec.raw_pairs.iter().find(|(k, _)| k == "CMT").map(|(_, v)| v.clone());
    Extracted { times: Some((rec.time.date, rec.time.msec)), comment, ..Default::default() }
}

/// Writes `extracted`'s populated fields back into `ping` in place
/// (§6.2's `insert`, inverse of `extract_ping`).
pub fn insert_ping(ping: &mut Ping, extracted: &Extracted) {
    if let Some((date, msec)) = extracted.times {
        ping.date = date;
        ping.msec = msec;
    }
    if let Some((lon, lat, speed_m_s)) = extracted.nav {
        ping.navlon = lon;
        ping.navlat = lat;
        ping.speed_cm_s = (speed_m_s * 100.0).round().clamp(0.0, u16::MAX as f64) as u16;
    }
    if let Some(bath) = &extracted.bathymetry {
        ping.depth_m = bath.depth_m.clone();
        ping.acrosstrack_m = bath.acrosstrack_m.clone();
        ping.alongtrack_m = bath.alongtrack_m.clone();
        ping.beamflag = bath.beamflag.clone();
    }
    if let Some(amp) = &extracted.amplitude {
        ping.amp_halfdb = amp.clone();
    }
    if let Some(ss) = &extracted.sidescan {
        ping.ss = ss.ss;
        ping.ss_alongtrack = ss.ss_alongtrack;
    }
}

/// Converts a continuous `time_d` (seconds on the same timeline as the
/// merger's `time_to_seconds`) back into `(date, msec)` — `civil_from_days`,
/// the inverse of Howard Hinnant's `days_from_civil`. Used by `insert`
/// and the `timestamp_changed` preprocessor option (§6.3) to recompute
/// the derived `date`/`msec` scalars from a caller-supplied timestamp.
pub fn seconds_to_date_msec(t: f64) -> (u32, u32) {
    let days = (t / 86400.0).floor() as i64;
    let msec = ((t - days as f64 * 86400.0) * 1000.0).round() as u32;

    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let y = if m <= 2 { y + 1 } else { y };

    (y as u32 * 10000 + m * 100 + d, msec)
}

/// Applies the `timestamp_changed` option (§6.3): replaces `ping.date`/
/// `ping.msec` with the `(date, msec)` derived from a caller-supplied
/// `time_d`.
pub fn apply_replacement_timestamp(ping: &mut Ping, time_d: f64) {
    let (date, msec) = seconds_to_date_msec(time_d);
    ping.date = date;
    ping.msec = msec;
}
