//! C6: the time-series merger (§4.6). Feeds decoded auxiliary records
//! into the store's interpolation services and, at ping completion,
//! interpolates navigation and motion back onto the ping and its beams.
use emdg_core::enums::DepthSensorHeave;
use emdg_core::interp::InterpolationSeries;
use emdg_core::records::{Attitude, Height, Position};
use emdg_core::store::Store;
use emdg_core::Ping;

/// Converts a `(YYYYMMDD, msec-since-midnight)` pair into a continuous
/// seconds timeline, so samples either side of midnight interpolate
/// correctly. Day numbering follows Howard Hinnant's `days_from_civil`.
pub fn time_to_seconds(date: u32, msec: u32) -> f64 {
    let y = (date / 10000) as i64;
    let m = ((date / 100) % 100) as i64;
    let d = (date % 100) as i64;
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (m + 9) % 12;
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    let days = era * 146097 + doe - 719468;
    days as f64 * 86400.0 + msec as f64 / 1000.0
}

/// Pushes an active `Position` fix's nav and heading into the store
/// (§4.6: "whose `system` byte has bit 7 set").
pub fn push_position(store: &mut Store, pos: &Position) {
    if !pos.is_active() {
        return;
    }
    let t = time_to_seconds(pos.time.date, pos.time.msec);
    if let (Some(lat), Some(lon)) = (pos.lat_deg(), pos.lon_deg()) {
        let speed_m_s = pos.speed_cm_s as f64 / 100.0;
        store.positions.add(t, (lat, lon, speed_m_s));
    }
    store.heading_series.add(t, pos.heading_centideg as f64 / 100.0);
}

/// Pushes an active `Attitude`/`NetworkAttitude` block's samples
/// (§4.6: "whose `sensordescriptor & 0x0E == 0`"). Both the primary and
/// network attitude sources feed the same series; an inactive record
/// simply contributes nothing, leaving the other sensor authoritative.
pub fn push_attitude(store: &mut Store, att: &Attitude) {
    if !att.is_active() {
        return;
    }
    let base = time_to_seconds(att.time.date, att.time.msec);
    for s in &att.samples {
        let t = base + s.t_ms as f64 / 1000.0;
        let heave_m = s.heave_centim as f64 / 100.0;
        let roll_deg = s.roll_centideg as f64 / 100.0;
        let pitch_deg = s.pitch_centideg as f64 / 100.0;
        store.attitude_series.add(t, (heave_m, roll_deg, pitch_deg));
    }
}

/// Pushes a `Height` sample as negated depth (§4.6).
pub fn push_height(store: &mut Store, h: &Height) {
    let t = time_to_seconds(h.time.date, h.time.msec);
    store.depth_series.add(t, -(h.height_m as f64));
}

/// Per-beam vessel orientation at transmit- and receive-time, used by
/// the beam-geometry computation (C7).
#[derive(Debug, Clone, Copy, Default)]
pub struct BeamMotion {
    pub heading_tx_deg: f64,
    pub roll_tx_deg: f64,
    pub pitch_tx_deg: f64,
    pub heave_tx_m: f64,
    pub heading_rx_deg: f64,
    pub roll_rx_deg: f64,
    pub pitch_rx_deg: f64,
    pub heave_rx_m: f64,
}

/// The four interpolation services the merger reads from, borrowed
/// either from a [`Store`] (`merge_ping`) or from caller-supplied
/// replacement arrays (`preprocess`, §6.2/§6.3's "supplied complete
/// replacement time-series" mode — "all interpolation switches to the
/// supplied arrays").
pub struct MergeSeries<'a> {
    pub positions: &'a InterpolationSeries<(f64, f64, f64)>,
    pub heading: &'a InterpolationSeries<f64>,
    pub attitude: &'a InterpolationSeries<(f64, f64, f64)>,
    pub depth: &'a InterpolationSeries<f64>,
}

/// Interpolates navigation and motion onto `ping` and returns the
/// per-beam transmit/receive motion needed by C7. Writes `navlat/navlon`,
/// `speed_cm_s`, `heave/roll/pitch_centideg` and `beam_heave_m` in place.
///
/// `depth_sensor_heave` selects whether a sensor-depth fix (pushed from
/// `Height` records into the depth series) replaces the attitude-derived
/// heave at ping time (`In`) or is left as a secondary augmentation with
/// no further effect here (`Ni`), per the installation's `par_dsh`.
pub fn merge_ping(store: &Store, ping: &mut Ping, depth_sensor_heave: DepthSensorHeave) -> Vec<BeamMotion> {
    let series = MergeSeries {
        positions: &store.positions,
        heading: &store.heading_series,
        attitude: &store.attitude_series,
        depth: &store.depth_series,
    };
    merge_with_series(&series, ping, depth_sensor_heave)
}

/// The two options `preprocess` accepts beyond the replacement series
/// themselves (§6.2/§6.3): the `IgnoreSnippets` kluge (suppress sidescan
/// assembly — here, drop any snippet the ping already carries rather
/// than merging motion onto it) and an optional replacement ping
/// timestamp (`timestamp_changed`, applied via
/// [`crate::projection::apply_replacement_timestamp`] before the C6
/// merge runs so the interpolation lookups below use the new time).
#[derive(Debug, Clone, Copy, Default)]
pub struct PreprocessOptions {
    pub ignore_snippets: bool,
    pub replacement_time_d: Option<f64>,
}

/// §6.2's `preprocess`: runs the same C6 merge as `merge_ping`, but
/// against caller-supplied replacement time-series instead of the
/// store's own interpolation history.
pub fn preprocess(
    series: &MergeSeries,
    ping: &mut Ping,
    depth_sensor_heave: DepthSensorHeave,
    options: PreprocessOptions,
) -> Vec<BeamMotion> {
    if let Some(time_d) = options.replacement_time_d {
        emdg_core::projection::apply_replacement_timestamp(ping, time_d);
    }
    if options.ignore_snippets {
        ping.ss_raw.clear();
        ping.ss_beam_samples.clear();
        ping.ss_start_sample.clear();
        ping.ss_center_sample.clear();
    }
    merge_with_series(series, ping, depth_sensor_heave)
}

fn merge_with_series(series: &MergeSeries, ping: &mut Ping, depth_sensor_heave: DepthSensorHeave) -> Vec<BeamMotion> {
    let t_ping = time_to_seconds(ping.date, ping.msec);

    if let Some((lat, lon, speed)) = series.positions.interp(t_ping) {
        ping.navlat = lat;
        ping.navlon = lon;
        ping.speed_cm_s = (speed * 100.0).round().clamp(0.0, u16::MAX as f64) as u16;
    }
    if let Some((heave, roll, pitch)) = series.attitude.interp(t_ping) {
        ping.heave_centim = (heave * 100.0).round() as i16;
        ping.roll_centideg = (roll * 100.0).round() as i16;
        ping.pitch_centideg = (pitch * 100.0).round() as i16;
    }
    if depth_sensor_heave == DepthSensorHeave::In {
        if let Some(depth_heave) = series.depth.interp(t_ping) {
            ping.heave_centim = (depth_heave * 100.0).round() as i16;
        }
    }
    let heading_ping = series.heading.interp(t_ping).unwrap_or(ping.heading_centideg as f64 / 100.0);
    let ping_heave_m = ping.heave_centim as f64 / 100.0;

    ping.range_sec = ping.rx.iter().map(|r| r.range_s).collect();
    let mut motions = Vec::with_capacity(ping.rx.len());
    ping.beam_heave_m = Vec::with_capacity(ping.rx.len());
    for rx in &ping.rx {
        let tx_offset_s = ping
            .tx
            .iter()
            .find(|t| t.sector == rx.sector)
            .map(|t| t.offset_s as f64)
            .unwrap_or(0.0);
        let t_tx = t_ping + tx_offset_s;
        let t_rx = t_tx + rx.range_s as f64;

        let (heave_tx, roll_tx, pitch_tx) = series.attitude.interp(t_tx).unwrap_or((0.0, 0.0, 0.0));
        let (heave_rx, roll_rx, pitch_rx) = series.attitude.interp(t_rx).unwrap_or((0.0, 0.0, 0.0));
        let heading_tx = series.heading.interp(t_tx).unwrap_or(heading_ping);
        let heading_rx = series.heading.interp(t_rx).unwrap_or(heading_ping);

        ping.beam_heave_m.push(((heave_tx + heave_rx) / 2.0 - ping_heave_m) as f32);
        motions.push(BeamMotion {
            heading_tx_deg: heading_tx,
            roll_tx_deg: roll_tx,
            pitch_tx_deg: pitch_tx,
            heave_tx_m: heave_tx,
            heading_rx_deg: heading_rx,
            roll_rx_deg: roll_rx,
            pitch_rx_deg: pitch_rx,
            heave_rx_m: heave_rx,
        });
    }
    motions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_to_seconds_is_monotonic_across_midnight() {
        let before = time_to_seconds(20230101, 86_399_000);
        let after = time_to_seconds(20230102, 0);
        assert!(after > before);
        assert!((after - before - 1.0).abs() < 1e-9);
    }

    #[test]
    fn preprocess_uses_supplied_series_instead_of_store() {
        use emdg_core::Ping;

        let cap = 16;
        let mut positions = InterpolationSeries::new(cap);
        let heading = InterpolationSeries::new(cap);
        let mut attitude = InterpolationSeries::new(cap);
        let depth = InterpolationSeries::new(cap);

        let t_ping = time_to_seconds(20230101, 0);
        positions.add(t_ping, (10.0, 20.0, 5.0));
        attitude.add(t_ping, (1.5, 0.0, 0.0));

        let series = MergeSeries { positions: &positions, heading: &heading, attitude: &attitude, depth: &depth };
        let mut ping = Ping::empty();
        ping.date = 20230101;
        ping.msec = 0;

        preprocess(&series, &mut ping, DepthSensorHeave::Ni, PreprocessOptions::default());
        assert_eq!(ping.navlat, 10.0);
        assert_eq!(ping.navlon, 20.0);
        assert_eq!(ping.heave_centim, 150);
    }

    #[test]
    fn preprocess_ignore_snippets_clears_any_existing_sidescan() {
        use emdg_core::Ping;

        let cap = 4;
        let positions = InterpolationSeries::new(cap);
        let heading = InterpolationSeries::new(cap);
        let attitude = InterpolationSeries::new(cap);
        let depth = InterpolationSeries::new(cap);
        let series = MergeSeries { positions: &positions, heading: &heading, attitude: &attitude, depth: &depth };

        let mut ping = Ping::empty();
        ping.ss_raw = vec![1, 2, 3];
        ping.ss_beam_samples = vec![3];
        ping.ss_start_sample = vec![0];
        ping.ss_center_sample = vec![1];

        let options = PreprocessOptions { ignore_snippets: true, replacement_time_d: None };
        preprocess(&series, &mut ping, DepthSensorHeave::Ni, options);
        assert!(ping.ss_raw.is_empty());
        assert!(ping.ss_beam_samples.is_empty());
    }

    #[test]
    fn preprocess_replaces_timestamp_before_merging() {
        use emdg_core::Ping;

        let cap = 4;
        let mut positions = InterpolationSeries::new(cap);
        let heading = InterpolationSeries::new(cap);
        let attitude = InterpolationSeries::new(cap);
        let depth = InterpolationSeries::new(cap);

        let new_time_d = time_to_seconds(20230615, 43_200_000);
        positions.add(new_time_d, (1.0, 2.0, 0.0));
        let series = MergeSeries { positions: &positions, heading: &heading, attitude: &attitude, depth: &depth };

        let mut ping = Ping::empty();
        ping.date = 20200101;
        ping.msec = 0;

        let options = PreprocessOptions { ignore_snippets: false, replacement_time_d: Some(new_time_d) };
        preprocess(&series, &mut ping, DepthSensorHeave::Ni, options);
        assert_eq!(ping.date, 20230615);
        assert_eq!(ping.navlat, 1.0);
    }

    #[test]
    fn push_position_ignores_inactive_fix() {
        let mut store = Store::new(emdg_core::settings::EngineSettings::default());
        let pos = Position {
            time: emdg_core::records::TimeStamp { date: 20230101, msec: 0 },
            serial: 1,
            lat_raw: 450_000_000,
            lon_raw: -1_200_000_000,
            fix_quality_cm: 0,
            speed_cm_s: 0,
            course_centideg: 0,
            heading_centideg: 9000,
            system: 0x00,
            input_bytes: 0,
            source: String::new(),
        };
        push_position(&mut store, &pos);
        assert!(store.positions.is_empty());
    }
}
