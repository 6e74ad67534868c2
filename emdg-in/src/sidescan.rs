//! C8: the sidescan regridder (§4.8). Bins per-beam snippets into a
//! fixed 1024-pixel across-track grid, smoothing the pixel size between
//! calls the way the source's `mbsys_simrad3_makess` does.
use emdg_core::records::RuntimeParameters;
use emdg_core::store::Store;
use emdg_core::{Ping, SonarModel, SIDESCAN_PIXELS};

/// Sentinel raw-amplitude value meaning "no data at this sample"
/// (`EM3_INVALID_AMP`).
const INVALID_AMP: i16 = 0x7F;

/// `reflscale`: converts the 0.5-dB raw amplitude units into the
/// physical intensity stored in `ping.ss`.
const REFL_SCALE: f64 = 0.1;

/// Interpolation reach for empty pixels: gaps up to `PIXEL_INT + 1`
/// pixels wide are filled by linear interpolation between the bracketing
/// filled pixels. The source takes this as a caller-supplied parameter
/// (`mbbackangle`'s `pixel_int`); fixed here since the settings surface
/// (§6.3) exposes no equivalent knob — see `DESIGN.md`.
const PIXEL_INT: usize = 4;

fn median_depth(ping: &Ping) -> Option<f64> {
    let mut depths: Vec<f64> = ping
        .rx
        .iter()
        .zip(ping.depth_m.iter())
        .zip(ping.beamflag.iter())
        .filter(|((_rx, _d), flag)| flag.is_valid())
        .map(|((_rx, d), _flag)| *d as f64 + ping.xducer_depth_m as f64)
        .collect();
    if depths.is_empty() {
        return None;
    }
    depths.sort_by(|a, b| a.partial_cmp(b).unwrap());
    Some(depths[depths.len() / 2])
}

fn swath_width_deg(ping: &Ping, runtime: Option<&RuntimeParameters>) -> f64 {
    if let Some(rt) = runtime {
        if rt.max_swath_deg > 0 {
            return rt.max_swath_deg as f64;
        }
    }
    let first = ping.depression_deg.first().copied().unwrap_or(90.0);
    let last = ping.depression_deg.last().copied().unwrap_or(90.0);
    2.5 + (90.0 - first).max(90.0 - last)
}

fn smooth_pixel_size(store: &mut Store, calc: f64) -> f64 {
    let smoothed = match store.sidescan_pixel_size_m {
        None => calc,
        Some(prev) if prev <= 0.0 => calc,
        Some(prev) if 0.95 * prev > calc => 0.95 * prev,
        Some(prev) if 1.05 * prev < calc => 1.05 * prev,
        Some(_) => calc,
    };
    store.sidescan_pixel_size_m = Some(smoothed);
    smoothed
}

/// Regrids `ping`'s sidescan snippets in place. Zeroes the grid and
/// emits a single mismatch warning if the bath and sidescan beam counts
/// disagree by more than the source's one-beam tolerance.
pub fn regrid(store: &mut Store, ping: &mut Ping, model: SonarModel, runtime: Option<&RuntimeParameters>) {
    ping.ss = [None; SIDESCAN_PIXELS];
    ping.ss_alongtrack = [0.0; SIDESCAN_PIXELS];

    let nbath = ping.nbeams as usize;
    let nss = ping.ss_beam_samples.len();
    if nbath < nss || nbath > nss + 1 {
        store.statistics.sidescan_mismatches += 1;
        if !store.statistics.sidescan_mismatch_warned {
            log::warn!("sidescan ignored: bath beams {nbath} != ss beams {nss}");
            store.statistics.sidescan_mismatch_warned = true;
        }
        return;
    }

    let Some(median) = median_depth(ping) else { return };
    let beamwidth_deg = runtime
        .map(|r| r.tx_beamwidth_deg as f64)
        .filter(|v| *v > 0.0)
        .unwrap_or_else(|| model.default_tx_beamwidth_deg());
    let swath = swath_width_deg(ping, runtime);

    let mut pixel_size = 2.0 * swath.to_radians().tan() * median / SIDESCAN_PIXELS as f64;
    if let Some(rt) = runtime {
        if rt.max_swath_deg > 0 {
            let max_bound = 2.0 * rt.max_swath_deg as f64 / SIDESCAN_PIXELS as f64;
            pixel_size = pixel_size.min(max_bound);
        }
    }
    pixel_size = pixel_size.max(median * (0.1_f64).to_radians().sin());
    let pixel_size = smooth_pixel_size(store, pixel_size);
    if pixel_size <= 0.0 {
        return;
    }

    let ss_spacing = 750.0 / ping.sample_rate_hz as f64;

    let mut sum = vec![0.0_f64; SIDESCAN_PIXELS];
    let mut sum_along = vec![0.0_f64; SIDESCAN_PIXELS];
    let mut count = vec![0_u32; SIDESCAN_PIXELS];

    for i in 0..nss {
        if !ping.beamflag.get(i).map(|f| f.is_valid()).unwrap_or(false) {
            continue;
        }
        let beam_samples = ping.ss_beam_samples[i] as usize;
        if beam_samples == 0 {
            continue;
        }
        let start = ping.ss_start_sample[i] as usize;
        let center = ping.ss_center_sample[i] as f64;
        let depth = ping.depth_m[i] as f64;
        let across = ping.acrosstrack_m[i] as f64;
        let along = ping.alongtrack_m[i] as f64;
        let depression = ping.depression_deg[i];

        let range = (depth * depth + across * across).sqrt();
        let angle_deg = 90.0 - depression;
        let foot = range * beamwidth_deg.to_radians().sin() / angle_deg.to_radians().cos();
        let sint = angle_deg.to_radians().sin().abs();
        let spacing_use = if sint < beam_samples as f64 * ss_spacing / foot {
            foot / beam_samples as f64
        } else {
            ss_spacing / sint
        };

        for k in 0..beam_samples {
            let Some(raw) = ping.ss_raw.get(start + k).copied() else { break };
            if raw == INVALID_AMP {
                continue;
            }
            let xtrack = across + spacing_use * (k as f64 - center);
            let kk = SIDESCAN_PIXELS as i64 / 2 + (xtrack / pixel_size) as i64;
            if kk > 0 && (kk as usize) < SIDESCAN_PIXELS {
                let kk = kk as usize;
                sum[kk] += REFL_SCALE * raw as f64;
                sum_along[kk] += along;
                count[kk] += 1;
            }
        }
    }

    let mut first = None;
    let mut last = None;
    for k in 0..SIDESCAN_PIXELS {
        if count[k] > 0 {
            ping.ss[k] = Some(sum[k] / count[k] as f64);
            ping.ss_alongtrack[k] = sum_along[k] / count[k] as f64;
            first.get_or_insert(k);
            last = Some(k);
        }
    }

    if let (Some(first), Some(last)) = (first, last) {
        let mut k1 = first;
        let mut k2 = first;
        for k in (first + 1)..last {
            if count[k] == 0 {
                if k2 <= k {
                    k2 = k + 1;
                    while k2 < last && count[k2] == 0 {
                        k2 += 1;
                    }
                }
                if k2 - k1 <= PIXEL_INT + 1 && count[k1] > 0 && count[k2] > 0 {
                    let v1 = ping.ss[k1].unwrap();
                    let v2 = ping.ss[k2].unwrap();
                    let frac = (k - k1) as f64 / (k2 - k1) as f64;
                    ping.ss[k] = Some(v1 + (v2 - v1) * frac);
                    ping.ss_alongtrack[k] =
                        ping.ss_alongtrack[k1] + (ping.ss_alongtrack[k2] - ping.ss_alongtrack[k1]) * frac;
                }
            } else {
                k1 = k;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emdg_core::enums::BeamFlag;
    use emdg_core::settings::EngineSettings;

    fn flat_ping(nbeams: usize) -> Ping {
        let mut p = Ping::empty();
        p.nbeams = nbeams as u16;
        p.sample_rate_hz = 20_000.0;
        p.xducer_depth_m = 0.0;
        p.depth_m = vec![100.0; nbeams];
        p.acrosstrack_m = (0..nbeams).map(|i| (i as f32 - nbeams as f32 / 2.0) * 2.0).collect();
        p.alongtrack_m = vec![0.0; nbeams];
        p.depression_deg = vec![80.0; nbeams];
        p.beamflag = vec![BeamFlag::none(); nbeams];
        p.ss_beam_samples = vec![4; nbeams];
        p.ss_start_sample = (0..nbeams as u16).map(|i| i * 4).collect();
        p.ss_center_sample = vec![2; nbeams];
        p.ss_raw = vec![20_i16; nbeams * 4];
        p
    }

    #[test]
    fn mismatched_beam_counts_zero_the_grid_and_warn_once() {
        let mut store = Store::new(EngineSettings::default());
        let mut ping = flat_ping(200);
        ping.nbeams = 200;
        ping.ss_beam_samples = vec![4; 180];
        regrid(&mut store, &mut ping, SonarModel::Em710, None);
        assert!(ping.ss.iter().all(|s| s.is_none()));
        assert_eq!(store.statistics.sidescan_mismatches, 1);
        regrid(&mut store, &mut ping, SonarModel::Em710, None);
        assert_eq!(store.statistics.sidescan_mismatches, 2);
    }

    #[test]
    fn matched_ping_fills_some_pixels() {
        let mut store = Store::new(EngineSettings::default());
        let mut ping = flat_ping(16);
        regrid(&mut store, &mut ping, SonarModel::Em710, None);
        assert!(ping.ss.iter().any(|s| s.is_some()));
    }
}
