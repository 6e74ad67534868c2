//! Reverse assembly: reconstructs the wire sub-records (`Bath2`,
//! `RawBeam4`, `SS2`) that a completed [`Ping`] was built from, so
//! [`crate::encode`] has something to serialise. This is the mirror
//! image of `emdg_in::assembler`'s `ingest_*`/`deliver_and_reset`.
use emdg_core::records::{Bath2, RawBeam4, Ss2, SsBeam, TimeStamp};
use emdg_core::Ping;

/// Converts a degree value back to the raw fixed-point encoding used by
/// `Bath2.lat_raw`/`lon_raw`, or the "invalid" sentinel for a non-finite
/// input. `Ping` only retains the merged/interpolated `navlat`/`navlon`
/// fix, not the per-beam position `Bath2` originally carried, so this is
/// a reconstruction rather than a verbatim round-trip.
fn raw_from_deg(deg: f64, scale: f64) -> i32 {
    if deg.is_finite() {
        (deg * scale).round() as i32
    } else {
        i32::MAX
    }
}

pub fn split_bath2(ping: &Ping) -> Bath2 {
    Bath2 {
        time: TimeStamp { date: ping.date, msec: ping.msec },
        count: ping.count,
        serial: ping.serial,
        lat_raw: raw_from_deg(ping.navlat, 2.0e7),
        lon_raw: raw_from_deg(ping.navlon, 1.0e7),
        heading_centideg: ping.heading_centideg,
        heave_centim: ping.heave_centim,
        roll_centideg: ping.roll_centideg,
        pitch_centideg: ping.pitch_centideg,
        ssv_decim_s: ping.ssv_decim_s,
        xducer_depth_m: ping.xducer_depth_m,
        nbeams: ping.nbeams,
        nbeams_valid: ping.nbeams_valid,
        sample_rate_hz: ping.sample_rate_hz,
        depth_m: ping.depth_m.clone(),
        acrosstrack_m: ping.acrosstrack_m.clone(),
        alongtrack_m: ping.alongtrack_m.clone(),
        window_samples: ping.window_samples.clone(),
        quality: ping.quality_0_254.clone(),
        iba_centideg: ping.iba_centideg.clone(),
        detection_info: ping.detection_info.clone(),
        clean: ping.clean.clone(),
        amp_halfdb: ping.amp_halfdb.clone(),
    }
}

/// `ndetections` is not retained on `Ping` separately from `rx`, so it
/// is reported as the full receive-beam count (every beam "detected").
pub fn split_rawbeam4(ping: &Ping) -> RawBeam4 {
    RawBeam4 {
        time: TimeStamp { date: ping.date, msec: ping.msec },
        count: ping.count,
        serial: ping.serial,
        ssv_decim_s: ping.ssv_decim_s,
        ntx: ping.tx.len() as u16,
        nbeams: ping.rx.len() as u16,
        ndetections: ping.rx.len() as u16,
        sample_rate_hz: ping.sample_rate_hz,
        tx: ping.tx.clone(),
        rx: ping.rx.clone(),
    }
}

/// The per-beam TVG/sort-order scalars `SS2` originally carried
/// (`r_zero`, `bsn`/`bso_decidb`, `tx`/`tvg_crossover_decideg`,
/// `sort_direction`, `detection_info`) are not retained by `Ping` beyond
/// what the regridder needed, so they are reconstructed as zero.
pub fn split_ss2(ping: &Ping) -> Ss2 {
    let nbeams = ping.ss_beam_samples.len();
    let beams = (0..nbeams)
        .map(|i| SsBeam {
            sort_direction: 0,
            detection_info: 0,
            beam_samples: ping.ss_beam_samples[i],
            start_sample: ping.ss_start_sample[i],
            center_sample: ping.ss_center_sample[i],
        })
        .collect();
    Ss2 {
        time: TimeStamp { date: ping.date, msec: ping.msec },
        count: ping.count,
        serial: ping.serial,
        sample_rate_hz: ping.sample_rate_hz,
        r_zero: 0,
        bsn_decidb: 0,
        bso_decidb: 0,
        tx_decideg: 0,
        tvg_crossover_decideg: 0,
        nbeams: nbeams as u16,
        npixels: ping.ss.len() as u16,
        beams,
        raw_samples: ping.ss_raw.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_bath2_marks_non_finite_nav_as_invalid() {
        let mut ping = Ping::empty();
        ping.navlat = f64::NAN;
        ping.navlon = 12.5;
        let bath = split_bath2(&ping);
        assert_eq!(bath.lat_raw, i32::MAX);
        assert_eq!(bath.lon_raw, (12.5 * 1.0e7).round() as i32);
    }

    #[test]
    fn split_rawbeam4_counts_match_ping_arrays() {
        let mut ping = Ping::empty();
        ping.tx = vec![Default::default(); 3];
        ping.rx = vec![Default::default(); 5];
        let raw = split_rawbeam4(&ping);
        assert_eq!(raw.ntx, 3);
        assert_eq!(raw.nbeams, 5);
        assert_eq!(raw.ndetections, 5);
    }

    #[test]
    fn split_ss2_preserves_snippet_geometry() {
        let mut ping = Ping::empty();
        ping.ss_beam_samples = vec![10, 20];
        ping.ss_start_sample = vec![0, 10];
        ping.ss_center_sample = vec![5, 20];
        ping.ss_raw = vec![1; 30];
        let ss2 = split_ss2(&ping);
        assert_eq!(ss2.nbeams, 2);
        assert_eq!(ss2.beams[1].beam_samples, 20);
        assert_eq!(ss2.raw_samples.len(), 30);
    }
}
