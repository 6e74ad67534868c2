//! C7: beam geometry (§4.7). Composes transmit/receive array mounting
//! offsets with instantaneous vessel orientation (Beaudoin et al. 2004
//! ray-geometry composition) and derives each beam's flag.
use emdg_core::enums::{BeamFlag, BeamQualifier};
use emdg_core::records::{Installation, MountOffsets, TxSector};
use emdg_core::{Ping, SonarModel};

use crate::merger::BeamMotion;

/// x = forward, y = starboard, z = down.
#[derive(Debug, Clone, Copy)]
struct Vec3 {
    x: f64,
    y: f64,
    z: f64,
}

/// A resolved mounting orientation, reverse-mount correction already
/// applied (§4.7: "subtracting 180° from the mount heading, negating
/// roll and pitch mount offsets, and negating the steering angle").
#[derive(Debug, Clone, Copy)]
struct ResolvedMount {
    heading_deg: f64,
    roll_deg: f64,
    pitch_deg: f64,
    steer_sign: f64,
}

fn resolve_mount(offsets: MountOffsets) -> ResolvedMount {
    let reversed = offsets.heading_deg > 90.0 && offsets.heading_deg < 270.0;
    if reversed {
        ResolvedMount {
            heading_deg: offsets.heading_deg - 180.0,
            roll_deg: -offsets.roll_deg,
            pitch_deg: -offsets.pitch_deg,
            steer_sign: -1.0,
        }
    } else {
        ResolvedMount {
            heading_deg: offsets.heading_deg,
            roll_deg: offsets.roll_deg,
            pitch_deg: offsets.pitch_deg,
            steer_sign: 1.0,
        }
    }
}

/// Rotates `v` by roll about x, then pitch about y, then heading about
/// z — the standard vessel-attitude composition order.
fn rotate_rph(v: Vec3, roll_deg: f64, pitch_deg: f64, heading_deg: f64) -> Vec3 {
    let (r, p, h) = (roll_deg.to_radians(), pitch_deg.to_radians(), heading_deg.to_radians());

    // Roll about x.
    let v1 = Vec3 { x: v.x, y: v.y * r.cos() - v.z * r.sin(), z: v.y * r.sin() + v.z * r.cos() };
    // Pitch about y.
    let v2 = Vec3 { x: v1.x * p.cos() + v1.z * p.sin(), y: v1.y, z: -v1.x * p.sin() + v1.z * p.cos() };
    // Heading (yaw) about z.
    Vec3 { x: v2.x * h.cos() - v2.y * h.sin(), y: v2.x * h.sin() + v2.y * h.cos(), z: v2.z }
}

/// One beam's steered, mount- and attitude-composed pointing vector,
/// expressed relative to the vessel's heading at ping time (§4.6's
/// "relative to the vessel's heading at ping time as a reference").
fn beam_vector(
    mount: MountOffsets,
    tiltangle_deg: f64,
    pointangle_deg: f64,
    motion: &BeamMotion,
    heading_ping_deg: f64,
) -> Vec3 {
    let m = resolve_mount(mount);

    // Steer fore-aft by the sector's tilt, then athwartship by the
    // beam's receive pointing angle, within the array-local frame.
    let tt = (m.steer_sign * tiltangle_deg).to_radians();
    let pa = (m.steer_sign * pointangle_deg).to_radians();
    let tilted = Vec3 { x: tt.sin(), y: 0.0, z: tt.cos() };
    let steered = Vec3 { x: tilted.x, y: tilted.z * pa.sin(), z: tilted.z * pa.cos() };

    // Mount orientation at tx, instantaneous attitude at tx/rx averaged
    // via the caller (this function is invoked once per time-base); the
    // heading delta re-references the result to heading-at-ping-time.
    let dh = motion.heading_tx_deg - heading_ping_deg;
    rotate_rph(steered, m.roll_deg + motion.roll_tx_deg, m.pitch_deg + motion.pitch_tx_deg, dh)
}

/// Depression/azimuth for one beam (§4.7's closing formula).
pub fn beam_depression_azimuth(v: Vec3) -> (f64, f64) {
    let beam_depression_out = v.z.clamp(-1.0, 1.0).acos().to_degrees();
    let beam_azimuth_out = v.y.atan2(v.x).to_degrees();
    let depression_deg = 90.0 - beam_depression_out;
    let azimuth_deg = (90.0 + beam_azimuth_out).rem_euclid(360.0);
    (depression_deg, azimuth_deg)
}

fn tx_tiltangle_for(tx: &[TxSector], sector: u8) -> f64 {
    tx.iter().find(|t| t.sector == sector).map(|t| t.tiltangle_centideg as f64 / 100.0).unwrap_or(0.0)
}

/// Computes depression/azimuth for every beam and derives each
/// beamflag, writing both into `ping` in place.
pub fn compute_geometry(
    ping: &mut Ping,
    installation: &Installation,
    stc: emdg_core::enums::TransducerConfiguration,
    model: SonarModel,
    motions: &[BeamMotion],
) {
    let mount = installation.mount_offsets(stc);
    let heading_ping_deg = ping.heading_centideg as f64 / 100.0;

    let n = ping.rx.len();
    ping.depression_deg = Vec::with_capacity(n);
    ping.azimuth_deg = Vec::with_capacity(n);
    ping.beamflag = Vec::with_capacity(n);

    // M3's null condition is keyed off Bath2's own `detection_info`, not
    // the rx-beam detection mask — collect the write-backs separately so
    // the loop below can still borrow `ping.rx` immutably.
    let mut m3_write_back = vec![false; n];

    for (i, rx) in ping.rx.iter().enumerate() {
        let motion = motions.get(i).copied().unwrap_or_default();
        let tiltangle = tx_tiltangle_for(&ping.tx, rx.sector);
        let pointangle = rx.pointangle_centideg as f64 / 100.0;
        let v = beam_vector(mount, tiltangle, pointangle, &motion, heading_ping_deg);
        let (depression, azimuth) = beam_depression_azimuth(v);
        ping.depression_deg.push(depression);
        ping.azimuth_deg.push(azimuth);

        let detection = rx.detection;
        let bath_detection = ping.detection_info.get(i).copied().unwrap_or(0);
        let clean = ping.clean.get(i).copied().unwrap_or(0);
        let mut flag = if model.is_m3() && bath_detection & 0x80 != 0 {
            m3_write_back[i] = true;
            BeamFlag::null()
        } else if detection & 0x80 != 0 {
            match detection & 0x0F {
                0 => BeamFlag::flagged(BeamQualifier::Sonar),
                1 | 2 => BeamFlag::flagged(BeamQualifier::Interpolate),
                3 => BeamFlag::flagged(BeamQualifier::Sonar),
                4 => BeamFlag::null(),
                _ => BeamFlag::none(),
            }
        } else if clean != 0 {
            BeamFlag::flagged(BeamQualifier::Sonar)
        } else {
            BeamFlag::none()
        };

        let depth = ping.depth_m.get(i).copied().unwrap_or(0.0);
        let across = ping.acrosstrack_m.get(i).copied().unwrap_or(0.0);
        let along = ping.alongtrack_m.get(i).copied().unwrap_or(0.0);
        if depth.is_nan() || across.is_nan() || along.is_nan() {
            flag = BeamFlag::null();
        }
        ping.beamflag.push(flag);
    }

    for (i, set) in m3_write_back.into_iter().enumerate() {
        if set {
            ping.rx[i].detection |= 0x80;
        }
    }
}
