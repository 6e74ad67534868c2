//! C3: the datagram encoders (§4.3), the mirror image of `emdg_in`'s
//! decoders. Each function writes one record's header-and-body payload
//! in exact on-wire order; [`write_record`] wraps the result with the
//! length placeholder, envelope and write-time checksum.
use std::io::{self, Write};

use emdg_core::records::*;
use emdg_core::SonarModel;
use num_traits::ToPrimitive;

use crate::bytes::ByteWriter;

fn write_time(w: &mut ByteWriter, t: TimeStamp) {
    w.u32(t.date);
    w.u32(t.msec);
}

pub fn model_code(model: SonarModel) -> u16 {
    model.to_u16().unwrap_or(0)
}

/// Picks the wire id an `Installation` record writes as: `Start`/the
/// comment variant both go out as `0x49`, `Stop` as `0x69` (§6.1).
pub fn installation_id(kind: emdg_core::enums::InstallationKind) -> u8 {
    use emdg_core::enums::InstallationKind::*;
    match kind {
        Start | Comment => 0x49,
        Stop => 0x69,
    }
}

/// Writes one complete record: length placeholder, `start`/`id`/`model`,
/// `body` (padded to an even length first if `pad_even`), `0x03`, and
/// the 16-bit checksum over everything from `id` through the stop byte.
pub fn write_record<W: Write>(w: &mut W, id: u8, model: u16, body: &[u8], pad_even: bool) -> io::Result<()> {
    let mut body = body.to_vec();
    if pad_even && body.len() % 2 != 0 {
        body.push(0);
    }
    let model_bytes = model.to_le_bytes();
    let len: u32 = 4 + body.len() as u32 + 1 + 2;

    let mut checksum: u16 = 0;
    checksum = checksum.wrapping_add(id as u16);
    checksum = checksum.wrapping_add(model_bytes[0] as u16).wrapping_add(model_bytes[1] as u16);
    for &b in &body {
        checksum = checksum.wrapping_add(b as u16);
    }
    checksum = checksum.wrapping_add(0x03);

    w.write_all(&len.to_le_bytes())?;
    w.write_all(&[0x02, id])?;
    w.write_all(&model_bytes)?;
    w.write_all(&body)?;
    w.write_all(&[0x03])?;
    w.write_all(&checksum.to_le_bytes())?;
    Ok(())
}

pub fn encode_installation(rec: &Installation) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u32(rec.line_number);
    w.u16(rec.serial);
    let text = rec
        .raw_pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v.replace(',', "^")))
        .collect::<Vec<_>>()
        .join(",");
    w.ascii_with_stop(&text);
    w.into_bytes()
}

pub fn encode_runtime_parameters(rec: &RuntimeParameters) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.u8(rec.mode);
    w.u8(rec.filter_bits);
    w.u16((rec.min_depth_m * 10.0).round() as u16);
    w.u16((rec.max_depth_m * 10.0).round() as u16);
    w.i8(rec.transmit_power_db);
    w.u16((rec.tx_beamwidth_deg * 10.0).round() as u16);
    w.u16((rec.rx_beamwidth_deg * 10.0).round() as u16);
    w.u16(rec.max_swath_deg);
    w.u8(rec.stabilisation_mode);
    w.i32(rec.transducer_configuration.to_i32().unwrap_or(-1));
    w.into_bytes()
}

pub fn encode_clock(rec: &Clock) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    write_time(&mut w, rec.external_time);
    w.u8(rec.pps_in_use as u8);
    w.into_bytes()
}

pub fn encode_tide(rec: &Tide) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.i16((rec.tide_m * 100.0).round() as i16);
    w.into_bytes()
}

pub fn encode_height(rec: &Height) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.i32((rec.height_m * 100.0).round() as i32);
    w.u8(rec.height_type);
    w.into_bytes()
}

pub fn encode_heading(rec: &Heading) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.u16(rec.ndata_on_disk);
    for s in &rec.samples {
        w.u16(s.t_ms);
        w.i16(s.heading_centideg);
    }
    w.u8(rec.status);
    w.into_bytes()
}

pub fn encode_attitude(rec: &Attitude) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.u16(rec.ndata_on_disk);
    for (i, s) in rec.samples.iter().enumerate() {
        w.u16(s.t_ms);
        w.u16(s.status);
        w.i16(s.roll_centideg);
        w.i16(s.pitch_centideg);
        w.i16(s.heave_centim);
        w.u16(s.heading_centideg);
        if let Some(blobs) = &rec.raw_nmea {
            let blob = blobs.get(i).map(|b| b.as_slice()).unwrap_or(&[]);
            w.u16(blob.len() as u16);
            w.bytes(blob);
        }
    }
    w.u8(rec.sensor_descriptor);
    w.into_bytes()
}

pub fn encode_ssv(rec: &Ssv) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.u16(rec.samples.len() as u16);
    for s in &rec.samples {
        w.u16(s.t_ms);
        w.i16(s.value);
    }
    w.into_bytes()
}

pub fn encode_tilt(rec: &Tilt) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.u16(rec.samples.len() as u16);
    for s in &rec.samples {
        w.u16(s.t_ms);
        w.i16(s.value);
    }
    w.into_bytes()
}

pub fn encode_position(rec: &Position) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.i32(rec.lat_raw);
    w.i32(rec.lon_raw);
    w.u16(rec.fix_quality_cm);
    w.u16(rec.speed_cm_s);
    w.u16(rec.course_centideg);
    w.u16(rec.heading_centideg);
    w.u8(rec.system);
    w.u8(rec.input_bytes);
    w.ascii_with_stop(&rec.source);
    w.into_bytes()
}

pub fn encode_svp(rec: &Svp) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    write_time(&mut w, rec.profile_time);
    w.u16(rec.points.len() as u16);
    for p in &rec.points {
        w.u32(p.depth_cm);
        w.u32(p.speed_decim_s);
    }
    w.into_bytes()
}

pub fn encode_extra_parameters(rec: &ExtraParameters) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.u16(rec.sub_id);
    w.bytes(&rec.raw);
    w.into_bytes()
}

pub fn encode_pu_status(rec: &PuStatus) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.serial);
    w.u16(rec.ping_rate_centihz);
    w.u32(rec.ping_count);
    w.u8(rec.load);
    w.u32(rec.sensor_status);
    w.u8(rec.achieved_port_coverage_deg);
    w.u8(rec.achieved_stbd_coverage_deg);
    w.i16(rec.yaw_stabilisation_deg);
    w.into_bytes()
}

pub fn encode_bath2(rec: &Bath2) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.count);
    w.u16(rec.serial);
    w.i32(rec.lat_raw);
    w.i32(rec.lon_raw);
    w.u16(rec.heading_centideg);
    w.i16(rec.heave_centim);
    w.i16(rec.roll_centideg);
    w.i16(rec.pitch_centideg);
    w.u16(rec.ssv_decim_s);
    w.i32((rec.xducer_depth_m * 100.0).round() as i32);
    w.u16(rec.nbeams);
    w.u16(rec.nbeams_valid);
    w.u32((rec.sample_rate_hz * 10.0).round() as u32);
    for i in 0..rec.nbeams as usize {
        w.i32((rec.depth_m[i] * 100.0).round() as i32);
        w.i32((rec.acrosstrack_m[i] * 100.0).round() as i32);
        w.i32((rec.alongtrack_m[i] * 100.0).round() as i32);
        w.u16(rec.window_samples[i]);
        w.u8(rec.quality[i]);
        w.i8(rec.iba_centideg[i]);
        w.u8(rec.detection_info[i]);
        w.i8(rec.clean[i]);
        w.i8(rec.amp_halfdb[i]);
        w.u8(0); // spare byte padding each beam entry out to 20 bytes
    }
    w.into_bytes()
}

pub fn encode_rawbeam4(rec: &RawBeam4) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.count);
    w.u16(rec.serial);
    w.u16(rec.ssv_decim_s);
    w.u16(rec.ntx);
    w.u16(rec.nbeams);
    w.u16(rec.ndetections);
    w.u32((rec.sample_rate_hz * 10.0).round() as u32);
    for t in &rec.tx {
        w.i16(t.tiltangle_centideg);
        w.i16(t.focus_decim);
        w.u32((t.signallength_s * 1e6).round() as u32);
        w.i32((t.offset_s * 1e6).round() as i32);
        w.u32(t.center_hz.round() as u32);
        w.i16(t.absorption_centidb_km);
        w.u8(t.waveform);
        w.u8(t.sector);
        w.u32(t.bandwidth_hz.round() as u32);
    }
    for b in &rec.rx {
        w.i16(b.pointangle_centideg);
        w.u8(b.sector);
        w.u8(b.detection);
        w.u16(b.window);
        w.u8(b.quality);
        w.u8(b.spare1);
        w.u32((b.range_s * 4e4).round() as u32);
        w.i16(b.amp_halfdb);
        w.u8(b.cleaning);
        w.u8(b.spare2);
    }
    w.into_bytes()
}

pub fn encode_quality(rec: &Quality) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.count);
    w.u16(rec.serial);
    w.u16(rec.quality_factor.len() as u16);
    for q in &rec.quality_factor {
        w.u16((*q * 100.0).round() as u16);
    }
    w.into_bytes()
}

pub fn encode_ss2(rec: &Ss2) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.count);
    w.u16(rec.serial);
    w.u32((rec.sample_rate_hz * 10.0).round() as u32);
    w.u16(rec.r_zero);
    w.i16(rec.bsn_decidb);
    w.i16(rec.bso_decidb);
    w.u16(rec.tx_decideg);
    w.u16(rec.tvg_crossover_decideg);
    w.u16(rec.nbeams);
    for b in &rec.beams {
        w.i8(b.sort_direction);
        w.u8(b.detection_info);
        w.u16(b.beam_samples);
        w.u16(b.start_sample);
        // `center_sample` is derived, never transmitted (EM3_SS2_BEAM_SIZE is 6 bytes).
    }
    for s in &rec.raw_samples {
        w.i16(*s);
    }
    w.into_bytes()
}

pub fn encode_water_column(rec: &WaterColumn) -> Vec<u8> {
    let mut w = ByteWriter::new();
    write_time(&mut w, rec.time);
    w.u16(rec.count);
    w.u16(rec.serial);
    w.u16(rec.ndatagrams);
    w.u16(rec.datagram_number);
    w.u16(rec.ntx);
    w.u16(rec.nbeams_total);
    w.u16(rec.nbeams_this_datagram);
    w.u16(rec.sound_speed_decim_s);
    w.u32(rec.sample_rate_hz);
    for t in &rec.tx_tilt_centideg {
        w.i16(*t);
    }
    for i in 0..rec.nbeams_this_datagram as usize {
        w.i16(rec.beam_pointangle_centideg[i]);
        w.u16(rec.beam_samples[i].len() as u16);
        w.u16(rec.beam_start_range_samples[i]);
        for s in &rec.beam_samples[i] {
            w.i8(*s);
        }
    }
    w.into_bytes()
}
