//! Cross-crate round-trip tests: write a record with `emdg_out`, read
//! it back with `emdg_in`/`emdg_core`, and check the two halves agree.
use std::io::Cursor;

use emdg_core::enums::{DepthSensorHeave, InstallationKind};
use emdg_core::records::*;
use emdg_core::store::Statistics;
use emdg_core::{Ping, SonarModel};
use emdg_in::decode::{self, Decoded};
use emdg_in::framer::Framer;

use crate::WriteHandle;

fn read_one(buf: Vec<u8>) -> Decoded {
    let raw = Framer::new().next_record(&mut Cursor::new(buf), &mut Statistics::default()).expect("one record");
    decode::decode(&raw).expect("decodable")
}

fn sample_clock() -> Clock {
    Clock {
        time: TimeStamp { date: 20230615, msec: 12_345 },
        serial: 42,
        external_time: TimeStamp { date: 20230615, msec: 12_340 },
        pps_in_use: true,
    }
}

#[test]
fn clock_round_trips_byte_for_byte() {
    let mut buf = Vec::new();
    let mut handle = WriteHandle::open(&mut buf, SonarModel::Em710);
    handle.write_clock(&sample_clock()).unwrap();

    match read_one(buf) {
        Decoded::Clock(rec) => assert_eq!(rec, sample_clock()),
        other => panic!("expected Clock, got {other:?}"),
    }
}

#[test]
fn installation_comma_escaping_survives_the_round_trip() {
    let rec = Installation {
        kind: InstallationKind::Start,
        time: TimeStamp { date: 20230615, msec: 0 },
        line_number: 3,
        serial: 9,
        array1_offsets: MountOffsets::default(),
        array2_offsets: MountOffsets::default(),
        depth_sensor_heave: DepthSensorHeave::Ni,
        raw_pairs: vec![("CMT".to_string(), "survey line 1, second pass".to_string())],
    };

    let mut buf = Vec::new();
    let mut handle = WriteHandle::open(&mut buf, SonarModel::Em3002);
    handle.write_installation(&rec).unwrap();

    match read_one(buf) {
        Decoded::Installation(back) => {
            let cmt = back.raw_pairs.iter().find(|(k, _)| k == "CMT").map(|(_, v)| v.clone());
            assert_eq!(cmt.as_deref(), Some("survey line 1, second pass"));
        }
        other => panic!("expected Installation, got {other:?}"),
    }
}

#[test]
fn write_ping_round_trips_bathymetry_through_bath2() {
    let mut ping = Ping::empty();
    ping.date = 20230615;
    ping.msec = 1_000;
    ping.count = 7;
    ping.serial = 100;
    ping.nbeams = 2;
    ping.nbeams_valid = 2;
    ping.navlat = 10.0;
    ping.navlon = 20.0;
    ping.depth_m = vec![12.3, 45.6];
    ping.acrosstrack_m = vec![1.0, -1.0];
    ping.alongtrack_m = vec![0.1, 0.2];
    ping.window_samples = vec![10, 20];
    ping.quality_0_254 = vec![200, 210];
    ping.iba_centideg = vec![1, -1];
    ping.detection_info = vec![0, 0];
    ping.clean = vec![0, 0];
    ping.amp_halfdb = vec![-10, -12];

    let mut buf = Vec::new();
    let mut handle = WriteHandle::open(&mut buf, SonarModel::Em710);
    handle.write_ping(&ping).unwrap();

    match read_one(buf) {
        Decoded::Bath2(back) => {
            assert_eq!(back.count, 7);
            assert_eq!(back.serial, 100);
            assert_eq!(back.nbeams, 2);
            assert_eq!(back.depth_m, vec![12.3, 45.6]);
        }
        other => panic!("expected Bath2, got {other:?}"),
    }
}

#[test]
fn write_ping_round_trips_multibeam_bathymetry_through_bath2() {
    // A single beam can't catch a per-beam length mismatch (there's no
    // "next beam" to land on the wrong offset); use three with distinct
    // values in every field so any misalignment shows up as nonsense.
    let mut ping = Ping::empty();
    ping.date = 20230615;
    ping.msec = 2_000;
    ping.count = 9;
    ping.serial = 101;
    ping.nbeams = 3;
    ping.nbeams_valid = 3;
    ping.depth_m = vec![10.0, 20.0, 30.0];
    ping.acrosstrack_m = vec![-5.0, 0.0, 5.0];
    ping.alongtrack_m = vec![1.0, 2.0, 3.0];
    ping.window_samples = vec![100, 200, 300];
    ping.quality = vec![10, 20, 30];
    ping.iba_centideg = vec![1, 2, 3];
    ping.detection_info = vec![0, 1, 0];
    ping.clean = vec![0, 0, 1];
    ping.amp_halfdb = vec![-1, -2, -3];

    let mut buf = Vec::new();
    let mut handle = WriteHandle::open(&mut buf, SonarModel::Em710);
    handle.write_ping(&ping).unwrap();

    match read_one(buf) {
        Decoded::Bath2(back) => {
            assert_eq!(back.depth_m, vec![10.0, 20.0, 30.0]);
            assert_eq!(back.acrosstrack_m, vec![-5.0, 0.0, 5.0]);
            assert_eq!(back.alongtrack_m, vec![1.0, 2.0, 3.0]);
            assert_eq!(back.window_samples, vec![100, 200, 300]);
            assert_eq!(back.quality, vec![10, 20, 30]);
            assert_eq!(back.iba_centideg, vec![1, 2, 3]);
            assert_eq!(back.detection_info, vec![0, 1, 0]);
            assert_eq!(back.clean, vec![0, 0, 1]);
            assert_eq!(back.amp_halfdb, vec![-1, -2, -3]);
        }
        other => panic!("expected Bath2, got {other:?}"),
    }
}

#[test]
fn write_ping_round_trips_multibeam_rawbeam4() {
    let mut ping = Ping::empty();
    ping.tx = vec![TxSector::default()];
    ping.rx = vec![
        RxBeam { pointangle_centideg: 100, sector: 0, detection: 0, window: 10, quality: 1, range_s: 0.01, amp_halfdb: -5, cleaning: 0, ..Default::default() },
        RxBeam { pointangle_centideg: -100, sector: 1, detection: 1, window: 20, quality: 2, range_s: 0.02, amp_halfdb: -6, cleaning: 1, ..Default::default() },
        RxBeam { pointangle_centideg: 0, sector: 0, detection: 0, window: 30, quality: 3, range_s: 0.03, amp_halfdb: -7, cleaning: 0, ..Default::default() },
    ];

    let mut buf = Vec::new();
    let mut handle = WriteHandle::open(&mut buf, SonarModel::Em710);
    handle.write_ping(&ping).unwrap();

    let first_len = u32::from_le_bytes(buf[0..4].try_into().unwrap()) as usize;
    let second_record = &buf[4 + first_len..];
    let raw = emdg_in::framer::Framer::new()
        .next_record(&mut Cursor::new(second_record.to_vec()), &mut Statistics::default())
        .unwrap();
    match decode::decode(&raw).unwrap() {
        Decoded::RawBeam4(back) => {
            assert_eq!(back.rx.len(), 3);
            assert_eq!(back.rx[0].pointangle_centideg, 100);
            assert_eq!(back.rx[1].pointangle_centideg, -100);
            assert_eq!(back.rx[2].window, 30);
            assert_eq!(back.rx[2].quality, 3);
        }
        other => panic!("expected RawBeam4, got {other:?}"),
    }
}

#[test]
fn write_ping_round_trips_multibeam_ss2_snippets() {
    let mut ping = Ping::empty();
    ping.ss_beam_samples = vec![4, 6, 2];
    ping.ss_start_sample = vec![0, 4, 10];
    ping.ss_center_sample = vec![2, 7, 11];
    ping.ss_raw = vec![1; 12];

    let mut buf = Vec::new();
    let mut handle = WriteHandle::open(&mut buf, SonarModel::Em710);
    handle.write_ping(&ping).unwrap();

    // Bath2 first, then SS2 (RawBeam4 is skipped: this ping has no tx/rx).
    let first_len = u32::from_le_bytes(buf[0..4].try_into().unwrap()) as usize;
    let second_record = &buf[4 + first_len..];
    let raw = emdg_in::framer::Framer::new()
        .next_record(&mut Cursor::new(second_record.to_vec()), &mut Statistics::default())
        .unwrap();
    match decode::decode(&raw).unwrap() {
        Decoded::Ss2(back) => {
            assert_eq!(back.beams.len(), 3);
            assert_eq!(back.beams[0].beam_samples, 4);
            assert_eq!(back.beams[1].beam_samples, 6);
            assert_eq!(back.beams[1].start_sample, 4);
            assert_eq!(back.beams[2].start_sample, 10);
            assert_eq!(back.raw_samples.len(), 12);
        }
        other => panic!("expected Ss2, got {other:?}"),
    }
}

#[test]
fn write_ping_emits_rawbeam4_when_ping_carries_raw_beams() {
    let mut ping = Ping::empty();
    ping.tx = vec![TxSector::default()];
    ping.rx = vec![RxBeam::default(), RxBeam::default()];

    let mut buf = Vec::new();
    let mut handle = WriteHandle::open(&mut buf, SonarModel::Em710);
    handle.write_ping(&ping).unwrap();

    // Bath2 then RawBeam4: find the second record's id by skipping the
    // first record's length-prefixed span.
    let first_len = u32::from_le_bytes(buf[0..4].try_into().unwrap()) as usize;
    let second_record_start = 4 + first_len;
    let second_id = buf[second_record_start + 5];
    assert_eq!(second_id, 0x4E);
}
