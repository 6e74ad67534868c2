//! This is the write-side datagram engine: it reconstructs wire
//! sub-records from a completed ping and drives the encoders over one
//! outgoing stream (§6.2's `open`/`write_ping`).
pub mod assembler;
pub mod bytes;
pub mod encode;
#[cfg(test)]
mod integration_tests;

use std::io::{self, Write};

use emdg_core::enums::InstallationKind;
use emdg_core::records::*;
use emdg_core::{Ping, SonarModel};
use encode::{model_code, write_record};

/// A handle onto one outgoing datagram stream (§6.2's write-side `open`).
pub struct WriteHandle<W> {
    stream: W,
    model: SonarModel,
}

impl<W: Write> WriteHandle<W> {
    pub fn open(stream: W, model: SonarModel) -> Self {
        WriteHandle { stream, model }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    fn model_code(&self) -> u16 {
        model_code(self.model)
    }

    pub fn write_installation(&mut self, rec: &Installation) -> io::Result<()> {
        let id = encode::installation_id(rec.kind);
        write_record(&mut self.stream, id, self.model_code(), &encode::encode_installation(rec), false)
    }

    pub fn write_runtime_parameters(&mut self, rec: &RuntimeParameters) -> io::Result<()> {
        write_record(&mut self.stream, 0x52, self.model_code(), &encode::encode_runtime_parameters(rec), false)
    }

    pub fn write_clock(&mut self, rec: &Clock) -> io::Result<()> {
        write_record(&mut self.stream, 0x43, self.model_code(), &encode::encode_clock(rec), false)
    }

    pub fn write_tide(&mut self, rec: &Tide) -> io::Result<()> {
        write_record(&mut self.stream, 0x54, self.model_code(), &encode::encode_tide(rec), false)
    }

    pub fn write_height(&mut self, rec: &Height) -> io::Result<()> {
        write_record(&mut self.stream, 0x68, self.model_code(), &encode::encode_height(rec), false)
    }

    pub fn write_heading(&mut self, rec: &Heading) -> io::Result<()> {
        write_record(&mut self.stream, 0x48, self.model_code(), &encode::encode_heading(rec), false)
    }

    pub fn write_attitude(&mut self, rec: &Attitude) -> io::Result<()> {
        write_record(&mut self.stream, 0x41, self.model_code(), &encode::encode_attitude(rec), false)
    }

    pub fn write_network_attitude(&mut self, rec: &Attitude) -> io::Result<()> {
        write_record(&mut self.stream, 0x6E, self.model_code(), &encode::encode_attitude(rec), true)
    }

    pub fn write_ssv(&mut self, rec: &Ssv) -> io::Result<()> {
        write_record(&mut self.stream, 0x47, self.model_code(), &encode::encode_ssv(rec), false)
    }

    pub fn write_tilt(&mut self, rec: &Tilt) -> io::Result<()> {
        write_record(&mut self.stream, 0x4A, self.model_code(), &encode::encode_tilt(rec), false)
    }

    pub fn write_position(&mut self, rec: &Position) -> io::Result<()> {
        write_record(&mut self.stream, 0x50, self.model_code(), &encode::encode_position(rec), false)
    }

    pub fn write_svp(&mut self, rec: &Svp) -> io::Result<()> {
        write_record(&mut self.stream, 0x56, self.model_code(), &encode::encode_svp(rec), false)
    }

    pub fn write_svp2(&mut self, rec: &Svp) -> io::Result<()> {
        write_record(&mut self.stream, 0x55, self.model_code(), &encode::encode_svp(rec), false)
    }

    pub fn write_extra_parameters(&mut self, rec: &ExtraParameters) -> io::Result<()> {
        write_record(&mut self.stream, 0x33, self.model_code(), &encode::encode_extra_parameters(rec), false)
    }

    pub fn write_pu_status(&mut self, rec: &PuStatus) -> io::Result<()> {
        write_record(&mut self.stream, 0x31, self.model_code(), &encode::encode_pu_status(rec), false)
    }

    pub fn write_water_column(&mut self, rec: &WaterColumn) -> io::Result<()> {
        write_record(&mut self.stream, 0x6B, self.model_code(), &encode::encode_water_column(rec), true)
    }

    /// Drives the encoders over one completed ping (§6.2's `write_ping`):
    /// reconstructs `Bath2` always, `RawBeam4` if the ping carries raw
    /// beam data, and `SS2` if it carries a sidescan snippet, then
    /// serialises each sub-record in turn.
    pub fn write_ping(&mut self, ping: &Ping) -> io::Result<()> {
        let bath = assembler::split_bath2(ping);
        write_record(&mut self.stream, 0x58, self.model_code(), &encode::encode_bath2(&bath), false)?;

        if !ping.tx.is_empty() || !ping.rx.is_empty() {
            let raw = assembler::split_rawbeam4(ping);
            write_record(&mut self.stream, 0x4E, self.model_code(), &encode::encode_rawbeam4(&raw), false)?;
        }

        if !ping.ss_raw.is_empty() {
            let ss2 = assembler::split_ss2(ping);
            write_record(&mut self.stream, 0x59, self.model_code(), &encode::encode_ss2(&ss2), false)?;
        }
        Ok(())
    }
}

/// Picks which id an `Installation` round-trips as, mirroring the read
/// side's disambiguation in reverse (re-exported for callers building
/// their own dispatch instead of going through `write_installation`).
pub fn installation_id(kind: InstallationKind) -> u8 {
    encode::installation_id(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emdg_core::enums::DepthSensorHeave;

    fn sample_installation() -> Installation {
        Installation {
            kind: InstallationKind::Start,
            time: TimeStamp { date: 20230101, msec: 0 },
            line_number: 1,
            serial: 100,
            array1_offsets: MountOffsets::default(),
            array2_offsets: MountOffsets::default(),
            depth_sensor_heave: DepthSensorHeave::Ni,
            raw_pairs: vec![("WLZ".to_string(), "0.0".to_string())],
        }
    }

    #[test]
    fn write_installation_round_trips_through_in_crate_decoder() {
        let mut buf = Vec::new();
        let mut handle = WriteHandle::open(&mut buf, SonarModel::Em710);
        handle.write_installation(&sample_installation()).unwrap();

        let raw = emdg_in::framer::Framer::new()
            .next_record(&mut std::io::Cursor::new(buf), &mut emdg_core::store::Statistics::default())
            .unwrap();
        let decoded = emdg_in::decode::decode(&raw).unwrap();
        match decoded {
            emdg_in::decode::Decoded::Installation(rec) => {
                assert_eq!(rec.serial, 100);
                assert_eq!(rec.line_number, 1);
            }
            other => panic!("expected Installation, got {other:?}"),
        }
    }

    #[test]
    fn write_ping_emits_bath_only_for_bathymetry_alone() {
        let mut buf = Vec::new();
        let mut handle = WriteHandle::open(&mut buf, SonarModel::Em710);
        let mut ping = Ping::empty();
        ping.nbeams = 0;
        handle.write_ping(&ping).unwrap();
        assert!(!buf.is_empty());
        assert_eq!(buf[5], 0x58); // id byte of the only record written
    }
}
