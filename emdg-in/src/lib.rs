//! This is the read-side datagram engine: it frames, decodes, assembles
//! and geometrically resolves one stream's worth of multibeam-echosounder
//! datagrams (§6.2's `open`/`read_ping`).
pub mod assembler;
pub mod bytes;
pub mod decode;
pub mod framer;
pub mod geometry;
pub mod merger;
pub mod sidescan;

use std::io::Read;

use decode::Decoded;
use emdg_core::enums::{DepthSensorHeave, TransducerConfiguration};
use emdg_core::errors::Taxon;
use emdg_core::store::Store;
use emdg_core::{EmdgError, EngineSettings, Ping, RecordKind, SonarModel};
use framer::Framer;

/// A handle onto one datagram stream (§6.2's `open`): the framer's
/// endianness/resync state, the store it feeds, and the underlying
/// reader.
pub struct StreamHandle<R> {
    stream: R,
    framer: Framer,
    store: Store,
    last_ping: Option<Ping>,
}

impl<R: Read> StreamHandle<R> {
    pub fn open(stream: R, settings: EngineSettings) -> Self {
        StreamHandle { stream, framer: Framer::new(), store: Store::new(settings), last_ping: None }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    /// The ping most recently completed by `read_ping`, valid only when
    /// the last call returned `RecordKind::Ping`.
    pub fn last_ping(&self) -> Option<&Ping> {
        self.last_ping.as_ref()
    }

    /// Drives the framer/decoder/assembler chain until a complete record
    /// is ready (§6.2, §7's propagation rule): `Io` always surfaces; the
    /// other taxons are counted as statistics and the loop retries with
    /// the next record. Partially-assembled pings at end-of-stream are
    /// never flushed — a clean EOF simply propagates as `Io`.
    pub fn read_ping(&mut self) -> Result<RecordKind, EmdgError> {
        loop {
            let raw = match self.framer.next_record(&mut self.stream, &mut self.store.statistics) {
                Ok(raw) => raw,
                Err(e) => {
                    if e.must_surface() {
                        return Err(e);
                    }
                    self.note_broken_datagram(&e);
                    continue;
                }
            };
            if !raw.stop_ok {
                self.store.statistics.misplaced_trailers += 1;
                if !self.store.statistics.misplaced_trailer_warned {
                    log::warn!("record trailer was not where the length field implied; resynced to the nearest 0x03");
                    self.store.statistics.misplaced_trailer_warned = true;
                }
            }

            let model = match SonarModel::new(raw.model) {
                Some(model) => model,
                // The framer has already validated the label's model
                // field; an unparsable model here would mean the framer
                // and decoder disagree, which should not happen.
                None => continue,
            };

            let decoded = match decode::decode(&raw) {
                Ok(d) => d,
                Err(e) => {
                    if e.must_surface() {
                        return Err(e);
                    }
                    if e.taxon() == Taxon::Unsupported {
                        self.store.statistics.unsupported_ids += 1;
                    } else {
                        self.note_broken_datagram(&e);
                    }
                    continue;
                }
            };

            if let Some(kind) = self.handle_decoded(decoded, model) {
                return Ok(kind);
            }
        }
    }

    fn note_broken_datagram(&mut self, e: &EmdgError) {
        self.store.statistics.broken_datagrams += 1;
        if !self.store.statistics.broken_datagram_warned {
            log::warn!("broken datagram: {e}");
            self.store.statistics.broken_datagram_warned = true;
        }
    }

    /// Routes one decoded record into the store, returning the kind to
    /// report to the caller, or `None` if the record is an opportunistic
    /// ping sub-record that did not complete a slot.
    fn handle_decoded(&mut self, decoded: Decoded, model: SonarModel) -> Option<RecordKind> {
        use Decoded::*;
        match decoded {
            Installation(mut rec) => {
                if self.store.settings.sensordepth_only() {
                    rec.depth_sensor_heave = DepthSensorHeave::In;
                }
                self.store.installation = Some(rec);
                Some(RecordKind::Installation)
            }
            RuntimeParameters(rec) => {
                self.store.runtime_parameters = Some(rec);
                Some(RecordKind::RuntimeParameters)
            }
            Clock(rec) => {
                self.store.clock = Some(rec);
                Some(RecordKind::Clock)
            }
            Tide(rec) => {
                self.store.tide = Some(rec);
                Some(RecordKind::Tide)
            }
            Height(rec) => {
                merger::push_height(&mut self.store, &rec);
                self.store.height = Some(rec);
                Some(RecordKind::Height)
            }
            Heading(rec) => {
                self.store.heading = Some(rec);
                Some(RecordKind::Heading)
            }
            Attitude(rec) => {
                merger::push_attitude(&mut self.store, &rec);
                self.store.attitude = Some(rec);
                Some(RecordKind::Attitude)
            }
            NetworkAttitude(rec) => {
                merger::push_attitude(&mut self.store, &rec);
                self.store.network_attitude = Some(rec);
                Some(RecordKind::NetworkAttitude)
            }
            Ssv(rec) => {
                self.store.ssv = Some(rec);
                Some(RecordKind::Ssv)
            }
            Tilt(rec) => {
                self.store.tilt = Some(rec);
                Some(RecordKind::Tilt)
            }
            Position(rec) => {
                merger::push_position(&mut self.store, &rec);
                self.store.position = Some(rec);
                Some(RecordKind::Position)
            }
            Svp(rec) => {
                self.store.svp = Some(rec);
                Some(RecordKind::Svp)
            }
            Svp2(rec) => {
                self.store.svp2 = Some(rec);
                Some(RecordKind::Svp2)
            }
            ExtraParameters(rec) => {
                self.store.extra_parameters = Some(rec);
                Some(RecordKind::ExtraParameters)
            }
            WaterColumn(rec) => {
                self.store.water_column.push(rec);
                Some(RecordKind::WaterColumn)
            }
            PuStatus(rec) => {
                self.store.pu_status = Some(rec);
                Some(RecordKind::PuStatus)
            }
            Bath2(rec) => {
                let slot = assembler::ingest_bath2(&mut self.store, rec, model);
                self.finish_ping(slot, model)
            }
            RawBeam4(rec) => {
                let slot = assembler::ingest_rawbeam4(&mut self.store, rec, model);
                self.finish_ping(slot, model)
            }
            Quality(rec) => {
                assembler::ingest_quality(&mut self.store, rec, model);
                None
            }
            Ss2(rec) => {
                let slot = assembler::ingest_ss2(&mut self.store, rec, model);
                self.finish_ping(slot, model)
            }
            Skipped => Some(RecordKind::Skipped),
        }
    }

    /// Runs C6/C7/C8 over a ring slot that just completed and stashes
    /// the result for `last_ping`.
    fn finish_ping(&mut self, completed_slot: Option<usize>, model: SonarModel) -> Option<RecordKind> {
        let slot = completed_slot?;
        let mut ping = assembler::deliver_and_reset(&mut self.store, slot);

        let dsh = self.store.installation.as_ref().map(|i| i.depth_sensor_heave).unwrap_or(DepthSensorHeave::Ni);
        let motions = merger::merge_ping(&self.store, &mut ping, dsh);

        if let Some(installation) = self.store.installation.clone() {
            let stc = self
                .store
                .runtime_parameters
                .map(|r| r.transducer_configuration)
                .unwrap_or(TransducerConfiguration::SingleHead);
            geometry::compute_geometry(&mut ping, &installation, stc, model, &motions);
        }

        // `ignore_snippets` (§6.3) synthesises a null sidescan grid: the
        // slot was never `ss_read`, so `ping.ss` is already all-`None`
        // from `Ping::empty()` and regridding would only produce a
        // spurious beam-count-mismatch warning.
        if !self.store.settings.ignore_snippets() {
            let runtime = self.store.runtime_parameters;
            sidescan::regrid(&mut self.store, &mut ping, model, runtime.as_ref());
        }

        self.last_ping = Some(ping);
        Some(RecordKind::Ping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn push_label(buf: &mut Vec<u8>, len: u32, id: u8, model: u16) {
        buf.extend_from_slice(&len.to_le_bytes());
        buf.push(0x02);
        buf.push(id);
        buf.extend_from_slice(&model.to_le_bytes());
    }

    /// A minimal `Clock` datagram: header fixed at §6.1's 28-byte size.
    fn clock_datagram() -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&20230101u32.to_le_bytes()); // date
        body.extend_from_slice(&0u32.to_le_bytes()); // msec
        body.extend_from_slice(&1u16.to_le_bytes()); // serial
        body.extend_from_slice(&20230101u32.to_le_bytes()); // ext date
        body.extend_from_slice(&0u32.to_le_bytes()); // ext msec
        body.push(1); // pps_in_use
        body.push(0x03); // stop
        body.extend_from_slice(&0u16.to_le_bytes()); // checksum (unverified on read)

        let len = 4 + body.len() as u32;
        let mut buf = Vec::new();
        push_label(&mut buf, len, 0x43, 710);
        buf.extend_from_slice(&body);
        buf
    }

    #[test]
    fn read_ping_surfaces_clock_then_eof() {
        let mut handle = StreamHandle::open(Cursor::new(clock_datagram()), EngineSettings::default());
        let kind = handle.read_ping().expect("clock record");
        assert_eq!(kind, RecordKind::Clock);
        assert!(handle.store().clock.is_some());

        let err = handle.read_ping().expect_err("stream should be exhausted");
        assert!(err.is_eof());
    }

    #[test]
    fn broken_datagram_between_records_is_skipped() {
        let mut buf = vec![0xFF; 7]; // garbage before the first valid label
        buf.extend_from_slice(&clock_datagram());
        let mut handle = StreamHandle::open(Cursor::new(buf), EngineSettings::default());
        let kind = handle.read_ping().expect("clock record after resync");
        assert_eq!(kind, RecordKind::Clock);
        assert_eq!(handle.store().statistics.bytes_skipped_total, 7);
    }

    #[test]
    fn misplaced_trailer_is_counted_but_still_decodes() {
        let mut body = Vec::new();
        body.extend_from_slice(&20230101u32.to_le_bytes()); // date
        body.extend_from_slice(&0u32.to_le_bytes()); // msec
        body.extend_from_slice(&1u16.to_le_bytes()); // serial
        body.extend_from_slice(&20230101u32.to_le_bytes()); // ext date
        body.extend_from_slice(&0u32.to_le_bytes()); // ext msec
        body.push(1); // pps_in_use
        body.push(0x03); // the real trailer
        body.push(0xAA); // garbage a length-trusting reader would keep
        body.extend_from_slice(&0u16.to_le_bytes()); // checksum

        let len = 4 + body.len() as u32;
        let mut buf = Vec::new();
        push_label(&mut buf, len, 0x43, 710);
        buf.extend_from_slice(&body);

        let mut handle = StreamHandle::open(Cursor::new(buf), EngineSettings::default());
        let kind = handle.read_ping().expect("clock record despite misplaced trailer");
        assert_eq!(kind, RecordKind::Clock);
        assert_eq!(handle.store().statistics.misplaced_trailers, 1);
    }
}
