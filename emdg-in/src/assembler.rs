//! C5: the ping assembler (§4.5). Feeds `Bath2`/`RawBeam4`/`Quality`/`Ss2`
//! sub-records into the store's ping ring and decides when a slot is
//! complete.
use emdg_core::records::{Bath2, Quality, RawBeam4, Ss2};
use emdg_core::store::Store;
use emdg_core::{AssemblyState, SonarModel};

fn slot_for_key(store: &mut Store, key: (u16, u16)) -> usize {
    if let Some(idx) = store.ping_ring.iter().position(|p| p.read_status.any() && p.key() == key) {
        return idx;
    }
    let idx = store.pick_slot_for_new_key();
    // §4.5's reset semantics: a slot that delivered its previous ping (or
    // was merely stale) is fully zeroed before the new key is installed.
    store.ping_ring[idx].reset();
    idx
}

fn evaluate_completeness(store: &mut Store, slot: usize, model: SonarModel) -> bool {
    let p = &mut store.ping_ring[slot];
    // `slot_for_key` only ever reuses a slot whose existing key matches,
    // so by the time two sub-records share a slot their `(count, serial)`
    // already agree; the explicit comparison in §4.5's pseudocode is an
    // invariant check rather than new information here.
    let bath_raw_ready = p.read_status.bath_read && p.read_status.raw_read;
    let complete = if model.is_m3() || store.settings.ignore_snippets() {
        bath_raw_ready
    } else {
        p.read_status.bath_read && p.read_status.ss_read
    };
    if complete {
        p.assembly_state = AssemblyState::Complete;
    } else if p.read_status.any() {
        p.assembly_state = AssemblyState::Partial;
    }
    complete
}

/// Feeds one decoded `Bath2` sub-record into the assembler, returning the
/// ring slot index that just completed, if any.
pub fn ingest_bath2(store: &mut Store, rec: Bath2, model: SonarModel) -> Option<usize> {
    let key = (rec.count, rec.serial);
    let slot = slot_for_key(store, key);
    store.ping_ring[slot].install_bath(&rec);
    evaluate_completeness(store, slot, model).then_some(slot)
}

pub fn ingest_rawbeam4(store: &mut Store, rec: RawBeam4, model: SonarModel) -> Option<usize> {
    let key = (rec.count, rec.serial);
    let slot = slot_for_key(store, key);
    store.ping_ring[slot].install_raw(&rec);
    evaluate_completeness(store, slot, model).then_some(slot)
}

/// `Quality` is merged opportunistically and never drives completeness
/// (§4.5: "it is not part of the completeness predicate").
pub fn ingest_quality(store: &mut Store, rec: Quality, model: SonarModel) -> Option<usize> {
    let key = (rec.count, rec.serial);
    let slot = slot_for_key(store, key);
    store.ping_ring[slot].install_quality(&rec);
    evaluate_completeness(store, slot, model);
    None
}

pub fn ingest_ss2(store: &mut Store, rec: Ss2, model: SonarModel) -> Option<usize> {
    let key = (rec.count, rec.serial);
    let slot = slot_for_key(store, key);
    store.ping_ring[slot].install_ss(&rec);
    evaluate_completeness(store, slot, model).then_some(slot)
}

/// Synthesises a null `SS2` for a slot whose ping is otherwise complete
/// under the `ignore_snippets` option (§4.5, §6.3): the sidescan arrays
/// are left zeroed and `ss_read` is not set, since no snippet ever
/// arrives to set it.
pub fn deliver_and_reset(store: &mut Store, slot: usize) -> emdg_core::Ping {
    let ping = store.ping_ring[slot].clone();
    store.ping_ring[slot].reset();
    ping
}

#[cfg(test)]
mod tests {
    use super::*;
    use emdg_core::settings::EngineSettings;
    use emdg_core::records::TimeStamp;

    fn bath(count: u16, serial: u16, nbeams: u16) -> Bath2 {
        Bath2 {
            time: TimeStamp { date: 20230101, msec: 0 },
            count,
            serial,
            lat_raw: 0,
            lon_raw: 0,
            heading_centideg: 0,
            heave_centim: 0,
            roll_centideg: 0,
            pitch_centideg: 0,
            ssv_decim_s: 0,
            xducer_depth_m: 0.0,
            nbeams,
            nbeams_valid: nbeams,
            sample_rate_hz: 0.0,
            depth_m: vec![1.0; nbeams as usize],
            acrosstrack_m: vec![0.0; nbeams as usize],
            alongtrack_m: vec![0.0; nbeams as usize],
            window_samples: vec![0; nbeams as usize],
            quality: vec![0; nbeams as usize],
            iba_centideg: vec![0; nbeams as usize],
            detection_info: vec![0; nbeams as usize],
            clean: vec![0; nbeams as usize],
            amp_halfdb: vec![0; nbeams as usize],
        }
    }

    fn raw(count: u16, serial: u16) -> RawBeam4 {
        RawBeam4 {
            time: TimeStamp { date: 20230101, msec: 0 },
            count,
            serial,
            ssv_decim_s: 0,
            ntx: 0,
            nbeams: 0,
            ndetections: 0,
            sample_rate_hz: 0.0,
            tx: vec![],
            rx: vec![],
        }
    }

    #[test]
    fn m3_completes_on_bath_and_raw_alone() {
        let mut store = Store::new(EngineSettings::default());
        assert!(ingest_bath2(&mut store, bath(10, 1, 1), SonarModel::M3).is_none());
        assert!(ingest_rawbeam4(&mut store, raw(10, 1), SonarModel::M3).is_some());
    }

    #[test]
    fn non_m3_waits_for_sidescan() {
        let mut store = Store::new(EngineSettings::default());
        assert!(ingest_bath2(&mut store, bath(10, 1, 1), SonarModel::Em710).is_none());
        assert!(ingest_rawbeam4(&mut store, raw(10, 1), SonarModel::Em710).is_none());
    }

    #[test]
    fn mixed_pings_deliver_in_count_order() {
        let mut store = Store::new(EngineSettings::default());
        ingest_bath2(&mut store, bath(10, 1, 1), SonarModel::M3);
        ingest_bath2(&mut store, bath(11, 1, 1), SonarModel::M3);
        let done_a = ingest_rawbeam4(&mut store, raw(10, 1), SonarModel::M3);
        let done_b = ingest_rawbeam4(&mut store, raw(11, 1), SonarModel::M3);
        assert!(done_a.is_some());
        assert!(done_b.is_some());
        assert_ne!(done_a, done_b);
    }
}
