mod enums {
    use crate::enums::*;

    #[test]
    fn sonar_model_new() {
        assert_eq!(SonarModel::new(710), Some(SonarModel::Em710));
        assert_eq!(SonarModel::new(2040), Some(SonarModel::Em2040));
        assert_eq!(SonarModel::new(20), Some(SonarModel::M3));
        assert_eq!(SonarModel::new(9999), None);
    }

    #[test]
    fn sonar_model_is_m3() {
        assert!(SonarModel::M3.is_m3());
        assert!(!SonarModel::Em710.is_m3());
    }

    #[test]
    fn default_tx_beamwidth() {
        assert_eq!(SonarModel::Em1000.default_tx_beamwidth_deg(), 2.5);
        assert_eq!(SonarModel::Em710.default_tx_beamwidth_deg(), 1.5);
    }

    #[test]
    fn transducer_configuration_new() {
        assert_eq!(TransducerConfiguration::new(0), TransducerConfiguration::SingleHead);
        assert_eq!(TransducerConfiguration::new(4), TransducerConfiguration::Em3000DHull);
        assert_eq!(TransducerConfiguration::new(99), TransducerConfiguration::Invalid);
    }

    #[test]
    fn depth_sensor_heave_roundtrip() {
        assert_eq!(DepthSensorHeave::from_ascii(*b"IN"), DepthSensorHeave::In);
        assert_eq!(DepthSensorHeave::from_ascii(*b"NI"), DepthSensorHeave::Ni);
        assert_eq!(DepthSensorHeave::In.to_ascii(), *b"IN");
        assert_eq!(DepthSensorHeave::Ni.to_ascii(), *b"NI");
    }

    #[test]
    fn beam_flag_predicates() {
        assert!(BeamFlag::none().is_valid());
        assert!(!BeamFlag::none().is_null());
        assert!(BeamFlag::null().is_null());
        assert!(!BeamFlag::flagged(BeamQualifier::Sonar).is_valid());
    }

    #[test]
    fn endian_polarity() {
        assert!(!EndianPolarity::Unknown.is_resolved());
        assert!(EndianPolarity::Native.is_resolved());
        assert!(!EndianPolarity::Native.swap());
        assert!(EndianPolarity::Swapped.swap());
    }
}

mod ping {
    use crate::enums::AssemblyState;
    use crate::ping::Ping;
    use crate::records::{Bath2, TimeStamp};

    fn sample_bath(count: u16, serial: u16) -> Bath2 {
        Bath2 {
            time: TimeStamp { date: 20230101, msec: 1000 },
            count,
            serial,
            lat_raw: 0,
            lon_raw: 0,
            heading_centideg: 9000,
            heave_centim: 0,
            roll_centideg: 0,
            pitch_centideg: 0,
            ssv_decim_s: 15000,
            xducer_depth_m: 1.0,
            nbeams: 1,
            nbeams_valid: 1,
            sample_rate_hz: 20000.0,
            depth_m: vec![100.0],
            acrosstrack_m: vec![0.0],
            alongtrack_m: vec![0.0],
            window_samples: vec![10],
            quality: vec![100],
            iba_centideg: vec![0],
            detection_info: vec![0],
            clean: vec![0],
            amp_halfdb: vec![0],
        }
    }

    #[test]
    fn install_bath_sets_key_and_flag() {
        let mut p = Ping::empty();
        assert_eq!(p.assembly_state, AssemblyState::NoData);
        p.install_bath(&sample_bath(10, 1));
        assert_eq!(p.key(), (10, 1));
        assert!(p.read_status.bath_read);
        assert!(!p.read_status.raw_read);
        assert_eq!(p.depth_m, vec![100.0]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut p = Ping::empty();
        p.install_bath(&sample_bath(10, 1));
        p.reset();
        assert_eq!(p.key(), (0, 0));
        assert!(!p.read_status.any());
    }
}

mod settings {
    use crate::settings::EngineSettings;

    #[test]
    fn default_is_all_off() {
        let s = EngineSettings::default();
        assert!(!s.ignore_snippets());
        assert!(!s.sensordepth_only());
        assert!(!s.timestamp_changed());
        assert_eq!(s.interpolation_history_cap(), crate::settings::DEFAULT_INTERPOLATION_HISTORY_CAP);
    }

    #[test]
    fn setters_roundtrip() {
        let mut s = EngineSettings::default();
        s.set_ignore_snippets(true);
        s.set_sensordepth_only(true);
        s.set_timestamp_changed(true);
        s.set_interpolation_history_cap(10);
        assert!(s.ignore_snippets());
        assert!(s.sensordepth_only());
        assert!(s.timestamp_changed());
        assert_eq!(s.interpolation_history_cap(), 10);
    }

    #[test]
    fn interpolation_cap_floor() {
        let mut s = EngineSettings::default();
        s.set_interpolation_history_cap(0);
        assert_eq!(s.interpolation_history_cap(), 1);
    }
}

mod errors {
    use crate::errors::{EmdgError, Taxon};

    #[test]
    fn taxon_mapping() {
        assert_eq!(EmdgError::BadDatagram { msg: "x".into() }.taxon(), Taxon::BadDatagram);
        assert_eq!(EmdgError::Unintelligible { msg: "x".into() }.taxon(), Taxon::Unintelligible);
        assert_eq!(EmdgError::Unsupported { id: 0x99 }.taxon(), Taxon::Unsupported);
        assert_eq!(EmdgError::CommentOrOther { msg: "x".into() }.taxon(), Taxon::CommentOrOther);
    }

    #[test]
    fn io_always_must_surface() {
        let e = EmdgError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(e.must_surface());
        assert!(!EmdgError::Unsupported { id: 1 }.must_surface());
    }
}
