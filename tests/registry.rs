mod common;

use common::{edid_block, on_fresh_thread};
use ddcci::registry::{probe_bus, DisplayIdentifier, DisplayRef, Registry};
use ddcci::sim::SimulatedMonitor;
use ddcci::{DdcOptions, Error, VersionSpec};

fn probe_all(monitors: Vec<(u32, SimulatedMonitor)>) -> Registry {
    Registry::from_bus_infos(monitors.into_iter().map(|(busno, m)| probe_bus(busno, m)).collect())
}

#[test]
fn probes_simulated_buses() {
    on_fresh_thread(|| {
        let registry = probe_all(vec![
            (4, common::monitor()),
            (1, SimulatedMonitor::new().with_edid(edid_block("OLD CRT", "1")).without_ddc()),
            (2, SimulatedMonitor::new().without_ddc()),
        ]);

        let buses = registry.buses();
        assert_eq!(buses.iter().map(|b| b.busno).collect::<Vec<_>>(), vec![1, 2, 4]);
        assert!(!buses[1].has_edid_addr);
        assert!(!buses[1].is_display());
        assert!(buses[0].has_edid_addr && !buses[0].has_ddc_addr && !buses[0].ddc_ok);
        assert!(buses[2].ddc_ok);
        assert_eq!(buses[2].functionality, 0x0eff_0001);

        let displays = registry.displays();
        assert_eq!(displays.len(), 2);
        assert_eq!((displays[0].busno, displays[0].dispno, displays[0].ddc_ok), (1, Some(1), false));
        assert_eq!((displays[1].busno, displays[1].dispno, displays[1].ddc_ok), (4, Some(2), true));
        assert_eq!(displays[0].version, None);
        assert_eq!(displays[1].version, Some(VersionSpec::V22));
    });
}

#[test]
fn selects_by_edid() {
    on_fresh_thread(|| {
        let target = edid_block("DELL U2415", "7MT0186");
        let registry = probe_all(vec![
            (3, common::monitor()),
            (5, SimulatedMonitor::new().with_edid(edid_block("DELL U2415", "7MT0999")).with_feature(0x10, 100, 0)),
        ]);

        let display = registry.resolve(&DisplayIdentifier::ByEdid(target)).unwrap();
        assert_eq!(display.busno, 3);
        assert_eq!(display.dispno, Some(1));

        let registry = probe_all(vec![
            (3, common::monitor()),
            (5, common::monitor()),
        ]);
        match registry.resolve(&DisplayIdentifier::ByEdid(target)) {
            Err(Error::AmbiguousDisplay(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    });
}

#[test]
fn selects_by_model_and_serial() {
    on_fresh_thread(|| {
        let registry = probe_all(vec![
            (3, common::monitor()),
            (5, SimulatedMonitor::new().with_edid(edid_block("DELL U2415", "7MT0999")).with_feature(0x10, 100, 0)),
        ]);

        let id = DisplayIdentifier::ByMfgModelSerial {
            mfg: None,
            model: Some("DELL U2415".into()),
            serial: Some("7MT0999".into()),
        };
        assert_eq!(registry.resolve(&id).unwrap().busno, 5);

        let id = DisplayIdentifier::ByMfgModelSerial { mfg: Some("DEL".into()), model: None, serial: None };
        assert!(matches!(registry.resolve(&id), Err(Error::AmbiguousDisplay(_))));

        let id = DisplayIdentifier::ByHiddev(0);
        assert!(matches!(registry.resolve(&id), Err(Error::DisplayNotFound(_))));
    });
}

#[test]
fn opens_resolved_display() {
    on_fresh_thread(|| {
        let registry = probe_all(vec![(7, common::monitor())]);
        let display = registry.resolve(&DisplayIdentifier::ByDisplayNumber(1)).unwrap();

        let mut handle = Registry::open_with(&display, DdcOptions::default(), |busno| {
            assert_eq!(busno, 7);
            Ok(common::monitor())
        }).unwrap();
        assert_eq!(handle.display().busno, 7);
        assert_eq!(handle.get_vcp_feature(0x10).unwrap().value(), 50);

        let handle = Registry::open_with(&DisplayRef::for_bus(9), DdcOptions::default(), |_| {
            Err::<SimulatedMonitor, _>(Error::DisplayNotFound("bus 9".into()))
        });
        assert!(handle.is_err());
    });
}
