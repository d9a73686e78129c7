mod common;

use std::fs;
use common::on_fresh_thread;
use ddcci::dumpload::DumpData;
use ddcci::registry::DisplayIdentifier;
use ddcci::Ddc;

#[test]
fn dump_and_restore() {
    on_fresh_thread(|| {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u2415.vcp");

        let mut monitor = common::monitor();
        let mut ddc = Ddc::new(&mut monitor);
        let mut data = ddc.dump().unwrap();
        data.bus = Some(4);

        assert_eq!(data.model.as_deref(), Some("DELL U2415"));
        assert_eq!(data.serial.as_deref(), Some("7MT0186"));
        assert!(data.values.contains(&(0x10, 50)));
        assert!(data.values.contains(&(0x12, 75)));
        assert!(data.values.iter().all(|&(code, _)| code != 0xdf));
        fs::write(&path, data.to_text()).unwrap();

        let mut changed = common::monitor();
        changed.set_feature_value(0x10, 20);
        changed.set_feature_value(0x12, 30);

        let loaded = DumpData::parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.bus, Some(4));
        assert_eq!(loaded.values, data.values);
        match loaded.identifier() {
            Some(DisplayIdentifier::ByEdid(block)) => assert_eq!(&block, data.edid.as_ref().unwrap().bytes()),
            other => panic!("unexpected {:?}", other),
        }

        let mut ddc = Ddc::new(&mut changed);
        ddc.load(&loaded).unwrap();
        assert_eq!(changed.feature(0x10).unwrap().value, 50);
        assert_eq!(changed.feature(0x12).unwrap().value, 75);
    });
}

#[test]
fn load_stops_at_first_failure() {
    on_fresh_thread(|| {
        let data = DumpData::parse("VCP 10 40\nVCP 12 10\n").unwrap();
        let mut monitor = common::monitor().ignore_writes_to(0x10);
        let mut ddc = Ddc::new(&mut monitor);

        assert!(ddc.load(&data).is_err());
        assert_eq!(monitor.set_count(0x12), 0);
        assert_eq!(monitor.feature(0x12).unwrap().value, 75);
    });
}
