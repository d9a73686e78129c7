mod common;

use common::{on_fresh_thread, Scripted};
use ddcci::features::lookup;
use ddcci::sim::{Fault, SimulatedMonitor};
use ddcci::{packet, Ddc, DdcOptions, Error, NewValue, ProtocolError, VcpValue, VersionSpec, MAX_TABLE_LEN};

#[test]
fn reads_continuous_feature() {
    on_fresh_thread(|| {
        let mut ddc = Ddc::new(Scripted::replying(&[
            &[0x6e, 0x88, 0x02, 0x00, 0x10, 0x00, 0x00, 0x64, 0x00, 0x32, 0xf2],
        ]));

        let reply = ddc.get_vcp_reply(0x10).unwrap();
        assert!(reply.supported);
        assert_eq!(reply.type_code, 0x00);
        assert_eq!(reply.value.maximum(), 100);
        assert_eq!(reply.value.value(), 50);
        assert_eq!(ddc.inner_ref().writes, vec![vec![0x51, 0x82, 0x01, 0x10, 0xac]]);
    });
}

#[test]
fn rejects_bad_checksum() {
    let reply = [0x6e, 0x88, 0x02, 0x00, 0x10, 0x00, 0x00, 0x64, 0x00, 0x32, 0xac];
    assert_eq!(packet::decode_response(&reply), Err(ProtocolError::Checksum));
}

#[test]
fn unsupported_feature_is_not_retried() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor();
        let mut ddc = Ddc::new(&mut monitor);

        assert_eq!(ddc.get_vcp_feature(0x14), Err(Error::FeatureUnsupportedByMonitor(0x14)));
        assert_eq!(monitor.requests(), &[vec![0x01, 0x14]]);
    });
}

#[test]
fn set_then_verify() {
    on_fresh_thread(|| {
        let readback = packet::encode_response(&[0x02, 0x00, 0x10, 0x00, 0x00, 0x64, 0x00, 0x4b]).unwrap();
        let mut ddc = Ddc::new(Scripted::replying(&[&readback]));
        let info = lookup(0x10, VersionSpec::V22, false).unwrap();

        let written = ddc.set_feature_value(&info, NewValue::Absolute(75)).unwrap();
        match written {
            VcpValue::NonTable(v) => assert_eq!(v.value(), 75),
            other => panic!("unexpected {:?}", other),
        }
        let writes = &ddc.inner_ref().writes;
        assert_eq!(writes[0], vec![0x51, 0x84, 0x03, 0x10, 0x00, 0x4b, 0xe3]);
        assert_eq!(writes[1], vec![0x51, 0x82, 0x01, 0x10, 0xac]);
    });
}

#[test]
fn verify_mismatch() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor().ignore_writes_to(0x10);
        let mut ddc = Ddc::new(&mut monitor);
        let info = ddc.feature_info(0x10, false).unwrap();

        match ddc.set_feature_value(&info, NewValue::Absolute(75)) {
            Err(Error::VerifyFailed { code: 0x10, expected, actual }) => {
                assert_eq!(expected, "75");
                assert_eq!(actual, "50");
            },
            other => panic!("unexpected {:?}", other),
        }

        ddc.set_options(DdcOptions { verify: false, ..Default::default() });
        assert!(ddc.set_feature_value(&info, NewValue::Absolute(75)).is_ok());
    });
}

#[test]
fn relative_values_are_clamped() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor();
        let mut ddc = Ddc::new(&mut monitor);
        let info = ddc.feature_info(0x10, false).unwrap();

        ddc.set_feature_value(&info, NewValue::Relative(80)).unwrap();
        assert_eq!(monitor.feature(0x10).unwrap().value, 100);

        let mut ddc = Ddc::new(&mut monitor);
        ddc.set_feature_value(&info, NewValue::Relative(-150)).unwrap();
        assert_eq!(monitor.feature(0x10).unwrap().value, 0);
    });
}

#[test]
fn read_only_feature_cannot_be_set() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor();
        let mut ddc = Ddc::new(&mut monitor);
        let info = ddc.feature_info(0xdf, false).unwrap();

        match ddc.set_feature_value(&info, NewValue::Absolute(1)) {
            Err(Error::InvalidOperation(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(monitor.set_count(0xdf), 0);
    });
}

#[test]
fn reassembles_capabilities() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor();
        let mut ddc = Ddc::new(&mut monitor);

        let raw = ddc.capabilities_string().unwrap();
        assert_eq!(raw, common::CAPABILITIES.as_bytes());
        let caps = ddc.capabilities().unwrap();
        assert_eq!(caps.feature_codes(), vec![0x10, 0x14, 0x16]);
        assert_eq!(caps.model.as_deref(), Some("XYZ"));

        let offsets: Vec<_> = monitor.requests().iter()
            .take(3)
            .map(|r| (r[0], u16::from_be_bytes([r[1], r[2]])))
            .collect();
        let end = common::CAPABILITIES.len() as u16;
        assert_eq!(offsets, vec![(0xf3, 0), (0xf3, 32), (0xf3, end)]);
    });
}

#[test]
fn multi_part_read_restarts_on_offset_mismatch() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor();
        monitor.push_fault(Fault::WrongOffset);
        let mut ddc = Ddc::new(&mut monitor);

        assert_eq!(ddc.capabilities_string().unwrap(), common::CAPABILITIES.as_bytes());

        let offsets: Vec<_> = monitor.requests().iter()
            .map(|r| u16::from_be_bytes([r[1], r[2]]))
            .collect();
        let end = common::CAPABILITIES.len() as u16;
        assert_eq!(offsets, vec![0, 0, 32, end]);
    });
}

#[test]
fn empty_capabilities() {
    on_fresh_thread(|| {
        let mut monitor = SimulatedMonitor::new().with_capabilities("");
        let mut ddc = Ddc::new(&mut monitor);

        let caps = ddc.capabilities().unwrap();
        assert!(caps.raw.is_empty());
        assert!(caps.vcp.is_empty());
    });
}

#[test]
fn oversized_table_is_rejected() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor().with_table(0x73, &[0xa5; 300]);
        let mut ddc = Ddc::new(&mut monitor);

        match ddc.table_read(0x73) {
            Err(Error::Protocol(ProtocolError::MultiPartOverflow(limit))) => assert_eq!(limit, MAX_TABLE_LEN),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(monitor.reads(), MAX_TABLE_LEN / 32 + 1);
    });
}

#[test]
fn table_values() {
    on_fresh_thread(|| {
        let lut: Vec<u8> = (0..40).collect();
        let mut monitor = common::monitor().with_table(0x73, &lut);
        let mut ddc = Ddc::new(&mut monitor);

        assert_eq!(ddc.table_read(0x73).unwrap(), lut);

        let replacement: Vec<u8> = (100..150).collect();
        ddc.table_write(0x73, &replacement).unwrap();
        assert_eq!(monitor.table(0x73), Some(&replacement[..]));
    });
}

#[test]
fn transient_errors_are_retried() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor();
        monitor.push_fault(Fault::BadChecksum);
        monitor.push_fault(Fault::Null);
        monitor.push_fault(Fault::AllZero);
        let mut ddc = Ddc::new(&mut monitor);

        assert_eq!(ddc.get_vcp_feature(0x12).unwrap().value(), 75);
        assert_eq!(monitor.reads(), 4);
    });
}

#[test]
fn second_all_zero_read_is_fatal() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor();
        monitor.push_fault(Fault::AllZero);
        monitor.push_fault(Fault::AllZero);
        let mut ddc = Ddc::new(&mut monitor);

        assert_eq!(ddc.get_vcp_feature(0x10), Err(Error::Protocol(ProtocolError::ReadAllZero)));
        assert_eq!(monitor.reads(), 2);
    });
}

#[test]
fn new_control_values() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor();
        monitor.push_change(0x10);
        monitor.push_change(0x12);
        let mut ddc = Ddc::new(&mut monitor);

        assert_eq!(ddc.get_vcp_feature(0x02).unwrap().sl, 0x02);
        assert_eq!(ddc.get_vcp_feature(0x52).unwrap().sl, 0x10);
        assert_eq!(ddc.get_vcp_feature(0x52).unwrap().sl, 0x12);
        assert_eq!(ddc.get_vcp_feature(0x52).unwrap().sl, 0x00);
        ddc.set_vcp_feature(0x02, 0x01).unwrap();
        assert_eq!(ddc.get_vcp_feature(0x02).unwrap().sl, 0x01);
    });
}

#[test]
fn version_falls_back_to_capabilities() {
    on_fresh_thread(|| {
        let mut monitor = ddcci::sim::SimulatedMonitor::new()
            .with_feature(0x10, 100, 50)
            .with_capabilities("(prot(monitor)vcp(10)mccs_ver(2.1))");
        let mut ddc = Ddc::new(&mut monitor);

        assert_eq!(ddc.mccs_version(), VersionSpec::V21);
        assert_eq!(ddc.cached_version(), Some(VersionSpec::V21));
    });
}
