mod common;

use common::on_fresh_thread;
use ddcci::sim::Fault;
use ddcci::{stats, thread_data, Ddc, Error, ProtocolError, RetryClass};
use serial_test::serial;

struct RestoreDefaults;

impl Drop for RestoreDefaults {
    fn drop(&mut self) {
        for &class in &RetryClass::ALL {
            thread_data::set_default_max_tries(class, class.default_max_tries()).unwrap();
        }
    }
}

#[test]
#[serial]
fn default_max_tries_apply_to_new_threads() {
    let _restore = RestoreDefaults;
    thread_data::set_default_max_tries(RetryClass::WriteRead, 3).unwrap();

    on_fresh_thread(|| {
        assert_eq!(thread_data::thread_max_tries(RetryClass::WriteOnly), 4);
        assert_eq!(thread_data::thread_max_tries(RetryClass::WriteRead), 3);
        assert_eq!(thread_data::thread_max_tries(RetryClass::MultiPartRead), 8);

        let mut monitor = common::monitor();
        for _ in 0..3 {
            monitor.push_fault(Fault::BadChecksum);
        }
        let mut ddc = Ddc::new(&mut monitor);

        match ddc.get_vcp_feature(0x10) {
            Err(Error::Retries { attempts: 3, last }) => assert_eq!(*last, Error::Protocol(ProtocolError::Checksum)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(monitor.reads(), 3);
    });
}

#[test]
#[serial]
fn rejects_out_of_range_max_tries() {
    assert!(thread_data::set_default_max_tries(RetryClass::WriteRead, 0).is_err());
    assert!(thread_data::set_default_max_tries(RetryClass::WriteRead, 16).is_err());
    assert_eq!(thread_data::default_max_tries(RetryClass::WriteRead), 10);
}

#[test]
fn thread_limits_are_private() {
    on_fresh_thread(|| {
        thread_data::set_thread_max_tries(RetryClass::WriteOnly, 2).unwrap();
        on_fresh_thread(|| {
            assert_ne!(thread_data::thread_max_tries(RetryClass::WriteOnly), 2);
        });
        assert_eq!(thread_data::thread_max_tries(RetryClass::WriteOnly), 2);
    });
}

#[test]
fn reports_list_retry_histograms() {
    on_fresh_thread(|| {
        let mut monitor = common::monitor();
        monitor.push_fault(Fault::BadChecksum);
        let mut ddc = Ddc::new(&mut monitor);
        ddc.get_vcp_feature(0x12).unwrap();

        let report = stats::report(stats::StatsType::All);
        assert!(report.contains(RetryClass::WriteRead.name()));
        assert!(stats::status_count(Error::Protocol(ProtocolError::Checksum).code()) >= 1);
    });
}
