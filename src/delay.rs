//! The timing governor.
//!
//! Every point in the DDC/CI protocol that needs a pause names a
//! [`SleepEvent`]. The governor scales the event's base time by the calling
//! thread's multiplier count, multiplier factor and adaptive factor, sleeps,
//! and records the sleep for the statistics reporter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::{Duration, Instant};
use std::fmt;
use tracing::trace;
use crate::transport::TransportKind;
use crate::{stats, thread_data};

/// A point in the protocol that requires a pause.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SleepEvent {
    WriteToRead,
    PostWrite,
    PostOpen,
    PostRead,
    PostSaveSettings,
    PreEdid,
    PreMultiPartRead,
    MultiPartReadToWrite,
    DdcNull,
    Other,
    /// A caller-specified base time in milliseconds.
    Special(u32),
}

impl SleepEvent {
    /// Every event with a fixed base time.
    pub const FIXED: [SleepEvent; 10] = [
        SleepEvent::WriteToRead,
        SleepEvent::PostWrite,
        SleepEvent::PostOpen,
        SleepEvent::PostRead,
        SleepEvent::PostSaveSettings,
        SleepEvent::PreEdid,
        SleepEvent::PreMultiPartRead,
        SleepEvent::MultiPartReadToWrite,
        SleepEvent::DdcNull,
        SleepEvent::Other,
    ];

    /// Upper-case name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            SleepEvent::WriteToRead => "WRITE_TO_READ",
            SleepEvent::PostWrite => "POST_WRITE",
            SleepEvent::PostOpen => "POST_OPEN",
            SleepEvent::PostRead => "POST_READ",
            SleepEvent::PostSaveSettings => "POST_SAVE_SETTINGS",
            SleepEvent::PreEdid => "PRE_EDID",
            SleepEvent::PreMultiPartRead => "PRE_MULTI_PART_READ",
            SleepEvent::MultiPartReadToWrite => "MULTI_PART_READ_TO_WRITE",
            SleepEvent::DdcNull => "DDC_NULL",
            SleepEvent::Other => "OTHER",
            SleepEvent::Special(_) => "SPECIAL",
        }
    }

    /// Unscaled sleep time for this event on the given transport.
    ///
    /// USB HID monitors pace themselves, so no event sleeps there.
    pub fn base_millis(self, kind: TransportKind) -> u32 {
        if kind == TransportKind::Usb {
            return 0
        }

        match self {
            SleepEvent::WriteToRead => 50,
            SleepEvent::PostWrite => 50,
            SleepEvent::PostOpen => 50,
            SleepEvent::PostRead => 50,
            SleepEvent::PostSaveSettings => 200,
            SleepEvent::PreEdid => 50,
            SleepEvent::PreMultiPartRead => 200,
            SleepEvent::MultiPartReadToWrite => 50,
            SleepEvent::DdcNull => 100,
            SleepEvent::Other => 50,
            SleepEvent::Special(ms) => ms,
        }
    }

    fn suppressible(self) -> bool {
        match self {
            SleepEvent::PostRead | SleepEvent::PreEdid => true,
            _ => false,
        }
    }
}

impl fmt::Display for SleepEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

static SUPPRESS_SLEEPS: AtomicBool = AtomicBool::new(false);

/// Turns `POST_READ` and `PRE_EDID` sleeps into no-ops.
pub fn set_sleep_suppression(enabled: bool) {
    SUPPRESS_SLEEPS.store(enabled, Ordering::Relaxed);
}

/// Whether sleep suppression is on.
pub fn sleep_suppression() -> bool {
    SUPPRESS_SLEEPS.load(Ordering::Relaxed)
}

/// Scales a base time, rounding up.
///
/// Returns 0 when the product is not positive, otherwise at least 1.
pub fn scaled_millis(base_ms: u32, multiplier_ct: u32, multiplier_factor: f64, adaptive_factor: f64) -> u32 {
    let product = base_ms as f64 * multiplier_ct as f64 * multiplier_factor * adaptive_factor;
    if !(product > 0.0) {
        return 0
    }

    let ms = product.ceil();
    if ms >= u32::MAX as f64 {
        u32::MAX
    } else {
        (ms as u32).max(1)
    }
}

/// The sleep the calling thread would perform for `event`, or `None` when
/// the event is suppressed.
pub fn planned_millis(kind: TransportKind, event: SleepEvent) -> Option<u32> {
    if event.suppressible() && sleep_suppression() {
        return None
    }

    let (ct, factor, adaptive) = thread_data::with_current(|data| {
        (data.sleep.multiplier_ct, data.sleep.multiplier_factor, data.sleep.adaptive.effective_factor())
    });

    Some(scaled_millis(event.base_millis(kind), ct, factor, adaptive))
}

/// Sleeps for `event`, returning the requested milliseconds.
pub fn tuned_sleep(kind: TransportKind, event: SleepEvent) -> u32 {
    let ms = match planned_millis(kind, event) {
        Some(ms) => ms,
        None => return 0,
    };

    let start = Instant::now();
    if ms > 0 {
        sleep(Duration::from_millis(ms as u64));
    }
    let actual = start.elapsed();

    trace!(event = event.name(), requested_ms = ms, actual_us = actual.as_micros() as u64, "tuned sleep");
    stats::record_sleep(event, ms, actual);

    ms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_times() {
        assert_eq!(SleepEvent::WriteToRead.base_millis(TransportKind::I2c), 50);
        assert_eq!(SleepEvent::PostSaveSettings.base_millis(TransportKind::I2c), 200);
        assert_eq!(SleepEvent::DdcNull.base_millis(TransportKind::I2c), 100);
        assert_eq!(SleepEvent::PreMultiPartRead.base_millis(TransportKind::I2c), 200);
        assert_eq!(SleepEvent::Special(7).base_millis(TransportKind::I2c), 7);
        assert_eq!(SleepEvent::PostWrite.base_millis(TransportKind::Usb), 0);
    }

    #[test]
    fn scaling() {
        assert_eq!(scaled_millis(50, 1, 1.0, 1.0), 50);
        assert_eq!(scaled_millis(50, 3, 1.0, 1.0), 150);
        assert_eq!(scaled_millis(50, 1, 0.5, 1.0), 25);
        assert_eq!(scaled_millis(50, 1, 0.011, 1.0), 1);
        assert_eq!(scaled_millis(50, 1, 0.001, 1.0), 1);
        assert_eq!(scaled_millis(50, 1, 1.0, 0.5), 25);
        assert_eq!(scaled_millis(200, 2, 1.5, 1.25), 750);
    }

    #[test]
    fn never_negative() {
        assert_eq!(scaled_millis(50, 1, 0.0, 1.0), 0);
        assert_eq!(scaled_millis(50, 1, -2.0, 1.0), 0);
        assert_eq!(scaled_millis(0, 4, 1.0, 1.0), 0);
        assert_eq!(scaled_millis(50, 1, f64::NAN, 1.0), 0);
        for &factor in &[0.0001, 0.3, 1.0, 2.7] {
            for event in SleepEvent::FIXED.iter() {
                assert!(scaled_millis(event.base_millis(TransportKind::I2c), 1, factor, 1.0) >= 1);
            }
        }
    }

    #[test]
    fn zero_factor_thread_does_not_sleep() {
        std::thread::spawn(|| {
            thread_data::set_thread_sleep_multiplier(0.0);
            assert_eq!(planned_millis(TransportKind::I2c, SleepEvent::PostWrite), Some(0));
            assert_eq!(tuned_sleep(TransportKind::I2c, SleepEvent::PostSaveSettings), 0);
        }).join().unwrap();
    }

    #[test]
    fn suppressed_events_skip_the_sleep() {
        std::thread::spawn(|| {
            set_sleep_suppression(true);
            assert_eq!(planned_millis(TransportKind::I2c, SleepEvent::PostRead), None);
            assert_eq!(tuned_sleep(TransportKind::I2c, SleepEvent::PreEdid), 0);
            assert_eq!(planned_millis(TransportKind::I2c, SleepEvent::PostWrite), Some(50));

            set_sleep_suppression(false);
            assert_eq!(planned_millis(TransportKind::I2c, SleepEvent::PostRead), Some(50));
        }).join().unwrap();
    }
}
