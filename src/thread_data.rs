//! Per-thread retry and sleep tuning records.
//!
//! Records live in one process-wide map keyed by OS thread id. The map lock
//! is held only to find or insert a record; each record has its own lock,
//! which in practice only its owning thread and the reporters take.

use std::collections::BTreeMap;
use std::cell::RefCell;
use std::sync::Arc;
use parking_lot::{Mutex, RwLock};
use lazy_static::lazy_static;
use tracing::debug;
use crate::error::{Error, Result};
use crate::retry::{RetryClass, MAX_MAX_TRIES};

/// Histogram width: fatal, failed-max-tries, then one column per attempt.
pub const TRY_COUNTERS: usize = MAX_MAX_TRIES as usize + 2;

/// Outcome of one exchange, as recorded in the try histogram.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TryOutcome {
    /// Succeeded on the given 1-based attempt.
    Succeeded(u8),
    /// Transient failures on every allowed attempt.
    FailedMaxTries,
    /// A non-transient failure ended the exchange.
    Fatal,
}

/// Retry limits and try histogram for one retry class on one thread.
#[derive(Clone, Debug, PartialEq)]
pub struct TryStats {
    pub class: RetryClass,
    pub current: u8,
    pub lowest: u8,
    pub highest: u8,
    /// `[0]` fatal, `[1]` failed max tries, `[n + 1]` succeeded on attempt `n`.
    pub counters: [u32; TRY_COUNTERS],
    /// Number of exchanges recorded.
    pub exchanges: u32,
}

impl TryStats {
    fn new(class: RetryClass, maxtries: u8) -> Self {
        TryStats {
            class,
            current: maxtries,
            lowest: maxtries,
            highest: maxtries,
            counters: [0; TRY_COUNTERS],
            exchanges: 0,
        }
    }

    /// Changes the try limit, widening the observed range.
    pub fn set_max_tries(&mut self, maxtries: u8) -> Result<()> {
        check_max_tries(maxtries)?;
        self.current = maxtries;
        self.lowest = self.lowest.min(maxtries);
        self.highest = self.highest.max(maxtries);
        Ok(())
    }

    pub fn record(&mut self, outcome: TryOutcome) {
        let column = match outcome {
            TryOutcome::Fatal => 0,
            TryOutcome::FailedMaxTries => 1,
            TryOutcome::Succeeded(attempt) => {
                debug_assert!(attempt >= 1 && attempt <= MAX_MAX_TRIES);
                (attempt.max(1).min(MAX_MAX_TRIES) as usize) + 1
            },
        };
        self.counters[column] += 1;
        self.exchanges += 1;
    }

    pub fn fatal(&self) -> u32 {
        self.counters[0]
    }

    pub fn failed_max_tries(&self) -> u32 {
        self.counters[1]
    }

    /// Exchanges that succeeded on the 1-based `attempt`.
    pub fn succeeded_on(&self, attempt: u8) -> u32 {
        self.counters.get(attempt as usize + 1).cloned().unwrap_or(0)
    }

    pub fn succeeded(&self) -> u32 {
        self.counters[2..].iter().sum()
    }

    /// Sum of every histogram column.
    pub fn histogram_total(&self) -> u32 {
        self.counters.iter().sum()
    }

    /// Highest attempt number any success needed.
    pub fn max_attempt_used(&self) -> u8 {
        (1..=MAX_MAX_TRIES).rev().find(|&n| self.succeeded_on(n) > 0).unwrap_or(0)
    }

    /// Accumulates another thread's counters into this one.
    pub fn merge(&mut self, other: &TryStats) {
        for (a, b) in self.counters.iter_mut().zip(other.counters.iter()) {
            *a += *b;
        }
        self.exchanges += other.exchanges;
        self.lowest = self.lowest.min(other.lowest);
        self.highest = self.highest.max(other.highest);
    }
}

fn check_max_tries(maxtries: u8) -> Result<()> {
    if maxtries < 1 || maxtries > MAX_MAX_TRIES {
        Err(Error::InvalidArgument(format!("max tries must be between 1 and {}, got {}", MAX_MAX_TRIES, maxtries)))
    } else {
        Ok(())
    }
}

/// Error rate above which the adaptive factor grows.
pub const ADAPTIVE_ERROR_THRESHOLD: f64 = 0.1;
/// Lower bound of the adaptive factor.
pub const ADAPTIVE_FLOOR: f64 = 0.5;
/// Step taken toward the floor after an error-free interval.
pub const ADAPTIVE_DECREMENT: f64 = 0.1;
/// Default upper bound of the adaptive factor.
pub const DEFAULT_ADAPTIVE_CEILING: f64 = 3.0;

/// Counters driving the adaptive sleep factor.
#[derive(Clone, Debug, PartialEq)]
pub struct Adaptive {
    /// When false the factor is held at 1.0; counters are still kept.
    pub enabled: bool,
    pub recent_ok: u32,
    pub recent_err: u32,
    pub total_ok: u64,
    pub total_err: u64,
    pub check_interval: u32,
    pub factor: f64,
    pub increment: f64,
    pub ceiling: f64,
    pub adjustments: u32,
    pub max_factor: f64,
    pub min_factor: f64,
}

impl Adaptive {
    fn new(enabled: bool, increment: f64) -> Self {
        Adaptive {
            enabled,
            recent_ok: 0,
            recent_err: 0,
            total_ok: 0,
            total_err: 0,
            check_interval: 2,
            factor: 1.0,
            increment,
            ceiling: DEFAULT_ADAPTIVE_CEILING,
            adjustments: 0,
            max_factor: 1.0,
            min_factor: 1.0,
        }
    }

    /// The factor the governor applies.
    pub fn effective_factor(&self) -> f64 {
        if self.enabled {
            self.factor
        } else {
            1.0
        }
    }

    /// Counts one try and, at the end of a check interval, recomputes the
    /// factor. Returns the new factor when it changed.
    pub fn record(&mut self, ok: bool) -> Option<f64> {
        if ok {
            self.recent_ok += 1;
            self.total_ok += 1;
        } else {
            self.recent_err += 1;
            self.total_err += 1;
        }

        let calls = self.recent_ok + self.recent_err;
        if calls < self.check_interval.max(1) {
            return None
        }

        let error_rate = self.recent_err as f64 / calls as f64;
        self.recent_ok = 0;
        self.recent_err = 0;

        if !self.enabled {
            return None
        }

        let previous = self.factor;
        if error_rate > ADAPTIVE_ERROR_THRESHOLD {
            self.factor = (self.factor + self.increment).min(self.ceiling);
        } else if error_rate == 0.0 {
            self.factor = (self.factor - ADAPTIVE_DECREMENT).max(ADAPTIVE_FLOOR);
        }

        if (self.factor - previous).abs() > f64::EPSILON {
            self.adjustments += 1;
            self.max_factor = self.max_factor.max(self.factor);
            self.min_factor = self.min_factor.min(self.factor);
            Some(self.factor)
        } else {
            None
        }
    }
}

/// Sleep tuning for one thread.
#[derive(Clone, Debug, PartialEq)]
pub struct SleepTuning {
    /// User tunable scale on every sleep.
    pub multiplier_factor: f64,
    /// Bumped by the retry engine on each failed try of an exchange.
    pub multiplier_ct: u32,
    pub max_multiplier_ct: u32,
    /// How many times `multiplier_ct` was raised above 1.
    pub multiplier_ct_bumps: u32,
    pub adaptive: Adaptive,
}

/// Everything kept for one thread.
#[derive(Clone, Debug, PartialEq)]
pub struct PerThreadData {
    pub thread_id: i32,
    pub description: Option<String>,
    pub sleep: SleepTuning,
    pub tries: [TryStats; 4],
}

impl PerThreadData {
    fn new(thread_id: i32, defaults: &Defaults) -> Self {
        let tries = [
            TryStats::new(RetryClass::WriteOnly, defaults.max_tries[0]),
            TryStats::new(RetryClass::WriteRead, defaults.max_tries[1]),
            TryStats::new(RetryClass::MultiPartRead, defaults.max_tries[2]),
            TryStats::new(RetryClass::MultiPartWrite, defaults.max_tries[3]),
        ];

        PerThreadData {
            thread_id,
            description: None,
            sleep: SleepTuning {
                multiplier_factor: defaults.sleep_multiplier,
                multiplier_ct: 1,
                max_multiplier_ct: 1,
                multiplier_ct_bumps: 0,
                adaptive: Adaptive::new(defaults.dynamic_sleep, defaults.sleep_multiplier.max(0.1)),
            },
            tries,
        }
    }

    pub fn try_stats(&self, class: RetryClass) -> &TryStats {
        &self.tries[class.index()]
    }

    pub fn try_stats_mut(&mut self, class: RetryClass) -> &mut TryStats {
        &mut self.tries[class.index()]
    }

    /// Sets the multiplier count for the rest of the current exchange.
    pub fn set_multiplier_ct(&mut self, ct: u32) {
        let ct = ct.max(1);
        if ct > 1 && ct != self.sleep.multiplier_ct {
            self.sleep.multiplier_ct_bumps += 1;
        }
        self.sleep.multiplier_ct = ct;
        self.sleep.max_multiplier_ct = self.sleep.max_multiplier_ct.max(ct);
    }
}

#[derive(Clone, Debug)]
struct Defaults {
    max_tries: [u8; 4],
    sleep_multiplier: f64,
    dynamic_sleep: bool,
}

type Record = Arc<Mutex<PerThreadData>>;

lazy_static! {
    static ref DEFAULTS: RwLock<Defaults> = RwLock::new(Defaults {
        max_tries: [
            RetryClass::WriteOnly.default_max_tries(),
            RetryClass::WriteRead.default_max_tries(),
            RetryClass::MultiPartRead.default_max_tries(),
            RetryClass::MultiPartWrite.default_max_tries(),
        ],
        sleep_multiplier: 1.0,
        dynamic_sleep: false,
    });
    static ref THREADS: Mutex<BTreeMap<i32, Record>> = Mutex::new(BTreeMap::new());
}

thread_local! {
    static CURRENT: RefCell<Option<Record>> = RefCell::new(None);
}

/// The kernel thread id of the caller.
pub fn current_thread_id() -> i32 {
    unsafe { libc::syscall(libc::SYS_gettid) as i32 }
}

fn current_record() -> Record {
    CURRENT.with(|current| {
        let mut current = current.borrow_mut();
        if let Some(record) = current.as_ref() {
            return record.clone()
        }

        let tid = current_thread_id();
        let record = {
            let mut threads = THREADS.lock();
            threads.entry(tid).or_insert_with(|| {
                let defaults = DEFAULTS.read();
                debug!(thread = tid, "creating per-thread data");
                Arc::new(Mutex::new(PerThreadData::new(tid, &defaults)))
            }).clone()
        };
        *current = Some(record.clone());
        record
    })
}

/// Runs `f` on the calling thread's record, creating it from the
/// process-wide defaults on first use.
pub fn with_current<R, F: FnOnce(&mut PerThreadData) -> R>(f: F) -> R {
    let record = current_record();
    let mut data = record.lock();
    f(&mut data)
}

/// Copies of every thread's record, in thread id order.
pub fn snapshot() -> Vec<PerThreadData> {
    let records: Vec<Record> = THREADS.lock().values().cloned().collect();
    records.iter().map(|r| r.lock().clone()).collect()
}

/// Sets the try limit new threads start with.
pub fn set_default_max_tries(class: RetryClass, maxtries: u8) -> Result<()> {
    check_max_tries(maxtries)?;
    DEFAULTS.write().max_tries[class.index()] = maxtries;
    Ok(())
}

pub fn default_max_tries(class: RetryClass) -> u8 {
    DEFAULTS.read().max_tries[class.index()]
}

/// Sets the sleep multiplier factor new threads start with.
pub fn set_default_sleep_multiplier(factor: f64) -> Result<()> {
    if !(factor >= 0.0) || !factor.is_finite() {
        return Err(Error::InvalidArgument(format!("invalid sleep multiplier {}", factor)))
    }
    DEFAULTS.write().sleep_multiplier = factor;
    Ok(())
}

/// Whether new threads adapt their sleep factor to observed errors.
pub fn set_dynamic_sleep_default(enabled: bool) {
    DEFAULTS.write().dynamic_sleep = enabled;
}

/// Sets the calling thread's try limit for a class.
pub fn set_thread_max_tries(class: RetryClass, maxtries: u8) -> Result<()> {
    with_current(|data| data.try_stats_mut(class).set_max_tries(maxtries))
}

pub fn thread_max_tries(class: RetryClass) -> u8 {
    with_current(|data| data.try_stats(class).current)
}

/// Sets the calling thread's sleep multiplier factor.
pub fn set_thread_sleep_multiplier(factor: f64) {
    with_current(|data| data.sleep.multiplier_factor = factor.max(0.0))
}

/// Enables or disables adaptation on the calling thread.
pub fn set_thread_dynamic_sleep(enabled: bool) {
    with_current(|data| data.sleep.adaptive.enabled = enabled)
}

/// Labels the calling thread in reports.
pub fn set_thread_description<S: Into<String>>(description: S) {
    let description = description.into();
    with_current(|data| data.description = Some(description))
}

/// Records an exchange outcome for the calling thread.
pub fn record_try(class: RetryClass, outcome: TryOutcome) {
    with_current(|data| data.try_stats_mut(class).record(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn on_fresh_thread<F: FnOnce() + Send + 'static>(f: F) {
        thread::spawn(f).join().unwrap();
    }

    #[test]
    fn max_tries_bounds_hold() {
        on_fresh_thread(|| {
            for &n in &[3u8, 15, 1, 7, 0, 16, 9] {
                let _ = set_thread_max_tries(RetryClass::WriteRead, n);
                with_current(|data| {
                    let s = data.try_stats(RetryClass::WriteRead);
                    assert!(s.lowest <= s.current);
                    assert!(s.current <= s.highest);
                    assert!(s.highest <= MAX_MAX_TRIES);
                });
            }
            assert_eq!(thread_max_tries(RetryClass::WriteRead), 9);
            with_current(|data| {
                let s = data.try_stats(RetryClass::WriteRead);
                assert_eq!((s.lowest, s.highest), (1, 15));
            });
        });
    }

    #[test]
    fn rejects_out_of_range() {
        on_fresh_thread(|| {
            assert!(set_thread_max_tries(RetryClass::WriteOnly, 0).is_err());
            assert!(set_thread_max_tries(RetryClass::WriteOnly, MAX_MAX_TRIES + 1).is_err());
        });
    }

    #[test]
    fn histogram_columns() {
        let mut stats = TryStats::new(RetryClass::WriteRead, 10);
        stats.record(TryOutcome::Succeeded(1));
        stats.record(TryOutcome::Succeeded(1));
        stats.record(TryOutcome::Succeeded(4));
        stats.record(TryOutcome::FailedMaxTries);
        stats.record(TryOutcome::Fatal);

        assert_eq!(stats.succeeded_on(1), 2);
        assert_eq!(stats.succeeded_on(4), 1);
        assert_eq!(stats.failed_max_tries(), 1);
        assert_eq!(stats.fatal(), 1);
        assert_eq!(stats.succeeded(), 3);
        assert_eq!(stats.max_attempt_used(), 4);
        assert_eq!(stats.histogram_total(), stats.exchanges);
    }

    #[test]
    fn threads_are_independent() {
        on_fresh_thread(|| {
            set_thread_max_tries(RetryClass::MultiPartRead, 2).unwrap();
            let tid = current_thread_id();
            on_fresh_thread(move || {
                assert_ne!(current_thread_id(), tid);
                assert_eq!(thread_max_tries(RetryClass::MultiPartRead), default_max_tries(RetryClass::MultiPartRead));
            });
            assert_eq!(thread_max_tries(RetryClass::MultiPartRead), 2);
        });
    }

    #[test]
    fn adaptive_factor_moves_within_bounds() {
        let mut a = Adaptive::new(true, 0.5);
        a.ceiling = 2.0;

        for _ in 0..20 {
            a.record(false);
        }
        assert_eq!(a.factor, 2.0);

        for _ in 0..100 {
            a.record(true);
        }
        assert!((a.factor - ADAPTIVE_FLOOR).abs() < 1e-9);
        assert!(a.adjustments > 0);
    }

    #[test]
    fn adaptive_disabled_holds_factor() {
        let mut a = Adaptive::new(false, 0.5);
        for _ in 0..10 {
            assert_eq!(a.record(false), None);
        }
        assert_eq!(a.effective_factor(), 1.0);
        assert_eq!(a.total_err, 10);
    }
}
