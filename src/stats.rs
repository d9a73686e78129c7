//! Execution statistics: status code counts, I/O call timings, sleep totals,
//! and reports over the per-thread try histograms.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::{Duration, Instant};
use parking_lot::Mutex;
use lazy_static::lazy_static;
use crate::delay::SleepEvent;
use crate::error::{Error, ErrorKind};
use crate::retry::{RetryClass, MAX_MAX_TRIES};
use crate::thread_data::{self, TryStats};

/// Kinds of timed bus operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IoEvent {
    Open,
    Close,
    Read,
    Write,
    IoctlRead,
    IoctlWrite,
    SetAddress,
    Poll,
    EdidRead,
}

impl IoEvent {
    pub fn name(self) -> &'static str {
        match self {
            IoEvent::Open => "open",
            IoEvent::Close => "close",
            IoEvent::Read => "read",
            IoEvent::Write => "write",
            IoEvent::IoctlRead => "ioctl read",
            IoEvent::IoctlWrite => "ioctl write",
            IoEvent::SetAddress => "set address",
            IoEvent::Poll => "poll",
            IoEvent::EdidRead => "EDID read",
        }
    }
}

/// Which report sections `--stats` prints.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StatsType {
    Tries,
    Errors,
    Calls,
    Elapsed,
    All,
}

#[derive(Clone, Debug, Default)]
struct Timing {
    count: u64,
    total: Duration,
}

#[derive(Clone, Debug, Default)]
struct SleepTotals {
    count: u64,
    requested_ms: u64,
    actual: Duration,
}

#[derive(Clone, Debug)]
struct StatusCount {
    kind: ErrorKind,
    name: &'static str,
    count: u64,
}

struct Collector {
    started: Instant,
    status: BTreeMap<i32, StatusCount>,
    io: BTreeMap<IoEvent, Timing>,
    sleeps: BTreeMap<SleepEvent, SleepTotals>,
}

lazy_static! {
    static ref STATS: Mutex<Collector> = Mutex::new(Collector {
        started: Instant::now(),
        status: BTreeMap::new(),
        io: BTreeMap::new(),
        sleeps: BTreeMap::new(),
    });
}

/// Counts one occurrence of an error's status code.
pub fn record_status(error: &Error) {
    let code = error.code();
    let mut stats = STATS.lock();
    stats.status.entry(code).or_insert_with(|| StatusCount {
        kind: error.kind(),
        name: error.name(),
        count: 0,
    }).count += 1;
}

/// Records a timed bus operation.
pub fn record_io_event(event: IoEvent, elapsed: Duration) {
    let mut stats = STATS.lock();
    let timing = stats.io.entry(event).or_default();
    timing.count += 1;
    timing.total += elapsed;
}

/// Runs `f`, recording its duration as `event`.
pub fn timed<R, F: FnOnce() -> R>(event: IoEvent, f: F) -> R {
    let start = Instant::now();
    let r = f();
    record_io_event(event, start.elapsed());
    r
}

/// Records one governor sleep.
pub fn record_sleep(event: SleepEvent, requested_ms: u32, actual: Duration) {
    let key = match event {
        SleepEvent::Special(_) => SleepEvent::Special(0),
        e => e,
    };
    let mut stats = STATS.lock();
    let totals = stats.sleeps.entry(key).or_default();
    totals.count += 1;
    totals.requested_ms += requested_ms as u64;
    totals.actual += actual;
}

/// How many times a status code was recorded.
pub fn status_count(code: i32) -> u64 {
    STATS.lock().status.get(&code).map(|s| s.count).unwrap_or(0)
}

/// How many sleeps of an event were recorded.
pub fn sleep_count(event: SleepEvent) -> u64 {
    STATS.lock().sleeps.get(&event).map(|s| s.count).unwrap_or(0)
}

/// Try histograms of every thread, merged by retry class.
pub fn merged_try_stats() -> Vec<TryStats> {
    let threads = thread_data::snapshot();
    RetryClass::ALL.iter().filter_map(|&class| {
        let mut iter = threads.iter().map(|t| t.try_stats(class));
        let mut merged = iter.next()?.clone();
        for s in iter {
            merged.merge(s);
        }
        Some(merged)
    }).collect()
}

fn report_try_stats(out: &mut String, stats: &TryStats) {
    let _ = writeln!(out, "Retry statistics for {} exchanges", stats.class);
    if stats.exchanges == 0 {
        let _ = writeln!(out, "   No tries attempted");
        return
    }
    let _ = writeln!(out, "   Max tries allowed: {} (range {}..{})", stats.current, stats.lowest, stats.highest);
    let _ = writeln!(out, "   Successful attempts by number of tries required:");
    for attempt in 1..=stats.max_attempt_used() {
        let _ = writeln!(out, "      {:2}: {:5}", attempt, stats.succeeded_on(attempt));
    }
    let _ = writeln!(out, "   Total successful:               {:5}", stats.succeeded());
    let _ = writeln!(out, "   Failed due to max tries exceeded: {:3}", stats.failed_max_tries());
    let _ = writeln!(out, "   Failed due to fatal error:      {:5}", stats.fatal());
    let _ = writeln!(out, "   Total exchanges:                {:5}", stats.exchanges);
}

/// The `tries` section.
pub fn tries_report() -> String {
    let mut out = String::new();
    for stats in merged_try_stats() {
        report_try_stats(&mut out, &stats);
    }

    let threads = thread_data::snapshot();
    if threads.len() > 1 {
        let _ = writeln!(out, "Per-thread maxtries (current/lowest/highest), MAX_MAX_TRIES = {}:", MAX_MAX_TRIES);
        for t in &threads {
            let _ = write!(out, "   thread {:7}", t.thread_id);
            for s in t.tries.iter() {
                let _ = write!(out, "  {:>16}: {:2}/{:2}/{:2}", s.class.name(), s.current, s.lowest, s.highest);
            }
            if let Some(desc) = &t.description {
                let _ = write!(out, "  ({})", desc);
            }
            let _ = writeln!(out);
        }
    }
    out
}

/// The `errors` section.
pub fn errors_report() -> String {
    let stats = STATS.lock();
    let mut out = String::new();
    let _ = writeln!(out, "Status codes recorded:");
    if stats.status.is_empty() {
        let _ = writeln!(out, "   None");
    }
    for (code, s) in stats.status.iter() {
        let _ = writeln!(out, "   {:6}  {:<10} {:<28} {:5}", code, s.kind.name(), s.name, s.count);
    }
    out
}

/// The `calls` section.
pub fn calls_report() -> String {
    let stats = STATS.lock();
    let mut out = String::new();
    let _ = writeln!(out, "I/O calls:");
    if stats.io.is_empty() {
        let _ = writeln!(out, "   None");
    }
    for (event, t) in stats.io.iter() {
        let _ = writeln!(out, "   {:<12} {:6} calls  {:10.3} ms", event.name(), t.count, t.total.as_secs_f64() * 1000.0);
    }
    out
}

/// The `elapsed` section, including per-thread sleep tuning.
pub fn elapsed_report() -> String {
    let mut out = String::new();
    {
        let stats = STATS.lock();
        let _ = writeln!(out, "Sleeps by event:");
        let mut requested = 0;
        let mut actual = Duration::default();
        for (event, s) in stats.sleeps.iter() {
            let _ = writeln!(out, "   {:<26} {:6} sleeps  requested {:8} ms  actual {:10.3} ms",
                event.name(), s.count, s.requested_ms, s.actual.as_secs_f64() * 1000.0);
            requested += s.requested_ms;
            actual += s.actual;
        }
        let _ = writeln!(out, "   Total sleep: requested {} ms, actual {:.3} ms", requested, actual.as_secs_f64() * 1000.0);
        let _ = writeln!(out, "Elapsed since start: {:.3} s", stats.started.elapsed().as_secs_f64());
    }

    let _ = writeln!(out, "Sleep tuning by thread:");
    for t in thread_data::snapshot() {
        let s = &t.sleep;
        let _ = writeln!(out, "   thread {:7}  multiplier factor {:5.2}  max multiplier ct {:2}  ct bumps {:3}  adaptive {} factor {:4.2} (min {:4.2}, max {:4.2}, {} adjustments, {} ok / {} err)",
            t.thread_id,
            s.multiplier_factor,
            s.max_multiplier_ct,
            s.multiplier_ct_bumps,
            if s.adaptive.enabled { "on " } else { "off" },
            s.adaptive.factor,
            s.adaptive.min_factor,
            s.adaptive.max_factor,
            s.adaptive.adjustments,
            s.adaptive.total_ok,
            s.adaptive.total_err);
    }
    out
}

/// The sections selected by `stats_type`, concatenated.
pub fn report(stats_type: StatsType) -> String {
    match stats_type {
        StatsType::Tries => tries_report(),
        StatsType::Errors => errors_report(),
        StatsType::Calls => calls_report(),
        StatsType::Elapsed => elapsed_report(),
        StatsType::All => [tries_report(), errors_report(), calls_report(), elapsed_report()].join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;

    #[test]
    fn status_codes_are_counted() {
        let e = Error::Protocol(ProtocolError::MultiPartOffsetMismatch);
        let before = status_count(e.code());
        record_status(&e);
        record_status(&e);
        assert_eq!(status_count(e.code()), before + 2);
        assert!(errors_report().contains("MultiPartOffsetMismatch"));
    }

    #[test]
    fn io_events_are_timed() {
        let n = timed(IoEvent::Poll, || 7);
        assert_eq!(n, 7);
        assert!(calls_report().contains("poll"));
    }

    #[test]
    fn full_report_has_every_section() {
        thread_data::thread_max_tries(RetryClass::WriteOnly);
        let r = report(StatsType::All);
        assert!(r.contains("Retry statistics"));
        assert!(r.contains("Status codes"));
        assert!(r.contains("I/O calls"));
        assert!(r.contains("Sleeps by event"));
    }
}
