//! The retry engine.
//!
//! One exchange is a closure performing a complete logical operation. The
//! engine runs it up to the calling thread's try limit for its class,
//! stretching the governor's sleeps after each failed try.

use std::fmt;
use tracing::{debug, warn};
use crate::error::{Error, Result};
use crate::thread_data::{self, TryOutcome};
use crate::stats;

/// Hard upper limit for any try count.
pub const MAX_MAX_TRIES: u8 = 15;

/// The four kinds of exchange, each with its own try limit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RetryClass {
    WriteOnly,
    WriteRead,
    MultiPartRead,
    MultiPartWrite,
}

impl RetryClass {
    pub const ALL: [RetryClass; 4] = [
        RetryClass::WriteOnly,
        RetryClass::WriteRead,
        RetryClass::MultiPartRead,
        RetryClass::MultiPartWrite,
    ];

    pub fn index(self) -> usize {
        match self {
            RetryClass::WriteOnly => 0,
            RetryClass::WriteRead => 1,
            RetryClass::MultiPartRead => 2,
            RetryClass::MultiPartWrite => 3,
        }
    }

    pub fn default_max_tries(self) -> u8 {
        match self {
            RetryClass::WriteOnly => 4,
            RetryClass::WriteRead => 10,
            RetryClass::MultiPartRead => 8,
            RetryClass::MultiPartWrite => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RetryClass::WriteOnly => "write only",
            RetryClass::WriteRead => "write-read",
            RetryClass::MultiPartRead => "multi-part read",
            RetryClass::MultiPartWrite => "multi-part write",
        }
    }
}

impl fmt::Display for RetryClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How repeated all-zero reads are treated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AllZeroPolicy {
    /// The first all-zero read is retried; a second one ends the exchange.
    TransientOnce,
    /// Always retried; an exchange where every try read zeros reports
    /// `AllTriesZero`.
    AlwaysTransient,
    /// Never retried.
    Fatal,
}

impl Default for AllZeroPolicy {
    fn default() -> Self {
        AllZeroPolicy::TransientOnce
    }
}

/// Retry behaviour knobs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub all_zero: AllZeroPolicy,
}

/// Runs `exchange` under the retry discipline of `class`.
///
/// The closure receives the 1-based attempt number.
pub fn with_retry<T, F>(class: RetryClass, policy: &RetryPolicy, mut exchange: F) -> Result<T>
where
    F: FnMut(u8) -> Result<T>,
{
    let max_tries = thread_data::thread_max_tries(class);
    let mut all_zero_ct = 0u8;

    thread_data::with_current(|data| data.set_multiplier_ct(1));

    let mut attempt = 1;
    let result = loop {
        match exchange(attempt) {
            Ok(value) => {
                record(class, TryOutcome::Succeeded(attempt), true);
                if attempt > 1 {
                    debug!(class = class.name(), attempt, "succeeded after retry");
                }
                break Ok(value)
            },
            Err(e) => {
                stats::record_status(&e);

                let transient = if e.is_read_all_zero() {
                    all_zero_ct += 1;
                    match policy.all_zero {
                        AllZeroPolicy::TransientOnce => all_zero_ct < 2,
                        AllZeroPolicy::AlwaysTransient => true,
                        AllZeroPolicy::Fatal => false,
                    }
                } else {
                    e.is_transient()
                };

                if !transient {
                    debug!(class = class.name(), attempt, error = %e, "fatal error, not retrying");
                    record(class, TryOutcome::Fatal, false);
                    break Err(e)
                }

                debug!(class = class.name(), attempt, max_tries, error = %e, "transient error");
                thread_data::with_current(|data| {
                    data.sleep.adaptive.record(false);
                });

                if attempt >= max_tries {
                    break Err(exhausted(class, max_tries, all_zero_ct, e))
                }

                attempt += 1;
                thread_data::with_current(|data| data.set_multiplier_ct(attempt as u32));
            },
        }
    };

    thread_data::with_current(|data| data.set_multiplier_ct(1));
    result
}

fn record(class: RetryClass, outcome: TryOutcome, ok: bool) {
    thread_data::with_current(|data| {
        data.try_stats_mut(class).record(outcome);
        if ok {
            if let Some(factor) = data.sleep.adaptive.record(true) {
                debug!(factor, "adaptive sleep factor lowered");
            }
        }
    });
}

fn exhausted(class: RetryClass, attempts: u8, all_zero_ct: u8, last: Error) -> Error {
    record(class, TryOutcome::FailedMaxTries, false);
    warn!(class = class.name(), attempts, "maximum retries exceeded");

    let error = if all_zero_ct == attempts {
        Error::AllTriesZero { attempts }
    } else {
        Error::Retries { attempts, last: Box::new(last) }
    };
    stats::record_status(&error);
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IoError, IoErrorKind, ProtocolError};
    use std::thread;

    fn on_fresh_thread<F: FnOnce() + Send + 'static>(f: F) {
        thread::spawn(move || {
            thread_data::set_thread_sleep_multiplier(0.0);
            f()
        }).join().unwrap();
    }

    fn failures(kind: ProtocolError, n: u8) -> impl FnMut(u8) -> Result<u8> {
        move |attempt| if attempt <= n { Err(kind.into()) } else { Ok(attempt) }
    }

    #[test]
    fn succeeds_after_transient_errors() {
        on_fresh_thread(|| {
            let r = with_retry(RetryClass::WriteRead, &RetryPolicy::default(), failures(ProtocolError::Checksum, 2));
            assert_eq!(r, Ok(3));
            thread_data::with_current(|data| {
                let s = data.try_stats(RetryClass::WriteRead);
                assert_eq!(s.succeeded_on(3), 1);
                assert_eq!(data.sleep.multiplier_ct, 1);
                assert_eq!(data.sleep.max_multiplier_ct, 3);
            });
        });
    }

    #[test]
    fn null_response_every_try() {
        on_fresh_thread(|| {
            let max = thread_data::thread_max_tries(RetryClass::WriteRead);
            let r: Result<()> = with_retry(RetryClass::WriteRead, &RetryPolicy::default(), |_| Err(ProtocolError::DdcNullResponse.into()));
            match r {
                Err(Error::Retries { attempts, last }) => {
                    assert_eq!(attempts, max);
                    assert_eq!(*last, Error::Protocol(ProtocolError::DdcNullResponse));
                },
                other => panic!("unexpected {:?}", other),
            }
            thread_data::with_current(|data| {
                let s = data.try_stats(RetryClass::WriteRead);
                assert_eq!(s.succeeded(), 0);
                assert_eq!(s.failed_max_tries(), 1);
            });
        });
    }

    #[test]
    fn fatal_stops_immediately() {
        on_fresh_thread(|| {
            let mut calls = 0;
            let r: Result<()> = with_retry(RetryClass::WriteOnly, &RetryPolicy::default(), |_| {
                calls += 1;
                Err(IoError::new(IoErrorKind::PermissionDenied).into())
            });
            assert_eq!(calls, 1);
            assert_eq!(r, Err(Error::Io(IoError::new(IoErrorKind::PermissionDenied))));
            thread_data::with_current(|data| assert_eq!(data.try_stats(RetryClass::WriteOnly).fatal(), 1));
        });
    }

    #[test]
    fn interrupted_is_fatal() {
        on_fresh_thread(|| {
            let mut calls = 0;
            let r: Result<()> = with_retry(RetryClass::WriteRead, &RetryPolicy::default(), |_| {
                calls += 1;
                Err(IoError::from_errno(libc::EINTR).into())
            });
            assert!(r.is_err());
            assert_eq!(calls, 1);
        });
    }

    #[test]
    fn read_all_zero_promoted_on_second_occurrence() {
        on_fresh_thread(|| {
            let mut calls = 0;
            let r: Result<()> = with_retry(RetryClass::WriteRead, &RetryPolicy::default(), |_| {
                calls += 1;
                Err(ProtocolError::ReadAllZero.into())
            });
            assert_eq!(calls, 2);
            assert_eq!(r, Err(Error::Protocol(ProtocolError::ReadAllZero)));
        });
    }

    #[test]
    fn all_tries_zero() {
        on_fresh_thread(|| {
            thread_data::set_thread_max_tries(RetryClass::WriteRead, 3).unwrap();
            let policy = RetryPolicy { all_zero: AllZeroPolicy::AlwaysTransient };
            let r: Result<()> = with_retry(RetryClass::WriteRead, &policy, |_| Err(ProtocolError::ReadAllZero.into()));
            assert_eq!(r, Err(Error::AllTriesZero { attempts: 3 }));
        });
    }

    #[test]
    fn respects_thread_limit() {
        on_fresh_thread(|| {
            thread_data::set_thread_max_tries(RetryClass::WriteRead, 3).unwrap();
            let mut calls = 0;
            let r: Result<()> = with_retry(RetryClass::WriteRead, &RetryPolicy::default(), |_| {
                calls += 1;
                Err(ProtocolError::Checksum.into())
            });
            assert_eq!(calls, 3);
            match r {
                Err(Error::Retries { attempts: 3, .. }) => (),
                other => panic!("unexpected {:?}", other),
            }
        });
    }
}
