//! Nanosecond-precision timestamps and half-open time spans.
//!
//! [`Ts`] is a signed seconds/nanoseconds pair. The nanosecond part is kept
//! normalized into `[0, NSEC_PER_SEC)` by every constructor and every
//! arithmetic operation, which lets ordering be derived lexicographically
//! from `(sec, nsec)`.
//!
//! Timestamps are read from text in the fixed format
//! `YYYY-MM-DDTHH:MM:SS[.fraction]`, always interpreted as UTC. Two parsers
//! are offered:
//!
//! - [`Ts::from_str`](std::str::FromStr) rejects malformed input with a
//!   [`TimeError`].
//! - [`Ts::parse_lenient`] never fails and produces a best-effort value.
//!   An unreadable date-time portion becomes the epoch second; the fraction
//!   is still applied when present.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};

/// Nanoseconds in one second.
pub const NSEC_PER_SEC: i64 = 1_000_000_000;

/// `chrono` format of the mandatory date-time portion.
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Maximum number of fraction digits that carry information.
const FRACTION_DIGITS: usize = 9;

/// Errors produced by the strict timestamp parser.
#[derive(Debug, thiserror::Error)]
pub enum TimeError {
    /// The `YYYY-MM-DDTHH:MM:SS` portion could not be parsed.
    #[error("invalid date-time in {input:?}: {source}")]
    DateTime {
        /// The rejected input.
        input: String,
        /// The underlying `chrono` parse error.
        source: chrono::ParseError,
    },

    /// Text after the date-time portion was not a `.digits` fraction.
    #[error("invalid fractional seconds in {input:?}")]
    Fraction {
        /// The rejected input.
        input: String,
    },
}

/// A point in time as seconds and nanoseconds since the Unix epoch.
///
/// Field order matters: the derived ordering compares `sec` first and
/// `nsec` second, which is correct because `nsec` is always normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ts {
    sec: i64,
    nsec: i64,
}

impl Ts {
    /// The Unix epoch, `1970-01-01T00:00:00`.
    pub const EPOCH: Self = Self { sec: 0, nsec: 0 };

    /// Largest representable timestamp.
    pub const MAX: Self = Self {
        sec: i64::MAX,
        nsec: NSEC_PER_SEC - 1,
    };

    /// Smallest representable timestamp.
    pub const MIN: Self = Self { sec: i64::MIN, nsec: 0 };

    /// Create a timestamp from seconds and nanoseconds.
    ///
    /// `nsec` may be outside `[0, NSEC_PER_SEC)`; whole seconds are carried
    /// into (or borrowed from) `sec`. Seconds saturate at the `i64` range.
    pub const fn new(sec: i64, nsec: i64) -> Self {
        Self {
            sec: sec.saturating_add(nsec.div_euclid(NSEC_PER_SEC)),
            nsec: nsec.rem_euclid(NSEC_PER_SEC),
        }
    }

    /// Create a timestamp from fractional seconds.
    ///
    /// The sub-second part is truncated to whole nanoseconds. Non-finite
    /// input yields [`Ts::EPOCH`].
    pub fn from_secs_f64(secs: f64) -> Self {
        if !secs.is_finite() {
            return Self::EPOCH;
        }
        let whole = secs.trunc();
        let frac = secs - whole;
        // Float to int casts saturate; `frac` is within (-1, 1).
        #[allow(clippy::cast_possible_truncation)]
        let sec = whole as i64;
        #[allow(clippy::cast_possible_truncation)]
        let nsec = (frac * 1e9) as i64;
        Self::new(sec, nsec)
    }

    /// Parse `YYYY-MM-DDTHH:MM:SS[.fraction]` without ever failing.
    ///
    /// An unreadable date-time portion is treated as the epoch second, and
    /// the digits following the last `.` in the input (if any) become the
    /// fraction.
    pub fn parse_lenient(input: &str) -> Self {
        let sec = NaiveDateTime::parse_and_remainder(input, DATE_TIME_FORMAT)
            .map_or(0, |(date_time, _rest)| date_time.and_utc().timestamp());
        let nsec = input.rfind('.').map_or(0, |dot| {
            let after = input.get(dot.saturating_add(1)..).unwrap_or("");
            let digits: String = after.chars().take_while(char::is_ascii_digit).collect();
            fraction_to_nsec(&digits)
        });
        Self::new(sec, nsec)
    }

    /// Whole seconds since the epoch.
    pub const fn sec(&self) -> i64 {
        self.sec
    }

    /// Nanoseconds within the second, always in `[0, NSEC_PER_SEC)`.
    pub const fn nsec(&self) -> i64 {
        self.nsec
    }

    /// Floating-point approximation in seconds (`sec + nsec / 1e9`).
    pub fn to_seconds(&self) -> f64 {
        // Precision loss only matters beyond 2^53 seconds.
        #[allow(clippy::cast_precision_loss)]
        let sec = self.sec as f64;
        #[allow(clippy::cast_precision_loss)]
        let nsec = self.nsec as f64;
        sec + nsec / 1e9
    }

    /// Add two timestamps, returning `None` on `i64` overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        let mut sec = self.sec.checked_add(rhs.sec)?;
        let mut nsec = self.nsec.checked_add(rhs.nsec)?;
        if nsec >= NSEC_PER_SEC {
            sec = sec.checked_add(1)?;
            nsec = nsec.checked_sub(NSEC_PER_SEC)?;
        }
        Some(Self { sec, nsec })
    }

    /// Subtract `rhs` from `self`, returning `None` on `i64` overflow.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        let mut sec = self.sec.checked_sub(rhs.sec)?;
        let mut nsec = self.nsec.checked_sub(rhs.nsec)?;
        if nsec < 0 {
            sec = sec.checked_sub(1)?;
            nsec = nsec.checked_add(NSEC_PER_SEC)?;
        }
        Some(Self { sec, nsec })
    }

    /// Add two timestamps, clamping to [`Ts::MIN`] / [`Ts::MAX`] on overflow.
    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        self.checked_add(rhs)
            .unwrap_or(if rhs.sec < 0 { Self::MIN } else { Self::MAX })
    }

    /// Subtract `rhs` from `self`, clamping to [`Ts::MIN`] / [`Ts::MAX`] on
    /// overflow.
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs)
            .unwrap_or(if rhs.sec < 0 { Self::MAX } else { Self::MIN })
    }
}

/// Convert fraction digits (the part after the `.`) to nanoseconds.
///
/// Digits past the ninth are truncated; shorter inputs are right-padded,
/// so `"003"` is 3 ms and `"5"` is 500 ms.
fn fraction_to_nsec(digits: &str) -> i64 {
    let mut nsec: i64 = 0;
    let mut used = 0_usize;
    for digit in digits.chars().take(FRACTION_DIGITS) {
        let value = i64::from(digit.to_digit(10).unwrap_or(0));
        nsec = nsec.saturating_mul(10).saturating_add(value);
        used = used.saturating_add(1);
    }
    for _ in used..FRACTION_DIGITS {
        nsec = nsec.saturating_mul(10);
    }
    nsec
}

impl FromStr for Ts {
    type Err = TimeError;

    /// Strictly parse `YYYY-MM-DDTHH:MM:SS[.fraction]` as UTC.
    ///
    /// The fraction, when present, must be at least one ASCII digit and
    /// nothing may follow it.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (date_time, rest) = NaiveDateTime::parse_and_remainder(input, DATE_TIME_FORMAT)
            .map_err(|source| TimeError::DateTime {
                input: input.to_owned(),
                source,
            })?;

        let nsec = if rest.is_empty() {
            0
        } else {
            let digits = rest.strip_prefix('.').unwrap_or("");
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(TimeError::Fraction {
                    input: input.to_owned(),
                });
            }
            fraction_to_nsec(digits)
        };

        Ok(Self::new(date_time.and_utc().timestamp(), nsec))
    }
}

impl fmt::Display for Ts {
    /// Formats as `YYYY-MM-DDTHH:MM:SS.nnnnnnnnn` (UTC), falling back to
    /// `sec.nsec` for timestamps outside the calendar range.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let calendar = u32::try_from(self.nsec)
            .ok()
            .and_then(|nsec| DateTime::from_timestamp(self.sec, nsec));
        match calendar {
            Some(date_time) => write!(
                f,
                "{}.{:09}",
                date_time.format(DATE_TIME_FORMAT),
                self.nsec
            ),
            None => write!(f, "{}.{:09}", self.sec, self.nsec),
        }
    }
}

impl Add for Ts {
    type Output = Self;

    /// Saturating addition with nanosecond carry.
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl Sub for Ts {
    type Output = Self;

    /// Saturating subtraction with nanosecond borrow.
    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

/// A time span between two timestamps.
///
/// `end >= start` by convention but not enforced. Membership is half-open:
/// a span contains `start` but not `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TsSpan {
    start: Ts,
    end: Ts,
}

impl TsSpan {
    /// Create a span from `start` to `end`.
    pub const fn new(start: Ts, end: Ts) -> Self {
        Self { start, end }
    }

    /// The zero-length span at the epoch.
    pub const fn epoch() -> Self {
        Self::new(Ts::EPOCH, Ts::EPOCH)
    }

    /// Start of the span (inclusive).
    pub const fn start(&self) -> Ts {
        self.start
    }

    /// End of the span (exclusive).
    pub const fn end(&self) -> Ts {
        self.end
    }

    /// Move the start of the span.
    pub const fn set_start(&mut self, start: Ts) {
        self.start = start;
    }

    /// Move the end of the span.
    pub const fn set_end(&mut self, end: Ts) {
        self.end = end;
    }

    /// Length of the span as a [`Ts`] offset.
    pub fn duration(&self) -> Ts {
        self.end.saturating_sub(self.start)
    }

    /// Length of the span in (fractional) seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.duration().to_seconds()
    }

    /// Half-open membership test: `start <= ts < end`.
    pub fn contains(&self, ts: Ts) -> bool {
        ts >= self.start && ts < self.end
    }

    /// Whether the span covers no time at all.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for TsSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}
