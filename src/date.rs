//! AmigaDOS on-disk time triples and the wall-clock source used to stamp
//! them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Epoch for AmigaDOS on-disk timestamps: 1978-01-01T00:00:00.
///
/// Real Amiga disks stamp this in an unspecified local zone with no zone
/// marker attached; this crate labels every instant UTC for internal
/// consistency, which is a labeling choice rather than a claim about the
/// original disk author's wall clock.
fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1978, 1, 1)
        .expect("1978-01-01 is a valid date")
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
}

/// One AmigaDOS on-disk time triple: days since epoch, minutes past
/// midnight, and ticks (1/50 s) past the last minute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmigaTime {
    /// Days since 1978-01-01.
    pub days: u32,
    /// Minutes past midnight.
    pub mins: u32,
    /// Ticks (20 ms each) past the last minute.
    pub ticks: u32,
}

impl AmigaTime {
    /// Build a triple from raw fields as stored on disk.
    #[inline]
    pub const fn new(days: u32, mins: u32, ticks: u32) -> Self {
        Self { days, mins, ticks }
    }

    /// Convert to a UTC `DateTime`.
    pub fn to_datetime(self) -> DateTime<Utc> {
        let total_ms = i64::from(self.days) * 86_400_000
            + i64::from(self.mins) * 60_000
            + i64::from(self.ticks) * 20;
        Utc.from_utc_datetime(&epoch()) + chrono::Duration::milliseconds(total_ms)
    }

    /// Build a triple from a UTC `DateTime`, splitting the epoch-relative
    /// millisecond count back into days/minutes/ticks.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let epoch_utc = Utc.from_utc_datetime(&epoch());
        let delta_ms = (dt - epoch_utc).num_milliseconds().max(0) as u64;
        let days = delta_ms / 86_400_000;
        let rem = delta_ms % 86_400_000;
        let mins = rem / 60_000;
        let rem_ms = rem % 60_000;
        let ticks = rem_ms / 20;
        Self {
            days: days as u32,
            mins: mins as u32,
            ticks: ticks as u32,
        }
    }
}

/// A source of "now", injectable so fixtures can pin deterministic
/// timestamps instead of reading the wall clock.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The default clock: reads the real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock fixed at construction time, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FrozenClock(pub DateTime<Utc>);

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn epoch_roundtrips_to_zero() {
        let t = AmigaTime::new(0, 0, 0);
        let dt = t.to_datetime();
        assert_eq!(dt, Utc.from_utc_datetime(&epoch()));
    }

    #[test]
    fn pinned_datetime_to_amigados() {
        // 2023-11-26T11:32:00 -> (16765, 692, 0).
        let dt = Utc.with_ymd_and_hms(2023, 11, 26, 11, 32, 0).unwrap();
        let t = AmigaTime::from_datetime(dt);
        assert_eq!(t, AmigaTime::new(16765, 692, 0));
    }

    #[test]
    fn pinned_amigados_to_datetime() {
        // (2, 15, 0) -> 1978-01-03T00:15:00.
        let t = AmigaTime::new(2, 15, 0);
        let dt = t.to_datetime();
        assert_eq!(dt, Utc.with_ymd_and_hms(1978, 1, 3, 0, 15, 0).unwrap());
    }

    #[test]
    fn roundtrip_is_stable() {
        let original = AmigaTime::new(16765, 692, 30);
        let roundtripped = AmigaTime::from_datetime(original.to_datetime());
        assert_eq!(original, roundtripped);
    }

    #[test]
    fn frozen_clock_is_fixed() {
        let fixed = Utc.with_ymd_and_hms(1989, 8, 17, 18, 21, 31).unwrap();
        let clock = FrozenClock(fixed);
        assert_eq!(clock.now(), fixed);
        assert_eq!(clock.now(), fixed);
    }
}
