//! Core traits at the edges of the table engine
//!
//! The engine is pure; the only things it needs from the outside world are
//! the current time (to evaluate relative date presets) and a collection of
//! records. Both are traits so sessions can run against fixed clocks and
//! canned data.

use chrono::{DateTime, FixedOffset, Local, Utc};

use crate::error::LvError;
use crate::result::LvResult;
use crate::types::Record;

/// Source of the current time
pub trait Clock {
    /// Current instant, expressed in the offset used for calendar boundaries
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock, either in the host's local offset or a fixed one
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Clock in the host's local offset
    pub fn local() -> Self {
        Self { offset: None }
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }

    /// `None` selects the host's local offset
    pub fn from_offset_minutes(minutes: Option<i32>) -> LvResult<Self> {
        match minutes {
            None => Ok(Self::local()),
            Some(m) => m
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .map(Self::with_offset)
                .ok_or_else(|| LvError::Config(format!("utc offset out of range: {} minutes", m))),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset),
            None => Local::now().fixed_offset(),
        }
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Parse an RFC 3339 timestamp, e.g. `2024-01-15T12:00:00+02:00`
    pub fn parse(rfc3339: &str) -> LvResult<Self> {
        DateTime::parse_from_rfc3339(rfc3339)
            .map(Self::new)
            .map_err(|e| LvError::invalid_spec(format!("bad timestamp {}: {}", rfc3339, e)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

/// Provider of an already-materialized record collection
pub trait RecordSource {
    /// Name used in logs and errors
    fn name(&self) -> String;

    /// Fetch the full collection
    fn fetch(&self) -> LvResult<Vec<Record>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::parse("2024-01-15T10:30:00+02:00").unwrap();
        let now = clock.now();
        assert_eq!(now.day(), 15);
        assert_eq!(now.hour(), 10);
        assert_eq!(now.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn test_fixed_clock_rejects_garbage() {
        assert!(FixedClock::parse("yesterday").is_err());
    }

    #[test]
    fn test_system_clock_offset() {
        let clock = SystemClock::from_offset_minutes(Some(120)).unwrap();
        assert_eq!(clock.now().offset().local_minus_utc(), 7200);

        assert!(SystemClock::from_offset_minutes(Some(24 * 60)).is_err());
        assert!(SystemClock::from_offset_minutes(None).is_ok());
    }

    #[test]
    fn test_system_clock_offset_overflow() {
        for minutes in [40_000_000, i32::MAX, i32::MIN] {
            let err = SystemClock::from_offset_minutes(Some(minutes)).unwrap_err();
            assert_eq!(err.error_code(), "configuration_error");
        }
    }

    #[test]
    fn test_clock_by_reference() {
        let clock = FixedClock::parse("2024-03-01T00:00:00Z").unwrap();
        fn read<C: Clock>(clock: C) -> DateTime<FixedOffset> {
            clock.now()
        }
        let by_ref: &dyn Clock = &clock;
        assert_eq!(read(by_ref), clock.now());
    }
}
