use chrono::{DateTime, Duration, Local, Utc};

/// Wall clock used for roster and activity timestamps; fixed in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Move a fixed clock forward. No effect on the system clock.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

/// Short stamp shown next to roster names and activity labels (`yy-mm-dd HH:MM`).
///
/// Rendered in the machine's local time zone, which is what students see on the wall.
#[must_use]
pub fn short_stamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%y-%m-%d %H:%M").to_string()
}

/// Same shape as [`short_stamp`] but in UTC, for deterministic output.
#[must_use]
pub fn short_stamp_utc(at: DateTime<Utc>) -> String {
    at.format("%y-%m-%d %H:%M").to_string()
}

/// Deterministic timestamp for tests (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance(Duration::minutes(5));
        assert_eq!(clock.now(), fixed_now() + Duration::minutes(5));
    }

    #[test]
    fn utc_stamp_is_short() {
        assert_eq!(short_stamp_utc(fixed_now()), "23-11-14 22:13");
    }
}
