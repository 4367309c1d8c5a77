use chrono::{FixedOffset, Local, Utc};
use crate::models::{InputError, TimeOfDay};

/// Source of the current time of day for open/closed evaluation
pub trait Clock: Send + Sync {
    fn now(&self) -> TimeOfDay;
}

/// Wall clock, in host local time or at a fixed UTC offset
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// Use a fixed offset from UTC instead of the host timezone
    pub fn with_utc_offset_minutes(minutes: i32) -> Result<Self, InputError> {
        let offset = FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
            InputError::InvalidTime(format!("UTC offset of {} minutes is out of range", minutes))
        })?;
        Ok(Self { offset: Some(offset) })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> TimeOfDay {
        match self.offset {
            Some(offset) => TimeOfDay::from_time(&Utc::now().with_timezone(&offset)),
            None => TimeOfDay::from_time(&Local::now()),
        }
    }
}

/// Clock frozen at a single time of day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub TimeOfDay);

impl Clock for FixedClock {
    fn now(&self) -> TimeOfDay {
        self.0
    }
}

/// Decide whether a facility is open at `now`
///
/// Unknown hours (either bound missing) count as closed. Opening is inclusive,
/// closing is exclusive. When closing is at or before opening the window wraps
/// past midnight, so 22:00-02:00 is open at 23:30 and 01:00.
#[inline]
pub fn is_open(opening: Option<TimeOfDay>, closing: Option<TimeOfDay>, now: TimeOfDay) -> bool {
    let (Some(opening), Some(closing)) = (opening, closing) else {
        return false;
    };

    let open = opening.minutes_since_midnight();
    let close = closing.minutes_since_midnight();
    let now = now.minutes_since_midnight();

    if close > open {
        open <= now && now < close
    } else {
        now >= open || now < close
    }
}
