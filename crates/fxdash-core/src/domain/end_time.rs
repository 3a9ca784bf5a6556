use std::fmt::{Display, Formatter};

use time::macros::{format_description, offset};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::ValidationError;

/// Timezone suffix appended to every explicit end timestamp.
pub const END_TIME_ZONE: &str = "EST";
const END_TIME_OFFSET: UtcOffset = offset!(-5);

// Keeps the rendered date at exactly eight digits.
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// End of the requested history window.
///
/// `Now` renders as the empty string, which the brokerage reads as "the
/// current moment".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EndDateTime {
    #[default]
    Now,
    At(EndTimestamp),
}

/// Explicit end timestamp assembled from the date picker and the three
/// time dropdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndTimestamp {
    pub date: Date,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl EndDateTime {
    /// Any missing part means `Now`. A blank date counts as missing.
    pub fn from_parts(
        date: Option<&str>,
        hour: Option<u8>,
        minute: Option<u8>,
        second: Option<u8>,
    ) -> Result<Self, ValidationError> {
        let date = date.map(str::trim).filter(|value| !value.is_empty());
        let (Some(date), Some(hour), Some(minute), Some(second)) = (date, hour, minute, second)
        else {
            return Ok(Self::Now);
        };

        let invalid = || ValidationError::InvalidDate {
            value: date.to_owned(),
        };
        let date = Date::parse(date, format_description!("[year]-[month]-[day]"))
            .map_err(|_| invalid())?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
            return Err(invalid());
        }
        check_range("hour", hour, 23)?;
        check_range("minute", minute, 59)?;
        check_range("second", second, 59)?;

        Ok(Self::At(EndTimestamp {
            date,
            hour,
            minute,
            second,
        }))
    }

    pub const fn is_now(&self) -> bool {
        matches!(self, Self::Now)
    }

    /// Absolute instant, or `None` for `Now`.
    pub fn instant(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Now => None,
            Self::At(ts) => Some(ts.instant()),
        }
    }
}

impl EndTimestamp {
    pub fn instant(&self) -> OffsetDateTime {
        // Ranges are checked on construction.
        let time = Time::from_hms(self.hour, self.minute, self.second).unwrap_or(Time::MIDNIGHT);
        PrimitiveDateTime::new(self.date, time).assume_offset(END_TIME_OFFSET)
    }
}

impl Display for EndDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Now => Ok(()),
            Self::At(ts) => write!(
                f,
                "{:04}{:02}{:02} {}:{}:{} {END_TIME_ZONE}",
                ts.date.year(),
                u8::from(ts.date.month()),
                ts.date.day(),
                ts.hour,
                ts.minute,
                ts.second,
            ),
        }
    }
}

fn check_range(field: &'static str, value: u8, max: u8) -> Result<(), ValidationError> {
    if value > max {
        return Err(ValidationError::TimeOutOfRange { field, value, max });
    }
    Ok(())
}
