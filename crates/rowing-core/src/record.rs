//! Workout records.
//!
//! A [`RawRecord`] is one parsed log line; a [`PowerRecord`] is the same
//! workout with its pace converted to watts. Both are immutable once built.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PowerError, SemanticCause};
use crate::{pace, power};

/// Date notation used by both the input log and the output lists.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// What the trailing value of a log line measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Meters rowed (`m`)
    Distance,
    /// Minutes rowed (`min`)
    Duration,
}

impl Unit {
    /// Unit literal as written in the log.
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Distance => "m",
            Unit::Duration => "min",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "m" => Some(Unit::Distance),
            "min" => Some(Unit::Duration),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One workout as logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    date: NaiveDate,
    #[serde(with = "pace_text")]
    pace: Duration,
    value: f64,
    unit: Unit,
}

impl RawRecord {
    /// Build a record, enforcing a positive pace and a finite, non-negative value.
    ///
    /// # Errors
    ///
    /// Returns [`SemanticCause::NonPositivePace`] or
    /// [`SemanticCause::InvalidValue`] when an invariant does not hold.
    pub fn new(date: NaiveDate, pace: Duration, value: f64, unit: Unit) -> Result<Self, SemanticCause> {
        if pace.is_zero() {
            return Err(SemanticCause::NonPositivePace);
        }
        if !value.is_finite() || value < 0.0 {
            return Err(SemanticCause::InvalidValue(value.to_string()));
        }
        Ok(Self {
            date,
            pace,
            value,
            unit,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Average time per 500 m.
    pub fn pace(&self) -> Duration {
        self.pace
    }

    /// Meters or minutes, depending on [`RawRecord::unit`].
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }
}

/// `DD.MM.YYYY, M:SS.T, VALUE`
impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.date.format(DATE_FORMAT),
            pace::encode(self.pace),
            self.value
        )
    }
}

/// A workout annotated with its power output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerRecord {
    date: NaiveDate,
    power: u32,
    value: f64,
}

impl PowerRecord {
    /// Derive the power record for one raw record.
    ///
    /// # Errors
    ///
    /// Propagates [`PowerError`] from the power formula.
    pub fn derive(raw: &RawRecord) -> Result<Self, PowerError> {
        Ok(Self {
            date: raw.date,
            power: power::power(raw.pace)?,
            value: raw.value,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whole watts.
    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// `DD.MM.YYYY, POWER, VALUE`
impl fmt::Display for PowerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}",
            self.date.format(DATE_FORMAT),
            self.power,
            self.value
        )
    }
}

mod pace_text {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(pace: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&crate::pace::encode(*pace))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        crate::pace::decode(&text).map_err(serde::de::Error::custom)
    }
}
