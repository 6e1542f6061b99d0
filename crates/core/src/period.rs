//! Calendar periods and forecast granularity.
//!
//! A [`Period`] is identified by the first day it covers. History is recorded
//! at month granularity; forecasts step forward from the last recorded
//! period by the requested [`Granularity`].

use core::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Step size used when labelling forecast periods.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
            Granularity::Quarterly => "quarterly",
        }
    }
}

impl core::fmt::Display for Granularity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(Granularity::Weekly),
            "monthly" | "month" => Ok(Granularity::Monthly),
            "quarterly" | "quarter" => Ok(Granularity::Quarterly),
            other => Err(DomainError::invalid_parameter(format!(
                "unsupported granularity '{other}'"
            ))),
        }
    }
}

/// A calendar period, identified by its first day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(NaiveDate);

impl Period {
    /// The calendar month `year-month`.
    pub fn month(year: i32, month: u32) -> DomainResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| DomainError::invalid_parameter(format!("no such month: {year}-{month:02}")))
    }

    pub fn start(&self) -> NaiveDate {
        self.0
    }

    /// The period `steps` units of `granularity` after this one.
    pub fn advance(&self, granularity: Granularity, steps: u32) -> DomainResult<Self> {
        let next = match granularity {
            Granularity::Weekly => self.0.checked_add_days(Days::new(7 * u64::from(steps))),
            Granularity::Monthly => self.0.checked_add_months(Months::new(steps)),
            Granularity::Quarterly => steps
                .checked_mul(3)
                .and_then(|months| self.0.checked_add_months(Months::new(months))),
        };
        next.map(Self)
            .ok_or_else(|| DomainError::invalid_parameter("period outside the supported calendar range"))
    }

    /// Human-facing label at the given granularity
    /// (`2024-07`, `2024-Q3`, `2024-W27`).
    pub fn label(&self, granularity: Granularity) -> String {
        match granularity {
            Granularity::Weekly => {
                let week = self.0.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Monthly => format!("{}-{:02}", self.0.year(), self.0.month()),
            Granularity::Quarterly => {
                format!("{}-Q{}", self.0.year(), (self.0.month() - 1) / 3 + 1)
            }
        }
    }
}

impl core::fmt::Display for Period {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.label(Granularity::Monthly))
    }
}

impl FromStr for Period {
    type Err = DomainError;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DomainError::invalid_parameter(format!("malformed period '{s}', expected YYYY-MM"));
        let (year, month) = s.trim().split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::month(year, month)
    }
}
