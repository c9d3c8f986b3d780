//! Return periods: filing month, Indian financial year (April to March) and quarter

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{GstError, GstResult};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Return month, written `YYYY-MM` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> GstResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(GstError::InvalidPeriod(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Month containing a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Month of an invoice date in any of the accepted formats
    pub fn from_invoice_date(text: &str) -> Option<Self> {
        parse_invoice_date(text).map(Self::from_date)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> GstResult<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| GstError::InvalidPeriod(format!("Year out of range: {}", self.year)))
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Financial year label such as `2024-2025`
    pub fn financial_year(&self) -> String {
        FinancialYear::of_month(self).short_label()
    }

    pub fn quarter(&self) -> Quarter {
        match self.month {
            4..=6 => Quarter::Q1,
            7..=9 => Quarter::Q2,
            10..=12 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    /// Display name such as `April 2024`
    pub fn display_name(&self) -> String {
        format!("{} {}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }

    /// Reject months in the future or more than two years before `today`
    pub fn validate_selectable(&self, today: NaiveDate) -> GstResult<()> {
        let first_day = self.first_day()?;
        if first_day > today {
            return Err(GstError::InvalidPeriod(
                "Cannot select future months".to_string(),
            ));
        }

        let cutoff_year = today.year() - 2;
        let cutoff = today
            .with_year(cutoff_year)
            .or_else(|| NaiveDate::from_ymd_opt(cutoff_year, today.month(), 28))
            .ok_or_else(|| GstError::InvalidPeriod(format!("Year out of range: {}", cutoff_year)))?;

        if first_day < cutoff {
            return Err(GstError::InvalidPeriod(
                "Cannot select months older than 2 years".to_string(),
            ));
        }
        Ok(())
    }

    /// The `count` most recent months ending with the month of `today`, newest first
    pub fn recent(today: NaiveDate, count: usize) -> Vec<Month> {
        let mut months = Vec::with_capacity(count);
        let mut current = Month::from_date(today);
        for _ in 0..count {
            months.push(current);
            current = current.previous();
        }
        months
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = GstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GstError::InvalidPeriod(format!("Expected YYYY-MM, got '{}'", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Month::new(year, month)
    }
}

impl TryFrom<String> for Month {
    type Error = GstError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

/// Quarter of the Indian financial year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quarter {
    /// April to June
    Q1,
    /// July to September
    Q2,
    /// October to December
    Q3,
    /// January to March
    Q4,
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quarter::Q1 => "Q1",
            Quarter::Q2 => "Q2",
            Quarter::Q3 => "Q3",
            Quarter::Q4 => "Q4",
        };
        f.write_str(label)
    }
}

/// Financial year starting 1 April of `start_year`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FinancialYear {
    pub start_year: i32,
}

impl FinancialYear {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self::of_month(&Month::from_date(date))
    }

    pub fn of_month(month: &Month) -> Self {
        if month.month() >= 4 {
            Self::new(month.year())
        } else {
            Self::new(month.year() - 1)
        }
    }

    /// Label stored on clients, e.g. `01/04/2024 - 31/03/2025`
    pub fn label(&self) -> String {
        format!("01/04/{} - 31/03/{}", self.start_year, self.start_year + 1)
    }

    /// Short label, e.g. `2024-2025`
    pub fn short_label(&self) -> String {
        format!("{}-{}", self.start_year, self.start_year + 1)
    }

    /// Current financial year followed by the next `ahead` years
    pub fn options(today: NaiveDate, ahead: usize) -> Vec<FinancialYear> {
        let current = Self::containing(today);
        (0..=ahead as i32)
            .map(|offset| Self::new(current.start_year + offset))
            .collect()
    }

    pub fn parse_label(label: &str) -> GstResult<Self> {
        let invalid = || GstError::InvalidPeriod(format!("Unrecognised financial year '{}'", label));
        let (start, end) = label.split_once(" - ").ok_or_else(invalid)?;
        let start = NaiveDate::parse_from_str(start.trim(), "%d/%m/%Y").map_err(|_| invalid())?;
        let end = NaiveDate::parse_from_str(end.trim(), "%d/%m/%Y").map_err(|_| invalid())?;

        if start.day() != 1 || start.month() != 4 || end.year() != start.year() + 1 {
            return Err(invalid());
        }
        Ok(Self::new(start.year()))
    }
}

/// Parse an invoice date written `DD/MM/YYYY`, `DD-MM-YYYY` or `YYYY-MM-DD`.
///
/// A trailing time after an ISO date is ignored.
pub fn parse_invoice_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if text.contains('/') {
        return NaiveDate::parse_from_str(text, "%d/%m/%Y").ok();
    }

    let first = text.split('-').next().unwrap_or("");
    if first.len() == 4 {
        let date_part = text.get(..10).unwrap_or(text);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    } else {
        NaiveDate::parse_from_str(text, "%d-%m-%Y").ok()
    }
}
