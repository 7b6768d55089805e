// SPDX-FileCopyrightText: 2026 Clinicpos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing filters applied to the sale creation timestamp.
//!
//! Each filter truncates the timestamp to its own granularity: `date` to the
//! calendar day, `month` to the month of the year (any year), `year` to the
//! year. Filters combine conjunctively.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::PosError;

/// Query-string form of the filters, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

/// Validated and normalized listing filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub date: Option<NaiveDate>,
    /// Month of the year, 1..=12.
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl SaleFilter {
    /// Validate raw query values. Blank values count as absent.
    pub fn parse(params: &FilterParams) -> Result<Self, PosError> {
        let date = present(params.date.as_deref())
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .filter(|_| raw.len() == 10)
                    .ok_or_else(|| {
                        PosError::validation(format!("`date` must be YYYY-MM-DD, got `{raw}`"))
                    })
            })
            .transpose()?;

        let month = present(params.month.as_deref())
            .map(|raw| {
                all_digits(raw, 1..=2)
                    .then(|| raw.parse::<u32>().ok())
                    .flatten()
                    .filter(|m| (1..=12).contains(m))
                    .ok_or_else(|| {
                        PosError::validation(format!("`month` must be between 1 and 12, got `{raw}`"))
                    })
            })
            .transpose()?;

        let year = present(params.year.as_deref())
            .map(|raw| {
                all_digits(raw, 4..=4)
                    .then(|| raw.parse::<i32>().ok())
                    .flatten()
                    .ok_or_else(|| {
                        PosError::validation(format!("`year` must be a 4-digit year, got `{raw}`"))
                    })
            })
            .transpose()?;

        Ok(Self { date, month, year })
    }

    /// True when no filter is set and the whole ledger is requested.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.month.is_none() && self.year.is_none()
    }

    /// The day filter as stored-timestamp text, `YYYY-MM-DD`.
    pub fn date_key(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// The month filter zero-padded to two digits, as `strftime('%m')` yields it.
    pub fn month_key(&self) -> Option<String> {
        self.month.map(|m| format!("{m:02}"))
    }

    /// The year filter as four digits, as `strftime('%Y')` yields it.
    pub fn year_key(&self) -> Option<String> {
        self.year.map(|y| format!("{y:04}"))
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn all_digits(raw: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_digit())
}
