//! Rolling window specifications.

use crate::error::{Error, Result};
use alloc::format;
use core::str::FromStr;
use core::time::Duration;

/// Extent of a rolling window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window {
    /// The last `n` rows.
    Rows(usize),
    /// Rows whose time index lies within this span of the latest row.
    Duration(Duration),
}

impl Window {
    /// Creates a row-count window.
    pub fn rows(n: usize) -> Result<Window> {
        if n == 0 {
            return Err(Error::invalid_window("row window must be positive"));
        }
        Ok(Window::Rows(n))
    }

    /// Parses a duration window such as `"500ms"`, `"10s"`, `"5min"`, `"2h"` or `"1d"`.
    pub fn parse(spec: &str) -> Result<Window> {
        let spec = spec.trim();
        let split = spec
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(spec.len());
        let (amount, unit) = spec.split_at(split);
        let amount: u64 = amount
            .parse()
            .map_err(|_| Error::invalid_window(format!("cannot parse duration {:?}", spec)))?;

        let millis_per_unit: u64 = match unit.trim() {
            "ms" => 1,
            "s" | "sec" => 1_000,
            "m" | "min" | "T" => 60_000,
            "h" | "H" => 3_600_000,
            "d" | "D" => 86_400_000,
            other => {
                return Err(Error::invalid_window(format!(
                    "unknown duration unit {:?} in {:?}",
                    other, spec
                )))
            }
        };
        let millis = amount
            .checked_mul(millis_per_unit)
            .ok_or_else(|| Error::invalid_window(format!("duration {:?} overflows", spec)))?;
        if millis == 0 {
            return Err(Error::invalid_window("duration window must be positive"));
        }
        Ok(Window::Duration(Duration::from_millis(millis)))
    }

    /// Returns true for time-based windows.
    pub fn is_duration(&self) -> bool {
        matches!(self, Window::Duration(_))
    }

    /// Minimum row count before a window emits.
    ///
    /// Duration windows always use 1, whatever the caller asked for.
    pub fn effective_min_periods(&self, min_periods: usize) -> usize {
        match self {
            Window::Rows(_) => min_periods,
            Window::Duration(_) => 1,
        }
    }

    /// Span of a duration window in milliseconds.
    pub fn span_millis(&self) -> Option<i64> {
        match self {
            Window::Rows(_) => None,
            Window::Duration(d) => Some(d.as_millis().min(i64::MAX as u128) as i64),
        }
    }
}

impl FromStr for Window {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<usize>() {
            Ok(n) => Window::rows(n),
            Err(_) => Window::parse(s),
        }
    }
}

impl From<Duration> for Window {
    fn from(d: Duration) -> Self {
        Window::Duration(d)
    }
}
