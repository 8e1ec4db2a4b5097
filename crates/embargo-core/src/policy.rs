//! Embargo decision for a single sidestream record.
//!
//! Record filenames look like `20170225T23:00:00Z_4.34.58.34_0.web100.gz`:
//! an 8-digit `YYYYMMDD` date, then the local IP between the first and the
//! last underscore. Legacy names such as `20170225T23:00:00Z_ALL0.web100.gz`
//! carry no IP.
//!
//! Rules, in order:
//!
//! 1. An unparseable date embargoes the record.
//! 2. A record dated on or before the cutoff is public.
//! 3. A record whose local IP is whitelisted is public.
//! 4. Everything else is embargoed, including legacy names.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::whitelist::Whitelist;

const DATE_TOKEN_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("invalid embargo cutoff '{value}': expected a YYYYMMDD calendar date")]
    InvalidCutoff { value: String },
}

/// Records dated on or before this date are never embargoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmbargoCutoff(NaiveDate);

impl EmbargoCutoff {
    pub const DEFAULT: &'static str = "20160305";

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// True if `date` is on or before the cutoff.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date <= self.0
    }
}

impl Default for EmbargoCutoff {
    fn default() -> Self {
        Self(NaiveDate::from_ymd_opt(2016, 3, 5).expect("valid default cutoff"))
    }
}

impl FromStr for EmbargoCutoff {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != DATE_TOKEN_LEN {
            return Err(PolicyError::InvalidCutoff {
                value: s.to_string(),
            });
        }
        parse_record_date(s)
            .map(Self)
            .ok_or_else(|| PolicyError::InvalidCutoff {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for EmbargoCutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

/// Parse the leading `YYYYMMDD` token of a record filename.
///
/// Returns `None` unless the first 8 characters are ASCII digits forming a
/// real calendar date.
pub fn parse_record_date(file_name: &str) -> Option<NaiveDate> {
    let token = file_name.get(..DATE_TOKEN_LEN)?;
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = token[0..4].parse().ok()?;
    let month: u32 = token[4..6].parse().ok()?;
    let day: u32 = token[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Local IP of a record: the text strictly between the first and last `_`.
///
/// Legacy names without an `_<IP>_` segment yield the empty string.
pub fn extract_local_ip(file_name: &str) -> &str {
    match (file_name.find('_'), file_name.rfind('_')) {
        (Some(start), Some(end)) if start < end => &file_name[start + 1..end],
        _ => "",
    }
}

/// Outcome of one policy evaluation, with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbargoDecision {
    pub embargoed: bool,
    /// `None` when the date token could not be parsed.
    pub record_date: Option<NaiveDate>,
    /// Empty for legacy names and for records decided by date alone.
    pub local_ip: String,
    pub in_whitelist: bool,
}

/// Cutoff and whitelist, fixed for the duration of a run.
#[derive(Debug, Clone, Default)]
pub struct EmbargoPolicy {
    cutoff: EmbargoCutoff,
    whitelist: Whitelist,
}

impl EmbargoPolicy {
    pub fn new(cutoff: EmbargoCutoff, whitelist: Whitelist) -> Self {
        Self { cutoff, whitelist }
    }

    pub fn cutoff(&self) -> EmbargoCutoff {
        self.cutoff
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Evaluate a record by its base filename (not its path in the archive).
    pub fn evaluate(&self, file_name: &str) -> EmbargoDecision {
        let Some(record_date) = parse_record_date(file_name) else {
            tracing::debug!("unparseable record date in '{}', embargoing", file_name);
            return EmbargoDecision {
                embargoed: true,
                record_date: None,
                local_ip: String::new(),
                in_whitelist: false,
            };
        };

        if self.cutoff.covers(record_date) {
            return EmbargoDecision {
                embargoed: false,
                record_date: Some(record_date),
                local_ip: String::new(),
                in_whitelist: false,
            };
        }

        let local_ip = extract_local_ip(file_name);
        if local_ip.is_empty() {
            tracing::debug!("no local IP in '{}', embargoing", file_name);
        }
        let in_whitelist = self.whitelist.contains(local_ip);

        EmbargoDecision {
            embargoed: !in_whitelist,
            record_date: Some(record_date),
            local_ip: local_ip.to_string(),
            in_whitelist,
        }
    }

    pub fn should_embargo(&self, file_name: &str) -> bool {
        self.evaluate(file_name).embargoed
    }
}
