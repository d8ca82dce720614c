//! Date ranges for collection filtering.

use crate::error::EngineError;

/// A half-open date interval used by
/// [`ImageCollection::filter_date`](crate::ImageCollection::filter_date).
///
/// Dates are ISO-8601 calendar days (`YYYY-MM-DD`), the precision the
/// engine's collection filters work with. A range without an end covers
/// everything from `start` onwards, which is how ongoing satellite missions
/// are expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: String,
    end: Option<String>,
}

impl DateRange {
    /// Creates a closed range.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, EngineError> {
        let range = Self {
            start: start.into(),
            end: Some(end.into()),
        };
        range.validate()?;
        Ok(range)
    }

    /// Creates a range with an open right end.
    pub fn from_start(start: impl Into<String>) -> Result<Self, EngineError> {
        let range = Self {
            start: start.into(),
            end: None,
        };
        range.validate()?;
        Ok(range)
    }

    /// First day of the range.
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Day the range ends on, if it is closed.
    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    fn validate(&self) -> Result<(), EngineError> {
        check_date(&self.start)?;
        if let Some(end) = &self.end {
            check_date(end)?;
        }
        Ok(())
    }
}

fn check_date(value: &str) -> Result<(), EngineError> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if well_formed {
        Ok(())
    } else {
        Err(EngineError::InvalidDate(value.to_string()))
    }
}
