//! Lenient parsing of spreadsheet date cells.
//!
//! Cells are tried against [`DATE_LAYOUTS`] in order; the first layout that
//! yields a real calendar date wins. Anything left over is read as a
//! spreadsheet serial day count from [`SERIAL_EPOCH`].

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// A cell that matched no layout and is not a serial number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized date format: {0:?}")]
pub struct UnrecognizedDateFormat(pub String);

/// Day zero of spreadsheet serial dates.
pub const SERIAL_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1899, 12, 30) {
    Some(date) => date,
    None => panic!("invalid serial epoch"),
};

/// Position of year, month and day within a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrder {
    /// `2006-01-02`
    YearMonthDay,
    /// `02/01/2006`
    DayMonthYear,
    /// `01/02/2006`
    MonthDayYear,
}

/// Width of the year field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearDigits {
    /// Exactly four digits.
    Four,
    /// Exactly two digits; 69-99 map to 19xx, 00-68 to 20xx.
    Two,
}

/// One accepted textual date shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateLayout {
    /// Field order.
    pub order: FieldOrder,
    /// Separator between fields.
    pub separator: char,
    /// Year width.
    pub year: YearDigits,
    /// Month and day need exactly two digits when set, one or two otherwise.
    pub padded: bool,
}

const fn layout(order: FieldOrder, separator: char, year: YearDigits, padded: bool) -> DateLayout {
    DateLayout {
        order,
        separator,
        year,
        padded,
    }
}

/// Layouts tried in order. Day-first wins over month-first when both fit.
pub const DATE_LAYOUTS: [DateLayout; 13] = {
    use FieldOrder::{DayMonthYear as Dmy, MonthDayYear as Mdy, YearMonthDay as Ymd};
    use YearDigits::{Four, Two};
    [
        layout(Ymd, '-', Four, true),
        layout(Dmy, '/', Four, true),
        layout(Mdy, '/', Four, true),
        layout(Dmy, '-', Four, true),
        layout(Mdy, '-', Four, true),
        layout(Dmy, '/', Two, true),
        layout(Mdy, '/', Two, true),
        layout(Dmy, '-', Two, true),
        layout(Mdy, '-', Two, true),
        layout(Dmy, '/', Two, false),
        layout(Mdy, '/', Two, false),
        layout(Dmy, '-', Two, false),
        layout(Mdy, '-', Two, false),
    ]
};

impl DateLayout {
    /// Parses `raw` strictly against this layout.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let mut fields = raw.split(self.separator);
        let (first, second, third) = (fields.next()?, fields.next()?, fields.next()?);
        if fields.next().is_some() {
            return None;
        }

        let (year, month, day) = match self.order {
            FieldOrder::YearMonthDay => (first, second, third),
            FieldOrder::DayMonthYear => (third, second, first),
            FieldOrder::MonthDayYear => (third, first, second),
        };

        let (min, max) = if self.padded { (2, 2) } else { (1, 2) };
        let month = digits(month, min, max)?;
        let day = digits(day, min, max)?;
        let year = match self.year {
            YearDigits::Four => i32::try_from(digits(year, 4, 4)?).ok()?,
            YearDigits::Two => {
                let yy = i32::try_from(digits(year, 2, 2)?).ok()?;
                if yy >= 69 { 1900 + yy } else { 2000 + yy }
            }
        };

        NaiveDate::from_ymd_opt(year, month, day)
    }
}

fn digits(field: &str, min: usize, max: usize) -> Option<u32> {
    if field.len() < min || field.len() > max || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Reads a serial day count; the fractional part (time of day) is dropped.
fn parse_serial(raw: &str) -> Option<NaiveDate> {
    let serial = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()?;
    let days = serial.trunc().to_i64()?;
    let offset = Days::new(days.unsigned_abs());
    if days >= 0 {
        SERIAL_EPOCH.checked_add_days(offset)
    } else {
        SERIAL_EPOCH.checked_sub_days(offset)
    }
}

/// Parses a date cell.
///
/// # Errors
///
/// Returns [`UnrecognizedDateFormat`] if no layout matches and the cell is
/// not a number.
pub fn parse_date(raw: &str) -> Result<NaiveDate, UnrecognizedDateFormat> {
    let trimmed = raw.trim();
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(trimmed))
        .or_else(|| parse_serial(trimmed))
        .ok_or_else(|| UnrecognizedDateFormat(raw.to_string()))
}
