//! Day-first date parsing for the `Dat. preenchimento` column
//!
//! Brazilian court exports write dates as `dd/mm/yyyy`, sometimes with a time
//! suffix. Values that don't parse become `None` and are simply left out of
//! every date-based computation.

use chrono::NaiveDate;

/// Parse a day-first date string.
///
/// Accepted shapes (time suffix after a space or `T` is ignored):
/// - `dd/mm/yyyy`, `dd-mm-yyyy`, `dd.mm.yyyy`
/// - `dd/mm/yy` (00-68 → 20xx, 69-99 → 19xx)
/// - `yyyy-mm-dd` (a four-digit leading field can't be a day)
pub fn parse_day_first(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let date_part = s.split(|c: char| c == ' ' || c == 'T').next()?;
    let sep = date_part.chars().find(|c| matches!(c, '/' | '-' | '.'))?;

    let fields: Vec<&str> = date_part.split(sep).collect();
    if fields.len() != 3 || fields.iter().any(|f| f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit())) {
        return None;
    }

    // ISO order
    if fields[0].len() == 4 {
        let year: i32 = fields[0].parse().ok()?;
        let month: u32 = fields[1].parse().ok()?;
        let day: u32 = fields[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if fields[0].len() > 2 || fields[1].len() > 2 {
        return None;
    }

    let day: u32 = fields[0].parse().ok()?;
    let month: u32 = fields[1].parse().ok()?;
    let year = match fields[2].len() {
        4 => fields[2].parse::<i32>().ok()?,
        2 => {
            let yy: i32 = fields[2].parse().ok()?;
            if yy <= 68 { 2000 + yy } else { 1900 + yy }
        }
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}
