use crate::ParseError;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Век, к которому относятся все двузначные года (YY -> 20YY)
pub const ASSUMED_CENTURY: i32 = 2000;

/// Разделитель строк: в зависимости от источника `\r\n` или `@@`
pub(super) const LINE_DIVIDER: &str = r"(?:@@|\r\n)";

/// YYMMDD -> дата, None если такой даты нет в календаре
pub(super) fn parse_yy_mm_dd(s: &str) -> Option<NaiveDate> {
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let yy: i32 = s[0..2].parse().ok()?;
    let mm: u32 = s[2..4].parse().ok()?;
    let dd: u32 = s[4..6].parse().ok()?;

    NaiveDate::from_ymd_opt(ASSUMED_CENTURY + yy, mm, dd)
}

/// Сумма MT940 ("637,39") -> Decimal
pub(super) fn parse_amount(raw: &str) -> Result<Decimal, ParseError> {
    let cleaned = raw.trim().replace(',', ".");

    if cleaned.is_empty() || cleaned.starts_with('-') || cleaned.starts_with('+') {
        return Err(ParseError::InvalidAmount(raw.to_string()));
    }

    // "100," у некоторых банков без дробной части
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);

    Decimal::from_str(cleaned).map_err(|_| ParseError::InvalidAmount(raw.to_string()))
}

/// Подбирает год для даты проводки (MMDD без года).
///
/// Дата проводки может попасть в соседний год относительно даты валютирования
/// (валютирование 31.12, проводка 02.01). Перебираем год валютирования -1, 0, +1
/// и берём ближайшую дату; при равенстве расстояний побеждает более ранний год.
///
/// Если MMDD нет или ни один кандидат не является датой, возвращается `fallback`.
pub(super) fn derive_booking_date(
    valuta_date: NaiveDate,
    booking_mm_dd: Option<&str>,
    fallback: NaiveDate,
) -> NaiveDate {
    let Some((mm, dd)) = booking_mm_dd.and_then(split_mm_dd) else {
        return fallback;
    };

    let mut best: Option<(i64, NaiveDate)> = None;

    for year in valuta_date.year() - 1..=valuta_date.year() + 1 {
        // 0229 в невисокосном году просто пропускаем
        let Some(candidate) = NaiveDate::from_ymd_opt(year, mm, dd) else {
            continue;
        };

        let diff = (candidate - valuta_date).num_days().abs();
        if diff == 0 {
            return candidate;
        }

        match best {
            Some((min_diff, _)) if diff >= min_diff => {}
            _ => best = Some((diff, candidate)),
        }
    }

    best.map(|(_, date)| date).unwrap_or(fallback)
}

fn split_mm_dd(s: &str) -> Option<(u32, u32)> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((s[0..2].parse().ok()?, s[2..4].parse().ok()?))
}
