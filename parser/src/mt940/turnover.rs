use crate::error::ParseError;
use crate::model::CreditDebit;
use chrono::NaiveDate;
use lazy_regex::regex_captures;
use rust_decimal::Decimal;
use tracing::debug;

use super::utils::{derive_booking_date, parse_amount, parse_yy_mm_dd};

/// Разобранное значение тега :61: (Umsatzzeile)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turnover {
    pub credit_debit: CreditDebit,
    pub amount: Decimal,
    pub valuta_date: NaiveDate,
    pub booking_date: NaiveDate,
}

impl Turnover {
    /// Разбирает значение :61: (без тега).
    ///
    /// Формат: `YYMMDD[MMDD](C|D|RC|RD)[A-Z]<сумма>N...`, например
    /// `1603310331DR637,39N033NONREF`. `fallback_date` - дата последнего
    /// открывающего баланса, используется если дата проводки не указана.
    pub fn parse(value: &str, fallback_date: Option<NaiveDate>) -> Result<Self, ParseError> {
        let Some((_, booking_mm_dd, mark, amount)) =
            regex_captures!(r"^\d{6}(\d{4})?(C|D|RC|RD)[A-Z]?([^N]+)N", value)
        else {
            return Err(ParseError::InvalidMark(value.to_string()));
        };

        let credit_debit: CreditDebit = mark
            .parse()
            .map_err(|_| ParseError::InvalidMark(value.to_string()))?;
        let amount = parse_amount(amount)?;

        let valuta_date =
            parse_yy_mm_dd(&value[0..6]).ok_or_else(|| ParseError::InvalidDate(value[0..6].to_string()))?;

        let booking_mm_dd = (!booking_mm_dd.is_empty()).then_some(booking_mm_dd);
        if booking_mm_dd.is_none() {
            debug!("no booking date in :61:{value}, using opening balance date");
        }

        // без :60F: в выписке остаётся только дата валютирования
        let fallback_date = fallback_date.unwrap_or(valuta_date);
        let booking_date = derive_booking_date(valuta_date, booking_mm_dd, fallback_date);

        Ok(Turnover {
            credit_debit,
            amount,
            valuta_date,
            booking_date,
        })
    }
}
