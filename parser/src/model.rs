use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Одна выписка из MT940 сообщения (блок между тегами :20:).
///
/// В результат [`crate::parse`] попадают только выписки, у которых есть
/// открывающий баланс и хотя бы одна транзакция.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// дата открывающего баланса (:60F: / :60M:)
    pub date: NaiveDate,
    /// открывающий баланс
    pub start_balance: StartBalance,
    /// транзакции в порядке появления в выписке
    pub transactions: Vec<Transaction>,
}

impl Statement {
    /// Go to [`Statement`]
    pub fn new(date: NaiveDate, start_balance: StartBalance, transactions: Vec<Transaction>) -> Self {
        Statement {
            date,
            start_balance,
            transactions,
        }
    }
}

/// Открывающий (или промежуточный) баланс
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartBalance {
    /// сумма без знака
    pub amount: Decimal,
    /// знак баланса, только `Credit` или `Debit`
    pub credit_debit: CreditDebit,
}

/// Признак кредит/дебет, включая сторно
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditDebit {
    /// `C`
    Credit,
    /// `D`
    Debit,
    /// `RC`, сторно кредита
    CreditCancellation,
    /// `RD`, сторно дебета
    DebitCancellation,
}

impl FromStr for CreditDebit {
    type Err = ParseError;

    fn from_str(mark: &str) -> Result<Self, Self::Err> {
        match mark {
            "C" => Ok(CreditDebit::Credit),
            "D" => Ok(CreditDebit::Debit),
            "RC" => Ok(CreditDebit::CreditCancellation),
            "RD" => Ok(CreditDebit::DebitCancellation),
            other => Err(ParseError::InvalidMark(other.to_string())),
        }
    }
}

impl fmt::Display for CreditDebit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreditDebit::Credit => write!(f, "credit"),
            CreditDebit::Debit => write!(f, "debit"),
            CreditDebit::CreditCancellation => write!(f, "credit_cancellation"),
            CreditDebit::DebitCancellation => write!(f, "debit_cancellation"),
        }
    }
}

/// Одна проводка: пара тегов :61: + :86:
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// исходное поле :61: вместе с тегом
    pub raw_turnover: String,
    /// исходное поле :86: вместе с тегом
    pub raw_description: String,
    pub credit_debit: CreditDebit,
    /// сумма без знака, знак задаётся через `credit_debit`
    pub amount: Decimal,
    /// первые 3 символа :86:
    pub transaction_code: String,
    /// дата проводки
    pub booking_date: NaiveDate,
    /// дата валютирования
    pub valuta_date: NaiveDate,
    pub description: Description,
}

/// Разобранное поле :86: (Mehrzweckfeld)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    /// Geschäftsvorfall-Code
    pub booking_code: String,
    /// ?00
    pub booking_text: String,
    /// структурированные поля назначения платежа (EREF, MREF, SVWZ, ...)
    pub structured: BTreeMap<String, String>,
    /// ?10
    pub primanoten_nr: String,
    /// склеенные ?20..?29
    pub description_1: String,
    /// ?30
    pub bank_code: String,
    /// ?31
    pub account_number: String,
    /// ?32 + ?33
    pub name: String,
    /// ?34
    pub text_key_addition: String,
    /// склеенные ?60..?63, без обрезки пробелов
    pub description_2: String,
    /// непустые строки назначения платежа (?20..?29, ?60..?63) по порядку
    pub lines: Vec<String>,
    /// все остальные подполя ?NN как есть, по номеру
    pub sub_fields: BTreeMap<u8, String>,
}
