mod description;
mod turnover;
mod utils;

use crate::error::ParseError;
use crate::model::{CreditDebit, StartBalance, Statement, Transaction};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

pub use description::{REMITTANCE_LINE_WIDTH, parse_description, parse_structured_remittance};
pub use turnover::Turnover;
pub use utils::ASSUMED_CENTURY;

use utils::{LINE_DIVIDER, parse_amount, parse_yy_mm_dd};

static STATEMENT_SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    // каждая выписка начинается с :20: (Auftragsreferenznummer), сам тег не нужен
    Regex::new(&format!("{LINE_DIVIDER}:20:.*?{LINE_DIVIDER}")).unwrap()
});

static FIELD_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!("{LINE_DIVIDER}:")).unwrap());

/// Одно поле MT940: тег (`60F`, `61`, `86`, ...) и его значение как есть
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub tag: String,
    pub value: String,
}

impl Field {
    /// `61:1605110509D198,02N...` -> tag `61`, value `1605110509D198,02N...`
    ///
    /// Первое поле блока приходит с ведущим `:` (`:25:...`), его отрезаем.
    fn from_part(part: &str) -> Self {
        let part = part.strip_prefix(':').unwrap_or(part);

        match part.split_once(':') {
            Some((tag, value)) => Field {
                tag: tag.to_string(),
                value: value.to_string(),
            },
            // мусор перед первым тегом
            None => Field {
                tag: part.to_string(),
                value: String::new(),
            },
        }
    }
}

/// Поля одной выписки в порядке появления, без :20:
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBlock {
    pub fields: Vec<Field>,
}

/// Режет сообщение на выписки по :20:, а выписки на поля.
///
/// Первый блок (до первого :20:) может быть пустым или заголовком,
/// он разбирается так же и просто не даёт выписки.
pub fn segment(raw: &str) -> Vec<StatementBlock> {
    STATEMENT_SPLIT_RE
        .split(raw)
        .map(|block| StatementBlock {
            fields: FIELD_SPLIT_RE.split(block).map(Field::from_part).collect(),
        })
        .collect()
}

/// Собирает выписку из полей одного блока.
///
/// `soa_date` - дата последнего открывающего баланса, переносится между
/// блоками и служит запасной датой проводки.
///
/// Возвращает `None`, если в блоке нет :60F:/:60M: или ни одной пары :61:+:86:
/// (например, блоки с заблокированными суммами).
pub fn build_statement(
    block: &StatementBlock,
    soa_date: &mut Option<NaiveDate>,
) -> Result<Option<Statement>, ParseError> {
    let mut start: Option<(NaiveDate, StartBalance)> = None;
    let mut transactions: Vec<Transaction> = Vec::new();

    for (i, field) in block.fields.iter().enumerate() {
        match field.tag.as_str() {
            "60F" | "60M" => match parse_start_balance(&field.value) {
                Some((date, balance)) => {
                    *soa_date = Some(date);
                    start = Some((date, balance));
                }
                None => {
                    warn!("skipped undecodable :{}:{}", field.tag, field.value);
                }
            },
            "61" => match block.fields.get(i + 1) {
                Some(info) if info.tag == "86" => {
                    transactions.push(build_transaction(field, info, *soa_date)?);
                }
                _ => {
                    debug!(":61:{} is not followed by :86:, skipped", field.value);
                }
            },
            other => {
                debug!("skipped tag {other}");
            }
        }
    }

    let Some((date, start_balance)) = start else {
        debug!("dropped statement block without opening balance");
        return Ok(None);
    };

    if transactions.is_empty() {
        debug!("dropped statement block without transactions");
        return Ok(None);
    }

    Ok(Some(Statement::new(date, start_balance, transactions)))
}

/// `C160401EUR1234,56` -> (2016-04-01, 1234.56 credit)
fn parse_start_balance(value: &str) -> Option<(NaiveDate, StartBalance)> {
    let credit_debit = if value.starts_with('C') {
        CreditDebit::Credit
    } else {
        CreditDebit::Debit
    };

    let date = parse_yy_mm_dd(value.get(1..7)?)?;
    // 3 символа валюты пропускаем
    let amount = parse_amount(value.get(10..)?).ok()?;

    Some((
        date,
        StartBalance {
            amount,
            credit_debit,
        },
    ))
}

fn build_transaction(
    turnover: &Field,
    info: &Field,
    soa_date: Option<NaiveDate>,
) -> Result<Transaction, ParseError> {
    let Turnover {
        credit_debit,
        amount,
        valuta_date,
        booking_date,
    } = Turnover::parse(&turnover.value, soa_date)?;

    let description = parse_description(&info.value);

    Ok(Transaction {
        raw_turnover: format!(":{}:{}", turnover.tag, turnover.value),
        raw_description: format!(":{}:{}", info.tag, info.value),
        credit_debit,
        amount,
        transaction_code: description.booking_code.clone(),
        booking_date,
        valuta_date,
        description,
    })
}

/// Разбирает MT940 сообщение (одна или несколько выписок) в список [`Statement`].
///
/// Разделитель строк может быть `\r\n` или `@@`.
/// Выписки без открывающего баланса или без транзакций в результат не попадают.
///
/// При неизвестном признаке C/D/RC/RD возвращает [`ParseError::InvalidMark`],
/// частичный результат не возвращается.
///
/// Пример:
/// ```rust
/// use mt940_parser::{parse, CreditDebit};
///
/// let raw = "\r\n:20:STARTUMSE\r\n:25:10020030/1234567\r\n:28C:00000/001\r\n\
///            :60F:C160401EUR1234,56\r\n:61:1604010401DR50,00NMSCNONREF\r\n\
///            :86:005?00LASTSCHRIFT?20SVWZ+Strom April\r\n:62F:C160401EUR1184,56\r\n-";
/// let statements = parse(raw).unwrap();
///
/// assert_eq!(statements.len(), 1);
/// assert_eq!(statements[0].transactions[0].credit_debit, CreditDebit::Debit);
/// ```
pub fn parse(raw: &str) -> Result<Vec<Statement>, ParseError> {
    let mut soa_date: Option<NaiveDate> = None;
    let mut statements: Vec<Statement> = Vec::new();

    for block in segment(raw) {
        if let Some(statement) = build_statement(&block, &mut soa_date)? {
            statements.push(statement);
        }
    }

    debug!("parsed {} mt940 statements", statements.len());

    Ok(statements)
}
