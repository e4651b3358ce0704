use thiserror::Error;

/// Ошибки при парсинге MT940
///
/// Структурные отклонения (нет :60F:, :61: без :86:, кривая дата проводки)
/// ошибкой не считаются: такие блоки молча пропускаются.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// признак C/D/RC/RD не найден в значении тега :61:
    #[error("c/d/rc/rd mark not found in: {0}")]
    InvalidMark(String),
    /// ошибка при парсинге денежной суммы
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// дата YYMMDD не является календарной датой
    #[error("invalid date: {0}")]
    InvalidDate(String),
}
