//! Парсер банковских выписок MT940 (в том числе немецкий вариант с
//! подполями `?NN` в :86: и SEPA-полями `EREF+`, `SVWZ+`, ...).
//!
//! Вход - строка с одной или несколькими выписками, выход - список [`Statement`].
//! Чтение файлов и прочий ввод/вывод остаются на стороне вызывающего кода.

pub mod error;
pub mod model;
pub mod mt940;

pub use crate::error::ParseError;
pub use crate::model::{CreditDebit, Description, StartBalance, Statement, Transaction};
pub use crate::mt940::parse;
