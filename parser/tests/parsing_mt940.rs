use chrono::NaiveDate;
use mt940_parser::{CreditDebit, ParseError, Statement, parse};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::{fs, path::PathBuf};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("mt940")
        .join("example.mt940")
}

fn read_fixture() -> String {
    let path = fixture_path();
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read MT940 fixture {path:?}: {e}"))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn structured(stmt: &Statement, tx: usize, tag: &str) -> Option<String> {
    stmt.transactions[tx].description.structured.get(tag).cloned()
}

#[test]
fn mt940_example_parses_into_statements() {
    let statements = parse(&read_fixture()).expect("failed to parse MT940 fixture");

    // третий блок (STARTDISPE) без :60F: и должен быть отброшен
    assert_eq!(statements.len(), 2, "earmarked block should be dropped");

    let first = &statements[0];
    assert_eq!(first.date, date(2015, 12, 30));
    assert_eq!(first.start_balance.amount, Decimal::new(152340, 2));
    assert_eq!(first.start_balance.credit_debit, CreditDebit::Credit);
    assert_eq!(first.transactions.len(), 2);

    let rent = &first.transactions[0];
    assert_eq!(rent.raw_turnover, ":61:1512311231DR637,39N033NONREF");
    assert_eq!(rent.credit_debit, CreditDebit::Debit);
    assert_eq!(rent.amount, Decimal::new(63739, 2));
    assert_eq!(rent.transaction_code, "177");
    assert_eq!(rent.valuta_date, date(2015, 12, 31));
    assert_eq!(rent.booking_date, date(2015, 12, 31));
    assert_eq!(rent.description.booking_text, "SEPA-UEBERWEISUNG");
    assert_eq!(rent.description.primanoten_nr, "0599");
    assert_eq!(rent.description.bank_code, "BYLADEM1001");
    assert_eq!(rent.description.account_number, "DE02120300000000202051");
    assert_eq!(rent.description.name, "Hausverwaltung Mustermann GmbH");
    assert_eq!(structured(first, 0, "EREF").as_deref(), Some("2015123100012345"));
    assert_eq!(
        structured(first, 0, "SVWZ").as_deref(),
        Some("Miete Januar 2016 Wohnung 3. OG links")
    );

    // валютирование 02.01.2016, проводка 31.12 -> прошлый год
    let salary = &first.transactions[1];
    assert_eq!(salary.credit_debit, CreditDebit::Credit);
    assert_eq!(salary.amount, Decimal::new(1200, 0));
    assert_eq!(salary.valuta_date, date(2016, 1, 2));
    assert_eq!(salary.booking_date, date(2015, 12, 31));
    assert_eq!(salary.description.name, "Arbeitgeber AG");
    assert_eq!(structured(first, 1, "SVWZ").as_deref(), Some("Gehalt Dezember 2015"));

    let second = &statements[1];
    assert_eq!(second.date, date(2016, 1, 2));
    assert_eq!(second.transactions.len(), 2);

    let power = &second.transactions[0];
    assert_eq!(power.booking_date, date(2016, 5, 9));
    assert_eq!(power.valuta_date, date(2016, 5, 11));
    assert_eq!(power.description.primanoten_nr, "931");
    assert_eq!(structured(second, 0, "EREF").as_deref(), Some("4711-0815"));
    assert_eq!(structured(second, 0, "MREF").as_deref(), Some("M-2014-17"));
    assert_eq!(structured(second, 0, "CRED").as_deref(), Some("DE98ZZZ09999999999"));
    assert_eq!(structured(second, 0, "SVWZ").as_deref(), Some("Strom Abschlag Mai"));

    // без даты проводки берётся дата :60F:
    let returned = &second.transactions[1];
    assert_eq!(returned.credit_debit, CreditDebit::CreditCancellation);
    assert_eq!(returned.amount, Decimal::new(15, 0));
    assert_eq!(returned.booking_date, date(2016, 1, 2));
    assert_eq!(returned.description.text_key_addition, "901");
}

#[test]
fn mt940_example_with_at_at_divider_gives_same_content() {
    let crlf = read_fixture();
    let at_at = crlf.replace("\r\n", "@@");

    let from_crlf = parse(&crlf).unwrap();
    let from_at_at = parse(&at_at).unwrap();

    assert_eq!(from_crlf.len(), from_at_at.len());
    for (a, b) in from_crlf.iter().zip(&from_at_at) {
        assert_eq!(a.date, b.date);
        assert_eq!(a.start_balance, b.start_balance);
        assert_eq!(a.transactions.len(), b.transactions.len());

        for (ta, tb) in a.transactions.iter().zip(&b.transactions) {
            assert_eq!(ta.raw_turnover, tb.raw_turnover);
            assert_eq!(ta.amount, tb.amount);
            assert_eq!(ta.booking_date, tb.booking_date);
            assert_eq!(ta.description, tb.description);
        }
    }
}

#[test]
fn mt940_parse_is_idempotent() {
    let raw = read_fixture();
    assert_eq!(parse(&raw).unwrap(), parse(&raw).unwrap());
}

#[test]
fn mt940_every_statement_has_balance_and_transactions() {
    let raw = read_fixture();
    let blocks = raw.matches(":20:").count();
    let statements = parse(&raw).unwrap();

    assert!(statements.len() <= blocks);
    assert!(statements.iter().all(|s| !s.transactions.is_empty()));
}

#[test]
fn mt940_bad_mark_fails_whole_parse() {
    let raw = read_fixture().replace("DR637,39", "X637,39");
    let err = parse(&raw).unwrap_err();

    assert_eq!(
        err,
        ParseError::InvalidMark("1512311231X637,39N033NONREF".to_string())
    );
}

#[test]
fn mt940_statement_without_account_field_is_parsed() {
    // :60F: сразу после :20:, без :25: и :28C:
    let raw = read_fixture()
        .replace(":25:10020030/0123456789\r\n", "")
        .replace(":28C:00000/001\r\n", "")
        .replace(":28C:00001/001\r\n", "");
    let statements = parse(&raw).unwrap();

    assert_eq!(statements.len(), 2);
    assert_eq!(statements[1].date, date(2016, 1, 2));
    assert_eq!(statements[1].transactions.len(), 2);
}
