use crate::model::Description;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::utils::LINE_DIVIDER;

/// Обычная длина строки назначения платежа; более короткие строки
/// потеряли пробелы в конце
pub const REMITTANCE_LINE_WIDTH: usize = 27;

/// Структура без явного тега целиком уходит сюда
const UNSTRUCTURED_TAG: &str = "SVWZ";

static DIVIDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(LINE_DIVIDER).unwrap());

static MULTI_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

static SUB_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    // ?NN<текст до следующего ?>, между ? и номером бывают переводы строки
    Regex::new(r"\?[\r\n]*(\d{2})([^?]+)").unwrap()
});

/// Разбирает значение тега :86: в [`Description`]
pub fn parse_description(value: &str) -> Description {
    // Geschäftsvorfall-Code
    let booking_code: String = value.chars().take(3).collect();

    let cleaned = DIVIDER_RE.replace_all(value, "");
    let cleaned = MULTI_SPACE_RE.replace_all(&cleaned, " ");
    let cleaned = cleaned.replace("? ", "?");

    let mut sub_fields: BTreeMap<u8, String> = BTreeMap::new();
    let mut lines: Vec<String> = Vec::new();
    let mut description_1 = String::new();
    let mut description_2 = String::new();

    for caps in SUB_FIELD_RE.captures_iter(&cleaned) {
        let (_, [index, text]) = caps.extract();
        // две цифры, в u8 влезает всегда
        let Ok(index) = index.parse::<u8>() else {
            continue;
        };

        match index {
            20..=29 | 60..=63 => {
                if index < 60 {
                    description_1.push_str(text);
                } else {
                    description_2.push_str(text);
                }

                let line = text.trim();
                if !line.is_empty() {
                    lines.push(line.to_string());
                }
            }
            _ => {
                sub_fields.insert(index, text.to_string());
            }
        }
    }

    let structured = parse_structured_remittance(&lines);

    let field = |index: u8| sub_fields.get(&index).map(String::as_str).unwrap_or("");

    Description {
        booking_code,
        booking_text: field(0).trim().to_string(),
        structured,
        primanoten_nr: field(10).trim().to_string(),
        description_1: description_1.trim().to_string(),
        bank_code: field(30).trim().to_string(),
        account_number: field(31).trim().to_string(),
        name: format!("{}{}", field(32), field(33)).trim().to_string(),
        text_key_addition: field(34).trim().to_string(),
        description_2,
        lines,
        sub_fields,
    }
}

/// Разбирает строки назначения платежа на SEPA-поля вида `EREF+...`.
///
/// Если первая строка не начинается с `XXXX+`, всё склеивается в `SVWZ`.
/// Список тегов не фиксирован: любой префикс из 4 символов перед `+`
/// становится ключом.
pub fn parse_structured_remittance(lines: &[String]) -> BTreeMap<String, String> {
    let mut structured: BTreeMap<String, String> = BTreeMap::new();

    if lines.first().is_none_or(|first| starting_tag(first).is_none()) {
        structured.insert(UNSTRUCTURED_TAG.to_string(), lines.concat());
        return structured;
    }

    let mut current: Option<(String, String)> = None;

    for line in lines {
        if let Some((tag, rest)) = starting_tag(line) {
            if let Some((prev_tag, prev_value)) = current.take() {
                structured.insert(prev_tag, prev_value.trim().to_string());
            }
            current = Some((tag.to_string(), rest.to_string()));
        } else if let Some((_, value)) = current.as_mut() {
            value.push_str(line);
        }

        // короткая строка: либо конец поля, либо обрезанные пробелы в конце;
        // лишний пробел в конце поля уйдёт при trim
        if line.chars().count() < REMITTANCE_LINE_WIDTH
            && let Some((_, value)) = current.as_mut()
        {
            value.push(' ');
        }
    }

    if let Some((tag, value)) = current {
        structured.insert(tag, value.trim().to_string());
    }

    structured
}

/// `EREF+ABC` -> Some(("EREF", "ABC"))
fn starting_tag(line: &str) -> Option<(&str, &str)> {
    let (plus_pos, plus) = line.char_indices().nth(4)?;
    if plus != '+' {
        return None;
    }

    Some((&line[..plus_pos], &line[plus_pos + 1..]))
}
