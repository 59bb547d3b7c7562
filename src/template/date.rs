//! Date patterns for `{{date.format("...")}}`

use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juill.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateToken {
    Year4,
    Year2,
    MonthLong,
    MonthShort,
    Month2,
    Day2,
    Day,
}

// Longest tokens first so `MMMM` is never read as `MM` + `MM`
const TOKENS: [(&str, DateToken); 7] = [
    ("YYYY", DateToken::Year4),
    ("MMMM", DateToken::MonthLong),
    ("MMM", DateToken::MonthShort),
    ("MM", DateToken::Month2),
    ("DD", DateToken::Day2),
    ("YY", DateToken::Year2),
    ("D", DateToken::Day),
];

fn render(token: DateToken, date: NaiveDate, out: &mut String) {
    let month = date.month0() as usize;
    match token {
        DateToken::Year4 => out.push_str(&format!("{:04}", date.year())),
        DateToken::Year2 => out.push_str(&format!("{:02}", date.year().rem_euclid(100))),
        DateToken::MonthLong => out.push_str(MONTHS[month]),
        DateToken::MonthShort => out.push_str(MONTHS_SHORT[month]),
        DateToken::Month2 => out.push_str(&format!("{:02}", date.month())),
        DateToken::Day2 => out.push_str(&format!("{:02}", date.day())),
        DateToken::Day => out.push_str(&date.day().to_string()),
    }
}

/// Format `date` with a pattern made of `DD`, `D`, `MMMM`, `MMM`, `MM`,
/// `YYYY` and `YY`. Every occurrence is replaced; anything else is copied.
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    'outer: while !rest.is_empty() {
        for (text, token) in TOKENS {
            if let Some(tail) = rest.strip_prefix(text) {
                render(token, date, &mut out);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}
