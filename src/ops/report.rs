//! Plain-text tables for the Query view.

use chrono::{Month, NaiveDateTime};

use crate::model::record::{BirthdayRow, ContactRow, format_timestamp};
use crate::util::unicode::pad_to_width;

const MISSING: &str = "N/A";

/// English month name for 1..=12; anything else is empty.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// Next month, wrapping December to January.
pub fn next_month(month: u32) -> u32 {
    month % 12 + 1
}

/// Previous month, wrapping January to December.
pub fn prev_month(month: u32) -> u32 {
    (month + 10) % 12 + 1
}

fn date_cell(ts: Option<&NaiveDateTime>) -> String {
    ts.map(format_timestamp)
        .unwrap_or_else(|| MISSING.to_string())
}

fn row(cells: &[(&str, usize)]) -> String {
    cells
        .iter()
        .map(|(text, width)| pad_to_width(text, *width))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every contact with its file, or a notice when there are none.
pub fn contacts_report(rows: &[ContactRow]) -> String {
    if rows.is_empty() {
        return "No data found.".to_string();
    }
    let mut lines = vec![
        row(&[
            ("ID", 5),
            ("Name", 25),
            ("Birthday", 20),
            ("Anniversary", 20),
            ("File", 25),
        ]),
        "-".repeat(90),
    ];
    for r in rows {
        let id = r.contact_id.to_string();
        let birthday = date_cell(r.birthday.as_ref());
        let anniversary = date_cell(r.anniversary.as_ref());
        lines.push(row(&[
            (&id, 5),
            (&r.name, 25),
            (&birthday, 20),
            (&anniversary, 20),
            (&r.file_name, 25),
        ]));
    }
    lines.join("\n")
}

/// Contacts born in `month`, oldest first.
pub fn birthdays_report(rows: &[BirthdayRow], month: u32) -> String {
    if rows.is_empty() {
        return format!("No contacts found in {}.", month_name(month));
    }
    let mut lines = vec![
        row(&[("Name", 25), ("Birthday", 25), ("Age", 5)]),
        "-".repeat(60),
    ];
    for r in rows {
        let birthday = date_cell(r.birthday.as_ref());
        let age = r
            .age
            .map(|a| a.to_string())
            .unwrap_or_else(|| MISSING.to_string());
        lines.push(row(&[(&r.name, 25), (&birthday, 25), (&age, 5)]));
    }
    lines.join("\n")
}
