//! Line-based stand-in for the native card library, for tests.

use std::fs;
use std::path::Path;

use super::CardLibrary;

#[derive(Debug, Default)]
pub struct FakeLibrary {
    fail_updates: bool,
}

impl FakeLibrary {
    pub fn failing_updates() -> Self {
        FakeLibrary { fail_updates: true }
    }
}

struct Parsed {
    name: String,
    birthday: Option<String>,
    anniversary: Option<String>,
    other: usize,
}

fn parse(path: &Path) -> Option<Parsed> {
    let text = fs::read_to_string(path).ok()?;
    let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    if lines.first() != Some(&"BEGIN:VCARD") || lines.last() != Some(&"END:VCARD") {
        return None;
    }
    let mut parsed = Parsed {
        name: String::new(),
        birthday: None,
        anniversary: None,
        other: 0,
    };
    let mut has_name = false;
    for line in &lines[1..lines.len() - 1] {
        if let Some(v) = line.strip_prefix("FN:") {
            parsed.name = v.to_string();
            has_name = true;
        } else if let Some(v) = line.strip_prefix("BDAY:") {
            parsed.birthday = Some(v.to_string());
        } else if let Some(v) = line.strip_prefix("ANNIVERSARY:") {
            parsed.anniversary = Some(v.to_string());
        } else if !line.starts_with("VERSION:") {
            parsed.other += 1;
        }
    }
    has_name.then_some(parsed)
}

fn date_text(value: &Option<String>) -> String {
    match value {
        None => "None".to_string(),
        Some(v) => match v.split_once('T') {
            Some((date, time)) => format!("DateTime: [Date: {date}, Time: {time}, UTC: false]"),
            None => format!("DateTime: [Text: {v}, UTC: false]"),
        },
    }
}

impl CardLibrary for FakeLibrary {
    fn validate(&self, path: &Path) -> Result<(), i32> {
        parse(path).map(|_| ()).ok_or(2)
    }

    fn name(&self, path: &Path) -> Option<String> {
        parse(path).map(|p| p.name)
    }

    fn details(&self, path: &Path) -> Option<String> {
        let p = parse(path)?;
        Some(format!(
            "File: {}\nName: {}\nBirthday: {}\nAnniversary: {}\nOther Props: {}",
            path.display(),
            p.name,
            date_text(&p.birthday),
            date_text(&p.anniversary),
            p.other
        ))
    }

    fn update_name(&self, path: &Path, new_name: &str) -> Result<(), i32> {
        if self.fail_updates {
            return Err(5);
        }
        parse(path).ok_or(2)?;
        let text = fs::read_to_string(path).map_err(|_| 7)?;
        let rewritten: String = text
            .split_inclusive('\n')
            .map(|line| {
                if line.starts_with("FN:") {
                    format!("FN:{new_name}\r\n")
                } else {
                    line.to_string()
                }
            })
            .collect();
        fs::write(path, rewritten).map_err(|_| 7)
    }
}
