//! Reconcile the card directory with the FILE/CONTACT tables.
//!
//! Cards are read straight from their text lines here, not through the card
//! library, so a card the library rejects can still be recorded. The List
//! view applies the library's gate; sync does not.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use log::{info, warn};

use crate::card::{CardError, CardStore};
use crate::db::{DbError, RecordRepository, local_now};
use crate::model::CardHeader;

/// Compact timestamp form found in card date properties
pub const CARD_DATE_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Outcome counts of one synchronization pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Card files seen in the directory
    pub scanned: usize,
    /// Files newly recorded (FILE + CONTACT)
    pub inserted: usize,
    /// Files the repository already knew
    pub already_known: usize,
    /// Files left unrecorded (unreadable or nameless)
    pub skipped: usize,
    /// Date values that failed to parse and were stored as absent
    pub bad_dates: usize,
}

/// Error type for a synchronization pass
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Db(#[from] DbError),
}

/// A card date that doesn't match [`CARD_DATE_FORMAT`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized card date '{0}'")]
pub struct DateFormatError(pub String);

/// Parse a card's compact timestamp, e.g. `19900101T000000`.
pub fn parse_card_date(value: &str) -> Result<NaiveDateTime, DateFormatError> {
    NaiveDateTime::parse_from_str(value.trim(), CARD_DATE_FORMAT)
        .map_err(|_| DateFormatError(value.to_string()))
}

/// Pull `FN:`, `BDAY:` and `ANNIVERSARY:` values out of card text. A value
/// runs from the prefix to the next `:`. Folded continuation lines start
/// with whitespace and never match a prefix.
pub fn parse_card_header(text: &str) -> CardHeader {
    let mut header = CardHeader::default();
    for line in text.lines() {
        let line = line.trim_end();
        let slot = if let Some(rest) = line.strip_prefix("FN:") {
            Some((&mut header.name, rest))
        } else if let Some(rest) = line.strip_prefix("BDAY:") {
            Some((&mut header.birthday, rest))
        } else if let Some(rest) = line.strip_prefix("ANNIVERSARY:") {
            Some((&mut header.anniversary, rest))
        } else {
            None
        };
        if let Some((field, rest)) = slot {
            let value = rest.split(':').next().unwrap_or("").trim();
            *field = Some(value.to_string());
        }
    }
    header
}

/// Read a card's header fields from disk.
pub fn read_card_header(path: &Path) -> Result<CardHeader, CardError> {
    let text = fs::read_to_string(path).map_err(|e| CardError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_card_header(&text))
}

/// Record every card file the repository doesn't know yet. Files already
/// recorded are left alone, so re-running after a partial pass only fills
/// the gaps.
pub fn synchronize(store: &CardStore, repo: &RecordRepository) -> Result<SyncReport, SyncError> {
    let mut report = SyncReport::default();
    info!(
        "event=sync module=sync status=start dir={}",
        store.dir().display()
    );

    for filename in store.card_files()? {
        report.scanned += 1;

        if repo.file_exists(&filename)? {
            report.already_known += 1;
            continue;
        }

        let path = store.path_for(&filename);
        let header = match read_card_header(&path) {
            Ok(h) => h,
            Err(e) => {
                warn!(
                    "event=sync_file module=sync status=skip file={} error={}",
                    filename, e
                );
                report.skipped += 1;
                continue;
            }
        };
        let Some(name) = header.name.as_deref().filter(|n| !n.is_empty()) else {
            warn!(
                "event=sync_file module=sync status=skip file={} reason=no_name",
                filename
            );
            report.skipped += 1;
            continue;
        };

        let birthday = normalize_date(&filename, header.birthday.as_deref(), &mut report);
        let anniversary = normalize_date(&filename, header.anniversary.as_deref(), &mut report);

        let now = local_now();
        let last_modified = file_mtime(&path).unwrap_or(now);

        if let Some(file_id) = repo.insert_file(&filename, &last_modified, &now)? {
            repo.insert_contact(name, birthday.as_ref(), anniversary.as_ref(), file_id)?;
            report.inserted += 1;
        }
    }

    info!(
        "event=sync module=sync status=ok scanned={} inserted={} already_known={} skipped={} bad_dates={}",
        report.scanned, report.inserted, report.already_known, report.skipped, report.bad_dates
    );
    Ok(report)
}

fn normalize_date(
    filename: &str,
    value: Option<&str>,
    report: &mut SyncReport,
) -> Option<NaiveDateTime> {
    let value = value.filter(|v| !v.is_empty())?;
    match parse_card_date(value) {
        Ok(ts) => Some(ts),
        Err(e) => {
            warn!(
                "event=sync_date module=sync status=recovered file={} error={}",
                filename, e
            );
            report.bad_dates += 1;
            None
        }
    }
}

fn file_mtime(path: &Path) -> Option<NaiveDateTime> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let local: DateTime<Local> = modified.into();
    Some(local.naive_local().with_nanosecond(0).unwrap_or(local.naive_local()))
}
