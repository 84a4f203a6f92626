use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{debug, info, warn};

use super::details::{display_date, file_label, parse_details};
use super::{CardError, CardLibrary};
use crate::model::CardSummary;

/// Read/write path over the card directory plus the card library.
/// Holds no state of its own: every listing is a fresh directory scan.
#[derive(Clone)]
pub struct CardStore {
    dir: PathBuf,
    extension: String,
    library: Rc<dyn CardLibrary>,
}

impl CardStore {
    pub fn new(dir: impl Into<PathBuf>, extension: &str, library: Rc<dyn CardLibrary>) -> Self {
        CardStore {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            library,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Full path of a card in the directory
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Whether `filename` carries the card extension
    pub fn has_card_extension(&self, filename: &str) -> bool {
        filename
            .strip_suffix(self.extension.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    }

    /// Every file with the card extension, sorted by name, without asking the
    /// library whether it parses.
    pub fn card_files(&self) -> Result<Vec<String>, CardError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| CardError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| self.has_card_extension(name))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Lazily yield card files the library validates. Each call rescans.
    pub fn valid_cards(&self) -> Result<ValidCards<'_>, CardError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| CardError::Io {
            path: self.dir.clone(),
            source: e,
        })?;
        Ok(ValidCards {
            store: self,
            entries,
        })
    }

    /// Name, dates and property count for one card, via the library.
    pub fn read_summary(&self, filename: &str) -> Result<CardSummary, CardError> {
        let path = self.path_for(filename);
        let name = self.library.name(&path);
        let details = self.library.details(&path);

        if name.is_none() && details.is_none() {
            warn!(
                "event=card_read module=card status=error file={} error=library_returned_null",
                filename
            );
            return Err(CardError::ParseError { path });
        }

        let map = details.as_deref().map(parse_details).unwrap_or_default();
        let name = name
            .or_else(|| map.get("Name").cloned())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(CardSummary {
            file: match map.get("File") {
                Some(f) => file_label(Some(f)),
                None => filename.to_string(),
            },
            name,
            birthday: display_date(map.get("Birthday").map(String::as_str)),
            anniversary: display_date(map.get("Anniversary").map(String::as_str)),
            other_props: map
                .get("Other Props")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
        })
    }

    /// The card's current name as the library reads it
    pub fn current_name(&self, filename: &str) -> Option<String> {
        self.library.name(&self.path_for(filename))
    }

    /// Rename the contact inside the card file. Keeping the database in step
    /// is the caller's job.
    pub fn rename_contact(&self, filename: &str, new_name: &str) -> Result<(), CardError> {
        let path = self.path_for(filename);
        match self.library.update_name(&path, new_name) {
            Ok(()) => {
                info!("event=card_rename module=card status=ok file={}", filename);
                Ok(())
            }
            Err(code) => {
                warn!(
                    "event=card_rename module=card status=error file={} code={}",
                    filename, code
                );
                Err(CardError::ExternalLibrary {
                    operation: "update name of",
                    path,
                    code,
                })
            }
        }
    }

    /// Write a minimal card unless something already exists at the path.
    /// Returns whether a file was written.
    pub fn create_card(&self, filename: &str, display_name: &str) -> Result<bool, CardError> {
        let path = self.path_for(filename);
        let io_err = |e: std::io::Error| CardError::Io {
            path: path.clone(),
            source: e,
        };

        fs::create_dir_all(&self.dir).map_err(|e| CardError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(
                    "event=card_create module=card status=skip file={} reason=exists",
                    filename
                );
                return Ok(false);
            }
            Err(e) => return Err(io_err(e)),
        };
        file.write_all(card_template(display_name).as_bytes())
            .map_err(io_err)?;
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).map_err(io_err)?;
        }

        info!("event=card_create module=card status=ok file={}", filename);
        Ok(true)
    }
}

/// The smallest card the library accepts: begin, version, name, end.
pub fn card_template(display_name: &str) -> String {
    format!("BEGIN:VCARD\r\nVERSION:4.0\r\nFN:{display_name}\r\nEND:VCARD\r\n")
}

/// Iterator over the file names of valid cards in a directory scan.
pub struct ValidCards<'a> {
    store: &'a CardStore,
    entries: fs::ReadDir,
}

impl Iterator for ValidCards<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for entry in self.entries.by_ref() {
            let Ok(entry) = entry else { continue };
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if !self.store.has_card_extension(&name) {
                continue;
            }
            if self.store.library.validate(&entry.path()).is_ok() {
                return Some(name);
            }
        }
        None
    }
}
