use std::fs;
use std::rc::Rc;

use log::{info, warn};

use crate::card::{CardError, CardLibrary, CardStore};
use crate::db::{Credentials, DbError, RecordRepository, local_now};
use crate::model::config::AppConfig;
use crate::ops::sync::{SyncError, SyncReport, synchronize};
use crate::session::Session;

/// Input problems the user fixes and retries; the view stays put.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required!")]
    MissingCredentials,
    #[error("Contact name cannot be empty!")]
    EmptyContactName,
    #[error("Any field cannot be empty.")]
    EmptyCreateField,
    #[error("Invalid file extension. Only .{0} files are allowed.")]
    BadExtension(String),
    #[error("Filename cannot contain a path separator.")]
    PathInFilename,
    #[error("File already exists.")]
    DuplicateFile,
}

/// Everything a view action can fail with. `Display` is the popup text.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Connection(DbError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to update name!")]
    Rename(#[source] CardError),
    #[error("Could not read card: {0}")]
    Card(#[from] CardError),
    #[error(transparent)]
    Storage(DbError),
    #[error("Synchronization failed: {0}")]
    Sync(#[from] SyncError),
}

impl From<DbError> for FlowError {
    fn from(err: DbError) -> Self {
        FlowError::Storage(err)
    }
}

/// Result of saving the Detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Unchanged,
    Renamed,
}

/// Connect, synchronize the card directory once, and hand back the session.
pub fn login(
    config: &AppConfig,
    library: Rc<dyn CardLibrary>,
    creds: &Credentials,
) -> Result<(Session, SyncReport), FlowError> {
    if [&creds.username, &creds.password, &creds.database]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err(ValidationError::MissingCredentials.into());
    }

    let mut repo = RecordRepository::new();
    repo.connect(creds, &config.database)
        .map_err(FlowError::Connection)?;

    let store = CardStore::new(&config.cards.dir, &config.cards.extension, library);
    if let Err(e) = fs::create_dir_all(store.dir()) {
        repo.close();
        return Err(CardError::Io {
            path: store.dir().to_path_buf(),
            source: e,
        }
        .into());
    }

    match synchronize(&store, &repo) {
        Ok(report) => {
            info!(
                "event=login module=ops status=ok user={} inserted={}",
                creds.username.trim(),
                report.inserted
            );
            Ok((Session::new(repo, store), report))
        }
        Err(e) => {
            repo.close();
            Err(e.into())
        }
    }
}

/// Save the Detail view: rename the card through the library, then bring
/// the database row in line. A failed rename leaves both untouched.
pub fn save_contact_name(
    session: &Session,
    filename: &str,
    new_name: &str,
) -> Result<SaveOutcome, FlowError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(ValidationError::EmptyContactName.into());
    }

    let old_name = session.store.current_name(filename);
    if old_name.as_deref() == Some(new_name) {
        return Ok(SaveOutcome::Unchanged);
    }

    session
        .store
        .rename_contact(filename, new_name)
        .map_err(FlowError::Rename)?;

    session.repo.touch_file_modified(filename)?;
    match session.repo.get_file_id(filename)? {
        Some(file_id) => {
            session.repo.update_contact_name(file_id, new_name)?;
        }
        None => warn!(
            "event=contact_rename module=ops status=skip file={} reason=untracked",
            filename
        ),
    }
    info!("event=contact_rename module=ops status=ok file={}", filename);
    Ok(SaveOutcome::Renamed)
}

/// Save the Create view: record the new file and contact, then write the
/// card unless a file already sits at that path. Returns whether the card
/// file was written.
pub fn create_contact(
    session: &Session,
    filename: &str,
    contact: &str,
) -> Result<bool, FlowError> {
    let filename = filename.trim();
    let contact = contact.trim();
    if filename.is_empty() || contact.is_empty() {
        return Err(ValidationError::EmptyCreateField.into());
    }
    if !session.store.has_card_extension(filename) {
        return Err(ValidationError::BadExtension(session.store.extension().to_string()).into());
    }
    if filename.contains(['/', '\\']) {
        return Err(ValidationError::PathInFilename.into());
    }
    if session.repo.file_exists(filename)? {
        return Err(ValidationError::DuplicateFile.into());
    }

    let now = local_now();
    if let Some(file_id) = session.repo.insert_file(filename, &now, &now)? {
        session.repo.insert_contact(contact, None, None, file_id)?;
    }

    let written = session.store.create_card(filename, contact)?;
    info!(
        "event=contact_create module=ops status=ok file={} written={}",
        filename, written
    );
    Ok(written)
}
