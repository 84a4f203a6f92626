use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime, Timelike};
use log::{debug, error, info};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};

use super::schema::CREATE_TABLES;
use super::{Credentials, DbError, DbResult};
use crate::model::config::DatabaseConfig;
use crate::model::record::{
    BirthdayRow, ContactRecord, ContactRow, FileRecord, format_timestamp, parse_timestamp,
};

/// Owner of the FILE and CONTACT tables.
#[derive(Default)]
pub struct RecordRepository {
    conn: Option<Connection>,
}

impl RecordRepository {
    /// A repository with no connection; every operation no-ops until `connect`.
    pub fn new() -> Self {
        RecordRepository { conn: None }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the database named by `creds` and make sure both tables exist.
    /// Any previous connection is closed first. On failure the repository
    /// stays disconnected.
    pub fn connect(&mut self, creds: &Credentials, config: &DatabaseConfig) -> DbResult<()> {
        self.close();
        let started_at = Instant::now();
        info!(
            "event=db_connect module=db status=start user={} database={}",
            creds.username, creds.database
        );

        let result = open_file(creds, config);
        match result {
            Ok(conn) => {
                info!(
                    "event=db_connect module=db status=ok duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                self.conn = Some(conn);
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=db_connect module=db status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Connect to a private in-memory database.
    pub fn connect_in_memory(&mut self) -> DbResult<()> {
        self.close();
        let conn = Connection::open_in_memory().map_err(connection_error)?;
        bootstrap(&conn).map_err(connection_error)?;
        self.conn = Some(conn);
        Ok(())
    }

    /// Drop the connection. Safe to call when already disconnected.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, err)) = conn.close() {
                error!("event=db_close module=db status=error error={}", err);
            } else {
                info!("event=db_close module=db status=ok");
            }
        }
    }

    pub fn file_exists(&self, filename: &str) -> DbResult<bool> {
        Ok(self.get_file_id(filename)?.is_some())
    }

    /// Insert a FILE row and return its id.
    pub fn insert_file(
        &self,
        filename: &str,
        last_modified: &NaiveDateTime,
        created_at: &NaiveDateTime,
    ) -> DbResult<Option<i64>> {
        let Some(conn) = &self.conn else {
            return Ok(None);
        };
        conn.execute(
            "INSERT INTO FILE (file_name, last_modified, creation_time) VALUES (?1, ?2, ?3)",
            params![
                filename,
                format_timestamp(last_modified),
                format_timestamp(created_at)
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(
            "event=file_insert module=db status=ok file={} file_id={}",
            filename, id
        );
        Ok(Some(id))
    }

    pub fn get_file_id(&self, filename: &str) -> DbResult<Option<i64>> {
        let Some(conn) = &self.conn else {
            return Ok(None);
        };
        let id = conn
            .query_row(
                "SELECT file_id FROM FILE WHERE file_name = ?1",
                params![filename],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn get_file(&self, filename: &str) -> DbResult<Option<FileRecord>> {
        let Some(conn) = &self.conn else {
            return Ok(None);
        };
        let record = conn
            .query_row(
                "SELECT file_id, file_name, last_modified, creation_time
                 FROM FILE WHERE file_name = ?1",
                params![filename],
                |row| {
                    let created: String = row.get("creation_time")?;
                    Ok((
                        row.get::<_, i64>("file_id")?,
                        row.get::<_, String>("file_name")?,
                        opt_timestamp(row, "last_modified")?,
                        created,
                    ))
                },
            )
            .optional()?;
        Ok(record.and_then(|(file_id, file_name, last_modified, created)| {
            Some(FileRecord {
                file_id,
                file_name,
                last_modified,
                creation_time: parse_timestamp(&created)?,
            })
        }))
    }

    /// Insert the CONTACT row owned by `file_id` and return its id.
    pub fn insert_contact(
        &self,
        name: &str,
        birthday: Option<&NaiveDateTime>,
        anniversary: Option<&NaiveDateTime>,
        file_id: i64,
    ) -> DbResult<Option<i64>> {
        let Some(conn) = &self.conn else {
            return Ok(None);
        };
        conn.execute(
            "INSERT INTO CONTACT (name, birthday, anniversary, file_id) VALUES (?1, ?2, ?3, ?4)",
            params![
                name,
                birthday.map(format_timestamp),
                anniversary.map(format_timestamp),
                file_id
            ],
        )?;
        Ok(Some(conn.last_insert_rowid()))
    }

    pub fn contact_for_file(&self, file_id: i64) -> DbResult<Option<ContactRecord>> {
        let Some(conn) = &self.conn else {
            return Ok(None);
        };
        let record = conn
            .query_row(
                "SELECT contact_id, name, birthday, anniversary, file_id
                 FROM CONTACT WHERE file_id = ?1",
                params![file_id],
                |row| {
                    Ok(ContactRecord {
                        contact_id: row.get("contact_id")?,
                        name: row.get("name")?,
                        birthday: opt_timestamp(row, "birthday")?,
                        anniversary: opt_timestamp(row, "anniversary")?,
                        file_id: row.get("file_id")?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Returns the number of rows changed.
    pub fn update_contact_name(&self, file_id: i64, new_name: &str) -> DbResult<usize> {
        let Some(conn) = &self.conn else {
            return Ok(0);
        };
        let changed = conn.execute(
            "UPDATE CONTACT SET name = ?1 WHERE file_id = ?2",
            params![new_name, file_id],
        )?;
        Ok(changed)
    }

    /// Set the file's last-modified time to now. Returns the number of rows changed.
    pub fn touch_file_modified(&self, filename: &str) -> DbResult<usize> {
        let Some(conn) = &self.conn else {
            return Ok(0);
        };
        let changed = conn.execute(
            "UPDATE FILE SET last_modified = ?1 WHERE file_name = ?2",
            params![format_timestamp(&local_now()), filename],
        )?;
        Ok(changed)
    }

    /// Every contact with its file, ordered by contact name then file name.
    pub fn all_contacts(&self) -> DbResult<Vec<ContactRow>> {
        let Some(conn) = &self.conn else {
            return Ok(Vec::new());
        };
        let mut stmt = conn.prepare(
            "SELECT CONTACT.contact_id, CONTACT.name, CONTACT.birthday, CONTACT.anniversary,
                    FILE.file_name
             FROM CONTACT
             JOIN FILE ON CONTACT.file_id = FILE.file_id
             ORDER BY CONTACT.name, FILE.file_name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ContactRow {
                contact_id: row.get("contact_id")?,
                name: row.get("name")?,
                birthday: opt_timestamp(row, "birthday")?,
                anniversary: opt_timestamp(row, "anniversary")?,
                file_name: row.get("file_name")?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Contacts whose birthday falls in `month` (1-12), oldest first. Age is
    /// the year of the file's last modification minus the birth year.
    pub fn contacts_born_in_month(&self, month: u32) -> DbResult<Vec<BirthdayRow>> {
        let Some(conn) = &self.conn else {
            return Ok(Vec::new());
        };
        let mut stmt = conn.prepare(
            "SELECT CONTACT.name, CONTACT.birthday,
                    (CAST(strftime('%Y', FILE.last_modified) AS INTEGER)
                     - CAST(strftime('%Y', CONTACT.birthday) AS INTEGER)) AS age
             FROM CONTACT
             JOIN FILE ON CONTACT.file_id = FILE.file_id
             WHERE CAST(strftime('%m', CONTACT.birthday) AS INTEGER) = ?1
             ORDER BY age DESC, CONTACT.name",
        )?;
        let rows = stmt.query_map(params![month], |row| {
            Ok(BirthdayRow {
                name: row.get("name")?,
                birthday: opt_timestamp(row, "birthday")?,
                age: row.get("age")?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Remove a FILE row; its CONTACT row goes with it.
    pub fn delete_file(&self, filename: &str) -> DbResult<usize> {
        let Some(conn) = &self.conn else {
            return Ok(0);
        };
        Ok(conn.execute("DELETE FROM FILE WHERE file_name = ?1", params![filename])?)
    }

    pub fn count_files(&self) -> DbResult<usize> {
        self.count("SELECT COUNT(*) FROM FILE")
    }

    pub fn count_contacts(&self) -> DbResult<usize> {
        self.count("SELECT COUNT(*) FROM CONTACT")
    }

    fn count(&self, sql: &str) -> DbResult<usize> {
        let Some(conn) = &self.conn else {
            return Ok(0);
        };
        let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }
}

/// Local wall-clock time at second precision, the resolution stored in the tables.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn open_file(creds: &Credentials, config: &DatabaseConfig) -> DbResult<Connection> {
    let path = creds.database_path(&config.data_dir)?;

    let flags = if config.create_if_missing {
        std::fs::create_dir_all(&config.data_dir).map_err(|e| {
            DbError::Connection(format!(
                "could not create {}: {}",
                config.data_dir.display(),
                e
            ))
        })?;
        OpenFlags::default()
    } else {
        if !path.exists() {
            return Err(DbError::Connection(format!(
                "unknown database '{}'",
                creds.database.trim()
            )));
        }
        OpenFlags::default().difference(OpenFlags::SQLITE_OPEN_CREATE)
    };

    let conn = Connection::open_with_flags(&path, flags).map_err(connection_error)?;
    bootstrap(&conn).map_err(connection_error)?;
    Ok(conn)
}

fn bootstrap(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn connection_error(err: rusqlite::Error) -> DbError {
    DbError::Connection(err.to_string())
}

fn opt_timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<NaiveDateTime>> {
    let text: Option<String> = row.get(column)?;
    Ok(text.as_deref().and_then(parse_timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn memory_repo() -> RecordRepository {
        let mut repo = RecordRepository::new();
        repo.connect_in_memory().unwrap();
        repo
    }

    fn add(
        repo: &RecordRepository,
        file: &str,
        name: &str,
        bday: Option<NaiveDateTime>,
        modified: NaiveDateTime,
    ) -> i64 {
        let id = repo
            .insert_file(file, &modified, &modified)
            .unwrap()
            .unwrap();
        repo.insert_contact(name, bday.as_ref(), None, id).unwrap();
        id
    }

    fn creds(database: &str) -> Credentials {
        Credentials {
            host: "localhost".into(),
            username: "tester".into(),
            password: "pw".into(),
            database: database.into(),
        }
    }

    #[test]
    fn disconnected_operations_are_noops() {
        let repo = RecordRepository::new();
        let now = ts(2024, 1, 1);
        assert!(!repo.is_connected());
        assert!(!repo.file_exists("a.vcf").unwrap());
        assert_eq!(repo.insert_file("a.vcf", &now, &now).unwrap(), None);
        assert_eq!(repo.get_file_id("a.vcf").unwrap(), None);
        assert_eq!(repo.insert_contact("A", None, None, 1).unwrap(), None);
        assert_eq!(repo.update_contact_name(1, "B").unwrap(), 0);
        assert_eq!(repo.touch_file_modified("a.vcf").unwrap(), 0);
        assert!(repo.all_contacts().unwrap().is_empty());
        assert!(repo.contacts_born_in_month(6).unwrap().is_empty());
    }

    #[test]
    fn file_names_are_unique() {
        let repo = memory_repo();
        let now = ts(2024, 1, 1);
        repo.insert_file("a.vcf", &now, &now).unwrap();
        let err = repo.insert_file("a.vcf", &now, &now).unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
        assert_eq!(repo.count_files().unwrap(), 1);
    }

    #[test]
    fn deleting_a_file_cascades_to_its_contact() {
        let repo = memory_repo();
        add(&repo, "a.vcf", "Alice", None, ts(2024, 1, 1));
        assert_eq!(repo.count_contacts().unwrap(), 1);
        assert_eq!(repo.delete_file("a.vcf").unwrap(), 1);
        assert_eq!(repo.count_contacts().unwrap(), 0);
    }

    #[test]
    fn contacts_are_ordered_by_name_then_file() {
        let repo = memory_repo();
        let now = ts(2024, 1, 1);
        add(&repo, "z.vcf", "Bob", None, now);
        add(&repo, "b.vcf", "Alice", None, now);
        add(&repo, "a.vcf", "Bob", None, now);

        let rows = repo.all_contacts().unwrap();
        let order: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.name.as_str(), r.file_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("Alice", "b.vcf"), ("Bob", "a.vcf"), ("Bob", "z.vcf")]
        );
    }

    #[test]
    fn birthdays_in_month_with_age_descending() {
        let repo = memory_repo();
        add(&repo, "young.vcf", "Young", Some(ts(2000, 6, 15)), ts(2024, 3, 1));
        add(&repo, "old.vcf", "Old", Some(ts(1950, 6, 1)), ts(2024, 3, 1));
        add(&repo, "july.vcf", "July", Some(ts(1980, 7, 4)), ts(2024, 3, 1));
        add(&repo, "none.vcf", "Nobody", None, ts(2024, 3, 1));

        let rows = repo.contacts_born_in_month(6).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Old");
        assert_eq!(rows[0].age, Some(74));
        assert_eq!(rows[1].name, "Young");
        assert_eq!(rows[1].age, Some(24));
        assert_eq!(rows[1].birthday, Some(ts(2000, 6, 15)));
    }

    #[test]
    fn rename_and_touch_update_rows() {
        let repo = memory_repo();
        let id = add(&repo, "a.vcf", "Alice", None, ts(2001, 1, 1));

        assert_eq!(repo.touch_file_modified("a.vcf").unwrap(), 1);
        assert_eq!(repo.update_contact_name(id, "Alicia").unwrap(), 1);

        let file = repo.get_file("a.vcf").unwrap().unwrap();
        assert!(file.last_modified.unwrap() > ts(2001, 1, 1));
        assert_eq!(file.creation_time, ts(2001, 1, 1));
        assert_eq!(repo.contact_for_file(id).unwrap().unwrap().name, "Alicia");
    }

    #[test]
    fn connect_creates_schema_idempotently_on_disk() {
        let tmp = TempDir::new().unwrap();
        let config = DatabaseConfig {
            host: "localhost".into(),
            data_dir: tmp.path().to_path_buf(),
            create_if_missing: true,
        };

        let mut repo = RecordRepository::new();
        repo.connect(&creds("book"), &config).unwrap();
        add(&repo, "a.vcf", "Alice", None, ts(2024, 1, 1));
        repo.close();
        assert!(!repo.is_connected());

        repo.connect(&creds("book"), &config).unwrap();
        assert_eq!(repo.count_files().unwrap(), 1);
        assert!(tmp.path().join("book.sqlite3").exists());
    }

    #[test]
    fn missing_database_without_create_is_a_connection_error() {
        let tmp = TempDir::new().unwrap();
        let config = DatabaseConfig {
            host: "localhost".into(),
            data_dir: tmp.path().to_path_buf(),
            create_if_missing: false,
        };
        let mut repo = RecordRepository::new();
        let err = repo.connect(&creds("absent"), &config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Database connection error: unknown database 'absent'"
        );
        assert!(!repo.is_connected());
    }
}
