/// Create-if-absent schema for the two tables. Safe to run on every connect.
pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS FILE (
    file_id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name TEXT NOT NULL UNIQUE,
    last_modified TEXT,
    creation_time TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS CONTACT (
    contact_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    birthday TEXT NULL,
    anniversary TEXT NULL,
    file_id INTEGER NOT NULL,
    FOREIGN KEY (file_id) REFERENCES FILE(file_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_contact_file_id ON CONTACT(file_id);
";
