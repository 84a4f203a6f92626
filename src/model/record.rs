use chrono::NaiveDateTime;

/// Storage/display format for every timestamp column
pub const DB_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Row of the FILE table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub file_id: i64,
    pub file_name: String,
    pub last_modified: Option<NaiveDateTime>,
    pub creation_time: NaiveDateTime,
}

/// Row of the CONTACT table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub contact_id: i64,
    pub name: String,
    pub birthday: Option<NaiveDateTime>,
    pub anniversary: Option<NaiveDateTime>,
    pub file_id: i64,
}

/// A contact joined with its owning file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub contact_id: i64,
    pub name: String,
    pub birthday: Option<NaiveDateTime>,
    pub anniversary: Option<NaiveDateTime>,
    pub file_name: String,
}

/// A contact born in the queried month, with the age derived from the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayRow {
    pub name: String,
    pub birthday: Option<NaiveDateTime>,
    /// Year of the file's last modification minus year of birth
    pub age: Option<i64>,
}

/// Format a timestamp the way the database stores it
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(DB_TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp; anything malformed reads back as absent
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DB_TIMESTAMP_FORMAT).ok()
}
