/// Display fields of one card, as reported by the card library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSummary {
    /// File name reported by the library (path stripped)
    pub file: String,
    pub name: String,
    /// Birthday text for display, `None` when the card has none
    pub birthday: Option<String>,
    pub anniversary: Option<String>,
    /// Number of optional properties beyond the required ones
    pub other_props: usize,
}

impl CardSummary {
    pub fn birthday_label(&self) -> &str {
        self.birthday.as_deref().unwrap_or("None")
    }

    pub fn anniversary_label(&self) -> &str {
        self.anniversary.as_deref().unwrap_or("None")
    }
}

/// Header fields read straight from a card's text lines (no library involved)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardHeader {
    pub name: Option<String>,
    pub birthday: Option<String>,
    pub anniversary: Option<String>,
}
