use log::warn;

use crate::card::CardStore;
use crate::db::RecordRepository;

/// What a logged-in user works against: the connected repository and the
/// card directory. Created when login succeeds, closed on exit.
pub struct Session {
    pub repo: RecordRepository,
    pub store: CardStore,
}

impl Session {
    pub fn new(repo: RecordRepository, store: CardStore) -> Self {
        Session { repo, store }
    }

    /// Sorted file names of the cards the library accepts. An unreadable
    /// directory lists as empty.
    pub fn valid_card_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.store.valid_cards() {
            Ok(cards) => cards.collect(),
            Err(e) => {
                warn!("event=card_list module=session status=error error={}", e);
                Vec::new()
            }
        };
        names.sort();
        names
    }

    /// Close the database connection.
    pub fn close(mut self) {
        self.repo.close();
    }
}
