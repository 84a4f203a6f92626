pub mod card;
pub mod config;
pub mod record;

pub use card::*;
pub use config::*;
pub use record::*;
