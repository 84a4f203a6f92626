//! vcm: a terminal manager for a directory of vCard files, kept in step with
//! a small contacts database.

pub mod card;
pub mod cli;
pub mod db;
pub mod io;
pub mod model;
pub mod ops;
pub mod session;
pub mod tui;
pub mod util;
