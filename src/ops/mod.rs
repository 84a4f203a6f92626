pub mod contact_ops;
pub mod report;
pub mod sync;
