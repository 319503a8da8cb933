pub mod extraction;
pub mod identification;
pub mod providers;

pub use identification::MovieIdentifier;
