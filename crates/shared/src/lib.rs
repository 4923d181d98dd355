pub mod datetime;
pub mod domain;
pub mod error;
pub mod protocol;
