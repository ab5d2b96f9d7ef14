//! flagtag - Expiring object flags and the tags that read them
//!
//! Objects own named flags whose values may carry an expiration instant.
//! Tags such as `flag[score]` or `has_flag[temp]` are parsed into attribute
//! chains and dispatched to per-type handlers; failures come back as a null
//! result plus a diagnostic instead of an error.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::FlagTagError;
