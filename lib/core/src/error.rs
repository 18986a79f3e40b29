//! Shared result type.
//!
//! Fallible operations across the workspace return their crate's error enum
//! wrapped in a rootcause `Report`; this alias spells that once.

use rootcause::Report;

/// `Result` whose error is a `Report` carrying context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
