//! # ims-cli — Command-Line Front End
//!
//! Provides the `ims` command-line interface over `ims-client` and
//! `ims-linking`.
//!
//! ## Subcommands
//!
//! - `ims documents create` — File one document under several locations and
//!   link the copies.
//! - `ims documents list|get|delete` — Inspect and remove document rows.
//! - `ims links list` — Show where a document is additionally filed.
//! - `ims catalog` — Show categories, subcategories and periodicities.
//!
//! ```bash
//! export IMS_API_TOKEN=... IMS_USER_ID=7 IMS_INCUBATOR_ID=3
//! ims documents create --name "Audit Report" \
//!     --description "Quarterly audit report for board review" \
//!     --category 1 --subcategory 10 --periodicity 2 --also 2:21
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Error, or no document was created |
//! | 2 | Partial: some documents or links failed |
//! | 3 | Submission rejected by validation |

pub mod catalog;
pub mod connection;
pub mod documents;
pub mod links;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_PARTIAL: u8 = 2;
pub const EXIT_INVALID: u8 = 3;
