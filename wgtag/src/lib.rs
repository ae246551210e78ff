//! # wgtag Library
//!
//! Extracts operator-supplied peer tags from a tree of WireGuard
//! configuration files, for enriching per-peer metrics with labels.
//!
//! # Module Structure
//!
//! - [`parser`] - ConfigParser, directory walk and per-file state machine
//! - [`patterns`] - Tag and `PublicKey` line patterns
//! - [`scanner`] - Bounded line reader
//! - [`tags`] - Result mapping and label enrichment
//! - [`error`] - Error types
//!
//! # Usage
//!
//! ```rust,no_run
//! use wgtag::ConfigParser;
//!
//! let mut parser = ConfigParser::with_root("/etc/wireguard")?;
//! parser.parse()?;
//! if let Some(tags) = parser.tags().peer_tags("wg0", "xTIBA5rboUvnH4htodjb6e697QjLERt1NAB4mZqp8Dg=") {
//!     println!("{tags:?}");
//! }
//! # Ok::<(), wgtag::ParseError>(())
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod parser;
pub mod patterns;
pub mod scanner;
pub mod tags;

// Re-export key types for convenience
pub use crate::error::{ParseError, ParseResult, ScanError};
pub use crate::parser::ConfigParser;
pub use crate::tags::{DeviceTags, ExtraTags, TagSet};
