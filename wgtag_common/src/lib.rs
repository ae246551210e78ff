//! wgtag Common Library
//!
//! This crate provides shared constants and configuration loading utilities
//! for all wgtag workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - File layout constants and scanner limits
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use wgtag_common::consts::CONF_EXTENSION;
//! use wgtag_common::config::{ConfigLoader, WgtagConfig};
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
