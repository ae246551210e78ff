//! Prelude module for common re-exports.
//!
//! ```rust
//! use wgtag_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    load_config, ConfigError, ConfigLoader, ParserSection, SharedConfig, WgtagConfig,
};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{CONF_EXTENSION, DEFAULT_CONFIG_ROOT, MAX_LINE_LEN, PEER_SECTION_MARKER};
