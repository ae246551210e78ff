//! Line patterns recognized inside a device configuration.
//!
//! Two patterns are matched, both as unanchored searches over a trimmed line:
//!
//! | Pattern    | Example                    | Captures          |
//! |------------|----------------------------|-------------------|
//! | tag        | `## tag: role = edge`      | `role`, `edge`    |
//! | public key | `PublicKey = ABC123=`      | `ABC123=`         |
//!
//! Values run greedily to the end of the line and are not trimmed further.
//! Whitespace is `[\t\n\f\r ]` (vertical tab excluded) and name characters
//! are ASCII `[0-9A-Za-z_]`.

use regex::Regex;

/// Tag annotation: `#+ tag: <name> = <value>`.
pub const TAG_PATTERN: &str = r"#+[\t\n\f\r ]*tag:[\t\n\f\r ]*([0-9A-Za-z_]+)[\t\n\f\r ]*=[\t\n\f\r ]*(.+)";

/// Peer key line: `PublicKey = <value>`.
pub const PUBLIC_KEY_PATTERN: &str = r"PublicKey[\t\n\f\r ]*=[\t\n\f\r ]*(.+)";

/// Compiled line patterns, built once per parser.
#[derive(Debug, Clone)]
pub struct LinePatterns {
    tag: Regex,
    public_key: Regex,
}

impl LinePatterns {
    /// Compile both patterns.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            tag: Regex::new(TAG_PATTERN)?,
            public_key: Regex::new(PUBLIC_KEY_PATTERN)?,
        })
    }

    /// Match a tag annotation, returning `(name, value)`.
    pub fn match_tag<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.tag.captures(line)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }

    /// Match a `PublicKey` assignment, returning its value.
    pub fn match_public_key<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = self.public_key.captures(line)?;
        Some(caps.get(1)?.as_str())
    }
}
