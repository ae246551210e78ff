//! WireGuard configuration tree parser.
//!
//! Walks a configuration root, treats every `*.conf` file as one device and
//! collects the `# tag: name = value` annotations attached to each peer's
//! `PublicKey`.
//!
//! # File format
//!
//! ```text
//! [Peer]
//! # tag: role = edge
//! ## tag: site = fra1
//! PublicKey = xTIBA5rboUvnH4htodjb6e697QjLERt1NAB4mZqp8Dg=
//! AllowedIPs = 10.0.0.2/32
//! ```
//!
//! Tags and the key may appear in any order inside a peer block. The pending
//! key and tags are recorded at the next `[Peer]` line or at end of file, but
//! only once both a key and at least one tag have been seen. Until then they
//! stay pending across `[Peer]` lines.

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::mem;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};
use walkdir::WalkDir;
use wgtag_common::prelude::{ParserSection, CONF_EXTENSION, PEER_SECTION_MARKER};

use crate::error::{ParseError, ParseResult};
use crate::patterns::LinePatterns;
use crate::scanner::LineScanner;
use crate::tags::{ExtraTags, TagSet};

/// Parses a directory of WireGuard configs into [`ExtraTags`].
///
/// Each call to [`parse`](Self::parse) rebuilds the mapping from scratch.
#[derive(Debug)]
pub struct ConfigParser {
    /// Config root directory, typically `/etc/wireguard`
    root: PathBuf,
    /// Longest accepted line in bytes
    max_line_len: usize,
    /// Compiled tag and key patterns
    patterns: LinePatterns,
    /// Result of the last successful parse
    tags: ExtraTags,
}

impl ConfigParser {
    /// Create a parser from the `[parser]` config section.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidConfig` if the section fails validation.
    pub fn new(config: ParserSection) -> ParseResult<Self> {
        config.validate()?;

        Ok(Self {
            root: config.root,
            max_line_len: config.max_line_len,
            patterns: LinePatterns::new()?,
            tags: ExtraTags::new(),
        })
    }

    /// Create a parser for `root` with default limits.
    pub fn with_root(root: impl Into<PathBuf>) -> ParseResult<Self> {
        Self::new(ParserSection {
            root: root.into(),
            ..ParserSection::default()
        })
    }

    /// Configured root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Mapping built by the last successful [`parse`](Self::parse).
    pub fn tags(&self) -> &ExtraTags {
        &self.tags
    }

    /// Consume the parser, returning its mapping.
    pub fn into_tags(self) -> ExtraTags {
        self.tags
    }

    /// Walk the root directory and rebuild the tag mapping.
    ///
    /// Files are visited in file-name order. The first walk, open or scan
    /// failure aborts the parse; the mapping is then left empty.
    pub fn parse(&mut self) -> ParseResult<()> {
        self.tags = ExtraTags::new();
        let mut tags = ExtraTags::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| ParseError::Walk {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                source,
            })?;

            if entry.file_type().is_dir() {
                continue;
            }
            let Some(device) = device_name(entry.file_name()) else {
                trace!("Skipping {:?}", entry.path());
                continue;
            };
            self.parse_file(&mut tags, &device, entry.path())?;
        }

        info!(
            "Parsed {} devices with {} tagged peers under {:?}",
            tags.device_count(),
            tags.peer_count(),
            self.root
        );
        self.tags = tags;
        Ok(())
    }

    /// Scan one device file into `tags`.
    fn parse_file(&self, tags: &mut ExtraTags, device: &str, path: &Path) -> ParseResult<()> {
        let file = File::open(path).map_err(|source| ParseError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scanner = LineScanner::new(BufReader::new(file), self.max_line_len);

        tags.reset_device(device);
        let mut pending = PendingPeer::default();
        let mut committed = 0;

        while let Some(line) = scanner.next_line().map_err(|source| ParseError::Scan {
            path: path.to_path_buf(),
            source,
        })? {
            let line = line.trim();

            if line.starts_with(PEER_SECTION_MARKER) {
                if pending.commit_into(tags, device) {
                    committed += 1;
                }
                continue;
            }

            if let Some((name, value)) = self.patterns.match_tag(line) {
                pending.observe_tag(name, value);
            }
            if let Some(key) = self.patterns.match_public_key(line) {
                pending.observe_key(key);
            }
        }
        if pending.commit_into(tags, device) {
            committed += 1;
        } else if !pending.is_empty() {
            trace!(
                "Device {}: dropping incomplete peer (key={:?}, {} tags)",
                device,
                pending.key,
                pending.tags.len()
            );
        }

        debug!(
            "Device {}: {} tagged peers from {} lines ({:?})",
            device,
            committed,
            scanner.line_number(),
            path
        );
        Ok(())
    }
}

/// Device name for a config file name, or `None` if it is not a `.conf` file.
pub fn device_name(file_name: &OsStr) -> Option<String> {
    file_name
        .to_string_lossy()
        .strip_suffix(CONF_EXTENSION)
        .map(str::to_string)
}

/// Key and tags gathered since the last commit point.
///
/// Empty key and empty tags is the "no pending pair" state.
#[derive(Debug, Default)]
struct PendingPeer {
    key: String,
    tags: TagSet,
}

impl PendingPeer {
    /// Set or overwrite a tag.
    fn observe_tag(&mut self, name: &str, value: &str) {
        self.tags.insert(name.to_string(), value.to_string());
    }

    /// Set the key; an earlier uncommitted key is discarded.
    fn observe_key(&mut self, key: &str) {
        if !self.key.is_empty() {
            trace!("Discarding uncommitted key {}", self.key);
        }
        self.key = key.to_string();
    }

    /// True in the "no pending pair" state.
    fn is_empty(&self) -> bool {
        self.key.is_empty() && self.tags.is_empty()
    }

    /// Record and reset the pair if both halves are present.
    ///
    /// An incomplete pair is left pending. Returns whether the pair was
    /// recorded.
    fn commit_into(&mut self, out: &mut ExtraTags, device: &str) -> bool {
        if self.key.is_empty() || self.tags.is_empty() {
            return false;
        }

        out.insert_peer(device, mem::take(&mut self.key), mem::take(&mut self.tags));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse_one(content: &str) -> ExtraTags {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("wg0.conf"), content).unwrap();
        let mut parser = ConfigParser::with_root(tmp.path()).unwrap();
        parser.parse().unwrap();
        parser.into_tags()
    }

    fn peers(tags: &ExtraTags) -> Vec<(&str, Vec<(&str, &str)>)> {
        tags.device("wg0")
            .unwrap()
            .iter()
            .map(|(key, set)| {
                (
                    key.as_str(),
                    set.iter().map(|(n, v)| (n.as_str(), v.as_str())).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn device_name_strips_extension() {
        assert_eq!(device_name(OsStr::new("wg0.conf")), Some("wg0".to_string()));
        assert_eq!(device_name(OsStr::new("wg0.conf.bak")), None);
        assert_eq!(device_name(OsStr::new("wg0")), None);
        assert_eq!(device_name(OsStr::new("a.b.conf")), Some("a.b".to_string()));
    }

    #[test]
    fn tag_after_key_in_same_block() {
        let tags = parse_one("[Peer]\nPublicKey = K1\n# tag: role = edge\n");
        assert_eq!(peers(&tags), vec![("K1", vec![("role", "edge")])]);
    }

    #[test]
    fn tags_before_key_across_blocks() {
        let tags = parse_one(
            "[Interface]\nPrivateKey = secret\n\n\
             [Peer]\n# tag: role = edge\n# tag: site = fra1\nPublicKey = K1\n\n\
             [Peer]\n# tag: role = core\nPublicKey = K2\n",
        );
        assert_eq!(
            peers(&tags),
            vec![
                ("K1", vec![("role", "edge"), ("site", "fra1")]),
                ("K2", vec![("role", "core")]),
            ]
        );
    }

    #[test]
    fn incomplete_block_carries_into_next_block() {
        let tags = parse_one("[Peer]\n# tag: role = edge\n[Peer]\nPublicKey = K1\n");
        assert_eq!(peers(&tags), vec![("K1", vec![("role", "edge")])]);

        let tags = parse_one("[Peer]\nPublicKey = K1\n[Peer]\n# tag: role = edge\n");
        assert_eq!(peers(&tags), vec![("K1", vec![("role", "edge")])]);
    }

    #[test]
    fn incomplete_pair_dropped_at_end_of_file() {
        let tags = parse_one("[Peer]\n# tag: role = orphan\n[Peer]\n[Peer]\n");
        assert!(peers(&tags).is_empty());
    }

    #[test]
    fn second_key_in_block_wins() {
        let tags = parse_one("[Peer]\n# tag: a = 1\nPublicKey = OLD\nPublicKey = NEW\n");
        assert_eq!(peers(&tags), vec![("NEW", vec![("a", "1")])]);
    }

    #[test]
    fn indented_lines_are_trimmed() {
        let tags = parse_one("  [Peer]  \n\t# tag: role = edge   \n  PublicKey = K1  \r\n");
        assert_eq!(peers(&tags), vec![("K1", vec![("role", "edge")])]);
    }

    #[test]
    fn marker_with_trailing_text_still_delimits() {
        let tags = parse_one("# tag: a = 1\nPublicKey = K1\n[Peer] # second\n# tag: b = 2\n");
        assert_eq!(peers(&tags), vec![("K1", vec![("a", "1")])]);
    }

    #[test]
    fn commit_resets_state() {
        let mut out = ExtraTags::new();
        let mut pending = PendingPeer::default();
        pending.observe_key("K");
        pending.observe_tag("a", "1");
        assert!(pending.commit_into(&mut out, "wg0"));
        assert!(pending.is_empty());
        assert!(!pending.commit_into(&mut out, "wg0"));
        assert_eq!(out.peer_count(), 1);
    }

    #[test]
    fn incomplete_pair_stays_pending() {
        let mut out = ExtraTags::new();
        let mut pending = PendingPeer::default();
        pending.observe_tag("a", "1");
        assert!(!pending.commit_into(&mut out, "wg0"));
        assert!(!pending.is_empty());

        pending.observe_key("K");
        assert!(pending.commit_into(&mut out, "wg0"));
        assert_eq!(out.peer_tags("wg0", "K").unwrap()["a"], "1");
    }

    #[test]
    fn invalid_config_rejected() {
        let result = ConfigParser::new(ParserSection {
            root: PathBuf::from("/tmp"),
            max_line_len: 0,
        });
        assert!(matches!(result, Err(ParseError::InvalidConfig(_))));
    }
}
