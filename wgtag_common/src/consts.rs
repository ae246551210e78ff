//! Workspace-wide constants for wgtag.
//!
//! Single source of truth for file layout markers, default paths and
//! scanner limits.

/// Canonical service name (used as the default `service_name` and in logs).
pub const SERVICE_NAME: &str = "wgtag";

/// Default WireGuard configuration root.
pub const DEFAULT_CONFIG_ROOT: &str = "/etc/wireguard";

/// Suffix selecting device configuration files. Stripped to form the device name.
pub const CONF_EXTENSION: &str = ".conf";

/// Line prefix that opens a peer section.
pub const PEER_SECTION_MARKER: &str = "[Peer]";

/// Line buffer size in bytes. A line plus its `\n` terminator must fit.
pub const MAX_LINE_LEN: usize = 64 * 1024;
