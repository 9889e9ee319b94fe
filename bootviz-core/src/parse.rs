use serde::{Deserialize, Serialize};

use crate::{error::ParseError, id::BootId};

/// One boot entry as reported by the firmware utility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootEntry {
    pub id: BootId,
    /// Firmware-defined free text; may be empty.
    pub description: String,
    /// Whether the firmware marks the entry as enabled (the `*` suffix).
    pub active: bool,
    /// Whether this is the entry the system booted from (`BootCurrent`).
    pub is_default: bool,
}

/// A snapshot of the firmware's boot entry table.
///
/// `entries` keeps the order in which the utility printed the entry lines;
/// that is the order reorder operations work on. `firmware_order` is the
/// utility's `BootOrder:` line, kept for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootInfo {
    pub entries: Vec<BootEntry>,
    /// The entry the system booted from in this session.
    pub current: BootId,
    pub firmware_order: Option<Vec<BootId>>,
}

/// Parses the enumerate output of `efibootmgr`.
///
/// The scan is line oriented and does not assume any ordering between the
/// `BootCurrent:` line, the `BootOrder:` line and the entry lines; the
/// `is_default` flags are computed after the whole output has been read.
/// Entry lines with an identifier that is not exactly 4 hex digits are
/// skipped with a warning, never silently accepted.
///
/// # Errors
///
/// Fails with [`ParseError::MissingCurrentBoot`] if no usable `BootCurrent:`
/// line is present; no partial entry list is returned in that case.
pub fn parse_entries(raw: &str) -> Result<BootInfo, ParseError> {
    let mut entries: Vec<BootEntry> = Vec::new();
    let mut current: Option<BootId> = None;
    let mut firmware_order: Option<Vec<BootId>> = None;

    for line in raw.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix("BootCurrent:") {
            match rest.split_whitespace().next().map(str::parse) {
                Some(Ok(id)) => current = Some(id),
                Some(Err(err)) => log::warn!("Unusable BootCurrent line {line:?}: {err}"),
                None => log::warn!("Unusable BootCurrent line {line:?}"),
            }
        } else if let Some(rest) = line.strip_prefix("BootOrder:") {
            let ids = rest
                .split(',')
                .map(str::trim)
                .filter_map(|token| match token.parse() {
                    Ok(id) => Some(id),
                    Err(err) => {
                        log::warn!("Skipping malformed id in BootOrder line: {err}");
                        None
                    }
                })
                .collect();
            firmware_order = Some(ids);
        } else if line.starts_with("BootNext:") {
            // Boot-next is out of scope; ignore rather than warn.
        } else if let Some(rest) = line.strip_prefix("Boot") {
            // Entry lines look like `Boot0000* opensuse` or
            // `Boot0001  Windows Boot Manager` (the separator is often a tab).
            let (token, description) = rest
                .split_once(|c: char| c.is_whitespace())
                .unwrap_or((rest, ""));
            let (token, active) = match token.strip_suffix('*') {
                Some(token) => (token, true),
                None => (token, false),
            };
            match token.parse() {
                Ok(id) => entries.push(BootEntry {
                    id,
                    description: description.trim().to_string(),
                    active,
                    is_default: false,
                }),
                Err(err) => log::warn!("Skipping malformed boot entry line {line:?}: {err}"),
            }
        }
    }

    let current = current.ok_or(ParseError::MissingCurrentBoot)?;
    for entry in &mut entries {
        entry.is_default = entry.id == current;
    }

    Ok(BootInfo {
        entries,
        current,
        firmware_order,
    })
}
