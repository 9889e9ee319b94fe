//! Core logic for managing UEFI boot entries through `efibootmgr`.
//!
//! The firmware's boot entry table is only reachable through a privileged
//! command line utility with loosely specified text output. This crate turns
//! that output into a typed model, validates the 4-hex-digit identifiers the
//! firmware requires, and commits a new boot order as a whole.
//!
//! Presentation layers talk to [`BootManager`], which exposes exactly two
//! operations: [`BootManager::list_entries`] and [`BootManager::apply_order`].
//! Each call is one fresh, blocking invocation of the utility; nothing is
//! cached between calls.

pub mod error;
pub mod id;
pub mod invoke;
pub mod manager;
pub mod order;
pub mod parse;

pub use error::{ApplyError, InvokeError, ListError, ParseError};
pub use id::{BootId, InvalidBootId};
pub use invoke::{Efibootmgr, Invoker};
pub use manager::BootManager;
pub use order::BootOrder;
pub use parse::{parse_entries, BootEntry, BootInfo};
