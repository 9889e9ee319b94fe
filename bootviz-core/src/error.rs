use std::{io, path::PathBuf, process::ExitStatus, time::Duration};

use thiserror::Error;

/// Failure to run the external firmware utility.
///
/// Never retried by this crate; the caller decides whether to invoke again.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("failed to run {}: {source}", utility.display())]
    Spawn {
        utility: PathBuf,
        source: io::Error,
    },
    #[error("{} did not finish within {timeout:?}", utility.display())]
    Timeout {
        utility: PathBuf,
        timeout: Duration,
    },
    /// Non-zero exit, with whatever the utility printed on stderr.
    #[error("{} failed ({status}): {stderr}", utility.display())]
    Failed {
        utility: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

/// Failure to make sense of the utility's enumerate output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The output had no usable `BootCurrent:` line. Without it there is no
    /// way to tell which entry the system booted from, so no entry list is
    /// returned at all rather than a mislabeled one.
    #[error("no BootCurrent line in efibootmgr output")]
    MissingCurrentBoot,
}

/// Failure of [`BootManager::list_entries`](crate::BootManager::list_entries).
#[derive(Error, Debug)]
pub enum ListError {
    #[error(transparent)]
    Invoke(#[from] InvokeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Failure of [`BootManager::apply_order`](crate::BootManager::apply_order).
#[derive(Error, Debug)]
pub enum ApplyError {
    /// A supplied identifier failed format validation. Nothing was committed:
    /// validation runs before any external invocation.
    #[error("invalid boot id {value:?} at position {index}: expected exactly 4 hex digits")]
    InvalidId { index: usize, value: String },
    /// The utility rejected the new order (for example an identifier that is
    /// not in its entry table). The stored order is presumed unchanged.
    #[error(transparent)]
    Commit(#[from] InvokeError),
}
