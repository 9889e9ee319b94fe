use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Result};
use bootviz_core::{BootId, BootInfo, BootManager, BootOrder, Efibootmgr, Invoker};
use clap::{Parser, Subcommand};

/// Command line arguments for bootviz.
#[derive(Parser, Debug)]
#[clap(version, about = "Inspect and reorder UEFI boot entries")]
struct Options {
    /// Path of the efibootmgr binary.
    #[clap(long, default_value = "/usr/sbin/efibootmgr")]
    efibootmgr: PathBuf,

    /// Elevation command used to run it.
    #[clap(long, default_value = "pkexec")]
    elevate: PathBuf,

    /// Run efibootmgr directly, without elevation (when already root).
    #[clap(long)]
    no_elevate: bool,

    /// Give up if the utility does not finish within this many seconds.
    /// Unset by default so an interactive privilege prompt can wait.
    #[clap(long)]
    timeout: Option<u64>,

    #[clap(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the boot entries and the firmware's stored order.
    List {
        /// Emit the snapshot as JSON instead of a table.
        #[clap(long)]
        json: bool,
    },
    /// Replace the boot order with the given ids.
    SetOrder {
        #[clap(required = true)]
        ids: Vec<String>,
    },
    /// Move an entry one position earlier in the boot order.
    MoveUp { id: String },
    /// Move an entry one position later in the boot order.
    MoveDown { id: String },
    /// Insert an entry into the boot order.
    Add {
        id: String,
        /// Position to insert at; appended at the end when omitted.
        #[clap(long)]
        at: Option<usize>,
    },
    /// Drop an entry from the boot order. The entry itself is kept.
    Remove { id: String },
}

fn print_table(info: &BootInfo) {
    println!("{:<6} {:<7} {:<8} DESCRIPTION", "ID", "ACTIVE", "DEFAULT");
    for entry in &info.entries {
        println!(
            "{:<6} {:<7} {:<8} {}",
            entry.id.to_string(),
            if entry.active { "yes" } else { "no" },
            if entry.is_default { "yes" } else { "no" },
            entry.description,
        );
    }
    if let Some(order) = &info.firmware_order {
        let order: Vec<_> = order.iter().map(BootId::to_string).collect();
        println!();
        println!("firmware order: {}", order.join(","));
    }
}

/// Fetches a fresh snapshot, applies `edit` to its order, and commits.
fn edit_order<I: Invoker>(
    manager: &BootManager<I>,
    id: &str,
    edit: impl FnOnce(&mut BootOrder, usize) -> Result<()>,
) -> Result<()> {
    let id: BootId = id.parse()?;
    let info = manager.list_entries()?;
    let mut order = BootOrder::from_entries(&info.entries);
    let Some(index) = order.position(id) else {
        bail!("no boot entry {id} in the current entry table");
    };
    edit(&mut order, index)?;
    log::info!("Committing boot order {}", order.to_arg());
    manager.apply(&order)?;
    println!("boot order updated: {}", order.to_arg());
    Ok(())
}

/// Fetches a fresh snapshot and commits it with `id` inserted at `at`, or
/// appended when `at` is omitted.
fn add_to_order<I: Invoker>(manager: &BootManager<I>, id: &str, at: Option<usize>) -> Result<()> {
    let id: BootId = id.parse()?;
    let info = manager.list_entries()?;
    let mut order = BootOrder::from_entries(&info.entries);
    if order.position(id).is_some() {
        log::warn!("Entry {id} is already in the boot order; adding it again");
    }
    let index = at.unwrap_or(order.len());
    if index > order.len() {
        bail!(
            "position {index} is past the end of the boot order ({} entries)",
            order.len()
        );
    }
    order.insert(index, id);
    log::info!("Committing boot order {}", order.to_arg());
    manager.apply(&order)?;
    println!("boot order updated: {}", order.to_arg());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let options = Options::parse();

    let mut invoker = Efibootmgr::new().with_utility(&options.efibootmgr);
    invoker = if options.no_elevate {
        invoker.with_elevation(None)
    } else {
        invoker.with_elevation(Some(options.elevate.clone()))
    };
    if let Some(secs) = options.timeout {
        invoker = invoker.with_timeout(Duration::from_secs(secs));
    }
    let manager = BootManager::new(invoker);

    match &options.command {
        Cmd::List { json } => {
            let info = manager.list_entries()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_table(&info);
            }
        }
        Cmd::SetOrder { ids } => {
            manager.apply_order(ids)?;
            println!("boot order updated");
        }
        Cmd::MoveUp { id } => edit_order(&manager, id, |order, index| {
            if !order.move_up(index) {
                bail!("entry is already first in the boot order");
            }
            Ok(())
        })?,
        Cmd::MoveDown { id } => edit_order(&manager, id, |order, index| {
            if !order.move_down(index) {
                bail!("entry is already last in the boot order");
            }
            Ok(())
        })?,
        Cmd::Add { id, at } => add_to_order(&manager, id, *at)?,
        Cmd::Remove { id } => edit_order(&manager, id, |order, index| {
            order.remove(index);
            Ok(())
        })?,
    }

    Ok(())
}
