use std::collections::BTreeMap;

use clap::Args;
use locked_core::history::load_history;
use locked_core::{Database, Mode};

#[derive(Args)]
pub struct HistoryArgs {
    /// Print a single mode's ledger
    #[arg(long)]
    mode: Option<Mode>,
}

pub fn run(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match args.mode {
        Some(mode) => {
            let history = load_history(&db, mode)?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
        None => {
            let mut all = BTreeMap::new();
            for mode in Mode::ALL {
                all.insert(mode, load_history(&db, mode)?);
            }
            println!("{}", serde_json::to_string_pretty(&all)?);
        }
    }
    Ok(())
}
