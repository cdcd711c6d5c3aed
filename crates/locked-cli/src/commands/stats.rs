use clap::Args;
use locked_core::history::load_history;
use locked_core::stats::combine;
use locked_core::{Clock, Database, History, Mode, StatsReport, SystemClock};

#[derive(Args)]
pub struct StatsArgs {
    /// Only count one mode (default: work and rest combined)
    #[arg(long)]
    mode: Option<Mode>,
}

pub(crate) fn load_selected(
    db: &Database,
    mode: Option<Mode>,
) -> Result<History, Box<dyn std::error::Error>> {
    let modes = match mode {
        Some(mode) => vec![mode],
        None => Mode::ALL.to_vec(),
    };
    let histories = modes
        .into_iter()
        .map(|mode| load_history(db, mode))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(combine(&histories))
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let history = load_selected(&db, args.mode)?;
    let report = StatsReport::build(&history, SystemClock.today());
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
