use clap::Args;
use locked_core::stats::{format_minutes, intensity, week_heatmap, HeatmapRow};
use locked_core::{Clock, Database, Mode, SystemClock};

use super::stats::load_selected;

const SHADES: [char; 5] = ['·', '░', '▒', '▓', '█'];

#[derive(Args)]
pub struct HeatmapArgs {
    /// Only count one mode (default: work and rest combined)
    #[arg(long)]
    mode: Option<Mode>,
    /// Print rows as JSON instead of a grid
    #[arg(long)]
    json: bool,
}

pub fn run(args: HeatmapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let history = load_selected(&db, args.mode)?;
    let rows = week_heatmap(&history, SystemClock.today());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!("          0     3     6     9     12    15    18    21");
    for row in &rows {
        println!("{}", render_row(row));
    }
    Ok(())
}

fn render_row(row: &HeatmapRow) -> String {
    let cells: String = row
        .cells
        .iter()
        .map(|&m| SHADES[usize::from(intensity(m))])
        .collect();
    format!(
        "{} {cells} {}",
        row.date.format("%a %m-%d"),
        format_minutes(row.total())
    )
}
