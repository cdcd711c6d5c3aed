use clap::Args;
use locked_core::timer::{format_countdown, parse_duration_input};
use locked_core::{Config, Mode};

#[derive(Args)]
pub struct DurationArgs {
    /// work or rest
    mode: Mode,
    /// Minutes (`45`) or seconds with an `s` suffix (`90s`)
    input: String,
}

pub fn run(args: DurationArgs) -> Result<(), Box<dyn std::error::Error>> {
    let secs = parse_duration_input(&args.input)?;
    let key = match args.mode {
        Mode::Work => "timer.work_duration_secs",
        Mode::Rest => "timer.rest_duration_secs",
    };

    let mut config = Config::load()?;
    config.set(key, &secs.to_string())?;
    config.save()?;
    println!("{} duration set to {}", args.mode, format_countdown(secs));
    Ok(())
}
