use clap::Args;
use locked_core::driver::{self, Command, Output};
use locked_core::timer::format_countdown;
use locked_core::{CompletionAction, Config, Database, Event, Mode, SessionEngine, SystemClock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

const HELP: &str = "commands: s start, p pause, r resume, x reset, w work, b rest, \
c continue, k switch, d [mode] <dur>, ? status, q quit";

#[derive(Args)]
pub struct RunArgs {
    /// Mode to start in
    #[arg(long, default_value = "work")]
    mode: Mode,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut engine = SessionEngine::new(SystemClock, db, config.engine_config(args.mode))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    if !args.json {
        eprintln!("{HELP}");
    }

    runtime.block_on(async {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();

        let input = tokio::spawn(read_commands(cmd_tx));
        let printer = async {
            while let Some(output) = out_rx.recv().await {
                print_output(&output, args.json);
            }
        };
        tokio::join!(driver::run(&mut engine, cmd_rx, out_tx), printer);
        input.abort();
    });
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();

    engine.sync_history()?;
    Ok(())
}

async fn read_commands(commands: mpsc::UnboundedSender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "stdin closed");
                break;
            }
        };
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(command)) => {
                if commands.send(command).is_err() {
                    return;
                }
            }
            Err(message) => eprintln!("{message}\n{HELP}"),
        }
    }
    if commands.send(Command::Shutdown).is_err() {
        debug!("driver already stopped");
    }
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let command = match head {
        "s" | "start" => Command::Start,
        "p" | "pause" => Command::Pause,
        "r" | "resume" => Command::Resume,
        "x" | "reset" => Command::Reset,
        "w" | "work" => Command::SwitchMode(Mode::Work),
        "b" | "rest" | "break" => Command::SwitchMode(Mode::Rest),
        "c" | "continue" => Command::Respond(CompletionAction::Continue),
        "k" | "switch" => Command::Respond(CompletionAction::Switch),
        "?" | "status" => Command::Snapshot,
        "q" | "quit" => Command::Shutdown,
        "d" | "duration" => {
            let rest: Vec<&str> = words.collect();
            match rest.as_slice() {
                [input] => Command::SetDuration {
                    mode: None,
                    input: (*input).to_string(),
                },
                [mode, input] => Command::SetDuration {
                    mode: Some(mode.parse().map_err(|e| format!("{e}"))?),
                    input: (*input).to_string(),
                },
                _ => return Err("usage: d [work|rest] <minutes|seconds>s".into()),
            }
        }
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Some(command))
}

fn print_output(output: &Output, json: bool) {
    match output {
        Output::Rejected { error, .. } => eprintln!("error: {error}"),
        Output::Event(event) if json => match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("error: {e}"),
        },
        Output::Event(event) => {
            if let Some(line) = describe(event) {
                println!("{line}");
            }
        }
    }
}

fn describe(event: &Event) -> Option<String> {
    let line = match event {
        Event::SessionStarted {
            mode, duration_secs, ..
        } => format!("{mode} started ({})", format_countdown(*duration_secs)),
        Event::SessionPaused {
            mode,
            time_left_secs,
            credit,
            ..
        } => {
            let logged = credit.as_ref().map_or(0, |c| c.minutes);
            format!(
                "{mode} paused at {} (+{logged}m logged)",
                format_countdown(*time_left_secs)
            )
        }
        Event::SessionResumed {
            mode,
            time_left_secs,
            ..
        } => format!("{mode} resumed at {}", format_countdown(*time_left_secs)),
        Event::SessionReset {
            mode,
            time_left_secs,
            ..
        } => format!("{mode} reset to {}", format_countdown(*time_left_secs)),
        Event::ModeSwitched {
            to, time_left_secs, ..
        } => format!("switched to {to} ({})", format_countdown(*time_left_secs)),
        Event::DurationUpdated {
            mode,
            duration_secs,
            applied,
            ..
        } => {
            let when = if *applied { "now" } else { "from the next run" };
            format!("{mode} duration {} {when}", format_countdown(*duration_secs))
        }
        Event::SessionCompleted { completed_mode, .. } => format!(
            "\x07{completed_mode} session complete: [c]ontinue or switch to {} [k]",
            completed_mode.other()
        ),
        Event::ProgressLogged { .. } => return None,
        Event::StateSnapshot {
            mode,
            state,
            formatted,
            progress_pct,
            awaiting_response,
            ..
        } => {
            let mut line = format!("{mode} {state} {formatted} ({progress_pct:.0}%)");
            if let Some(completed) = awaiting_response {
                line.push_str(&format!(", {completed} finished"));
            }
            line
        }
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_letter_commands() {
        assert_eq!(parse_command("s"), Ok(Some(Command::Start)));
        assert_eq!(parse_command("  p "), Ok(Some(Command::Pause)));
        assert_eq!(parse_command("b"), Ok(Some(Command::SwitchMode(Mode::Rest))));
        assert_eq!(
            parse_command("k"),
            Ok(Some(Command::Respond(CompletionAction::Switch)))
        );
        assert_eq!(parse_command(""), Ok(None));
        assert!(parse_command("z").is_err());
    }

    #[test]
    fn parses_duration_with_optional_mode() {
        assert_eq!(
            parse_command("d 25"),
            Ok(Some(Command::SetDuration {
                mode: None,
                input: "25".into()
            }))
        );
        assert_eq!(
            parse_command("d rest 90s"),
            Ok(Some(Command::SetDuration {
                mode: Some(Mode::Rest),
                input: "90s".into()
            }))
        );
        assert!(parse_command("d").is_err());
        assert!(parse_command("d nap 5").is_err());
    }

    #[test]
    fn snapshot_line_shows_state_and_progress() {
        let snapshot = Event::StateSnapshot {
            mode: Mode::Work,
            state: locked_core::RunState::Paused,
            time_left_secs: 90,
            duration_secs: 120,
            formatted: "01:30".into(),
            progress_pct: 25.0,
            awaiting_response: None,
            at: chrono::Utc::now(),
        };
        assert_eq!(describe(&snapshot).as_deref(), Some("work paused 01:30 (25%)"));
    }
}
