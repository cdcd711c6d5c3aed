use clap::Subcommand;
use locked_core::{Database, Theme};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Flip between dark and light
    Toggle,
}

pub fn run(action: Option<ThemeAction>) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let theme = match action {
        Some(ThemeAction::Toggle) => Theme::toggle(&db)?,
        None => Theme::load(&db)?,
    };
    println!("{theme}");
    Ok(())
}
