pub mod completions;
pub mod config;
pub mod duration;
pub mod heatmap;
pub mod history;
pub mod run;
pub mod stats;
pub mod theme;
