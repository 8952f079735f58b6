use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, ValueEnum};
use nalja_core::ItemKind;

use crate::render::ColorMode;

/// Preview what a Korean quick-add line resolves to
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Prints the config file locations that are searched, in order.
    #[arg(long, short, exclusive = true)]
    pub path: bool,
    /// Read this config file instead of the standard locations.
    #[arg(long, env = "NALJA_CONFIG")]
    pub config: Option<PathBuf>,
    /// The focused day (e.g., `--reference 2025-12-22`). Defaults to today.
    #[arg(long, short, value_parser = parse_reference)]
    pub reference: Option<NaiveDate>,
    /// Pretend the current moment is this (e.g., `--now "2025-12-22 09:30"`).
    /// 오늘/내일/모레, weekdays and `N일 뒤` resolve against it.
    #[arg(long, env = "NALJA_NOW", value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,
    /// Also show the item the line would create.
    #[arg(long, short, value_enum)]
    pub kind: Option<KindArg>,
    /// Control ANSI colors in output.
    /// By default, colors are disabled when output is redirected (e.g with `>` or `|`).
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Quick-add text (e.g., `nalja 내일 오후 3시 회의`). Without it, every stdin line is parsed.
    #[arg()]
    pub text: Vec<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Todo,
    Event,
}

impl From<KindArg> for ItemKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Todo => ItemKind::Todo,
            KindArg::Event => ItemKind::Event,
        }
    }
}

fn parse_reference(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {e}"))
}
