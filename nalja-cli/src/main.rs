mod cli;
mod render;

use anyhow::{Context, Result};
use chrono::{Local, NaiveTime};
use clap::Parser;
use cli::Cli;
use env_logger::Env;
use log::debug;
use nalja_core::{Config, Nalja, ParseOptions};
use render::{RenderOptions, Renderer, use_color};
use std::io::{self, BufRead};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::new().filter_or("NALJA_LOG", "warn")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("nalja: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.path {
        for path in Config::config_file_paths() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let nalja = Nalja::with_config(config)?;
    let renderer = Renderer::new(RenderOptions {
        datetime_format: nalja.config.datetime_format.clone(),
        use_color: use_color(cli.color),
    });

    let reference = cli
        .reference
        .or_else(|| cli.now.map(|now| now.date()))
        .unwrap_or_else(|| Local::now().date_naive())
        .and_time(NaiveTime::MIN);
    let options = ParseOptions {
        reference: Some(reference),
        now: cli.now,
    };

    let lines = if cli.text.is_empty() {
        read_lines()?
    } else {
        vec![cli.text.join(" ")]
    };
    if lines.is_empty() {
        renderer.print_info("Nothing to parse, because no text was received.");
        return Ok(());
    }

    for line in &lines {
        let parsed = nalja.parse_with(line, options);
        debug!("{line:?}: stages {:?}", parsed.stages);
        renderer.print_result(&parsed);
        if let Some(kind) = cli.kind {
            if let Some(item) = nalja.draft_item(line, kind.into(), options) {
                renderer.print_item(&item);
            }
        }
    }
    Ok(())
}

/// Non-blank stdin lines.
fn read_lines() -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}
