// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{anyhow, Context, Result};
use reel::config::watcher::{validate_config, ConfigWatcher};
use reel::config::ShowFile;
use reel::narration::ConsoleSpeech;
use reel::presentation::{run, ConsoleView, PresentationController, RunOptions};
use std::env;
use std::path::PathBuf;
use tracing::Level;

fn print_usage() {
    println!("REEL - Looping Narrated Presentations");
    println!();
    println!("Usage: reel [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <PATH>     Load the show from a YAML or TOML file");
    println!("                      (default: built-in show)");
    println!("  --watch             Reload the show when the config file changes");
    println!("  --mute              Run without narration");
    println!("  --loops <N>         Stop after N loop passes (default: run until Ctrl+C)");
    println!("  --print-schedule    Print scene and narration offsets, then exit");
    println!("  --validate <PATH>   Check a show file and exit");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
}

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    watch: bool,
    mute: bool,
    loops: Option<u64>,
    print_schedule: bool,
    validate: Option<PathBuf>,
    verbose: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--validate" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--validate requires a file path"))?;
                parsed.validate = Some(PathBuf::from(path));
            }
            "--loops" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--loops requires a number"))?;
                let loops: u64 = value
                    .parse()
                    .map_err(|_| anyhow!("Invalid loop count: {}", value))?;
                parsed.loops = Some(loops);
            }
            "--watch" => parsed.watch = true,
            "--mute" => parsed.mute = true,
            "--print-schedule" => parsed.print_schedule = true,
            "--verbose" | "-v" => parsed.verbose = true,
            "--help" | "-h" => parsed.help = true,
            other => return Err(anyhow!("Unknown option: {}", other)),
        }
    }

    if parsed.watch && parsed.config.is_none() {
        return Err(anyhow!("--watch requires --config"));
    }
    Ok(parsed)
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn print_schedule(show: &ShowFile) -> Result<()> {
    let sequence = show.scene_sequence()?;

    println!("Show: {}", show.show.name);
    println!();
    println!("Scenes:");
    for (index, offset) in sequence.offsets_ms().into_iter().enumerate() {
        let duration = sequence.scene(index).map(|s| s.duration_ms()).unwrap_or(0);
        println!(
            "  {:>8} ms  {:<14} ({} ms)",
            offset,
            sequence.label(index),
            duration
        );
    }
    let loop_at = sequence.total_ms() + show.show.loop_pause_ms;
    println!("  {:>8} ms  loop restart", loop_at);

    if show.narration.enabled {
        let script = show.narration_script()?;
        let offsets = show.gap_policy()?.offsets_micros(&script);
        println!();
        println!("Narration:");
        for (line, offset) in script.lines().iter().zip(offsets) {
            println!("  {:>10.1} ms  \"{}\"", offset as f64 / 1000.0, line.text());
        }
    } else {
        println!();
        println!("Narration: disabled");
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let raw: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if args.help {
        print_usage();
        return Ok(());
    }

    init_logging(args.verbose);

    if let Some(path) = &args.validate {
        let show = validate_config(path)?;
        println!(
            "{:?} is valid: \"{}\", {} scenes, narration {}",
            path,
            show.show.name,
            show.scenes.len(),
            if show.narration.enabled { "on" } else { "off" }
        );
        return Ok(());
    }

    let show = match &args.config {
        Some(path) => ShowFile::load(path)?,
        None => ShowFile::default(),
    };

    if args.print_schedule {
        return print_schedule(&show);
    }

    let watcher = match (&args.config, args.watch) {
        (Some(path), true) => Some(
            ConfigWatcher::new(path, None)
                .with_context(|| format!("Failed to watch {:?}", path))?,
        ),
        _ => None,
    };

    let view = ConsoleView::new(show.show.name.clone());
    let mut controller = PresentationController::new(show)
        .with_speech(ConsoleSpeech::new())
        .with_view(view);
    controller.set_narration_enabled(!args.mute);

    let options = RunOptions {
        max_loops: args.loops,
        ..RunOptions::default()
    };

    println!("Press Ctrl+C to stop");
    run(controller, options, watcher).await
}
