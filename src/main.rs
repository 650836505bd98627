mod config;

use std::{env, path::PathBuf};

use anyhow::{bail, Context, Result};
use mdfx_config::{ConfigSection, ErrorLog};
use mdfx_providers::{seed_random, ProviderDocument};
use mdfx_testkit::JsonlSink;
use tracing::info;

use crate::config::SimulationConfig;

const USAGE: &str = "usage: mdfx <effect.toml> [--ticks N] [--seed N] [--check] \
                     [--emit PATH] [--record PATH] [--settings PATH]";

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = CliOptions::parse(env::args().skip(1));
    let Some(effect_path) = cli.effect.clone() else {
        bail!(USAGE);
    };

    let mut settings = match &cli.settings {
        Some(path) => SimulationConfig::load_from_path(path),
        None => SimulationConfig::load(),
    };
    if let Some(ticks) = cli.ticks {
        settings.ticks = ticks;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }

    let root = ConfigSection::load(&effect_path)
        .with_context(|| format!("failed to load effect from {}", effect_path.display()))?;
    let mut log = ErrorLog::new();
    let mut document = ProviderDocument::from_section(&root, &mut log, "");
    info!(
        path = %effect_path.display(),
        fields = document.len(),
        issues = log.len(),
        "effect loaded"
    );
    for issue in log.issues() {
        eprintln!("{}: {}", issue.path, issue.message);
    }

    if cli.check {
        if !log.is_empty() {
            bail!(
                "{} configuration issue(s) in {}",
                log.len(),
                effect_path.display()
            );
        }
        println!("{}: {} field(s) ok", effect_path.display(), document.len());
        return Ok(());
    }

    let mut recorder = match &cli.record {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => None,
    };
    run(&mut document, &settings, recorder.as_mut())?;

    if let Some(path) = &cli.emit {
        document
            .to_section()
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "effect state written");
    }
    Ok(())
}

/// Tick `document` for the configured number of refreshes.
fn run(
    document: &mut ProviderDocument,
    settings: &SimulationConfig,
    mut recorder: Option<&mut JsonlSink>,
) -> Result<()> {
    if let Some(seed) = settings.seed {
        seed_random(seed);
    }
    for _ in 0..settings.ticks {
        document.refresh();
        if let Some(sink) = recorder.as_deref_mut() {
            sink.write_document(document)?;
        }
        if settings.prints(document.tick().0) {
            println!("{}", format_tick(document));
        }
    }
    info!(ticks = document.tick().0, "simulation finished");
    Ok(())
}

/// One line per tick: `tick N  name=value ...`.
fn format_tick(document: &ProviderDocument) -> String {
    let mut line = format!("tick {:>4}", document.tick().0);
    for (name, node) in document.scalars() {
        line.push_str(&format!("  {name}={:.4}", node.value()));
    }
    for (name, node) in document.vectors() {
        let v = node.value();
        line.push_str(&format!("  {name}=({:.4}, {:.4}, {:.4})", v.x, v.y, v.z));
    }
    line
}

#[derive(Debug, Default)]
struct CliOptions {
    effect: Option<PathBuf>,
    ticks: Option<u64>,
    seed: Option<u64>,
    check: bool,
    emit: Option<PathBuf>,
    record: Option<PathBuf>,
    settings: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--check" => opts.check = true,
                "--ticks" => opts.ticks = parse_u64(&mut args, "--ticks"),
                "--seed" => opts.seed = parse_u64(&mut args, "--seed"),
                "--emit" => opts.emit = path_arg(&mut args, "--emit"),
                "--record" => opts.record = path_arg(&mut args, "--record"),
                "--settings" => opts.settings = path_arg(&mut args, "--settings"),
                other if other.starts_with("--") => {
                    tracing::warn!(flag = other, "ignoring unknown flag");
                }
                _ => {
                    if opts.effect.is_some() {
                        tracing::warn!(value = %arg, "ignoring extra effect path");
                    } else {
                        opts.effect = Some(PathBuf::from(arg));
                    }
                }
            }
        }
        opts
    }
}

fn parse_u64<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Option<u64> {
    let Some(raw) = args.next() else {
        tracing::error!("{flag} requires an integer");
        return None;
    };
    match raw.parse::<u64>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::error!(%err, value = %raw, "{flag} must be an integer");
            None
        }
    }
}

fn path_arg<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> Option<PathBuf> {
    let path = args.next().map(PathBuf::from);
    if path.is_none() {
        tracing::error!("{flag} requires a file path");
    }
    path
}
