mod config;
mod telemetry;

use addrgen::{Address, AddressGenerator, MemoryAddressCache, Seed, install_global_cache};
use anyhow::Context;
use clap::Parser;
use config::{CacheMode, CliArgs, CliConfig};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use telemetry::init_logging;
use zeroize::Zeroize;

#[derive(Serialize)]
struct AddressLine<'a> {
    index: Option<i64>,
    address: &'a Address,
}

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let mut config = CliConfig::try_from(args)?;

    init_logging(config.debug)?;

    let seed = match config.seed.take() {
        Some(seed) => seed,
        None => read_seed()?,
    };

    let mut generator = AddressGenerator::with_digest(seed, config.digest);
    match config.cache {
        CacheMode::None => {}
        CacheMode::Global => {
            install_global_cache(Arc::new(MemoryAddressCache::new()))?;
        }
        CacheMode::Local => generator.set_cache(Some(Arc::new(MemoryAddressCache::new()))),
    }

    tracing::debug!(
        start = config.start,
        count = config.count,
        step = config.step,
        security_level = config.digest.security_level(),
        cache = ?config.cache,
        scan = config.scan,
        "deriving addresses"
    );

    let addresses = if config.scan {
        generator
            .create_iterator(config.start, config.step)?
            .take(config.count)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        generator.get_addresses(config.start, config.count, config.step)?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for address in &addresses {
        if config.json {
            let line = AddressLine {
                index: address.key_index(),
                address,
            };
            serde_json::to_writer(&mut out, &line)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{address}")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Reads the seed from one line of stdin. An empty line yields a random seed.
fn read_seed() -> anyhow::Result<Seed> {
    eprintln!(
        "Enter seed and press return.\n\
         If no seed is specified, a random one will be used instead."
    );

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read seed from stdin")?;
    Ok(seed_from_line(&mut line))
}

/// Turns one input line into a seed and wipes the line.
fn seed_from_line(line: &mut String) -> Seed {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    let seed = if trimmed.is_empty() {
        tracing::info!("no seed given, using a random one");
        Seed::random()
    } else {
        Seed::from(trimmed)
    };
    // `Seed` keeps its own copy.
    line.zeroize();
    seed
}
