use addrgen::{HashChainDigest, KeyIndex, Seed};
use anyhow::bail;
use clap::{Parser, ValueEnum};

/// Where derived addresses are memoized for the lifetime of the process.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// No cache; every address is derived.
    None,
    /// Install a cache in the process-wide registry.
    Global,
    /// Give the generator its own private cache.
    Local,
}

/// Command-line arguments for the `addrgen` binary.
///
/// All values can also come from environment variables (or a `.env` file).
/// Does not implement `Debug`, so the seed never ends up in logs.
#[derive(Parser, Clone)]
#[command(
    name = "addrgen",
    version,
    about = "Derive public addresses from a secret seed"
)]
pub struct CliArgs {
    /// The secret seed.
    ///
    /// If omitted, one line is read from stdin. An empty line selects a fresh
    /// random seed.
    ///
    /// Environment variable: `ADDRGEN_SEED`
    #[arg(long, env = "ADDRGEN_SEED", hide_env_values = true)]
    pub seed: Option<String>,

    /// First key index to derive. Must not be negative.
    ///
    /// Environment variable: `ADDRGEN_START`
    #[arg(long, env = "ADDRGEN_START", default_value_t = 0, allow_negative_numbers = true)]
    pub start: KeyIndex,

    /// Number of addresses to print. Must be at least 1.
    ///
    /// Environment variable: `ADDRGEN_COUNT`
    #[arg(long, env = "ADDRGEN_COUNT", default_value_t = 1)]
    pub count: usize,

    /// Distance between consecutive key indices. Negative values walk
    /// backwards; zero is rejected.
    ///
    /// Environment variable: `ADDRGEN_STEP`
    #[arg(long, env = "ADDRGEN_STEP", default_value_t = 1, allow_negative_numbers = true)]
    pub step: i64,

    /// Number of hash-chain fragment groups per key (1-3).
    ///
    /// Environment variable: `ADDRGEN_SECURITY_LEVEL`
    #[arg(long, env = "ADDRGEN_SECURITY_LEVEL", default_value_t = 2)]
    pub security_level: u8,

    /// Address cache scope.
    ///
    /// Environment variable: `ADDRGEN_CACHE`
    #[arg(long, env = "ADDRGEN_CACHE", value_enum, default_value_t = CacheMode::Global)]
    pub cache: CacheMode,

    /// Pull addresses from the lazy iterator instead of a single batch call.
    #[arg(long, default_value_t = false)]
    pub scan: bool,

    /// Print one JSON object per line instead of bare addresses.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Log at debug level regardless of `RUST_LOG`.
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,
}

#[derive(Debug)]
pub struct CliConfig {
    pub seed: Option<Seed>,
    pub start: KeyIndex,
    pub count: usize,
    pub step: i64,
    pub digest: HashChainDigest,
    pub cache: CacheMode,
    pub scan: bool,
    pub json: bool,
    pub debug: bool,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.start < 0 {
            bail!("--start must not be negative (got {})", args.start);
        }
        if args.count == 0 {
            bail!("--count must be at least 1");
        }
        if args.step == 0 {
            bail!("--step must not be zero");
        }

        let digest = HashChainDigest::new(args.security_level)?;

        Ok(Self {
            seed: args.seed.as_deref().map(Seed::from),
            start: args.start,
            count: args.count,
            step: args.step,
            digest,
            cache: args.cache,
            scan: args.scan,
            json: args.json,
            debug: args.debug,
        })
    }
}
