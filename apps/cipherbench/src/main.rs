// cipherbench
//
// Command-line driver for the AEAD benchmark harness.
//
// Examples:
//   cargo run --release -- --backend direct --algorithm aes-gcm --size 1024 --iterations 100
//   cargo run --release -- --backend all --size 1024,1048576 --out results.csv
//   cargo run --release -- --suite --out results.csv
//
// Flags:
//   --backend library|bridged|direct|all    (default: all)
//   --algorithm aes-gcm|chacha|all          (default: all)
//   --size BYTES[,BYTES...]                 (default: 1024)
//   --iterations N                          (default: 100)
//   --suite     run the full planned matrix; ignores the flags above
//   --out FILE  write the CSV export
//   --help

use anyhow::{anyhow, bail, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use aead_core::keys::SessionKeys;
use aead_core::{Algorithm, BackendKind};
use harness::{export, suite, BenchmarkConfig, CancelToken, History, Runner, SuitePlan};

struct Options {
    backends: Vec<BackendKind>,
    algorithms: Vec<Algorithm>,
    sizes: Vec<usize>,
    iterations: u32,
    suite: bool,
    out: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            backends: BackendKind::ALL.to_vec(),
            algorithms: Algorithm::ALL.to_vec(),
            sizes: vec![1024],
            iterations: 100,
            suite: false,
            out: None,
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let options = parse_args(std::env::args().skip(1))?;
    let keys = SessionKeys::generate();
    let history = History::new();
    let cancel = CancelToken::new();

    if options.suite {
        let completed = suite::run_suite(&SuitePlan::default(), &keys, &history, &cancel);
        info!(completed, "suite done");
    } else {
        for &kind in &options.backends {
            let backend = backends::backend_for(kind);
            for &algorithm in &options.algorithms {
                for &size in &options.sizes {
                    let config = BenchmarkConfig {
                        backend: kind,
                        algorithm,
                        data_size: size,
                        iterations: options.iterations,
                    };
                    let runner = Runner::with_cancel(backend.as_ref(), &keys, cancel.clone());
                    if let Some(result) = runner.run(&config) {
                        history.push(result);
                    }
                }
            }
        }
    }

    // Blocks print oldest first, matching run order.
    let snapshot = history.snapshot();
    for result in snapshot.iter().rev() {
        print!("{}", export::render_block(result));
    }

    if let Some(path) = &options.out {
        std::fs::write(path, export::to_csv(&snapshot))?;
        info!(%path, rows = snapshot.len(), "CSV written");
    }
    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--backend" => options.backends = parse_backends(&required(&mut args, "--backend")?)?,
            "--algorithm" => {
                options.algorithms = parse_algorithms(&required(&mut args, "--algorithm")?)?
            }
            "--size" => options.sizes = parse_sizes(&required(&mut args, "--size")?)?,
            "--iterations" => {
                let raw = required(&mut args, "--iterations")?;
                let n: u32 = raw.parse().map_err(|_| anyhow!("bad iteration count '{raw}'"))?;
                if n == 0 {
                    bail!("iteration count must be positive");
                }
                options.iterations = n;
            }
            "--suite" => options.suite = true,
            "--out" => options.out = Some(required(&mut args, "--out")?),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => bail!("unknown flag '{other}' (try --help)"),
        }
    }
    Ok(options)
}

fn required(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().ok_or_else(|| anyhow!("{flag} needs a value"))
}

fn parse_backends(raw: &str) -> Result<Vec<BackendKind>> {
    if raw == "all" {
        return Ok(BackendKind::ALL.to_vec());
    }
    raw.split(',')
        .map(|token| match token.trim() {
            "library" => Ok(BackendKind::Library),
            "bridged" | "bridged-native" => Ok(BackendKind::BridgedNative),
            "direct" | "direct-native" => Ok(BackendKind::DirectNative),
            other => bail!("unknown backend '{other}'"),
        })
        .collect()
}

fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>> {
    if raw == "all" {
        return Ok(Algorithm::ALL.to_vec());
    }
    raw.split(',')
        .map(|token| match token.trim() {
            "aes-gcm" | "aes-256-gcm" | "aes" => Ok(Algorithm::Aes256Gcm),
            "chacha20-poly1305" | "chacha" => Ok(Algorithm::ChaCha20Poly1305),
            other => bail!("unknown algorithm '{other}'"),
        })
        .collect()
}

fn parse_sizes(raw: &str) -> Result<Vec<usize>> {
    let sizes: Vec<usize> = raw
        .split(',')
        .filter(|token| !token.trim().is_empty())
        .map(|token| token.trim().parse::<usize>().map_err(|_| anyhow!("bad size '{token}'")))
        .collect::<Result<_>>()?;
    if sizes.is_empty() {
        bail!("--size needs at least one value");
    }
    if sizes.contains(&0) {
        bail!("data size must be positive");
    }
    Ok(sizes)
}

fn print_usage() {
    println!(
        "cipherbench - AEAD micro-benchmark across library, bridged, and direct backends

USAGE:
    cipherbench [FLAGS]

FLAGS:
    --backend library|bridged|direct|all    backends to run (default: all)
    --algorithm aes-gcm|chacha|all          algorithms to run (default: all)
    --size BYTES[,BYTES...]                 plaintext sizes (default: 1024)
    --iterations N                          iterations per run (default: 100)
    --suite                                 run the full planned matrix
    --out FILE                              write the CSV export
    --help                                  show this help"
    );
}
