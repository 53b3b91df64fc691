//! `skein`: store files of any size on a bounded-blob data-availability node.
//!
//! Files larger than one blob are split into chunks, each chunk is submitted
//! as its own blob, and a JSON manifest listing the chunks is submitted last.
//! The printed root locator is all that is needed to read the file back.
//!
//! # Usage
//!
//! ```text
//! skein submit ./photo.jpg                       # submit a file, print its root
//! skein submit ./data.bin --mime-type text/csv   # override MIME detection
//! skein read 42/000008e5f679bf7116cb/ab12.. -o out.bin
//! skein read --height 42 --commitment ab12.. -o out.bin
//! skein inspect 42/000008e5f679bf7116cb/ab12..   # show the manifest only
//! skein benchmark -n 50 -s 4000000               # in-memory throughput
//! ```

mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use skein_engine::{Inspection, SkeinClient};
use skein_store::{BlobStore, MemoryBlobStore, RpcBlobStore};
use skein_types::{BlobLocator, Commitment, Namespace};
use tracing::{info, warn};

use config::CliConfig;

// -----------------------------------------------------------------------
// CLI definition
// -----------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "skein",
    version,
    about = "Chunked file storage on a bounded-blob data-availability node"
)]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the node RPC endpoint.
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// Node auth token.
    #[arg(long, global = true, env = "CELESTIA_NODE_AUTH_TOKEN", hide_env_values = true)]
    auth: Option<String>,

    /// Override the namespace id (hex, up to 10 bytes).
    #[arg(short, long, global = true)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a file and print its root locator.
    Submit {
        /// File to submit.
        file: PathBuf,

        /// Name recorded in the manifest. Defaults to the path as given.
        #[arg(long)]
        name: Option<String>,

        /// MIME type recorded in the manifest. Detected from content if omitted.
        #[arg(long)]
        mime_type: Option<String>,

        /// Override the maximum chunk size in bytes.
        #[arg(long)]
        max_chunk_size: Option<usize>,
    },

    /// Reconstruct a file from its root locator.
    Read {
        /// Root locator (`<height>/<namespace>/<commitment>`).
        #[arg(conflicts_with_all = ["height", "commitment"])]
        locator: Option<String>,

        /// Root blob height, used with `--commitment` and the configured namespace.
        #[arg(long, requires = "commitment")]
        height: Option<u64>,

        /// Root blob commitment in hex.
        #[arg(long, requires = "height")]
        commitment: Option<String>,

        /// Where to write the reconstructed bytes.
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show what a root locator points at without fetching chunks.
    Inspect {
        /// Root locator (`<height>/<namespace>/<commitment>`).
        locator: String,
    },

    /// Run a quick submit/read benchmark (in-memory).
    Benchmark {
        /// Number of payloads to submit and read.
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,

        /// Size of each payload in bytes.
        #[arg(short, long, default_value = "4000000")]
        size: usize,
    },
}

// -----------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;

    setup_tracing(&config.log.level);
    apply_overrides(&mut config, cli.rpc, cli.auth, cli.namespace);

    match cli.command {
        Commands::Submit {
            file,
            name,
            mime_type,
            max_chunk_size,
        } => {
            if let Some(size) = max_chunk_size {
                config.blob.max_chunk_size = size;
            }
            cmd_submit(&config, &file, name, mime_type.as_deref()).await
        }
        Commands::Read {
            locator,
            height,
            commitment,
            output,
        } => {
            let root = resolve_locator(locator, height, commitment, || config.namespace())?;
            cmd_read(&config, &root, &output).await
        }
        Commands::Inspect { locator } => {
            let root: BlobLocator = locator
                .parse()
                .with_context(|| format!("invalid locator {locator:?}"))?;
            cmd_inspect(&config, &root).await
        }
        Commands::Benchmark { count, size } => cmd_benchmark(&config, count, size).await,
    }
}

/// Initialize tracing with `RUST_LOG` or the configured level.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// CLI flags take precedence over config file values.
fn apply_overrides(
    config: &mut CliConfig,
    rpc: Option<String>,
    auth: Option<String>,
    namespace: Option<String>,
) {
    if let Some(url) = rpc {
        config.rpc.url = url;
    }
    if let Some(token) = auth {
        config.rpc.auth_token = Some(token);
    }
    if let Some(ns) = namespace {
        config.blob.namespace = ns;
    }
}

/// A root given either as one locator string or as height plus commitment.
fn resolve_locator(
    locator: Option<String>,
    height: Option<u64>,
    commitment: Option<String>,
    namespace: impl FnOnce() -> Result<Namespace>,
) -> Result<BlobLocator> {
    match (locator, height, commitment) {
        (Some(s), _, _) => s
            .parse()
            .with_context(|| format!("invalid locator {s:?}")),
        (None, Some(height), Some(commitment)) => {
            let commitment = Commitment::from_hex(&commitment).context("invalid commitment")?;
            Ok(BlobLocator::new(height, namespace()?, commitment)?)
        }
        _ => bail!("provide a root locator, or --height and --commitment"),
    }
}

/// Connect to the configured node.
fn open_store(config: &CliConfig) -> Result<Arc<dyn BlobStore>> {
    if config.rpc.auth_token.is_none() {
        warn!("no auth token configured, node requests will be unauthenticated");
    }
    let store = RpcBlobStore::new(&config.rpc.url, config.rpc.auth_token.clone())
        .with_context(|| format!("failed to create RPC client for {}", config.rpc.url))?;
    Ok(Arc::new(store))
}

fn open_client(config: &CliConfig) -> Result<SkeinClient> {
    let store = open_store(config)?;
    Ok(SkeinClient::new(config.client_config()?, store)?)
}

/// A client for reading `root`. Reads address blobs by the root's own
/// namespace, so the configured one is not consulted.
fn open_reader(config: &CliConfig, root: &BlobLocator) -> Result<SkeinClient> {
    let store = open_store(config)?;
    Ok(SkeinClient::new(config.client_config_in(root.namespace)?, store)?)
}

// -----------------------------------------------------------------------
// skein submit
// -----------------------------------------------------------------------

async fn cmd_submit(
    config: &CliConfig,
    file: &Path,
    name: Option<String>,
    mime_type: Option<&str>,
) -> Result<()> {
    let client = open_client(config)?;
    let name = name.unwrap_or_else(|| file.display().to_string());

    let handle = tokio::fs::File::open(file)
        .await
        .with_context(|| format!("failed to open {}", file.display()))?;
    let size = handle.metadata().await?.len();
    info!(file = %file.display(), size, rpc = %config.rpc.url, "submitting file");

    let receipt = client
        .submit_reader(handle, &name, mime_type)
        .await
        .context("submit failed")?;

    for (i, chunk) in receipt.chunks.iter().enumerate() {
        println!("chunk {i}: {chunk}");
    }
    match &receipt.manifest {
        Some(m) => println!(
            "manifest: {} chunks, {} bytes, {}",
            m.chunks.len(),
            m.size,
            m.mime_type
        ),
        None => println!("single blob, no manifest"),
    }
    println!("{}", receipt.root);

    Ok(())
}

// -----------------------------------------------------------------------
// skein read
// -----------------------------------------------------------------------

async fn cmd_read(config: &CliConfig, root: &BlobLocator, output: &Path) -> Result<()> {
    let client = open_reader(config, root)?;

    let data = client
        .read(root)
        .await
        .with_context(|| format!("failed to read {root}"))?;
    tokio::fs::write(output, &data)
        .await
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("wrote {} bytes to {}", data.len(), output.display());
    Ok(())
}

// -----------------------------------------------------------------------
// skein inspect
// -----------------------------------------------------------------------

async fn cmd_inspect(config: &CliConfig, root: &BlobLocator) -> Result<()> {
    let client = open_reader(config, root)?;

    match client.inspect(root).await? {
        Inspection::Manifest(manifest) => {
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Inspection::Raw { size, mime_type } => {
            println!("raw blob: {size} bytes, {mime_type}");
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------
// skein benchmark
// -----------------------------------------------------------------------

async fn cmd_benchmark(config: &CliConfig, count: usize, size: usize) -> Result<()> {
    let chunk_size = config.blob.max_chunk_size;

    println!("Skein Benchmark");
    println!("  payloads:   {count}");
    println!("  size:       {size} bytes each");
    println!("  chunk_size: {chunk_size}");
    println!();

    // In-memory setup, measures client throughput only.
    let store = Arc::new(MemoryBlobStore::new(usize::MAX));
    let client = SkeinClient::new(config.client_config()?, store.clone())?;

    let data = generate_bench_data(size);
    let total_bytes = count as u64 * size as u64;

    // --- Submit ---
    print!("Submitting {count} payloads... ");
    let start = Instant::now();
    let mut roots = Vec::with_capacity(count);
    for i in 0..count {
        let root = client
            .submit(&data, &format!("bench-{i}"), "application/octet-stream")
            .await?;
        roots.push(root);
    }
    let write_dur = start.elapsed();
    let write_mbs = total_bytes as f64 / write_dur.as_secs_f64() / 1_048_576.0;
    println!("{:.2}s ({write_mbs:.1} MB/s)", write_dur.as_secs_f64());

    // --- Read ---
    print!("Reading {count} payloads... ");
    let start = Instant::now();
    for root in &roots {
        let got = client.read(root).await?;
        if got.len() != size {
            bail!("read {} bytes from {root}, expected {size}", got.len());
        }
    }
    let read_dur = start.elapsed();
    let read_mbs = total_bytes as f64 / read_dur.as_secs_f64() / 1_048_576.0;
    println!("{:.2}s ({read_mbs:.1} MB/s)", read_dur.as_secs_f64());

    println!();
    println!("Summary:");
    println!("  Submit throughput: {write_mbs:.1} MB/s");
    println!("  Read throughput:   {read_mbs:.1} MB/s");
    println!("  Blobs stored:      {}", store.len());
    println!(
        "  Total data:        {:.1} MB",
        total_bytes as f64 / 1_048_576.0
    );

    Ok(())
}

/// Generate deterministic data for benchmarking.
fn generate_bench_data(size: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state: u32 = 0xDEAD_BEEF;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    data
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
