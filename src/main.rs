use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serrs::{Arg, Config, Format, KeyCase, LogLevel, Store, Value};

#[derive(Parser)]
#[command(name = "serrs", about = "Render one structured record as text or JSON")]
struct Cli {
    /// Write debug logs to stderr (filter with RUST_LOG).
    #[arg(long)]
    debug: bool,

    /// Config file to layer over the defaults (default: ~/.config/serrs/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format; overrides the config file.
    #[arg(long)]
    format: Option<Format>,

    /// Key case transform; overrides the config file.
    #[arg(long)]
    key_case: Option<KeyCase>,

    #[arg(long, default_value = "info")]
    level: LogLevel,

    #[arg(long)]
    message: String,

    /// Print the store as a JSON array instead of one line per record.
    #[arg(long, conflicts_with = "live")]
    array: bool,

    /// Forward through the live sink (stdout) instead of rendering.
    #[arg(long)]
    live: bool,

    /// Flat attribute list: KEY VALUE [KEY VALUE ...]
    #[arg(last = true)]
    attrs: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::debug!("serrs debug log started");
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|err| {
            tracing::debug!(error = %err, "falling back to default config");
            Config::defaults()
        }),
    };

    let mut render = config.render_config();
    if let Some(format) = cli.format {
        render.format = format;
    }
    if let Some(key_case) = cli.key_case {
        render.key_case = key_case;
    }

    let mut store = Store::with_sink(io::stdout().lock(), render);
    // Keys stay strings; only values are given a native kind.
    let args = cli.attrs.iter().enumerate().map(|(i, s)| {
        if i % 2 == 0 {
            Arg::from(s)
        } else {
            Arg::Value(parse_value(s))
        }
    });
    store
        .add_from_args(chrono::Utc::now(), cli.level, cli.message, args)
        .context("building record from attributes")?;

    if cli.live {
        store.flush()?;
    } else if cli.array {
        let json = store.to_json()?;
        let out = store.sink_mut();
        out.write_all(&json)?;
        out.write_all(b"\n")?;
    } else {
        let text = store.render_all()?;
        store.sink_mut().write_all(text.as_bytes())?;
    }
    Ok(())
}

/// Command-line values are strings; give numbers and booleans their native kind.
fn parse_value(s: &str) -> Value {
    if let Ok(n) = s.parse::<i64>() {
        Value::Int(n)
    } else if let Some(f) = s.parse::<f64>().ok().filter(|f| f.is_finite()) {
        Value::Float(f)
    } else if let Ok(b) = s.parse::<bool>() {
        Value::Bool(b)
    } else {
        Value::Str(s.to_string())
    }
}
