mod document;
mod rules;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use blocktree_config::Config;
use blocktree_engine::{BlockBuilder, BlockSerialize};
use clap::{Parser, Subcommand};

use document::Document;

#[derive(Parser)]
#[command(name = "blocktree", version, about = "Check and format block JSON documents")]
struct Cli {
    /// Config file to use instead of ~/.config/blocktree/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a document strictly and run configured validators on every block
    Check(FileArgs),

    /// Re-serialize a document in canonical shape
    Fmt(FmtArgs),

    /// Print a new block with a generated id
    New(NewArgs),

    /// Write a default config file
    Init(InitArgs),
}

#[derive(clap::Args)]
struct FileArgs {
    /// Block document (one object or an array of objects)
    file: PathBuf,
}

#[derive(clap::Args)]
struct FmtArgs {
    /// Block document (one object or an array of objects)
    file: PathBuf,

    /// Emit compact JSON regardless of configuration
    #[arg(long)]
    compact: bool,
}

#[derive(clap::Args)]
struct NewArgs {
    /// Type tag of the new block
    #[arg(short = 't', long = "type", default_value = "")]
    block_type: String,

    /// Parameter as key=value. Repeatable.
    #[arg(short, long = "param", value_parser = parse_parameter)]
    params: Vec<(String, String)>,

    /// Free-text content
    #[arg(short, long, default_value = "")]
    content: String,
}

#[derive(clap::Args)]
struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    force: bool,
}

fn parse_parameter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {raw:?}")),
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let explicit = cli.config.as_deref();

    match cli.command {
        Command::Check(args) => check(&args.file, &load_config(explicit)?),
        Command::Fmt(args) => fmt(&args.file, args.compact, &load_config(explicit)?),
        Command::New(args) => new_block(args, &load_config(explicit)?),
        Command::Init(args) => init(explicit, args.force),
    }
}

fn resolve_config_path(explicit: &Path) -> PathBuf {
    Config::expand_path(explicit).unwrap_or_else(|| explicit.to_path_buf())
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let Some(explicit) = explicit else {
        log::debug!("Config path: {}", Config::config_path().display());
        return Ok(Config::load()?.unwrap_or_default());
    };

    let config_path = resolve_config_path(explicit);
    log::debug!("Config path: {}", config_path.display());
    match Config::load_from_path(&config_path)? {
        Some(config) => Ok(config),
        None => bail!("config file not found: {}", config_path.display()),
    }
}

fn init(explicit: Option<&Path>, force: bool) -> Result<()> {
    let config_path = match explicit {
        Some(path) => resolve_config_path(path),
        None => Config::config_path(),
    };
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let config = Config::default();
    match explicit {
        Some(_) => config.save_to_path(&config_path)?,
        None => config.save()?,
    }
    println!("wrote {}", config_path.display());
    Ok(())
}

fn read_document(file: &Path, config: &Config) -> Result<Document> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Document::parse(&text, config.codec.max_depth)
        .with_context(|| format!("{} is not a valid block document", file.display()))
}

fn check(file: &Path, config: &Config) -> Result<()> {
    let document = read_document(file, config)?;
    let registry = rules::registry_from_config(config);
    log::debug!("validating with {registry:?}");

    for root in document.roots() {
        registry
            .validate_tree(root)
            .with_context(|| format!("{} failed validation", file.display()))?;
    }

    println!(
        "{}: {} block(s) ok",
        file.display(),
        document.block_count()
    );
    Ok(())
}

fn fmt(file: &Path, compact: bool, config: &Config) -> Result<()> {
    let document = read_document(file, config)?;
    let pretty = config.codec.pretty && !compact;
    println!("{}", document.to_json(pretty)?);
    Ok(())
}

fn new_block(args: NewArgs, config: &Config) -> Result<()> {
    let mut builder = BlockBuilder::new()
        .with_type(args.block_type)
        .with_content(args.content);
    for (key, value) in args.params {
        builder = builder.with_parameter(key, value);
    }
    let block = builder.build();

    let json = if config.codec.pretty {
        block.to_json_pretty()?
    } else {
        block.to_json()?
    };
    println!("{json}");
    Ok(())
}
