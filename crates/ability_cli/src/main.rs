use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ability_core::core_api::{AbilityRecord, Engine, ExtractorConfig};
use ability_core::game_data::GameData;
use ability_render::{render_collection_json, render_page, render_record_json};
use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

const COLLECTION_FILE: &str = "_abilities.json";
const KEEP_LIST_SEPARATOR: char = '|';

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Extract the abilities named in a keep list into JSON records.
    Extract {
        #[arg(value_name = "GAME_DATA.json")]
        game_data: PathBuf,
        /// Lines of `<debug name> | <uuid>`.
        #[arg(long, value_name = "FILE")]
        keep: PathBuf,
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        #[arg(long, value_name = "CONFIG.toml")]
        config: Option<PathBuf>,
    },
    /// Render wiki pages from extracted JSON records.
    Infobox {
        /// A record file, or a directory of them.
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Required when INPUT is a directory.
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            game_data,
            keep,
            out,
            config,
        } => run_extract(&game_data, &keep, &out, config.as_deref()),
        Command::Infobox { input, output_dir } => run_infobox(&input, output_dir.as_deref()),
    }
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ExtractorConfig> {
    let Some(path) = path else {
        return Ok(ExtractorConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn load_game_data(path: &Path) -> Result<GameData> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading game data {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing game data {}", path.display()))
}

// Only the id column is used; the name is there for people editing the list.
fn parse_keep_list(text: &str) -> Vec<Uuid> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let id = line
                .split_once(KEEP_LIST_SEPARATOR)
                .and_then(|(_, id)| id.trim().parse::<Uuid>().ok());
            if id.is_none() {
                debug!(line, "skipping malformed keep-list line");
            }
            id
        })
        .collect()
}

fn run_extract(game_data: &Path, keep: &Path, out: &Path, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let data = load_game_data(game_data)?;
    let keep_text = fs::read_to_string(keep)
        .with_context(|| format!("reading keep list {}", keep.display()))?;
    let keep_list = parse_keep_list(&keep_text);
    info!(abilities = keep_list.len(), "loaded keep list");

    let engine = Engine::new(data, config);
    let batch = engine.extract_batch(keep_list);

    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    let mut seen = HashSet::new();
    let mut written = 0;
    for record in batch.records() {
        if !seen.insert(record.internalname.clone()) {
            warn!(ability = %record.internalname, "duplicate internal name, keeping the first file");
            continue;
        }
        match write_record(out, record) {
            Ok(path) => {
                written += 1;
                debug!(path = %path.display(), "wrote record");
            }
            Err(e) => warn!(ability = %record.internalname, "skipping record: {e:#}"),
        }
    }

    let skipped = batch.failures.len() + batch.extractions.len() - written;
    let collection = batch.into_collection();
    let path = out.join(COLLECTION_FILE);
    let json = render_collection_json(&collection).context("serializing ability collection")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

    info!(written, skipped, out = %out.display(), "extraction finished");
    Ok(())
}

fn write_record(out: &Path, record: &AbilityRecord) -> Result<PathBuf> {
    let path = out.join(format!("{}.json", record.internalname));
    let json = render_record_json(record).context("serializing record")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn run_infobox(input: &Path, output_dir: Option<&Path>) -> Result<()> {
    if input.is_dir() {
        let Some(output_dir) = output_dir else {
            Cli::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "OUTPUT_DIR is required when INPUT is a directory",
                )
                .exit();
        };
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating {}", output_dir.display()))?;

        let mut inputs: Vec<PathBuf> = fs::read_dir(input)
            .with_context(|| format!("listing {}", input.display()))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        inputs.sort();

        let mut rendered = 0;
        for path in &inputs {
            if render_record_file(path, &page_path(path, Some(output_dir))) {
                rendered += 1;
            }
        }
        info!(rendered, skipped = inputs.len() - rendered, "infobox rendering finished");
    } else if !render_record_file(input, &page_path(input, output_dir)) {
        warn!(path = %input.display(), "nothing rendered");
    }
    Ok(())
}

fn page_path(record_path: &Path, output_dir: Option<&Path>) -> PathBuf {
    match (output_dir, record_path.file_stem()) {
        (Some(dir), Some(stem)) => {
            let mut name = stem.to_os_string();
            name.push(".txt");
            dir.join(name)
        }
        _ => record_path.with_extension("txt"),
    }
}

// Unreadable or unusable records are logged and skipped.
fn render_record_file(path: &Path, page: &Path) -> bool {
    let record = match read_record(path) {
        Ok(record) => record,
        Err(e) => {
            warn!(path = %path.display(), "skipping record: {e:#}");
            return false;
        }
    };
    if record.guid.is_nil() {
        warn!(path = %path.display(), "skipping record without guid");
        return false;
    }

    match fs::write(page, render_page(&record)) {
        Ok(()) => {
            debug!(page = %page.display(), "wrote page");
            true
        }
        Err(e) => {
            warn!(page = %page.display(), "failed to write page: {e}");
            false
        }
    }
}

fn read_record(path: &Path) -> Result<AbilityRecord> {
    let json = fs::read_to_string(path).context("reading record")?;
    serde_json::from_str(&json).context("parsing record")
}
