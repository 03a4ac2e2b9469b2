mod recorded;

use anyhow::{Context, Result, bail};
use realign_config::Config;
use realign_engine::{
    Adapter, AlignedMatch, Aligner, CheckAdapter, CheckResult, CompositeAdapter, DiffOptions,
    Equivalence, InputFormat, Match, MatchWithReplacement, NormalizationPolicy, Span, io,
};
use recorded::RecordedFile;
use serde::Serialize;
use std::{env, path::PathBuf, process};
use uuid::Uuid;

const USAGE: &str = "Usage: realign-cli <select|replace> <snapshot-file> <current-file> <matches.json> [--html] [--write] [--config <path>]
       realign-cli <select|replace> <matches.json> --region <snapshot-file> <current-file>... [--html] [--write] [--config <path>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Select,
    Replace,
}

/// The text a check ran on and where that text lives now.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FilePair {
    snapshot: PathBuf,
    current: PathBuf,
}

/// One file, or several files checked as one composed document.
#[derive(Debug, PartialEq, Eq)]
enum Inputs {
    Single(FilePair),
    Regions(Vec<FilePair>),
}

#[derive(Debug)]
struct Options {
    command: Command,
    inputs: Inputs,
    matches_path: PathBuf,
    format: InputFormat,
    write: bool,
    config_path: Option<PathBuf>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut positional = Vec::new();
        let mut format = InputFormat::Text;
        let mut write = false;
        let mut config_path = None;
        let mut regions = Vec::new();

        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--html" => format = InputFormat::Html,
                "--write" => write = true,
                "--config" => {
                    let path = iter.next().context("--config needs a path")?;
                    config_path = Some(PathBuf::from(path));
                }
                "--region" => {
                    let snapshot = iter.next().context("--region needs a snapshot file")?;
                    let current = iter.next().context("--region needs a current file")?;
                    regions.push(FilePair {
                        snapshot: PathBuf::from(snapshot),
                        current: PathBuf::from(current),
                    });
                }
                flag if flag.starts_with("--") => bail!("unknown option {flag}"),
                _ => positional.push(arg.clone()),
            }
        }

        let (command, inputs, matches) = match (positional.as_slice(), regions.is_empty()) {
            ([command, snapshot, current, matches], true) => {
                let pair = FilePair {
                    snapshot: PathBuf::from(snapshot),
                    current: PathBuf::from(current),
                };
                (command, Inputs::Single(pair), matches)
            }
            ([command, matches], false) => (command, Inputs::Regions(regions), matches),
            (_, true) => bail!("expected 4 arguments, got {}", positional.len()),
            (_, false) => bail!("expected 2 arguments with --region, got {}", positional.len()),
        };
        let command = match command.as_str() {
            "select" => Command::Select,
            "replace" => Command::Replace,
            other => bail!("unknown command {other}"),
        };
        if write && command == Command::Select {
            bail!("--write only applies to replace");
        }

        Ok(Self {
            command,
            inputs,
            matches_path: PathBuf::from(matches),
            format,
            write,
            config_path,
        })
    }
}

/// One line of `select` output.
#[derive(Debug, Serialize)]
struct SelectedMatch {
    found_offset: usize,
    flag_length: usize,
    content: String,
}

impl SelectedMatch {
    fn from_aligned(aligned: &[AlignedMatch<Match>]) -> Vec<Self> {
        aligned
            .iter()
            .map(|m| SelectedMatch {
                found_offset: m.found_offset(),
                flag_length: m.flag_length(),
                content: m.original_match.content.clone(),
            })
            .collect()
    }
}

/// What happened in one region of a composite run.
#[derive(Debug, Serialize)]
struct RegionReport {
    region_id: String,
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    matches: Option<Vec<SelectedMatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            let path = Config::expand_path(path).unwrap_or_else(|| path.clone());
            log::info!("Loading config from {}", path.display());
            Config::load_from_path(&path)?
                .with_context(|| format!("config file {} not found", path.display()))
        }
        None => {
            let config = Config::load()?;
            if config.is_none() {
                log::info!(
                    "No config file at {}, using defaults",
                    Config::config_path().display()
                );
            }
            Ok(config.unwrap_or_default())
        }
    }
}

fn aligner_from(config: &Config) -> Aligner {
    let normalization = &config.normalization;
    let policy = NormalizationPolicy {
        strip_tags: normalization.strip_tags,
        decode_entities: normalization.decode_entities,
        nbsp_as_space: normalization.nbsp_as_space,
        collapse_whitespace: normalization.collapse_whitespace,
        equivalents: normalization
            .equivalents
            .iter()
            .map(|eq| Equivalence::new(&eq.from, &eq.to))
            .collect(),
    };
    let diff = DiffOptions {
        timeout: config.diff.timeout(),
    };
    Aligner::new(policy, diff)
}

/// Checks the snapshot of one file; alignment then runs against its
/// current text.
async fn checked_adapter(
    snapshot: &str,
    current: &str,
    format: InputFormat,
    aligner: Aligner,
) -> Result<(CheckAdapter<RecordedFile>, String)> {
    let mut adapter =
        CheckAdapter::with_aligner(RecordedFile::new(snapshot, current, format), aligner);
    let check_id = Uuid::new_v4().to_string();

    let extraction = adapter.extract_content_for_check().await?;
    adapter.register_check_call(&check_id);
    adapter.register_check_result(&CheckResult::new(
        &check_id,
        Span::new(0, extraction.content.len()),
    ))?;
    Ok((adapter, check_id))
}

/// Checks every region as one composed document, wrapped and named the way
/// the config says.
async fn checked_composite(
    regions: &[(String, String)],
    config: &Config,
    format: InputFormat,
    aligner: &Aligner,
) -> Result<(CompositeAdapter, Vec<String>, String)> {
    let mut composite = CompositeAdapter::with_defaults(
        &config.composite.default_wrapper,
        &config.composite.region_id_prefix,
    );
    let ids: Vec<String> = regions
        .iter()
        .map(|(snapshot, current)| {
            let surface = RecordedFile::new(snapshot.as_str(), current, format);
            composite.add_region(CheckAdapter::with_aligner(surface, aligner.clone()), None, None)
        })
        .collect();
    let check_id = Uuid::new_v4().to_string();

    let extraction = composite.extract_content_for_check().await?;
    composite.register_check_call(&check_id);
    composite.register_check_result(&CheckResult::new(
        &check_id,
        Span::new(0, extraction.content.len()),
    ))?;
    Ok((composite, ids, check_id))
}

fn pair_for<'a>(ids: &[String], pairs: &'a [FilePair], region_id: &str) -> Option<&'a FilePair> {
    ids.iter()
        .position(|id| id == region_id)
        .and_then(|idx| pairs.get(idx))
}

async fn run_single(options: &Options, pair: &FilePair, aligner: Aligner) -> Result<()> {
    let snapshot = io::read_text(&pair.snapshot)?;
    let current = io::read_text(&pair.current)?;

    let (mut adapter, check_id) =
        checked_adapter(&snapshot, &current, options.format, aligner).await?;
    log::info!("Realigning against {} (check {check_id})", pair.current.display());

    match options.command {
        Command::Select => {
            let matches: Vec<Match> = io::load_matches(&options.matches_path)?;
            let aligned = adapter.select_ranges(&check_id, &matches)?;
            log::info!("Aligned {} of {} matches", aligned.len(), matches.len());
            let selected = SelectedMatch::from_aligned(&aligned);
            println!("{}", serde_json::to_string_pretty(&selected)?);
        }
        Command::Replace => {
            let matches: Vec<MatchWithReplacement> = io::load_matches(&options.matches_path)?;
            let outcome = adapter.replace_ranges(&check_id, matches)?;
            if options.write {
                io::write_text(&pair.current, &outcome.text)?;
                log::info!("Wrote {}", pair.current.display());
            } else {
                print!("{}", outcome.text);
            }
        }
    }
    Ok(())
}

async fn run_regions(
    options: &Options,
    pairs: &[FilePair],
    config: &Config,
    aligner: Aligner,
) -> Result<()> {
    let texts = pairs
        .iter()
        .map(|pair| -> Result<(String, String)> {
            Ok((io::read_text(&pair.snapshot)?, io::read_text(&pair.current)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let (mut composite, ids, check_id) =
        checked_composite(&texts, config, options.format, &aligner).await?;
    log::info!("Realigning {} regions (check {check_id})", ids.len());

    let file_of = |region_id: &str| pair_for(&ids, pairs, region_id);
    let mut reports = Vec::new();

    match options.command {
        Command::Select => {
            let matches: Vec<Match> = io::load_matches(&options.matches_path)?;
            for outcome in composite.select_ranges(&check_id, &matches)? {
                let file = file_of(&outcome.region_id)
                    .map(|pair| pair.current.display().to_string())
                    .unwrap_or_default();
                let (matches, error) = match outcome.result {
                    Ok(aligned) => (Some(SelectedMatch::from_aligned(&aligned)), None),
                    Err(err) => (None, Some(err.to_string())),
                };
                reports.push(RegionReport {
                    region_id: outcome.region_id,
                    file,
                    matches,
                    text: None,
                    error,
                });
            }
        }
        Command::Replace => {
            let matches: Vec<MatchWithReplacement> = io::load_matches(&options.matches_path)?;
            for outcome in composite.replace_ranges(&check_id, matches)? {
                let pair = file_of(&outcome.region_id);
                let file = pair
                    .map(|pair| pair.current.display().to_string())
                    .unwrap_or_default();
                let (text, error) = match outcome.result {
                    Ok(replaced) => {
                        if let Some(pair) = pair.filter(|_| options.write) {
                            io::write_text(&pair.current, &replaced.text)?;
                            log::info!("Wrote {}", pair.current.display());
                        }
                        (Some(replaced.text), None)
                    }
                    Err(err) => {
                        log::warn!("Region {} left unchanged: {err}", outcome.region_id);
                        (None, Some(err.to_string()))
                    }
                };
                reports.push(RegionReport {
                    region_id: outcome.region_id,
                    file,
                    matches: None,
                    text,
                    error,
                });
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

async fn run(options: Options) -> Result<()> {
    let config = load_config(options.config_path.as_ref())?;
    let aligner = aligner_from(&config);

    match &options.inputs {
        Inputs::Single(pair) => run_single(&options, pair, aligner).await,
        Inputs::Regions(pairs) => run_regions(&options, pairs, &config, aligner).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Info by default; RUST_LOG still wins
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match Options::parse(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    if let Err(e) = run(options).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
