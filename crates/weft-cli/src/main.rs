use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use weft::{LayoutSettings, NodeKey, PlacementStrategy, RankAlignment};
use weft_host::{
    ComplexityReport, GraphDocument, HostError, MemorySizeCache, auto_layout,
    connected_components, extract,
};

const LOG_ENV: &str = "WEFT_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Host(HostError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Host(err) => write!(f, "{err}\n{}", err.guidance()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<HostError> for CliError {
    fn from(value: HostError) -> Self {
        Self::Host(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Components,
    Complexity,
}

#[derive(Debug, Clone, Copy)]
struct Placement(PlacementStrategy);

impl FromStr for Placement {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self(PlacementStrategy::Simple)),
            "compact" => Ok(Self(PlacementStrategy::Compact)),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Align(RankAlignment);

impl FromStr for Align {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self(RankAlignment::Left)),
            "center" | "centre" => Ok(Self(RankAlignment::Center)),
            "right" => Ok(Self(RankAlignment::Right)),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    config: Option<String>,
    placement: Option<PlacementStrategy>,
    align: Option<RankAlignment>,
    select: Vec<NodeKey>,
}

fn usage() -> &'static str {
    "weft-cli\n\
\n\
USAGE:\n\
  weft-cli [layout] [--pretty] [--config <path>] [--placement simple|compact] [--align left|center|right] [--select <uuid>]... [--verbose] [<path>|-]\n\
  weft-cli components [--pretty] [<path>|-]\n\
  weft-cli complexity [--pretty] [--select <uuid>]... [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the JSON graph document is read from stdin.\n\
  - Without --select every node is selected.\n\
  - --config reads layout settings as JSON; --placement and --align override it.\n\
  - Logs go to stderr; filter them with WEFT_LOG (default: warn, --verbose: debug).\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "components" => args.command = Command::Components,
            "complexity" => args.command = Command::Complexity,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--placement" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let Placement(p) = kind.parse::<Placement>().map_err(|_| CliError::Usage(usage()))?;
                args.placement = Some(p);
            }
            "--align" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let Align(al) = kind.parse::<Align>().map_err(|_| CliError::Usage(usage()))?;
                args.align = Some(al);
            }
            "--select" => {
                let Some(key) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.select
                    .push(key.parse::<NodeKey>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_settings(args: &Args) -> Result<LayoutSettings, CliError> {
    let mut settings = match args.config.as_deref() {
        Some(path) => serde_json::from_str::<LayoutSettings>(&std::fs::read_to_string(path)?)?,
        None => LayoutSettings::default(),
    };
    if let Some(p) = args.placement {
        settings.placement = p;
    }
    if let Some(al) = args.align {
        settings.rank_alignment = al;
    }
    Ok(settings)
}

/// Explicit selection, or every node of the document.
fn selection(args: &Args, doc: &GraphDocument) -> Vec<NodeKey> {
    if args.select.is_empty() {
        doc.nodes.iter().map(|n| n.key).collect()
    } else {
        args.select.clone()
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let doc = GraphDocument::from_json(&text)?;
    let cache = MemorySizeCache::new();
    tracing::debug!(graph_id = %doc.graph_id, nodes = doc.nodes.len(), links = doc.links.len(), "read graph document");

    match args.command {
        Command::Layout => {
            let settings = load_settings(&args)?;
            let report = auto_layout(&doc, &selection(&args, &doc), &settings, &cache)?;
            write_json(&report, args.pretty)
        }
        Command::Components => {
            let extracted = extract(&doc, &cache)?;
            let components: Vec<Vec<NodeKey>> = connected_components(&extracted)
                .iter()
                .map(|c| c.iter().filter_map(|&id| extracted.key(id)).collect())
                .collect();
            write_json(&components, args.pretty)
        }
        Command::Complexity => {
            let extracted = extract(&doc, &cache)?;
            let mut selected = BTreeSet::new();
            for key in selection(&args, &doc) {
                let id = extracted
                    .id(key)
                    .ok_or(HostError::SelectionOutsideGraph { key })?;
                selected.insert(id);
            }
            write_json(&ComplexityReport::compute(&extracted, &selected), args.pretty)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
