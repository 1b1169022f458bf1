//! Command-line front end for editing quest documents.
//!
//! Every subcommand loads the three documents, runs one operation from
//! `quest-records`, and writes the loaded documents back when something
//! changed.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use quest_records::{PairKind, RecordId};
use std::path::PathBuf;

use crate::config::{EditorConfig, PathOverrides};
use crate::output::CommandResponse;

mod commands;
mod config;
mod output;

pub use config::CONFIG_FILE_NAME;

#[derive(Parser)]
#[command(name = "quest-editor")]
#[command(about = "Edit quest records across QuestInfo, Check and Act documents", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the documents (and quest-editor.toml)
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// Config file (defaults to quest-editor.toml in --dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Definition document path, relative to --dir
    #[arg(long, global = true)]
    questinfo: Option<PathBuf>,

    /// Requirements document path, relative to --dir
    #[arg(long, global = true)]
    check: Option<PathBuf>,

    /// Rewards document path, relative to --dir
    #[arg(long, global = true)]
    act: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List quests from the definition document
    List(ListArgs),

    /// Print one quest as an editable JSON draft
    Show(ShowArgs),

    /// Clone a base quest to targets and write a draft over the copies
    Save(SaveArgs),

    /// Copy a quest to one or more new ids in every document
    Clone(CloneArgs),

    /// Remove a quest from every document
    Delete(DeleteArgs),

    /// Check a pair-list text file for lines that would be dropped
    Validate(ValidateArgs),
}

#[derive(Args)]
struct ListArgs {
    /// Keep quests whose id or name contains this text
    #[arg(long)]
    filter: Option<String>,

    /// Output JSON envelope
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ShowArgs {
    id: RecordId,

    /// Output JSON envelope
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SaveArgs {
    /// Quest to copy unrelated data from
    #[arg(long)]
    base: RecordId,

    /// Target ids, separated by commas and/or spaces
    #[arg(long)]
    targets: String,

    /// Draft JSON file (`-` for stdin), as printed by `show`
    #[arg(long)]
    draft: PathBuf,

    /// Overwrite targets that already exist
    #[arg(long)]
    force: bool,

    /// Output JSON envelope
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CloneArgs {
    source: RecordId,

    /// Target ids, separated by commas and/or spaces
    targets: String,

    /// Overwrite targets that already exist
    #[arg(long)]
    force: bool,

    /// Output JSON envelope
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DeleteArgs {
    id: RecordId,

    /// Output JSON envelope
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ValidateArgs {
    /// Pair-list flavour of the file
    #[arg(long, value_enum, default_value = "id-count")]
    kind: KindArg,

    /// Text file to check (`-` for stdin)
    file: PathBuf,

    /// Output JSON envelope
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    IdCount,
    IdState,
}

impl From<KindArg> for PairKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::IdCount => PairKind::IdCount,
            KindArg::IdState => PairKind::IdState,
        }
    }
}

impl Commands {
    fn json(&self) -> bool {
        match self {
            Commands::List(args) => args.json,
            Commands::Show(args) => args.json,
            Commands::Save(args) => args.json,
            Commands::Clone(args) => args.json,
            Commands::Delete(args) => args.json,
            Commands::Validate(args) => args.json,
        }
    }
}

fn init_logging(cli: &Cli, json_output: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || json_output {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn run(cli: Cli) -> Result<CommandResponse> {
    let overrides = PathOverrides {
        questinfo: cli.questinfo,
        check: cli.check,
        act: cli.act,
    };
    let config = EditorConfig::resolve(&cli.dir, cli.config.as_deref())?.with_overrides(overrides);
    config.validate()?;
    let paths = config.document_paths(&cli.dir);

    match cli.command {
        Commands::List(args) => commands::list(&paths, args.filter.as_deref()),
        Commands::Show(args) => commands::show(&paths, args.id),
        Commands::Save(args) => commands::save(
            &paths,
            commands::SaveRequest {
                base: args.base,
                targets: &args.targets,
                draft: &args.draft,
                force: args.force,
            },
        ),
        Commands::Clone(args) => commands::clone(&paths, args.source, &args.targets, args.force),
        Commands::Delete(args) => commands::delete(&paths, args.id),
        Commands::Validate(args) => commands::validate(&args.file, args.kind.into()),
    }
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    let json_output = cli.command.json();
    init_logging(&cli, json_output);

    let response = match run(cli) {
        Ok(response) => response,
        Err(err) => {
            log::debug!("Command failed: {err:?}");
            CommandResponse::error(&err)
        }
    };
    response.emit(json_output)?;
    if response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}
