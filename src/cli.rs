use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use litdex::{
    Specifier,
    output::Format,
    query::{DEFAULT_END_YEAR, DEFAULT_START_YEAR, SearchConfig},
};

#[derive(Debug, Parser)]
#[command(
    name = "litdex",
    about = "Full-text search over a bibliographic library"
)]
pub struct Cli {
    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a project from a JSON array of records
    Create(CreateArgs),
    /// Convert source documents into searchable text
    Convert(ConvertArgs),
    /// Search the converted text of a project
    Search(SearchArgs),
    /// List project records or the distinct values of one field
    Show(ShowArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Create --

#[derive(Debug, Parser)]
pub struct CreateArgs {
    /// Path of the project file to write
    pub project: PathBuf,

    /// JSON file holding the records to import
    #[arg(short, long)]
    pub records: PathBuf,

    /// Directory for converted text files (default: XDG data directory)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Only import records written in this language (repeatable)
    #[arg(short, long = "lang")]
    pub langs: Vec<String>,

    /// Overwrite an existing project file
    #[arg(short, long)]
    pub force: bool,
}

// -- Convert --

#[derive(Debug, Parser)]
pub struct ConvertArgs {
    /// Project file
    #[arg(short, long)]
    pub project: PathBuf,

    #[command(flatten)]
    pub select: SelectArgs,

    /// Re-convert documents that already have text
    #[arg(short, long)]
    pub force: bool,
}

/// Entry selection. Each flag adds one specifier; no flags selects
/// every entry.
#[derive(Debug, Default, Parser)]
pub struct SelectArgs {
    /// Select entries with this title
    #[arg(long = "title")]
    pub titles: Vec<String>,

    /// Select entries by this author
    #[arg(long = "author")]
    pub authors: Vec<String>,

    /// Select entries from this publication
    #[arg(long = "publication")]
    pub publications: Vec<String>,

    /// Select entries from this year
    #[arg(long = "year")]
    pub years: Vec<u32>,

    /// Select the entry with this hash
    #[arg(long = "hash")]
    pub hashes: Vec<String>,
}

impl SelectArgs {
    pub fn specifiers(&self) -> Vec<Specifier> {
        self.titles
            .iter()
            .map(Specifier::title)
            .chain(self.authors.iter().map(Specifier::author))
            .chain(self.publications.iter().map(Specifier::publication))
            .chain(self.years.iter().copied().map(Specifier::year))
            .chain(self.hashes.iter().map(Specifier::hash))
            .collect()
    }
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Project file
    #[arg(short, long)]
    pub project: PathBuf,

    /// Whole-word term to count (repeatable)
    #[arg(short, long = "term")]
    pub terms: Vec<String>,

    /// Raw regular expression to count (repeatable)
    #[arg(short, long = "regexp")]
    pub regexps: Vec<String>,

    /// First year to search
    #[arg(long, default_value_t = DEFAULT_START_YEAR)]
    pub from: u32,

    /// Last year to search
    #[arg(long, default_value_t = DEFAULT_END_YEAR)]
    pub to: u32,

    /// Only search entries by this author (repeatable)
    #[arg(short, long = "author")]
    pub authors: Vec<String>,

    /// Only search entries from this publication (repeatable)
    #[arg(long = "publication")]
    pub publications: Vec<String>,

    /// Output format: pretty, csv, csv-no-hdr, or json
    #[arg(long, default_value = "pretty")]
    pub format: Format,

    /// Write results to this file instead of stdout
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,
}

impl SearchArgs {
    pub fn config(&self) -> SearchConfig {
        SearchConfig {
            terms: self.terms.clone(),
            regexps: self.regexps.clone(),
            authors: self.authors.clone(),
            publications: self.publications.clone(),
            start: self.from,
            end: self.to,
        }
    }
}

// -- Show --

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowField {
    /// Every field of every record, with its hash
    All,
    Years,
    Titles,
    Authors,
    Publications,
    Hashes,
    /// Distinct languages; an empty language shows as `<Not Specified>`
    Languages,
    /// Source document paths
    #[value(alias = "pdfs")]
    Files,
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Project file
    #[arg(short, long)]
    pub project: PathBuf,

    /// Which values to list
    #[arg(value_enum)]
    pub field: ShowField,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "litdex",
            &mut std::io::stdout(),
        );
    }
}
