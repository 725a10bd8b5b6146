//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use foliocite_core::{CitationStyle, EntryFilter, ExportFormat, SourceKind};

/// Search catalogs, format citations, and keep a personal bibliography.
///
/// FolioCite looks up source metadata on Open Library and Crossref, renders
/// it in five citation styles, and stores per-user bibliographies in SQLite.
#[derive(Parser, Debug)]
#[command(name = "foliocite")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the bibliography database
    #[arg(long, default_value = "foliocite.db", global = true)]
    pub db: PathBuf,

    /// Contact email sent to catalog APIs that ask for one
    #[arg(long, default_value = "foliocite@example.com", global = true)]
    pub mailto: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search catalogs for source metadata and preview citations
    Search(SearchArgs),
    /// Format a citation from metadata given on the command line
    Cite(CiteArgs),
    /// Manage a saved bibliography
    Bib(BibArgs),
}

/// Arguments for the `search` command.
#[derive(ClapArgs, Debug)]
pub struct SearchArgs {
    /// Free-text query, ISBN, or DOI
    pub query: String,

    /// Source kind to search for
    #[arg(short, long, default_value = "book")]
    pub kind: SourceKind,

    /// Citation style for candidate previews
    #[arg(short, long, default_value = "apa")]
    pub style: CitationStyle,

    /// Maximum number of candidates (1-20)
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=20))]
    pub limit: u8,
}

/// Source metadata fields shared by `cite` and `bib add`.
#[derive(ClapArgs, Debug)]
pub struct RecordArgs {
    /// Source kind the metadata describes
    #[arg(short, long, default_value = "book")]
    pub kind: SourceKind,

    /// Source title
    #[arg(short, long)]
    pub title: String,

    /// Author display name in citation order; repeat for multiple authors
    #[arg(short, long = "author")]
    pub author: Vec<String>,

    /// Publication year
    #[arg(short, long, allow_negative_numbers = true)]
    pub year: Option<i32>,

    /// Publisher (books)
    #[arg(long)]
    pub publisher: Option<String>,

    /// Place of publication (books)
    #[arg(long)]
    pub place: Option<String>,

    /// Journal name (articles)
    #[arg(long)]
    pub journal: Option<String>,

    /// Volume (articles)
    #[arg(long)]
    pub volume: Option<String>,

    /// Issue (articles)
    #[arg(long)]
    pub issue: Option<String>,

    /// Page range (articles)
    #[arg(long)]
    pub pages: Option<String>,

    /// DOI (articles)
    #[arg(long)]
    pub doi: Option<String>,

    /// Site name (websites)
    #[arg(long)]
    pub site_name: Option<String>,

    /// URL (websites)
    #[arg(long)]
    pub url: Option<String>,

    /// Access date (websites), e.g. "12 Jan 2026"
    #[arg(long)]
    pub accessed: Option<String>,
}

/// Arguments for the `cite` command.
#[derive(ClapArgs, Debug)]
pub struct CiteArgs {
    #[command(flatten)]
    pub record: RecordArgs,

    /// Citation style to render
    #[arg(short, long, default_value = "apa")]
    pub style: CitationStyle,

    /// Also print the HTML rendering
    #[arg(long)]
    pub html: bool,

    /// Also print the BibTeX entry
    #[arg(long)]
    pub bibtex: bool,
}

/// Arguments for the `bib` command family.
#[derive(ClapArgs, Debug)]
pub struct BibArgs {
    /// Bibliography owner
    #[arg(short, long, default_value = "default")]
    pub user: String,

    #[command(subcommand)]
    pub command: BibCommand,
}

/// Bibliography subcommands.
#[derive(Subcommand, Debug)]
pub enum BibCommand {
    /// List saved entries
    List {
        /// Restrict the listing to one source kind
        #[arg(short, long, default_value = "all")]
        filter: EntryFilter,
    },
    /// Save a new entry from metadata given on the command line
    Add(AddArgs),
    /// Set or clear the note on an entry
    Note {
        /// Entry ID
        id: i64,
        /// New note text; omit to clear
        note: Option<String>,
    },
    /// Delete one entry
    Delete {
        /// Entry ID
        id: i64,
    },
    /// Delete all entries
    Clear,
    /// Export the bibliography to a file
    Export {
        /// Output format
        #[arg(short, long, default_value = "txt")]
        format: ExportFormat,

        /// Output path (defaults to bibliography.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Arguments for `bib add`.
#[derive(ClapArgs, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub record: RecordArgs,

    /// Citation style stored with the entry
    #[arg(short, long, default_value = "apa")]
    pub style: CitationStyle,

    /// Private note kept with the entry (never exported)
    #[arg(short, long)]
    pub note: Option<String>,
}
