//! Cite command handler: format one source without saving it.

use anyhow::Result;
use foliocite_core::{SourceKind, format_citation};

use crate::cli::CiteArgs;
use crate::commands::record_from_args;

pub fn run_cite_command(cite: &CiteArgs) -> Result<()> {
    let record = record_from_args(&cite.record)?;

    if cite.style.requires_access_date()
        && record.kind() == SourceKind::Website
        && record.accessed().is_none()
    {
        eprintln!(
            "note: {} website citations usually carry an access date (--accessed).",
            cite.style.label()
        );
    }

    let citation = format_citation(&record, cite.style);

    println!("{}", citation.plain);
    if cite.html {
        println!("{}", citation.html);
    }
    if cite.bibtex {
        println!("{}", citation.bibtex);
    }

    Ok(())
}
