//! Search command handler: query catalogs and preview candidate citations.

use anyhow::Result;
use foliocite_core::{build_default_provider_registry, format_citation, parse_query};

use crate::cli::{Args, SearchArgs};

pub async fn run_search_command(args: &Args, search: &SearchArgs) -> Result<()> {
    let registry = build_default_provider_registry(&args.mailto);
    let query = parse_query(&search.query);

    let records = registry
        .search(search.kind, &query, usize::from(search.limit))
        .await?;

    if records.is_empty() {
        println!("No results for '{}'. Try another query.", search.query);
        return Ok(());
    }

    println!(
        "Found {} candidate(s) for '{}' ({} query, previews in {}):",
        records.len(),
        search.query,
        query.kind,
        search.style.label()
    );
    for (index, record) in records.iter().enumerate() {
        let citation = format_citation(record, search.style);
        println!("{:>3}. {}", index + 1, citation.plain);
    }

    Ok(())
}
