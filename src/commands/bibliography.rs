//! Bibliography command handlers: list, add, annotate, delete, and export.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use foliocite_core::{Accounts, Bibliography, Database, format_citation};

use crate::cli::{Args, BibArgs, BibCommand};
use crate::commands::record_from_args;

pub async fn run_bib_command(args: &Args, bib: &BibArgs) -> Result<()> {
    let db = Database::new(&args.db).await?;
    let accounts = Accounts::new(db.clone());
    let user = accounts.ensure(&bib.user).await?;
    let store = Bibliography::new(db);

    match &bib.command {
        BibCommand::List { filter } => {
            let entries = store.list(user.id, *filter).await?;
            if entries.is_empty() {
                println!("Bibliography for '{}' is empty.", user.username);
                return Ok(());
            }

            println!("Bibliography for '{}' ({}):", user.username, filter);
            for entry in &entries {
                let citation = format_citation(&entry.record(), entry.style());
                println!("[{}] {}", entry.id, citation.plain);
                if let Some(note) = &entry.note {
                    println!("      note: {note}");
                }
            }
        }
        BibCommand::Add(add) => {
            let record = record_from_args(&add.record)?;
            let id = store
                .save(user.id, &record, add.style, add.note.as_deref())
                .await?;
            let citation = format_citation(&record, add.style);
            println!("Saved entry {id}: {}", citation.plain);
        }
        BibCommand::Note { id, note } => {
            store.update_note(user.id, *id, note.as_deref()).await?;
            match note {
                Some(_) => println!("Updated note on entry {id}."),
                None => println!("Cleared note on entry {id}."),
            }
        }
        BibCommand::Delete { id } => {
            store.delete(user.id, *id).await?;
            println!("Deleted entry {id}.");
        }
        BibCommand::Clear => {
            let removed = store.clear(user.id).await?;
            let noun = if removed == 1 { "entry" } else { "entries" };
            println!("Removed {removed} {noun}.");
        }
        BibCommand::Export { format, output } => {
            let payload = store.export(user.id, *format).await?;
            let path = output
                .clone()
                .unwrap_or_else(|| PathBuf::from(format!("bibliography.{}", format.extension())));
            fs::write(&path, &payload)
                .with_context(|| format!("failed to write export to {}", path.display()))?;
            println!("Exported bibliography to {}.", path.display());
        }
    }

    Ok(())
}
