//! BibTeX entry generation.
//!
//! Records export as `@book`, `@article`, or `@online` entries. Keys are
//! derived from the first author's surname and the year (`hopfield1982`);
//! [`disambiguate_keys`] appends `a`, `b`, ... when several records in one
//! export collide on the same key.

use std::collections::HashMap;

use super::authors::AuthorName;
use crate::source::SourceRecord;

/// One BibTeX entry, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BibTexEntry {
    entry_type: &'static str,
    key: String,
    fields: Vec<(&'static str, String)>,
}

impl BibTexEntry {
    pub(crate) fn from_record(record: &SourceRecord) -> Self {
        let mut fields: Vec<(&'static str, String)> = Vec::new();

        let authors: Vec<String> = record
            .authors()
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if !authors.is_empty() {
            fields.push(("author", authors.join(" and ")));
        }
        fields.push(("title", record.title().to_string()));

        let entry_type = match record {
            SourceRecord::Book(book) => {
                push_opt(&mut fields, "publisher", book.publisher.as_deref());
                push_opt(&mut fields, "address", book.place.as_deref());
                "book"
            }
            SourceRecord::Article(article) => {
                push_opt(&mut fields, "journal", article.journal.as_deref());
                push_opt(&mut fields, "volume", article.volume.as_deref());
                push_opt(&mut fields, "number", article.issue.as_deref());
                push_opt(&mut fields, "pages", article.pages.as_deref());
                push_opt(&mut fields, "doi", article.doi.as_deref());
                "article"
            }
            SourceRecord::Website(site) => {
                push_opt(&mut fields, "organization", site.site_name.as_deref());
                push_opt(&mut fields, "url", site.url.as_deref());
                push_opt(&mut fields, "urldate", site.accessed.as_deref());
                "online"
            }
        };

        if let Some(year) = record.year() {
            fields.push(("year", year.to_string()));
        }

        Self {
            entry_type,
            key: citation_key(record),
            fields,
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.fields.len() + 2);
        lines.push(format!("@{}{{{},", self.entry_type, self.key));
        for (name, value) in &self.fields {
            lines.push(format!("  {name} = {{{}}},", escape_bibtex(value)));
        }
        lines.push("}".to_string());
        lines.join("\n")
    }
}

fn push_opt(fields: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        let value = value.trim();
        if !value.is_empty() {
            fields.push((name, value.to_string()));
        }
    }
}

/// `surname + year`, lowercased and stripped to ASCII alphanumerics, with
/// `anon` and `nd` standing in for a missing author or year.
pub(crate) fn citation_key(record: &SourceRecord) -> String {
    let surname = record
        .authors()
        .iter()
        .filter_map(|raw| AuthorName::parse(raw))
        .next()
        .map(|name| {
            name.surname()
                .to_lowercase()
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "anon".to_string());
    let year = record
        .year()
        .map_or_else(|| "nd".to_string(), |y| y.to_string());
    format!("{surname}{year}")
}

/// Appends `a`, `b`, ... `z`, `aa`, ... to every member of each colliding
/// key group, in list order. Unique keys are left alone.
pub(crate) fn disambiguate_keys(entries: &mut [BibTexEntry]) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for entry in entries.iter() {
        *counts.entry(entry.key.clone()).or_insert(0) += 1;
    }

    let mut assigned: HashMap<String, usize> = HashMap::new();
    for entry in entries.iter_mut() {
        if counts.get(&entry.key).copied().unwrap_or(0) < 2 {
            continue;
        }
        let base = entry.key.clone();
        let index = assigned.entry(base.clone()).or_insert(0);
        entry.key = format!("{base}{}", key_suffix(*index));
        *index += 1;
    }
}

/// Spreadsheet-column suffixes: 0 is `a`, 25 is `z`, 26 is `aa`.
fn key_suffix(mut index: usize) -> String {
    let mut out = String::new();
    loop {
        let letter = char::from(b'a' + u8::try_from(index % 26).unwrap_or(0));
        out.insert(0, letter);
        index /= 26;
        if index == 0 {
            break;
        }
        index -= 1;
    }
    out
}

/// Backslash-escapes the characters BibTeX treats specially in field values.
fn escape_bibtex(value: &str) -> String {
    value
        .replace('&', "\\&")
        .replace('%', "\\%")
        .replace('#', "\\#")
        .replace('_', "\\_")
        .replace('{', "\\{")
        .replace('}', "\\}")
}
