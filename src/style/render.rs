//! Citation layout.
//!
//! [`segments`] turns a source record into an ordered list of [`Segment`]s
//! under one style's rules. Each style function only decides which clauses
//! appear and in what order; spacing, terminal periods, and skipping of
//! absent fields live in [`Composer`] and the clause helpers, so a record
//! with missing optional fields never produces doubled punctuation or
//! dangling separators.

use super::authors::author_list;
use super::rules::{StyleRules, rules_for};
use super::{CitationStyle, Segment};
use crate::source::{SourceKind, SourceRecord};

/// Renders `record` as styled text segments.
pub(crate) fn segments(record: &SourceRecord, style: CitationStyle) -> Vec<Segment> {
    let rules = rules_for(style);
    match style {
        CitationStyle::Apa => apa(record, rules),
        CitationStyle::Mla => mla(record, rules),
        CitationStyle::Chicago => chicago(record, rules),
        CitationStyle::Harvard => harvard(record, rules),
        CitationStyle::Vancouver => vancouver(record, rules),
    }
}

fn apa(record: &SourceRecord, rules: &StyleRules) -> Vec<Segment> {
    let mut c = Composer::new();
    let authors = author_list(record.authors(), &rules.authors);
    let year = year_text(record.year(), rules);
    c.text(paren_year_head(authors, year));
    match record.kind() {
        SourceKind::Book => {
            c.push(container_chunk(record.title(), rules));
            if let Some(publisher) = nonempty(record.publisher()) {
                c.text(with_period(publisher));
            }
        }
        SourceKind::Article => {
            c.push(item_title_chunk(record.title(), rules));
            c.push(comma_clause(vec![
                nonempty(record.journal()).map(|j| (j.to_string(), rules.italic_container)),
                vol_issue(record.volume(), record.issue()).map(|v| (v, false)),
                nonempty(record.pages()).map(|p| (p.to_string(), false)),
            ]));
            if let Some(doi) = nonempty(record.doi()) {
                c.text(doi_link(doi));
            }
        }
        SourceKind::Website => {
            c.push(item_title_chunk(record.title(), rules));
            if let Some(site) = nonempty(record.site_name()) {
                c.push(container_chunk(site, rules));
            }
            if let Some(url) = nonempty(record.url()) {
                c.text(url.to_string());
            }
        }
    }
    c.finish()
}

fn mla(record: &SourceRecord, rules: &StyleRules) -> Vec<Segment> {
    let mut c = Composer::new();
    let authors = author_list(record.authors(), &rules.authors);
    let year = year_text(record.year(), rules);
    if let Some(authors) = &authors {
        c.text(with_period(authors));
    }
    match record.kind() {
        SourceKind::Book => {
            c.push(container_chunk(record.title(), rules));
            c.push(comma_clause(vec![
                nonempty(record.publisher()).map(|p| (p.to_string(), false)),
                year.map(|y| (y, false)),
            ]));
        }
        SourceKind::Article => {
            c.push(item_title_chunk(record.title(), rules));
            c.push(comma_clause(vec![
                nonempty(record.journal()).map(|j| (j.to_string(), rules.italic_container)),
                nonempty(record.volume()).map(|v| (format!("vol. {v}"), false)),
                nonempty(record.issue()).map(|i| (format!("no. {i}"), false)),
                year.map(|y| (y, false)),
                nonempty(record.pages()).map(|p| (format!("pp. {p}"), false)),
            ]));
        }
        SourceKind::Website => {
            c.push(item_title_chunk(record.title(), rules));
            c.push(comma_clause(vec![
                nonempty(record.site_name()).map(|s| (s.to_string(), rules.italic_container)),
                year.map(|y| (y, false)),
                nonempty(record.url()).map(|u| (u.to_string(), false)),
            ]));
            if let Some(accessed) = nonempty(record.accessed()) {
                c.text(with_period(&format!("Accessed {accessed}")));
            }
        }
    }
    c.finish()
}

fn chicago(record: &SourceRecord, rules: &StyleRules) -> Vec<Segment> {
    let mut c = Composer::new();
    let authors = author_list(record.authors(), &rules.authors);
    let year = year_text(record.year(), rules);
    if let Some(authors) = &authors {
        c.text(with_period(authors));
    }
    if let Some(year) = &year {
        c.text(with_period(year));
    }
    match record.kind() {
        SourceKind::Book => {
            c.push(container_chunk(record.title(), rules));
            if let Some(imprint) = imprint_clause(record.place(), record.publisher()) {
                c.text(imprint);
            }
        }
        SourceKind::Article => {
            c.push(item_title_chunk(record.title(), rules));
            c.push(chicago_journal_clause(
                record.journal(),
                record.volume(),
                record.issue(),
                record.pages(),
                rules,
            ));
        }
        SourceKind::Website => {
            c.push(item_title_chunk(record.title(), rules));
            if let Some(site) = nonempty(record.site_name()) {
                c.push(container_chunk(site, rules));
            }
            if let Some(url) = nonempty(record.url()) {
                c.text(with_period(url));
            }
            if let Some(accessed) = nonempty(record.accessed()) {
                c.text(with_period(&format!("(accessed {accessed})")));
            }
        }
    }
    c.finish()
}

fn harvard(record: &SourceRecord, rules: &StyleRules) -> Vec<Segment> {
    let mut c = Composer::new();
    let authors = author_list(record.authors(), &rules.authors);
    let year = year_text(record.year(), rules);
    c.text(harvard_head(authors, year));
    match record.kind() {
        SourceKind::Book => {
            c.push(container_chunk(record.title(), rules));
            if let Some(imprint) = imprint_clause(record.place(), record.publisher()) {
                c.text(imprint);
            }
        }
        SourceKind::Article => {
            c.push(item_title_chunk(record.title(), rules));
            c.push(comma_clause(vec![
                nonempty(record.journal()).map(|j| (j.to_string(), rules.italic_container)),
                vol_issue(record.volume(), record.issue()).map(|v| (v, false)),
                nonempty(record.pages()).map(|p| (p.to_string(), false)),
            ]));
        }
        SourceKind::Website => {
            c.push(item_title_chunk(record.title(), rules));
            if let Some(site) = nonempty(record.site_name()) {
                c.push(container_chunk(site, rules));
            }
            if let Some(url) = nonempty(record.url()) {
                let availability = match nonempty(record.accessed()) {
                    Some(date) => format!("Available at: {url} (Accessed: {date})."),
                    None => with_period(&format!("Available at: {url}")),
                };
                c.text(availability);
            }
        }
    }
    c.finish()
}

fn vancouver(record: &SourceRecord, rules: &StyleRules) -> Vec<Segment> {
    let mut c = Composer::new();
    let authors = author_list(record.authors(), &rules.authors);
    let year = year_text(record.year(), rules);
    if let Some(authors) = &authors {
        c.text(with_period(authors));
    }
    match record.kind() {
        SourceKind::Book => {
            c.push(container_chunk(record.title(), rules));
            c.text(vancouver_book_imprint_clause(
                record.place(),
                record.publisher(),
                year,
            ));
        }
        SourceKind::Article => {
            c.push(item_title_chunk(record.title(), rules));
            if let Some(journal) = nonempty(record.journal()) {
                c.push(container_chunk(journal, rules));
            }
            c.text(vancouver_article_date_clause(
                year,
                record.volume(),
                record.issue(),
                record.pages(),
            ));
        }
        SourceKind::Website => {
            c.push(item_title_chunk(record.title(), rules));
            if let Some(site) = nonempty(record.site_name()) {
                c.push(container_chunk(site, rules));
            }
            if let Some(year) = &year {
                c.text(with_period(year));
            }
            if let Some(url) = nonempty(record.url()) {
                c.text(with_period(&format!("Available from: {url}")));
            }
        }
    }
    c.finish()
}

// ==================== Clause Helpers ====================

/// Joins chunks with single spaces, dropping chunks that carry no text.
struct Composer {
    segments: Vec<Segment>,
}

impl Composer {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push(&mut self, chunk: Vec<Segment>) {
        let chunk: Vec<Segment> = chunk
            .into_iter()
            .filter(|segment| !segment.text.is_empty())
            .collect();
        if chunk.is_empty() {
            return;
        }
        if !self.segments.is_empty() {
            self.segments.push(Segment::plain(" "));
        }
        self.segments.extend(chunk);
    }

    fn text(&mut self, text: String) {
        if text.trim().is_empty() {
            return;
        }
        self.push(vec![Segment::plain(text)]);
    }

    fn finish(self) -> Vec<Segment> {
        self.segments
    }
}

/// Ensures `text` ends with terminal punctuation. Empty input stays empty.
fn with_period(text: &str) -> String {
    let text = text.trim_end();
    if text.is_empty() {
        return String::new();
    }
    if text.ends_with(['.', '?', '!']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn doi_link(doi: &str) -> String {
    if doi.starts_with("http") {
        doi.to_string()
    } else {
        format!("https://doi.org/{doi}")
    }
}

/// Container title (book title, site name), italic when the style says so,
/// always period-terminated.
fn container_chunk(name: &str, rules: &StyleRules) -> Vec<Segment> {
    let name = name.trim_end();
    if name.is_empty() {
        return Vec::new();
    }
    if rules.italic_container {
        if name.ends_with(['.', '?', '!']) {
            vec![Segment::italic(name)]
        } else {
            vec![Segment::italic(name), Segment::plain(".")]
        }
    } else {
        vec![Segment::plain(with_period(name))]
    }
}

/// Item title (article or web page title), quoted when the style says so.
fn item_title_chunk(title: &str, rules: &StyleRules) -> Vec<Segment> {
    let title = with_period(title);
    if title.is_empty() {
        return Vec::new();
    }
    if rules.quote_item_title {
        vec![Segment::plain(format!("\"{title}\""))]
    } else {
        vec![Segment::plain(title)]
    }
}

/// Comma-separated clause ending in a period. Each part is `(text, italic)`;
/// absent and blank parts vanish without leaving separators behind.
fn comma_clause(parts: Vec<Option<(String, bool)>>) -> Vec<Segment> {
    let parts: Vec<(String, bool)> = parts
        .into_iter()
        .flatten()
        .filter(|(text, _)| !text.trim().is_empty())
        .collect();
    let last = parts.len().saturating_sub(1);
    let mut out = Vec::new();
    for (i, (text, italic)) in parts.into_iter().enumerate() {
        match (italic, i == last) {
            (true, false) => {
                out.push(Segment::italic(text));
                out.push(Segment::plain(", "));
            }
            (true, true) => {
                let text = text.trim_end().to_string();
                let terminal = text.ends_with(['.', '?', '!']);
                out.push(Segment::italic(text));
                if !terminal {
                    out.push(Segment::plain("."));
                }
            }
            (false, false) => out.push(Segment::plain(format!("{text}, "))),
            (false, true) => out.push(Segment::plain(with_period(&text))),
        }
    }
    out
}

/// `volume(issue)`, or whichever half is present.
fn vol_issue(volume: Option<&str>, issue: Option<&str>) -> Option<String> {
    match (nonempty(volume), nonempty(issue)) {
        (Some(v), Some(i)) => Some(format!("{v}({i})")),
        (Some(v), None) => Some(v.to_string()),
        (None, Some(i)) => Some(format!("({i})")),
        (None, None) => None,
    }
}

fn year_text(year: Option<i32>, rules: &StyleRules) -> Option<String> {
    match year {
        Some(y) => Some(y.to_string()),
        None => rules.missing_year.map(ToOwned::to_owned),
    }
}

/// `Authors (Year).` head used by APA.
fn paren_year_head(authors: Option<String>, year: Option<String>) -> String {
    match (authors, year) {
        (Some(a), Some(y)) => format!("{a} ({y})."),
        (Some(a), None) => with_period(&a),
        (None, Some(y)) => format!("({y})."),
        (None, None) => String::new(),
    }
}

/// `Authors, Year.` head used by Harvard.
fn harvard_head(authors: Option<String>, year: Option<String>) -> String {
    match (authors, year) {
        (Some(a), Some(y)) => with_period(&format!("{a}, {y}")),
        (Some(a), None) => with_period(&a),
        (None, Some(y)) => with_period(&y),
        (None, None) => String::new(),
    }
}

/// `Place: Publisher.` with graceful fallback to whichever is present.
fn imprint_clause(place: Option<&str>, publisher: Option<&str>) -> Option<String> {
    match (nonempty(place), nonempty(publisher)) {
        (Some(pl), Some(pu)) => Some(format!("{pl}: {pu}.")),
        (Some(pl), None) => Some(with_period(pl)),
        (None, Some(pu)) => Some(with_period(pu)),
        (None, None) => None,
    }
}

/// `Journal Volume, no. Issue: Pages.` with the journal name italic.
fn chicago_journal_clause(
    journal: Option<&str>,
    volume: Option<&str>,
    issue: Option<&str>,
    pages: Option<&str>,
    rules: &StyleRules,
) -> Vec<Segment> {
    let Some(journal) = nonempty(journal) else {
        return comma_clause(vec![
            vol_issue(volume, issue).map(|v| (v, false)),
            nonempty(pages).map(|p| (p.to_string(), false)),
        ]);
    };
    let mut tail = String::new();
    if let Some(v) = nonempty(volume) {
        tail.push(' ');
        tail.push_str(v);
    }
    if let Some(i) = nonempty(issue) {
        tail.push_str(", no. ");
        tail.push_str(i);
    }
    if let Some(p) = nonempty(pages) {
        tail.push_str(": ");
        tail.push_str(p);
    }
    tail.push('.');
    if rules.italic_container {
        vec![Segment::italic(journal), Segment::plain(tail)]
    } else {
        vec![Segment::plain(format!("{journal}{tail}"))]
    }
}

/// `Year;Volume(Issue):Pages.` as Vancouver prints article dates.
fn vancouver_article_date_clause(
    year: Option<String>,
    volume: Option<&str>,
    issue: Option<&str>,
    pages: Option<&str>,
) -> String {
    let mut out = year.unwrap_or_default();
    if let Some(vi) = vol_issue(volume, issue) {
        if !out.is_empty() {
            out.push(';');
        }
        out.push_str(&vi);
    }
    if let Some(p) = nonempty(pages) {
        if !out.is_empty() {
            out.push(':');
        }
        out.push_str(p);
    }
    with_period(&out)
}

/// `Place: Publisher; Year.` as Vancouver prints book imprints.
fn vancouver_book_imprint_clause(
    place: Option<&str>,
    publisher: Option<&str>,
    year: Option<String>,
) -> String {
    let imprint = match (nonempty(place), nonempty(publisher)) {
        (Some(pl), Some(pu)) => Some(format!("{pl}: {pu}")),
        (Some(pl), None) => Some(pl.to_string()),
        (None, Some(pu)) => Some(pu.to_string()),
        (None, None) => None,
    };
    match (imprint, year) {
        (Some(im), Some(y)) => with_period(&format!("{im}; {y}")),
        (Some(im), None) => with_period(&im),
        (None, Some(y)) => with_period(&y),
        (None, None) => String::new(),
    }
}
