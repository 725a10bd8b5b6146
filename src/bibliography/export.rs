//! Bibliography export rendering.
//!
//! Each entry is rendered with the citation style it was saved under.
//! Notes are working annotations and never appear in any export format.

use std::fmt;
use std::io::{Cursor, Write as _};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::entry::BibliographyEntry;
use super::error::BibliographyError;
use crate::style::{BibTexEntry, citation_segments, disambiguate_keys, format_citation};

/// Supported bibliography export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Plain text, one formatted citation per line.
    Txt,
    /// BibTeX database.
    Bib,
    /// Minimal Word document with italics preserved.
    Docx,
}

impl ExportFormat {
    /// Returns the format name, which doubles as the file extension.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Bib => "bib",
            Self::Docx => "docx",
        }
    }

    /// File extension for exported files of this format.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "bib" => Ok(Self::Bib),
            "docx" => Ok(Self::Docx),
            other => Err(format!(
                "unknown export format: {other} (expected txt, bib, or docx)"
            )),
        }
    }
}

// ==================== Renderers ====================

/// Renders the plain-text export, one citation per line.
pub(crate) fn render_txt(entries: &[BibliographyEntry]) -> Vec<u8> {
    let mut out = String::new();
    for entry in entries {
        let citation = format_citation(&entry.record(), entry.style());
        out.push_str(&citation.plain);
        out.push('\n');
    }
    out.into_bytes()
}

/// Renders the BibTeX export with colliding keys disambiguated.
pub(crate) fn render_bib(entries: &[BibliographyEntry]) -> Vec<u8> {
    let mut bib_entries: Vec<BibTexEntry> = entries
        .iter()
        .map(|entry| BibTexEntry::from_record(&entry.record()))
        .collect();
    disambiguate_keys(&mut bib_entries);

    let rendered: Vec<String> = bib_entries.iter().map(BibTexEntry::render).collect();
    let mut out = rendered.join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out.into_bytes()
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Renders the Word export: a minimal OOXML package with one paragraph per
/// citation and italic runs for the styled segments.
///
/// # Errors
///
/// Returns [`BibliographyError::ExportFailed`] if the zip archive cannot
/// be written.
pub(crate) fn render_docx(entries: &[BibliographyEntry]) -> Result<Vec<u8>, BibliographyError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let document = render_document_xml(entries);
    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", RELS_XML),
        ("word/document.xml", document.as_str()),
    ];
    for (name, content) in parts {
        writer
            .start_file(name, options)
            .map_err(|e| BibliographyError::export_failed("docx", e.to_string()))?;
        writer
            .write_all(content.as_bytes())
            .map_err(|e| BibliographyError::export_failed("docx", e.to_string()))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| BibliographyError::export_failed("docx", e.to_string()))?;
    Ok(cursor.into_inner())
}

fn render_document_xml(entries: &[BibliographyEntry]) -> String {
    let mut body = String::new();
    for entry in entries {
        let segments = citation_segments(&entry.record(), entry.style());
        body.push_str("<w:p>");
        for segment in &segments {
            if segment.italic {
                body.push_str("<w:r><w:rPr><w:i/></w:rPr><w:t xml:space=\"preserve\">");
            } else {
                body.push_str("<w:r><w:t xml:space=\"preserve\">");
            }
            body.push_str(&html_escape::encode_text(&segment.text));
            body.push_str("</w:t></w:r>");
        }
        body.push_str("</w:p>");
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{body}</w:body></w:document>"
    )
}
