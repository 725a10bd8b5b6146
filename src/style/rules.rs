//! Per-style formatting rules.
//!
//! Each citation style is described by one [`StyleRules`] table: how author
//! names are written, how long an author list may grow before truncation,
//! which separators join it, whether container titles are italicized,
//! whether item titles are quoted, and how an unknown year is rendered.
//! The shared routines in [`super::authors`] and [`super::render`] consume
//! these tables; no per-style function re-implements the edge cases.

use super::CitationStyle;

/// How a single author name is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameForm {
    /// `Family, F. M.` for every author (APA, Harvard).
    FamilyInitials,
    /// First author `Family, Given`, the rest `Given Family` (MLA, Chicago).
    InvertFirstOnly,
    /// `Family FM` with bare initials (Vancouver).
    FamilyBareInitials,
}

/// When and how a long author list is cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Truncation {
    /// At `min` or more authors, show the first `show` followed by `marker`.
    EtAl {
        min: usize,
        show: usize,
        marker: &'static str,
    },
    /// At `min` or more authors, show the first `show`, an ellipsis, and the
    /// final author (APA).
    EllipsisLast { min: usize, show: usize },
}

/// Author-list rules for one style.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AuthorRules {
    pub form: NameForm,
    /// Separator between authors other than the final pair.
    pub list_sep: &'static str,
    /// Separator before the final author (carries the conjunction).
    pub final_sep: &'static str,
    pub truncation: Truncation,
}

/// The full rule table for one style.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StyleRules {
    pub authors: AuthorRules,
    /// Whether container titles (book title, journal, site name) are italic.
    pub italic_container: bool,
    /// Whether item titles (article or page titles) are wrapped in quotes.
    pub quote_item_title: bool,
    /// Whether the style mandates an access date for websites.
    pub requires_access_date: bool,
    /// Text standing in for an unknown year, or `None` to omit the year.
    pub missing_year: Option<&'static str>,
}

static APA: StyleRules = StyleRules {
    authors: AuthorRules {
        form: NameForm::FamilyInitials,
        list_sep: ", ",
        final_sep: ", & ",
        truncation: Truncation::EllipsisLast { min: 21, show: 19 },
    },
    italic_container: true,
    quote_item_title: false,
    requires_access_date: false,
    missing_year: Some("n.d."),
};

static MLA: StyleRules = StyleRules {
    authors: AuthorRules {
        form: NameForm::InvertFirstOnly,
        list_sep: ", ",
        final_sep: ", and ",
        truncation: Truncation::EtAl {
            min: 3,
            show: 1,
            marker: ", et al.",
        },
    },
    italic_container: true,
    quote_item_title: true,
    requires_access_date: true,
    missing_year: None,
};

static CHICAGO: StyleRules = StyleRules {
    authors: AuthorRules {
        form: NameForm::InvertFirstOnly,
        list_sep: ", ",
        final_sep: ", and ",
        truncation: Truncation::EtAl {
            min: 11,
            show: 7,
            marker: ", et al.",
        },
    },
    italic_container: true,
    quote_item_title: true,
    requires_access_date: false,
    missing_year: Some("n.d."),
};

static HARVARD: StyleRules = StyleRules {
    authors: AuthorRules {
        form: NameForm::FamilyInitials,
        list_sep: ", ",
        final_sep: " and ",
        truncation: Truncation::EtAl {
            min: 4,
            show: 1,
            marker: " et al.",
        },
    },
    italic_container: true,
    quote_item_title: false,
    requires_access_date: true,
    missing_year: Some("n.d."),
};

static VANCOUVER: StyleRules = StyleRules {
    authors: AuthorRules {
        form: NameForm::FamilyBareInitials,
        list_sep: ", ",
        final_sep: ", ",
        truncation: Truncation::EtAl {
            min: 7,
            show: 6,
            marker: ", et al.",
        },
    },
    italic_container: false,
    quote_item_title: false,
    requires_access_date: false,
    missing_year: Some("n.d."),
};

/// Returns the rule table for a style.
pub(crate) fn rules_for(style: CitationStyle) -> &'static StyleRules {
    match style {
        CitationStyle::Apa => &APA,
        CitationStyle::Mla => &MLA,
        CitationStyle::Chicago => &CHICAGO,
        CitationStyle::Harvard => &HARVARD,
        CitationStyle::Vancouver => &VANCOUVER,
    }
}
