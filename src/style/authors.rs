//! Author name parsing and list rendering.
//!
//! Provider adapters and manual entry both hand author display names to the
//! formatter as plain strings, either inverted (`"Curie, Marie"`) or natural
//! (`"Marie Curie"`). [`AuthorName::parse`] splits either form into family
//! and given parts; [`author_list`] renders a whole list under one style's
//! [`AuthorRules`], including conjunctions and truncation.

use super::rules::{AuthorRules, NameForm, Truncation};

/// One parsed author name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthorName {
    family: String,
    given: Vec<String>,
}

impl AuthorName {
    /// Parses a display name in inverted (`"Family, Given"`) or natural
    /// (`"Given Family"`) order. Returns `None` for blank input.
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Some((family, given)) = input.split_once(',') {
            let family = family.trim();
            if family.is_empty() {
                return None;
            }
            return Some(Self {
                family: family.to_string(),
                given: given.split_whitespace().map(ToOwned::to_owned).collect(),
            });
        }

        let mut parts: Vec<String> = input.split_whitespace().map(ToOwned::to_owned).collect();
        let family = parts.pop()?;
        Some(Self {
            family,
            given: parts,
        })
    }

    /// The family name, as parsed.
    pub(crate) fn surname(&self) -> &str {
        &self.family
    }

    /// Dotted initials: `["Marie", "S."]` becomes `"M. S."`.
    fn initials(&self) -> String {
        self.given
            .iter()
            .filter_map(|part| part.chars().next())
            .map(|c| format!("{}.", c.to_ascii_uppercase()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Bare initials: `["Marie", "S."]` becomes `"MS"`.
    fn bare_initials(&self) -> String {
        self.given
            .iter()
            .filter_map(|part| part.chars().next())
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    /// Renders the name under one style's form. `is_first` matters only for
    /// [`NameForm::InvertFirstOnly`].
    pub(crate) fn render(&self, form: NameForm, is_first: bool) -> String {
        if self.given.is_empty() {
            return self.family.clone();
        }
        match form {
            NameForm::FamilyInitials => format!("{}, {}", self.family, self.initials()),
            NameForm::InvertFirstOnly => {
                let given = self.given.join(" ");
                if is_first {
                    format!("{}, {given}", self.family)
                } else {
                    format!("{given} {}", self.family)
                }
            }
            NameForm::FamilyBareInitials => format!("{} {}", self.family, self.bare_initials()),
        }
    }
}

/// Renders an author list under one style's rules.
///
/// Returns `None` when no parseable author remains, so layouts can skip the
/// author slot entirely.
pub(crate) fn author_list(authors: &[String], rules: &AuthorRules) -> Option<String> {
    let names: Vec<AuthorName> = authors
        .iter()
        .filter_map(|raw| AuthorName::parse(raw))
        .collect();
    if names.is_empty() {
        return None;
    }

    let rendered: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, name)| name.render(rules.form, i == 0))
        .collect();

    let text = match rules.truncation {
        Truncation::EtAl { min, show, marker } if rendered.len() >= min => {
            format!("{}{marker}", rendered[..show].join(rules.list_sep))
        }
        Truncation::EllipsisLast { min, show } if rendered.len() >= min => {
            format!(
                "{}, ... {}",
                rendered[..show].join(rules.list_sep),
                rendered[rendered.len() - 1]
            )
        }
        _ => join_names(&rendered, rules.list_sep, rules.final_sep),
    };

    Some(text)
}

fn join_names(names: &[String], list_sep: &str, final_sep: &str) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [head @ .., last] => format!("{}{final_sep}{last}", head.join(list_sep)),
    }
}
