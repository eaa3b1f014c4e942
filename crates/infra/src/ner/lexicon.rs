//! Word lists behind the lexicon model
//!
//! The embedded Russian lexicon ships inside the binary. A TOML file with
//! the same layout replaces it wholesale; categories the file omits are
//! empty, not inherited from the embedded lists.

use std::path::Path;

use fz152_domain::{Fz152Error, Result};
use serde::{Deserialize, Serialize};

const EMBEDDED_LEXICON: &str = include_str!("lexicon_ru.toml");

/// Lexicon categories. Entries are nominative forms; inflected forms are
/// matched by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Known first names.
    pub first_names: Vec<String>,
    /// Endings that make a capitalized word surname-shaped.
    pub surname_suffixes: Vec<String>,
    /// Endings that mark a patronymic.
    pub patronymic_suffixes: Vec<String>,
    /// Words ("господин") that mark the following name as a person.
    pub person_titles: Vec<String>,
    /// Legal forms, compared case-sensitively (`ООО`, `ПАО`, ...).
    pub org_forms: Vec<String>,
    /// Known organization names.
    pub organizations: Vec<String>,
    /// Known place names.
    pub locations: Vec<String>,
    /// Words ("г.", "улица") followed by a place name.
    pub location_markers: Vec<String>,
    /// Nationalities, tagged `NORP`.
    pub nationalities: Vec<String>,
    /// Capitalized words that never count as entities.
    pub stop_words: Vec<String>,
}

impl Lexicon {
    /// The lexicon compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_LEXICON)
    }

    /// Parse and validate a TOML lexicon.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let lexicon: Self = toml::from_str(contents)
            .map_err(|e| Fz152Error::Model(format!("Invalid lexicon: {}", e)))?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    /// Load a lexicon file
    ///
    /// # Errors
    /// Returns `Fz152Error::Model` if the file is missing, unreadable, not
    /// valid TOML, or defines no entity words at all.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Fz152Error::Model(format!("Lexicon file not found: {}", path.display())));
        }

        tracing::info!(path = %path.display(), "Loading NER lexicon");
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Fz152Error::Model(format!("Failed to read lexicon {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Whether no category can produce an entity.
    pub fn is_empty(&self) -> bool {
        self.first_names.is_empty()
            && self.patronymic_suffixes.is_empty()
            && self.person_titles.is_empty()
            && self.org_forms.is_empty()
            && self.organizations.is_empty()
            && self.locations.is_empty()
            && self.location_markers.is_empty()
            && self.nationalities.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Fz152Error::Model("Lexicon defines no entity words".to_string()));
        }

        let categories = [
            ("first_names", &self.first_names),
            ("surname_suffixes", &self.surname_suffixes),
            ("patronymic_suffixes", &self.patronymic_suffixes),
            ("person_titles", &self.person_titles),
            ("org_forms", &self.org_forms),
            ("organizations", &self.organizations),
            ("locations", &self.locations),
            ("location_markers", &self.location_markers),
            ("nationalities", &self.nationalities),
            ("stop_words", &self.stop_words),
        ];
        for (category, entries) in categories {
            if entries.iter().any(|entry| entry.trim().is_empty()) {
                return Err(Fz152Error::Model(format!(
                    "Lexicon category '{}' contains a blank entry",
                    category
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_embedded_lexicon_parses() {
        let lexicon = Lexicon::embedded().unwrap();
        assert!(lexicon.first_names.iter().any(|name| name == "иван"));
        assert!(lexicon.organizations.iter().any(|org| org == "фмс"));
        assert!(lexicon.org_forms.iter().any(|form| form == "ООО"));
        assert!(lexicon.nationalities.iter().any(|n| n == "русские"));
    }

    /// Validates `Lexicon::from_path` behavior for the replacement file
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms listed categories are loaded.
    /// - Confirms omitted categories are empty.
    #[test]
    fn test_from_path_replaces_categories() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first_names = [\"гоша\"]\nlocations = [\"тверь\"]").unwrap();

        let lexicon = Lexicon::from_path(file.path()).unwrap();
        assert_eq!(lexicon.first_names, vec!["гоша"]);
        assert_eq!(lexicon.locations, vec!["тверь"]);
        assert!(lexicon.organizations.is_empty());
    }

    #[test]
    fn test_missing_file_is_model_error() {
        let err = Lexicon::from_path(Path::new("/nonexistent/lexicon.toml")).unwrap_err();
        assert!(matches!(err, Fz152Error::Model(ref msg) if msg.contains("not found")));
    }

    #[test]
    fn test_invalid_contents_rejected() {
        assert!(matches!(Lexicon::from_toml_str("first_names = ["), Err(Fz152Error::Model(_))));
        assert!(matches!(Lexicon::from_toml_str("stop_words = [\"и\"]"), Err(Fz152Error::Model(_))));
        assert!(matches!(
            Lexicon::from_toml_str("first_names = [\"иван\", \" \"]"),
            Err(Fz152Error::Model(_))
        ));
    }
}
