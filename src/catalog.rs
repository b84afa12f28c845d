//! Emote catalog collaborator
//!
//! The composer resolves typed names to emote ids and asks for the markup to
//! render and the text to submit. [`StaticCatalog`] is a fixed catalog loaded
//! from YAML:
//!
//! ```yaml
//! emotes:
//!   - id: "1730752"
//!     name: PogChamp
//!   - id: "39261"
//!     name: KEKW
//!     markup: '<img src="kekw.webp" alt="KEKW">'
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::editable::TokenId;

/// Lookup interface the composer depends on
pub trait EmoteCatalog {
    /// Id of the emote named exactly `name` (case-sensitive)
    fn emote_id_by_name(&self, name: &str) -> Option<TokenId>;

    /// Markup to render inside a token body
    fn renderable_by_id(&self, id: &TokenId) -> Option<String>;

    /// Representation of the emote in the submitted message
    fn embeddable(&self, id: &TokenId) -> String;

    /// Display name, used when a draft is turned back into typed text
    fn name_by_id(&self, id: &TokenId) -> Option<String>;
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emote {
    pub id: String,
    pub name: String,
    /// Overrides the default `<img>` markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
}

impl Emote {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            markup: None,
        }
    }

    fn render(&self) -> String {
        match &self.markup {
            Some(markup) => markup.clone(),
            None => format!(
                r#"<img class="emote" data-emote-id="{}" alt="{}">"#,
                self.id, self.name
            ),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    emotes: Vec<Emote>,
}

/// Errors loading a catalog file
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "Failed to read emote catalog: {}", e),
            CatalogError::Parse(e) => write!(f, "Failed to parse emote catalog: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Parse(e) => Some(e),
        }
    }
}

/// In-memory catalog keyed by id and by name
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    by_id: HashMap<String, Emote>,
    by_name: HashMap<String, String>,
}

impl StaticCatalog {
    pub fn new(emotes: impl IntoIterator<Item = Emote>) -> Self {
        let mut catalog = Self::default();
        for emote in emotes {
            catalog.insert(emote);
        }
        catalog
    }

    /// Add an emote. A later entry with the same name wins.
    pub fn insert(&mut self, emote: Emote) {
        if emote.id.is_empty() || emote.name.is_empty() {
            tracing::warn!(?emote, "Skipping emote without id or name");
            return;
        }
        self.by_name.insert(emote.name.clone(), emote.id.clone());
        self.by_id.insert(emote.id.clone(), emote);
    }

    pub fn from_yaml(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(content).map_err(CatalogError::Parse)?;
        Ok(Self::new(file.emotes))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
        let catalog = Self::from_yaml(&content)?;
        tracing::info!("Loaded {} emotes from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl EmoteCatalog for StaticCatalog {
    fn emote_id_by_name(&self, name: &str) -> Option<TokenId> {
        let id = self.by_name.get(name).map(|id| TokenId::new(id.as_str()));
        if id.is_none() {
            tracing::trace!(name, "no emote with this name");
        }
        id
    }

    fn renderable_by_id(&self, id: &TokenId) -> Option<String> {
        self.by_id.get(id.as_str()).map(Emote::render)
    }

    fn embeddable(&self, id: &TokenId) -> String {
        match self.by_id.get(id.as_str()) {
            Some(emote) => format!("[emote:{}:{}]", emote.id, emote.name),
            None => format!("[emote:{}]", id),
        }
    }

    fn name_by_id(&self, id: &TokenId) -> Option<String> {
        self.by_id.get(id.as_str()).map(|emote| emote.name.clone())
    }
}
