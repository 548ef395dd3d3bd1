use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::unit::{PracticeUnit, units_from_texts};

#[derive(Debug, Error)]
pub enum UnitListError {
    #[error("failed to read practice list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid practice list {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypingMode {
    #[default]
    Original,
    BaseForm,
}

impl TypingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::BaseForm => "base-form",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Original => Self::BaseForm,
            Self::BaseForm => Self::Original,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeList {
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub base_forms: HashMap<String, String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListFile {
    Full(PracticeList),
    Bare(Vec<String>),
}

impl PracticeList {
    pub fn from_words<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            base_forms: HashMap::new(),
        }
    }

    /// Plain text: one unit per line, `#` comments and blank lines skipped.
    pub fn parse_text(content: &str) -> Self {
        Self::from_words(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn parse_json(content: &str) -> Result<Self, serde_json::Error> {
        Ok(match serde_json::from_str::<ListFile>(content)? {
            ListFile::Full(list) => list,
            ListFile::Bare(words) => Self::from_words(words),
        })
    }

    /// `.json` files (or content that looks like JSON) go through serde,
    /// anything else is read as plain text.
    pub fn load(path: &Path) -> Result<Self, UnitListError> {
        let content = fs::read_to_string(path).map_err(|source| UnitListError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path.extension().is_some_and(|ext| ext == "json")
            || content.trim_start().starts_with(['{', '[']);
        if is_json {
            Self::parse_json(&content).map_err(|source| UnitListError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            Ok(Self::parse_text(&content))
        }
    }

    pub fn base_form_of<'a>(&'a self, word: &'a str) -> &'a str {
        let trimmed = word.trim();
        self.base_forms
            .get(&trimmed.to_lowercase())
            .or_else(|| self.base_forms.get(word))
            .or_else(|| self.base_forms.get(trimmed))
            .map(String::as_str)
            .filter(|base| !base.trim().is_empty())
            .unwrap_or(word)
    }

    pub fn texts(&self, mode: TypingMode) -> Vec<String> {
        match mode {
            TypingMode::Original => self.words.clone(),
            TypingMode::BaseForm => {
                let mut seen = HashSet::new();
                self.words
                    .iter()
                    .map(|w| self.base_form_of(w).to_string())
                    .filter(|base| seen.insert(base.to_lowercase()))
                    .collect()
            }
        }
    }

    pub fn units(&self, mode: TypingMode) -> Vec<PracticeUnit> {
        units_from_texts(&self.texts(mode))
    }
}
