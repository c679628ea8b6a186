//! Expected keywords per site image.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{AssetError, Result};

/// Filename → lowercase keyword substrings a correct classification should hit.
///
/// Keyword lists are never empty; [`insert`](Self::insert) rejects them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExpectedLabelTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl ExpectedLabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the keywords for `file`. Keywords are trimmed and lowercased.
    pub fn insert<I, S>(&mut self, file: impl Into<String>, keywords: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let file = file.into();
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .collect();
        if keywords.is_empty() || keywords.iter().any(String::is_empty) {
            return Err(AssetError::config(
                "expected_labels",
                file,
                "keyword lists must be non-empty and contain no blank keywords",
            ));
        }
        self.entries.insert(file, keywords);
        Ok(())
    }

    pub fn get(&self, file: &str) -> Option<&[String]> {
        self.entries.get(file).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object of `"file.jpg": ["keyword", ...]`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (file, keywords) in raw {
            table.insert(file, keywords)?;
        }
        Ok(table)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| AssetError::io_at("reading expected labels", path, e))?;
        Self::from_json_str(&json).map_err(|e| e.with_context(format!("loading {}", path.display())))
    }

    /// Table for the current `assets/images` set.
    pub fn builtin() -> Self {
        const BUILTIN: &[(&str, &[&str])] = &[
            ("happy-commuter.jpg", &["person", "woman", "train", "subway", "bus", "commut", "smile"]),
            ("earphones-commuter.jpg", &["person", "headphone", "earphone", "bus", "train", "commut"]),
            ("person-walking-city.jpg", &["person", "walk", "street", "city", "night", "urban"]),
            ("phone-gps-closeup.jpg", &["phone", "map", "gps", "mobile", "screen", "smartphone", "hand"]),
            ("hero-city.jpg", &["city", "skyline", "urban", "building", "aerial"]),
            ("city-skyline.jpg", &["city", "skyline", "building"]),
            ("city-streets.jpg", &["city", "street", "road", "urban"]),
            ("bus-commute.jpg", &["bus", "commut", "transit", "transport", "vehicle"]),
            ("city-night.jpg", &["city", "night", "light", "urban", "dark"]),
            ("commuter-phone.jpg", &["phone", "commut", "person", "mobile", "train"]),
            ("train-window.jpg", &["train", "window", "rail", "transport"]),
            ("map-phone.jpg", &["phone", "map", "screen", "hand"]),
            ("night-bus.jpg", &["bus", "night", "light", "transport"]),
            ("city-aerial.jpg", &["city", "aerial", "building", "urban", "sky"]),
            ("phone-navigate.jpg", &["phone", "navigate", "map", "gps", "hand"]),
            ("train-platform.jpg", &["train", "platform", "station", "rail"]),
            ("arrival-destination.jpg", &["city", "destination", "building", "travel"]),
            ("sunset-commute.jpg", &["sunset", "sky", "commut", "light", "evening"]),
            ("city-morning.jpg", &["city", "morning", "sky", "building", "sunrise"]),
        ];

        let entries = BUILTIN
            .iter()
            .map(|(file, keywords)| {
                (
                    (*file).to_string(),
                    keywords.iter().map(|k| (*k).to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }
}
