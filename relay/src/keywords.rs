//! Static condition keyword library.
//!
//! Maps a condition name to the lowercase trigger phrases that suggest it. The
//! library is built once at startup and shared read-only (`Arc<KeywordLibrary>`)
//! between the matcher and the confidence scorer.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Built-in table, in match order.
const BUILTIN_CONDITIONS: &[(&str, &[&str])] = &[
    ("measles", &["measles", "rash", "koplik spots"]),
    ("covid", &["covid", "coronavirus", "loss of smell", "dry cough"]),
    ("heart attack", &["heart attack", "chest pain", "radiating pain", "tightness"]),
    ("angina", &["angina", "pressure", "tightness", "chest discomfort"]),
    ("arthritis", &["arthritis", "joint swelling", "joint pain", "stiff joints"]),
    ("gout", &["gout", "uric acid", "swollen toe", "joint inflammation"]),
    ("lupus", &["lupus", "autoimmune", "rash", "joint pain"]),
    ("flu", &["flu", "influenza", "body aches", "fever", "chills"]),
    ("food poisoning", &["food poisoning", "vomiting", "diarrhea", "nausea"]),
    ("hypoglycemia", &["hypoglycemia", "low blood sugar", "shaking", "dizzy"]),
    (
        "pulmonary embolism",
        &["pulmonary embolism", "shortness of breath", "chest pain", "clot"],
    ),
    (
        "DVT",
        &[
            "dvt",
            "deep vein thrombosis",
            "leg swelling",
            "calf pain",
            "swollen leg",
            "leg is swollen",
        ],
    ),
    ("anemia", &["anemia", "low iron", "fatigue", "pale skin"]),
    ("depression", &["depression", "low mood", "lack of motivation", "hopelessness"]),
    ("oral herpes", &["oral herpes", "cold sores", "blisters", "tingling lips"]),
    ("dehydration", &["dehydration", "dry mouth", "thirst", "dark urine"]),
    ("diabetes", &["diabetes", "high blood sugar", "thirst", "frequent urination"]),
    ("Sjogren’s syndrome", &["sjogren", "dry eyes", "dry mouth", "autoimmune"]),
    (
        "hypothyroidism",
        &["hypothyroidism", "slow metabolism", "fatigue", "cold intolerance"],
    ),
];

#[derive(Debug, Error)]
pub enum KeywordLibraryError {
    #[error("failed to read keyword file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse keyword file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid keyword entry: {0}")]
    InvalidEntry(String),
    #[error("keyword file defines no conditions")]
    Empty,
}

/// One condition and its trigger phrases
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConditionEntry {
    pub name: String,
    pub keywords: Vec<String>,
}

impl ConditionEntry {
    pub fn new<S: Into<String>>(name: impl Into<String>, keywords: impl IntoIterator<Item = S>) -> Self {
        let mut normalized: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into().trim().to_lowercase();
            if !keyword.is_empty() && !normalized.contains(&keyword) {
                normalized.push(keyword);
            }
        }
        Self {
            name: name.into(),
            keywords: normalized,
        }
    }

    /// True if any keyword occurs in `lowercase_text`.
    pub fn hits(&self, lowercase_text: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowercase_text.contains(keyword.as_str()))
    }
}

#[derive(Deserialize)]
struct KeywordFile {
    #[serde(rename = "condition", default)]
    conditions: Vec<ConditionEntry>,
}

/// Immutable, ordered set of condition entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordLibrary {
    entries: Vec<ConditionEntry>,
}

impl KeywordLibrary {
    /// Build a library from entries; keywords are lowercased and deduplicated.
    pub fn new(entries: Vec<ConditionEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| ConditionEntry::new(entry.name, entry.keywords))
            .collect();
        Self { entries }
    }

    /// Load a library from a TOML file of `[[condition]]` tables.
    pub fn load_from_file(path: &Path) -> Result<Self, KeywordLibraryError> {
        let content = fs::read_to_string(path)?;
        let file: KeywordFile = toml::from_str(&content)?;

        for entry in &file.conditions {
            if entry.name.trim().is_empty() {
                return Err(KeywordLibraryError::InvalidEntry(
                    "condition name cannot be empty".into(),
                ));
            }
            if entry.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(KeywordLibraryError::InvalidEntry(format!(
                    "condition '{}' has no keywords",
                    entry.name
                )));
            }
        }

        let library = Self::new(file.conditions);
        if library.is_empty() {
            return Err(KeywordLibraryError::Empty);
        }
        Ok(library)
    }

    pub fn entries(&self) -> &[ConditionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by condition name
    pub fn keywords_for(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.name.to_lowercase() == name.to_lowercase())
            .map(|entry| entry.keywords.as_slice())
    }
}

impl Default for KeywordLibrary {
    fn default() -> Self {
        Self::new(
            BUILTIN_CONDITIONS
                .iter()
                .map(|(name, keywords)| ConditionEntry::new(*name, keywords.iter().copied()))
                .collect(),
        )
    }
}
