use std::fmt;

use serde::{Deserialize, Serialize};

/// What a recognized string identifies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ExtractionKind {
    /// A UK registration plate.
    #[default]
    #[serde(rename = "reg")]
    Registration,
    /// A 17-character vehicle identification number.
    #[serde(rename = "vin")]
    Vin,
}

impl ExtractionKind {
    /// Tag used on the wire, both in the model's reply and in our response.
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Registration => "reg",
            Self::Vin => "vin",
        }
    }

    /// Map an upstream tag onto a kind. Only the exact `"vin"` tag is a VIN;
    /// anything else, including a missing tag, is treated as a plate.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("vin") => Self::Vin,
            _ => Self::Registration,
        }
    }
}

impl fmt::Display for ExtractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// One recognized item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionResult {
    #[serde(rename = "type")]
    pub kind: ExtractionKind,
    pub value: String,
    pub uncertain: bool,
}

impl ExtractionResult {
    pub fn new(kind: ExtractionKind, value: impl Into<String>, uncertain: bool) -> Self {
        Self {
            kind,
            value: value.into(),
            uncertain,
        }
    }
}

/// Ordered results for one image, in the order the model emitted them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ExtractionResponse {
    pub results: Vec<ExtractionResult>,
}

impl ExtractionResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of results the model flagged as low-confidence.
    pub fn uncertain_count(&self) -> usize {
        self.results.iter().filter(|r| r.uncertain).count()
    }
}
