//! Section identifiers and per-section layout knobs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identifier for a landing page section.
///
/// The set is closed: ids that do not parse into a variant are ignored
/// wherever structures are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionId {
    Hero,
    Catalog,
    StyleQuiz,
    Gallery,
    Appointment,
    Testimonials,
    Benefits,
    Contact,
}

impl SectionId {
    /// Every section id, in declaration order.
    pub const ALL: [SectionId; 8] = [
        SectionId::Hero,
        SectionId::Catalog,
        SectionId::StyleQuiz,
        SectionId::Gallery,
        SectionId::Appointment,
        SectionId::Testimonials,
        SectionId::Benefits,
        SectionId::Contact,
    ];

    /// Wire name used in JSON documents and preview messages.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::Hero => "hero",
            SectionId::Catalog => "catalog",
            SectionId::StyleQuiz => "styleQuiz",
            SectionId::Gallery => "gallery",
            SectionId::Appointment => "appointment",
            SectionId::Testimonials => "testimonials",
            SectionId::Benefits => "benefits",
            SectionId::Contact => "contact",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = UnknownSection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| UnknownSection(value.to_string()))
    }
}

/// Returned when a string does not name a known section.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section id: {0}")]
pub struct UnknownSection(pub String);

/// A single layout knob value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutValue {
    Number(serde_json::Number),
    Text(String),
}

impl From<i32> for LayoutValue {
    fn from(value: i32) -> Self {
        LayoutValue::Number(value.into())
    }
}

impl From<i64> for LayoutValue {
    fn from(value: i64) -> Self {
        LayoutValue::Number(value.into())
    }
}

impl From<&str> for LayoutValue {
    fn from(value: &str) -> Self {
        LayoutValue::Text(value.to_string())
    }
}

impl From<String> for LayoutValue {
    fn from(value: String) -> Self {
        LayoutValue::Text(value)
    }
}

/// Open set of style knobs for one section (e.g. `paddingTop`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutParams(BTreeMap<String, LayoutValue>);

impl LayoutParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, knob: impl Into<String>, value: impl Into<LayoutValue>) -> Self {
        self.0.insert(knob.into(), value.into());
        self
    }

    pub fn insert(&mut self, knob: impl Into<String>, value: impl Into<LayoutValue>) {
        self.0.insert(knob.into(), value.into());
    }

    pub fn get(&self, knob: &str) -> Option<&LayoutValue> {
        self.0.get(knob)
    }

    /// Numeric knob value, if the knob is set to a number.
    pub fn number(&self, knob: &str) -> Option<f64> {
        match self.0.get(knob)? {
            LayoutValue::Number(number) => number.as_f64(),
            LayoutValue::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LayoutValue)> {
        self.0.iter()
    }
}
