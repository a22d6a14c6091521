//! Landing structure documents and lenient decoding of stored layers.

use crate::section::{LayoutParams, SectionId};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Config key holding the committed landing structure.
pub const LANDING_STRUCTURE_KEY: &str = "landingStructure";

/// Total structure: order, visibility, and layout for a landing page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingStructure {
    pub section_order: Vec<SectionId>,
    pub section_visibility: BTreeMap<SectionId, bool>,
    pub section_layout: BTreeMap<SectionId, LayoutParams>,
}

impl LandingStructure {
    /// Visibility for a section; absent entries are visible.
    pub fn is_visible(&self, id: SectionId) -> bool {
        self.section_visibility.get(&id).copied().unwrap_or(true)
    }

    pub fn layout(&self, id: SectionId) -> Option<&LayoutParams> {
        self.section_layout.get(&id)
    }

    /// Express this structure as an override that sets every field.
    pub fn to_override(&self) -> StructureOverride {
        StructureOverride {
            section_order: Some(self.section_order.clone()),
            section_visibility: Some(self.section_visibility.clone()),
            section_layout: Some(self.section_layout.clone()),
        }
    }
}

/// Partial structure used for the committed and preview layers.
///
/// `None` means "inherit from the layer below", never "reset".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_order: Option<Vec<SectionId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_visibility: Option<BTreeMap<SectionId, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_layout: Option<BTreeMap<SectionId, LayoutParams>>,
}

impl StructureOverride {
    pub fn is_empty(&self) -> bool {
        self.section_order.is_none()
            && self.section_visibility.is_none()
            && self.section_layout.is_none()
    }

    /// Decode a committed structure read from the site config.
    ///
    /// Decoding never fails: a non-object value yields `None` and a field
    /// with the wrong shape is dropped so lower layers show through.
    pub fn from_committed(value: &Value) -> Option<Self> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return None,
            _ => {
                warn!("ignoring committed landing structure: expected object");
                return None;
            }
        };
        Some(Self {
            section_order: lenient_field(map, "sectionOrder", decode_order),
            section_visibility: lenient_field(map, "sectionVisibility", decode_visibility),
            section_layout: lenient_field(map, "sectionLayout", decode_layouts),
        })
    }

    /// Merge a newer partial update into this one.
    ///
    /// A present order replaces the current one; visibility and layout maps
    /// are merged per section with the newer entry winning. Absent fields
    /// leave the current state untouched.
    pub fn absorb(&mut self, newer: StructureOverride) {
        if let Some(order) = newer.section_order {
            self.section_order = Some(order);
        }
        if let Some(visibility) = newer.section_visibility {
            self.section_visibility
                .get_or_insert_with(BTreeMap::new)
                .extend(visibility);
        }
        if let Some(layouts) = newer.section_layout {
            self.section_layout
                .get_or_insert_with(BTreeMap::new)
                .extend(layouts);
        }
    }
}

/// Shape mismatch found while decoding a structure field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {message}")]
pub struct ShapeError {
    pub field: String,
    pub message: String,
}

impl ShapeError {
    pub(crate) fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn lenient_field<T>(
    map: &Map<String, Value>,
    field: &str,
    decode: fn(&Value, &str) -> Result<T, ShapeError>,
) -> Option<T> {
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => match decode(value, field) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                warn!("dropping committed field ({err})");
                None
            }
        },
    }
}

/// Decode a section order; unknown ids are skipped and duplicates dropped.
pub fn decode_order(value: &Value, field: &str) -> Result<Vec<SectionId>, ShapeError> {
    let Value::Array(entries) = value else {
        return Err(ShapeError::new(field, "expected array"));
    };
    let mut order = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let Some(name) = entry.as_str() else {
            return Err(ShapeError::new(
                &format!("{field}[{idx}]"),
                "expected string",
            ));
        };
        match SectionId::from_str(name) {
            Ok(id) if !order.contains(&id) => order.push(id),
            Ok(_) => {}
            Err(_) => log::debug!("skipping unknown section in order (id={name})"),
        }
    }
    Ok(order)
}

/// Decode a visibility map; unknown ids are skipped.
pub fn decode_visibility(
    value: &Value,
    field: &str,
) -> Result<BTreeMap<SectionId, bool>, ShapeError> {
    let Value::Object(entries) = value else {
        return Err(ShapeError::new(field, "expected object"));
    };
    let mut visibility = BTreeMap::new();
    for (name, entry) in entries {
        let Some(visible) = entry.as_bool() else {
            return Err(ShapeError::new(&format!("{field}.{name}"), "expected bool"));
        };
        if let Ok(id) = SectionId::from_str(name) {
            visibility.insert(id, visible);
        }
    }
    Ok(visibility)
}

/// Decode a layout map; unknown ids are skipped.
pub fn decode_layouts(
    value: &Value,
    field: &str,
) -> Result<BTreeMap<SectionId, LayoutParams>, ShapeError> {
    let Value::Object(entries) = value else {
        return Err(ShapeError::new(field, "expected object"));
    };
    let mut layouts = BTreeMap::new();
    for (name, entry) in entries {
        let params: LayoutParams = serde_json::from_value(entry.clone()).map_err(|_| {
            ShapeError::new(
                &format!("{field}.{name}"),
                "expected object of numbers or strings",
            )
        })?;
        if let Ok(id) = SectionId::from_str(name) {
            layouts.insert(id, params);
        }
    }
    Ok(layouts)
}
