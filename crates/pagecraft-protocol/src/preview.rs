//! Live preview messages exchanged between an editor and a renderer.

use crate::section::{LayoutParams, SectionId};
use crate::structure::{
    ShapeError, StructureOverride, decode_layouts, decode_order, decode_visibility,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Tag carried by every layout update message.
pub const LAYOUT_UPDATE_TAG: &str = "landing-layout-update";

/// Message broadcast by an editor to push unpublished structure edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewMessage {
    pub order: Option<Vec<SectionId>>,
    pub visibility: Option<BTreeMap<SectionId, bool>>,
    pub layouts: Option<BTreeMap<SectionId, LayoutParams>>,
}

impl PreviewMessage {
    pub fn order(order: Vec<SectionId>) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    pub fn visibility(visibility: BTreeMap<SectionId, bool>) -> Self {
        Self {
            visibility: Some(visibility),
            ..Self::default()
        }
    }

    pub fn layouts(layouts: BTreeMap<SectionId, LayoutParams>) -> Self {
        Self {
            layouts: Some(layouts),
            ..Self::default()
        }
    }

    /// Encode as a tagged JSON payload ready for any transport.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("type".to_string(), Value::String(LAYOUT_UPDATE_TAG.to_string()));
        if let Some(order) = &self.order {
            map.insert(
                "order".to_string(),
                Value::Array(order.iter().map(|id| Value::from(id.as_str())).collect()),
            );
        }
        if let Some(visibility) = &self.visibility {
            map.insert(
                "visibility".to_string(),
                Value::Object(
                    visibility
                        .iter()
                        .map(|(id, visible)| (id.as_str().to_string(), Value::Bool(*visible)))
                        .collect(),
                ),
            );
        }
        if let Some(layouts) = &self.layouts {
            let encoded = layouts
                .iter()
                .map(|(id, params)| {
                    let params = serde_json::to_value(params).unwrap_or(Value::Null);
                    (id.as_str().to_string(), params)
                })
                .collect();
            map.insert("layouts".to_string(), Value::Object(encoded));
        }
        Value::Object(map)
    }

    /// Decode a received payload.
    ///
    /// The payload must be an object tagged with [`LAYOUT_UPDATE_TAG`] and
    /// every present field must have the right shape; otherwise the whole
    /// message is rejected. Unknown section ids inside a field are skipped.
    pub fn decode(value: &Value) -> Result<Self, ShapeError> {
        let Value::Object(map) = value else {
            return Err(ShapeError::new("message", "expected object"));
        };
        match map.get("type").and_then(Value::as_str) {
            Some(LAYOUT_UPDATE_TAG) => {}
            Some(other) => {
                return Err(ShapeError::new(
                    "type",
                    format!("unexpected message type {other}"),
                ));
            }
            None => return Err(ShapeError::new("type", "missing message tag")),
        }
        let order = match map.get("order") {
            None | Some(Value::Null) => None,
            Some(value) => Some(decode_order(value, "order")?),
        };
        let visibility = match map.get("visibility") {
            None | Some(Value::Null) => None,
            Some(value) => Some(decode_visibility(value, "visibility")?),
        };
        let layouts = match map.get("layouts") {
            None | Some(Value::Null) => None,
            Some(value) => Some(decode_layouts(value, "layouts")?),
        };
        Ok(Self {
            order,
            visibility,
            layouts,
        })
    }

    pub fn into_override(self) -> StructureOverride {
        StructureOverride {
            section_order: self.order,
            section_visibility: self.visibility,
            section_layout: self.layouts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn encodes_only_present_fields() {
        let message = PreviewMessage::visibility(BTreeMap::from([(SectionId::Hero, false)]));
        assert_eq!(
            message.to_value(),
            json!({ "type": LAYOUT_UPDATE_TAG, "visibility": { "hero": false } })
        );
    }

    #[test]
    fn decodes_full_message() {
        let value = json!({
            "type": LAYOUT_UPDATE_TAG,
            "order": ["catalog", "hero"],
            "visibility": { "gallery": false },
            "layouts": { "hero": { "paddingTop": 0 } },
        });
        let message = PreviewMessage::decode(&value).expect("decode");
        assert_eq!(message.order, Some(vec![SectionId::Catalog, SectionId::Hero]));
        assert_eq!(
            message.visibility,
            Some(BTreeMap::from([(SectionId::Gallery, false)]))
        );
        assert_eq!(
            message
                .layouts
                .as_ref()
                .and_then(|layouts| layouts.get(&SectionId::Hero))
                .and_then(|params| params.number("paddingTop")),
            Some(0.0)
        );
    }

    #[test]
    fn rejects_untagged_or_foreign_messages() {
        assert!(PreviewMessage::decode(&json!({ "order": ["hero"] })).is_err());
        assert!(PreviewMessage::decode(&json!({ "type": "cart-update" })).is_err());
        assert!(PreviewMessage::decode(&json!("landing-layout-update")).is_err());
    }

    #[test]
    fn rejects_misshapen_fields() {
        let value = json!({ "type": LAYOUT_UPDATE_TAG, "visibility": ["hero"] });
        let err = PreviewMessage::decode(&value).unwrap_err();
        assert_eq!(err.field, "visibility");
    }

    #[test]
    fn decoded_message_matches_sent_message() {
        let message = PreviewMessage {
            order: Some(vec![SectionId::Contact, SectionId::Hero]),
            visibility: None,
            layouts: Some(BTreeMap::from([(
                SectionId::Contact,
                LayoutParams::new().with("paddingBottom", 24),
            )])),
        };
        let decoded = PreviewMessage::decode(&message.to_value()).expect("decode");
        assert_eq!(decoded, message);
    }
}
