//! Renderer-side preview state.

use log::{debug, warn};
use pagecraft_config::{RenderPlan, default_structure, merge_structure};
use pagecraft_protocol::{LandingStructure, PreviewMessage, ShapeError, StructureOverride};
use serde_json::Value;
use std::sync::Arc;

/// Lifecycle of a render context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    /// Committed config not fetched yet; nothing to render.
    Uninitialized,
    /// Rendering defaults + committed config.
    DefaultsLoaded,
    /// At least one preview message applied; preview stays authoritative
    /// for the rest of the session.
    PreviewActive,
}

/// Owned preview state for one render context.
///
/// Create one per rendering context and drop it on teardown; nothing is
/// shared between contexts.
#[derive(Debug, Clone)]
pub struct LiveRenderer {
    defaults: Arc<LandingStructure>,
    committed: Option<StructureOverride>,
    committed_loaded: bool,
    preview: Option<StructureOverride>,
}

impl LiveRenderer {
    pub fn new(defaults: Arc<LandingStructure>) -> Self {
        Self {
            defaults,
            committed: None,
            committed_loaded: false,
            preview: None,
        }
    }

    /// Renderer over the compiled default structure.
    pub fn with_compiled_defaults() -> Self {
        Self::new(Arc::new(default_structure().clone()))
    }

    pub fn phase(&self) -> RenderPhase {
        match (self.committed_loaded, self.preview.is_some()) {
            (false, _) => RenderPhase::Uninitialized,
            (true, false) => RenderPhase::DefaultsLoaded,
            (true, true) => RenderPhase::PreviewActive,
        }
    }

    /// Record the resolved committed fetch (possibly empty).
    pub fn load_committed(&mut self, committed: Option<StructureOverride>) {
        debug!(
            "committed structure loaded (present={})",
            committed.is_some()
        );
        self.committed = committed;
        self.committed_loaded = true;
    }

    /// Decode and apply a raw channel payload.
    ///
    /// A malformed payload is rejected and leaves the preview state as it
    /// was.
    pub fn apply_payload(&mut self, payload: &Value) -> Result<(), ShapeError> {
        match PreviewMessage::decode(payload) {
            Ok(message) => {
                self.apply_message(message);
                Ok(())
            }
            Err(err) => {
                warn!("dropping malformed preview message ({err})");
                Err(err)
            }
        }
    }

    /// Fold a decoded message into the preview state. Fields absent from
    /// the message keep their previous preview values.
    pub fn apply_message(&mut self, message: PreviewMessage) {
        self.preview
            .get_or_insert_with(StructureOverride::default)
            .absorb(message.into_override());
    }

    pub fn committed(&self) -> Option<&StructureOverride> {
        self.committed.as_ref()
    }

    pub fn preview(&self) -> Option<&StructureOverride> {
        self.preview.as_ref()
    }

    /// Merged structure for the current phase; `None` before the committed
    /// config has been loaded.
    pub fn structure(&self) -> Option<LandingStructure> {
        if !self.committed_loaded {
            return None;
        }
        Some(merge_structure(
            &self.defaults,
            self.committed.as_ref(),
            self.preview.as_ref(),
        ))
    }

    pub fn plan(&self) -> Option<RenderPlan> {
        self.structure()
            .map(|structure| RenderPlan::from_structure(&structure))
    }
}

#[cfg(test)]
mod tests {
    use super::{LiveRenderer, RenderPhase};
    use pagecraft_protocol::{
        LAYOUT_UPDATE_TAG, LandingStructure, LayoutParams, PreviewMessage, SectionId,
        StructureOverride,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn defaults() -> Arc<LandingStructure> {
        Arc::new(LandingStructure {
            section_order: vec![SectionId::Hero, SectionId::Catalog, SectionId::Gallery],
            section_visibility: BTreeMap::from([
                (SectionId::Hero, true),
                (SectionId::Catalog, true),
                (SectionId::Gallery, true),
            ]),
            section_layout: BTreeMap::new(),
        })
    }

    #[test]
    fn phases_advance_and_never_return() {
        let mut renderer = LiveRenderer::new(defaults());
        assert_eq!(renderer.phase(), RenderPhase::Uninitialized);
        assert_eq!(renderer.structure(), None);

        renderer.load_committed(None);
        assert_eq!(renderer.phase(), RenderPhase::DefaultsLoaded);

        renderer
            .apply_payload(&json!({ "type": LAYOUT_UPDATE_TAG }))
            .expect("apply");
        assert_eq!(renderer.phase(), RenderPhase::PreviewActive);

        renderer.load_committed(None);
        assert_eq!(renderer.phase(), RenderPhase::PreviewActive);
    }

    #[test]
    fn preview_hides_on_top_of_committed() {
        let mut renderer = LiveRenderer::new(defaults());
        renderer.load_committed(Some(StructureOverride {
            section_visibility: Some(BTreeMap::from([(SectionId::Gallery, false)])),
            ..StructureOverride::default()
        }));
        renderer
            .apply_payload(&json!({
                "type": LAYOUT_UPDATE_TAG,
                "visibility": { "catalog": false },
            }))
            .expect("apply");

        let plan = renderer.plan().expect("plan");
        assert_eq!(plan.section_ids(), vec![SectionId::Hero]);
    }

    #[test]
    fn later_order_keeps_earlier_visibility() {
        let mut renderer = LiveRenderer::new(defaults());
        renderer.load_committed(None);
        renderer
            .apply_payload(&json!({ "type": LAYOUT_UPDATE_TAG, "visibility": { "hero": false } }))
            .expect("visibility");
        renderer
            .apply_payload(&json!({ "type": LAYOUT_UPDATE_TAG, "order": ["catalog", "hero"] }))
            .expect("order");

        let structure = renderer.structure().expect("structure");
        assert_eq!(
            structure.section_order,
            vec![SectionId::Catalog, SectionId::Hero]
        );
        assert!(!structure.is_visible(SectionId::Hero));
    }

    #[test]
    fn malformed_payload_keeps_preview_state() {
        let mut renderer = LiveRenderer::new(defaults());
        renderer.load_committed(None);
        renderer.apply_message(PreviewMessage::visibility(BTreeMap::from([(
            SectionId::Catalog,
            false,
        )])));
        let before = renderer.preview().cloned();

        assert!(renderer.apply_payload(&json!("garbage")).is_err());
        assert!(
            renderer
                .apply_payload(&json!({ "type": LAYOUT_UPDATE_TAG, "order": "hero" }))
                .is_err()
        );
        assert_eq!(renderer.preview().cloned(), before);
    }

    #[test]
    fn disjoint_messages_commute() {
        let messages = [
            PreviewMessage::order(vec![SectionId::Gallery, SectionId::Hero]),
            PreviewMessage::visibility(BTreeMap::from([(SectionId::Hero, false)])),
            PreviewMessage::layouts(BTreeMap::from([(
                SectionId::Gallery,
                LayoutParams::new().with("paddingTop", 8),
            )])),
        ];
        let orders: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        let mut results = Vec::new();
        for order in orders {
            let mut renderer = LiveRenderer::new(defaults());
            renderer.load_committed(None);
            for idx in order {
                renderer.apply_message(messages[idx].clone());
            }
            results.push(renderer.preview().cloned().expect("preview"));
        }

        let expected = StructureOverride {
            section_order: Some(vec![SectionId::Gallery, SectionId::Hero]),
            section_visibility: Some(BTreeMap::from([(SectionId::Hero, false)])),
            section_layout: Some(BTreeMap::from([(
                SectionId::Gallery,
                LayoutParams::new().with("paddingTop", 8),
            )])),
        };
        for result in results {
            assert_eq!(result, expected);
        }
    }

    #[test]
    fn preview_received_before_committed_is_kept() {
        let mut renderer = LiveRenderer::new(defaults());
        renderer.apply_message(PreviewMessage::visibility(BTreeMap::from([(
            SectionId::Hero,
            false,
        )])));
        assert_eq!(renderer.phase(), RenderPhase::Uninitialized);
        assert_eq!(renderer.plan(), None);

        renderer.load_committed(None);
        assert_eq!(renderer.phase(), RenderPhase::PreviewActive);
        assert_eq!(
            renderer.plan().expect("plan").section_ids(),
            vec![SectionId::Catalog, SectionId::Gallery]
        );
    }
}
