//! Layer merging for landing structures.
//!
//! Combines the compiled defaults, the committed structure read from the
//! site config, and an optional live preview override. Precedence
//! (high -> low): preview, committed, defaults.

use pagecraft_protocol::{LandingStructure, LayoutParams, SectionId, StructureOverride};
use std::collections::BTreeMap;

/// Origin of a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureLayer {
    /// Compiled defaults.
    Defaults,
    /// Structure persisted in the site config.
    Committed,
    /// Unpublished edits pushed over the preview channel.
    Preview,
}

/// Merged structure plus the layer each value was taken from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStructure {
    pub structure: LandingStructure,
    pub order_source: StructureLayer,
    pub visibility_sources: BTreeMap<SectionId, StructureLayer>,
    pub layout_sources: BTreeMap<SectionId, StructureLayer>,
}

impl ResolvedStructure {
    /// Sections whose visibility or layout comes from a layer above defaults.
    pub fn overridden_sections(&self) -> Vec<SectionId> {
        SectionId::ALL
            .into_iter()
            .filter(|id| {
                self.visibility_sources.get(id) != Some(&StructureLayer::Defaults)
                    || self.layout_sources.get(id) != Some(&StructureLayer::Defaults)
            })
            .collect()
    }
}

/// Merge the three layers into a total structure.
pub fn merge_structure(
    defaults: &LandingStructure,
    committed: Option<&StructureOverride>,
    preview: Option<&StructureOverride>,
) -> LandingStructure {
    resolve_structure(defaults, committed, preview).structure
}

/// Merge the three layers, recording where every value came from.
///
/// The order is taken wholesale from the highest layer with a non-empty
/// order. Visibility and layout are resolved per section, so an upper layer
/// may override a single section and inherit the rest.
pub fn resolve_structure(
    defaults: &LandingStructure,
    committed: Option<&StructureOverride>,
    preview: Option<&StructureOverride>,
) -> ResolvedStructure {
    let overlays = [
        (StructureLayer::Preview, preview),
        (StructureLayer::Committed, committed),
    ];

    let (order_source, order) = overlays
        .iter()
        .filter_map(|(layer, overlay)| {
            let order = dedup_order(overlay.as_ref()?.section_order.as_deref()?);
            (!order.is_empty()).then_some((*layer, order))
        })
        .next()
        .unwrap_or_else(|| (StructureLayer::Defaults, dedup_order(&defaults.section_order)));

    let mut section_visibility = BTreeMap::new();
    let mut visibility_sources = BTreeMap::new();
    let mut section_layout = BTreeMap::new();
    let mut layout_sources = BTreeMap::new();

    for id in SectionId::ALL {
        let (layer, visible) = overlays
            .iter()
            .find_map(|(layer, overlay)| {
                let visible = overlay.as_ref()?.section_visibility.as_ref()?.get(&id)?;
                Some((*layer, *visible))
            })
            .unwrap_or_else(|| {
                let visible = defaults.section_visibility.get(&id).copied().unwrap_or(true);
                (StructureLayer::Defaults, visible)
            });
        section_visibility.insert(id, visible);
        visibility_sources.insert(id, layer);

        let (layer, params) = overlays
            .iter()
            .find_map(|(layer, overlay)| {
                let params = overlay.as_ref()?.section_layout.as_ref()?.get(&id)?;
                Some((*layer, params.clone()))
            })
            .unwrap_or_else(|| {
                let params = defaults.section_layout.get(&id).cloned().unwrap_or_default();
                (StructureLayer::Defaults, params)
            });
        section_layout.insert(id, params);
        layout_sources.insert(id, layer);
    }

    ResolvedStructure {
        structure: LandingStructure {
            section_order: order,
            section_visibility,
            section_layout,
        },
        order_source,
        visibility_sources,
        layout_sources,
    }
}

fn dedup_order(order: &[SectionId]) -> Vec<SectionId> {
    let mut seen = Vec::with_capacity(order.len());
    for id in order {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}

/// One section ready to be instantiated by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSection {
    pub id: SectionId,
    pub layout: LayoutParams,
}

/// Ordered list of visible sections with their resolved layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPlan {
    pub sections: Vec<PlannedSection>,
}

impl RenderPlan {
    /// Build a plan from a merged structure, dropping hidden sections.
    pub fn from_structure(structure: &LandingStructure) -> Self {
        let sections = structure
            .section_order
            .iter()
            .filter(|id| structure.is_visible(**id))
            .map(|id| PlannedSection {
                id: *id,
                layout: structure.layout(*id).cloned().unwrap_or_default(),
            })
            .collect();
        Self { sections }
    }

    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|section| section.id).collect()
    }
}
