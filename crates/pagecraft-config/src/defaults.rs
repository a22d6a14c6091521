//! Compiled default landing structure (the base layer).

use pagecraft_protocol::{LandingStructure, LayoutParams, SectionId};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DEFAULT_STRUCTURE: LazyLock<LandingStructure> = LazyLock::new(build_default_structure);

/// Process-wide default structure. Total over every [`SectionId`].
pub fn default_structure() -> &'static LandingStructure {
    &DEFAULT_STRUCTURE
}

fn build_default_structure() -> LandingStructure {
    let section_order = SectionId::ALL.to_vec();
    let section_visibility = SectionId::ALL.into_iter().map(|id| (id, true)).collect();
    let section_layout: BTreeMap<SectionId, LayoutParams> = SectionId::ALL
        .into_iter()
        .map(|id| (id, default_layout(id)))
        .collect();
    LandingStructure {
        section_order,
        section_visibility,
        section_layout,
    }
}

fn default_layout(id: SectionId) -> LayoutParams {
    let (top, bottom) = match id {
        SectionId::Hero => (0, 0),
        SectionId::Catalog | SectionId::Gallery => (64, 64),
        SectionId::StyleQuiz | SectionId::Appointment => (80, 80),
        SectionId::Testimonials | SectionId::Benefits => (56, 56),
        SectionId::Contact => (64, 96),
    };
    LayoutParams::new()
        .with("paddingTop", top)
        .with("paddingBottom", bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_structure_is_total() {
        let defaults = default_structure();
        assert_eq!(defaults.section_order.len(), SectionId::ALL.len());
        for id in SectionId::ALL {
            assert!(defaults.section_order.contains(&id));
            assert_eq!(defaults.section_visibility.get(&id), Some(&true));
            assert!(defaults.layout(id).is_some());
        }
    }
}
