//! Editor-side working copy of the landing structure.

use super::channel::PreviewChannel;
use crate::error::ServiceError;
use crate::service::ConfigService;
use log::{debug, info};
use pagecraft_protocol::{
    LandingStructure, LayoutParams, PreviewMessage, SectionId, SetConfigRequest,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Holds unpublished structure edits and mirrors each one onto the preview
/// channel.
///
/// Every edit is broadcast as a partial message carrying only what changed.
/// Nothing is persisted until [`StructureEditor::publish`].
pub struct StructureEditor {
    channel: Arc<dyn PreviewChannel>,
    working: LandingStructure,
}

impl StructureEditor {
    pub fn new(channel: Arc<dyn PreviewChannel>, initial: LandingStructure) -> Self {
        Self {
            channel,
            working: initial,
        }
    }

    /// Seed the working copy from defaults merged with the committed layer.
    pub async fn load(channel: Arc<dyn PreviewChannel>, service: &ConfigService) -> Self {
        Self::new(channel, service.resolve(None).await)
    }

    pub fn structure(&self) -> &LandingStructure {
        &self.working
    }

    /// Move a section to `index` (clamped to the end). Returns the number of
    /// listeners reached, or `None` when the section is not in the order.
    pub fn move_section(&mut self, id: SectionId, index: usize) -> Option<usize> {
        let from = self.working.section_order.iter().position(|s| *s == id)?;
        let section = self.working.section_order.remove(from);
        let to = index.min(self.working.section_order.len());
        self.working.section_order.insert(to, section);
        Some(self.broadcast(PreviewMessage::order(
            self.working.section_order.clone(),
        )))
    }

    /// Replace the whole order; repeated ids keep their first position.
    pub fn set_order(&mut self, order: Vec<SectionId>) -> usize {
        let mut deduped = Vec::with_capacity(order.len());
        for id in order {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        self.working.section_order = deduped;
        self.broadcast(PreviewMessage::order(self.working.section_order.clone()))
    }

    pub fn set_visible(&mut self, id: SectionId, visible: bool) -> usize {
        self.working.section_visibility.insert(id, visible);
        self.broadcast(PreviewMessage::visibility(BTreeMap::from([(id, visible)])))
    }

    pub fn set_layout(&mut self, id: SectionId, layout: LayoutParams) -> usize {
        self.working.section_layout.insert(id, layout.clone());
        self.broadcast(PreviewMessage::layouts(BTreeMap::from([(id, layout)])))
    }

    /// Broadcast the full working copy, e.g. after a renderer reloads.
    pub fn resync(&self) -> usize {
        let structure = &self.working;
        self.broadcast(PreviewMessage {
            order: Some(structure.section_order.clone()),
            visibility: Some(structure.section_visibility.clone()),
            layouts: Some(structure.section_layout.clone()),
        })
    }

    /// Persist the working copy as the committed structure.
    ///
    /// The full structure is written under the service's structure key; the
    /// service replaces values wholesale so nested fields are merged here.
    pub async fn publish(
        &self,
        service: &ConfigService,
        credential: Option<&str>,
    ) -> Result<(), ServiceError> {
        let value = serde_json::to_value(&self.working)?;
        service
            .set(
                credential,
                SetConfigRequest::new(service.structure_key(), value),
            )
            .await?;
        info!(
            "published landing structure (key={}, sections={})",
            service.structure_key(),
            self.working.section_order.len()
        );
        Ok(())
    }

    fn broadcast(&self, message: PreviewMessage) -> usize {
        let listeners = self.channel.send(message.to_value());
        debug!("preview update sent (listeners={listeners})");
        listeners
    }
}

#[cfg(test)]
mod tests {
    use super::StructureEditor;
    use crate::auth::SharedTokenVerifier;
    use crate::error::ServiceError;
    use crate::preview::{BroadcastPreviewChannel, LiveRenderer, PreviewChannel};
    use crate::service::ConfigService;
    use crate::store::FileConfigStore;
    use futures_util::StreamExt;
    use pagecraft_config::default_structure;
    use pagecraft_protocol::{LayoutParams, PreviewMessage, SectionId};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn editor(channel: &Arc<BroadcastPreviewChannel>) -> StructureEditor {
        StructureEditor::new(channel.clone(), default_structure().clone())
    }

    #[tokio::test]
    async fn edits_broadcast_only_what_changed() {
        let channel = Arc::new(BroadcastPreviewChannel::new());
        let mut receiver = channel.subscribe();
        let mut editor = editor(&channel);

        assert_eq!(editor.set_visible(SectionId::Gallery, false), 1);
        assert_eq!(
            editor.set_layout(SectionId::Hero, LayoutParams::new().with("paddingTop", 0)),
            1
        );

        let first = receiver.next().await.expect("visibility");
        assert_eq!(
            PreviewMessage::decode(&first).expect("decode"),
            PreviewMessage::visibility(BTreeMap::from([(SectionId::Gallery, false)]))
        );
        let second = receiver.next().await.expect("layout");
        assert_eq!(
            PreviewMessage::decode(&second).expect("decode"),
            PreviewMessage::layouts(BTreeMap::from([(
                SectionId::Hero,
                LayoutParams::new().with("paddingTop", 0),
            )]))
        );
    }

    #[tokio::test]
    async fn move_section_reorders_and_clamps() {
        let channel = Arc::new(BroadcastPreviewChannel::new());
        let mut editor = editor(&channel);

        assert_eq!(editor.move_section(SectionId::Contact, 0), Some(0));
        assert_eq!(editor.structure().section_order[0], SectionId::Contact);

        editor.move_section(SectionId::Contact, 100);
        assert_eq!(
            editor.structure().section_order.last(),
            Some(&SectionId::Contact)
        );

        editor.set_order(vec![SectionId::Hero, SectionId::Hero, SectionId::Gallery]);
        assert_eq!(
            editor.structure().section_order,
            vec![SectionId::Hero, SectionId::Gallery]
        );
        assert_eq!(editor.move_section(SectionId::Catalog, 0), None);
    }

    #[tokio::test]
    async fn renderer_following_edits_matches_working_copy() {
        let channel = Arc::new(BroadcastPreviewChannel::new());
        let mut receiver = channel.subscribe();
        let mut editor = editor(&channel);
        let mut renderer = LiveRenderer::with_compiled_defaults();
        renderer.load_committed(None);

        editor.set_visible(SectionId::StyleQuiz, false);
        editor.move_section(SectionId::Contact, 1);
        editor.set_layout(SectionId::Gallery, LayoutParams::new().with("columns", 4));
        for _ in 0..3 {
            let payload = receiver.next().await.expect("payload");
            renderer.apply_payload(&payload).expect("apply");
        }

        assert_eq!(renderer.structure().as_ref(), Some(editor.structure()));
    }

    #[tokio::test]
    async fn publish_requires_admin_and_commits_structure() {
        let temp = tempdir().expect("tempdir");
        let service = ConfigService::new(
            Arc::new(FileConfigStore::new(temp.path().join("config.json"))),
            Arc::new(SharedTokenVerifier::new(Some("admin".to_string()))),
        );
        let channel = Arc::new(BroadcastPreviewChannel::new());
        let mut editor = StructureEditor::load(channel, &service).await;
        editor.set_visible(SectionId::Benefits, false);

        let err = editor.publish(&service, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
        assert_eq!(service.committed_structure().await, None);

        editor.publish(&service, Some("admin")).await.expect("publish");
        let resolved = service.resolve(None).await;
        assert_eq!(&resolved, editor.structure());
        assert!(!resolved.is_visible(SectionId::Benefits));
    }
}
