use pagecraft_config::RenderPlan;
use pagecraft_core::{RenderPhase, SectionRenderer};
use pagecraft_protocol::SectionId;
use tokio::sync::mpsc;

/// One render call captured by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRender {
    pub plan: RenderPlan,
    pub phase: RenderPhase,
}

impl RecordedRender {
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.plan.section_ids()
    }
}

/// Renderer that forwards every render call to a receiver.
pub struct RecordingRenderer {
    sink: mpsc::UnboundedSender<RecordedRender>,
}

impl RecordingRenderer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RecordedRender>) {
        let (sink, renders) = mpsc::unbounded_channel();
        (Self { sink }, renders)
    }
}

impl SectionRenderer for RecordingRenderer {
    fn render(&mut self, plan: &RenderPlan, phase: RenderPhase) {
        let _ = self.sink.send(RecordedRender {
            plan: plan.clone(),
            phase,
        });
    }
}
