//! Render session: drives a [`LiveRenderer`] from a committed source and a
//! preview receiver, re-rendering after every change.

use super::channel::PreviewReceiver;
use super::renderer::{LiveRenderer, RenderPhase};
use crate::source::CommittedSource;
use futures_util::StreamExt;
use log::{debug, info};
use pagecraft_config::RenderPlan;
use pagecraft_protocol::LandingStructure;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Instantiates section views from a render plan.
pub trait SectionRenderer: Send {
    fn render(&mut self, plan: &RenderPlan, phase: RenderPhase);
}

/// Builder for a render session.
pub struct RenderSession {
    defaults: Arc<LandingStructure>,
    source: Arc<dyn CommittedSource>,
}

impl RenderSession {
    pub fn new(defaults: Arc<LandingStructure>, source: Arc<dyn CommittedSource>) -> Self {
        Self { defaults, source }
    }

    /// Start the session on the current tokio runtime.
    ///
    /// The receiver should be subscribed before calling so that messages
    /// sent while the committed config is loading are applied once it
    /// resolves, in delivery order.
    pub fn spawn<R>(self, receiver: PreviewReceiver, renderer: R) -> RenderSessionHandle
    where
        R: SectionRenderer + 'static,
    {
        let (phase_tx, phase_rx) = watch::channel(RenderPhase::Uninitialized);
        let task = tokio::spawn(run_session(
            self.defaults,
            self.source,
            receiver,
            renderer,
            phase_tx,
        ));
        RenderSessionHandle {
            task: Some(task),
            phase: phase_rx,
        }
    }
}

async fn run_session<R: SectionRenderer>(
    defaults: Arc<LandingStructure>,
    source: Arc<dyn CommittedSource>,
    mut receiver: PreviewReceiver,
    mut renderer: R,
    phase_tx: watch::Sender<RenderPhase>,
) {
    let mut state = LiveRenderer::new(defaults);
    let committed = source.fetch().await;
    state.load_committed(committed);
    render(&state, &mut renderer, &phase_tx);

    while let Some(payload) = receiver.next().await {
        if state.apply_payload(&payload).is_ok() {
            render(&state, &mut renderer, &phase_tx);
        }
    }
    info!("preview channel closed; render session finished");
}

fn render<R: SectionRenderer>(
    state: &LiveRenderer,
    renderer: &mut R,
    phase_tx: &watch::Sender<RenderPhase>,
) {
    let Some(plan) = state.plan() else {
        return;
    };
    let phase = state.phase();
    debug!(
        "rendering sections (phase={:?}, visible={})",
        phase,
        plan.sections.len()
    );
    phase_tx.send_replace(phase);
    renderer.render(&plan, phase);
}

/// Handle to a running render session.
///
/// Dropping the handle tears the session down and releases its channel
/// subscription.
pub struct RenderSessionHandle {
    task: Option<JoinHandle<()>>,
    phase: watch::Receiver<RenderPhase>,
}

impl RenderSessionHandle {
    /// Phase of the most recent (or in-progress) render.
    pub fn phase(&self) -> RenderPhase {
        *self.phase.borrow()
    }

    /// Wait until the session has rendered in the given phase.
    pub async fn wait_for_phase(&mut self, phase: RenderPhase) -> bool {
        self.phase.wait_for(|current| *current == phase).await.is_ok()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }

    /// Stop the session and wait for its subscription to be released.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            debug!("render session shut down");
        }
    }
}

impl Drop for RenderSessionHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
