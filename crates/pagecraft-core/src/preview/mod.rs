//! Live preview: the message channel between editor and renderer, the
//! renderer's preview state machine, and the session driver tying them to a
//! section renderer.

mod channel;
mod editor;
mod renderer;
mod session;

pub use channel::{BroadcastPreviewChannel, PreviewChannel, PreviewReceiver};
pub use editor::StructureEditor;
pub use renderer::{LiveRenderer, RenderPhase};
pub use session::{RenderSession, RenderSessionHandle, SectionRenderer};
