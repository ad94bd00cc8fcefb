//! [`Renderer`](reelgen_core::render::Renderer) implementations.

pub mod ffmpeg;
pub mod simulated;

pub use ffmpeg::FfmpegRenderer;
pub use simulated::SimulatedRenderer;

/// Renderer names accepted by [`RendererKind::from_name`].
pub const VALID_RENDERERS: &[&str] = &["simulated", "ffmpeg"];

/// Which renderer the processor should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    #[default]
    Simulated,
    Ffmpeg,
}

impl RendererKind {
    /// Parse a renderer name. Returns `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "simulated" => Some(Self::Simulated),
            "ffmpeg" => Some(Self::Ffmpeg),
            _ => None,
        }
    }
}
