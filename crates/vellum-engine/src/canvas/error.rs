use std::fmt;

/// Backend hook that refused a canvas request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BackendStage {
    Clear,
    PreRender,
    PostRender,
    Sync,
}

impl fmt::Display for BackendStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendStage::Clear => "clear",
            BackendStage::PreRender => "pre_render",
            BackendStage::PostRender => "post_render",
            BackendStage::Sync => "sync",
        })
    }
}

/// Why a canvas operation was rejected. The canvas is unchanged in every case.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("canvas is drawing; call sync() first")]
    Drawing,

    #[error("canvas has no paints")]
    EmptyScene,

    #[error("canvas is already synced")]
    AlreadySynced,

    #[error("no paint produced visible output")]
    NothingRendered,

    #[error("backend is borrowed elsewhere")]
    BackendBusy,

    #[error("a paint is borrowed elsewhere")]
    PaintBusy,

    #[error("{backend} refused {stage}")]
    Backend {
        /// [`RenderBackend::name`](crate::render::RenderBackend::name) of the refusing backend.
        backend: String,
        stage: BackendStage,
        #[source]
        source: anyhow::Error,
    },

    #[error("paint could not be taken over by the canvas")]
    PaintUnavailable,
}

/// Flat outcome code for callers that only branch on the category.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResultCode {
    Success,
    /// A state or backend precondition was not met.
    InsufficientCondition,
    /// The incoming paint could not be accepted.
    MemoryCorruption,
}

impl CanvasError {
    pub fn code(&self) -> ResultCode {
        match self {
            CanvasError::PaintUnavailable => ResultCode::MemoryCorruption,
            _ => ResultCode::InsufficientCondition,
        }
    }
}

impl ResultCode {
    pub fn of<T>(result: &CanvasResult<T>) -> Self {
        match result {
            Ok(_) => ResultCode::Success,
            Err(e) => e.code(),
        }
    }
}

pub type CanvasResult<T> = Result<T, CanvasError>;
