use crate::platform::SurfaceError;

/// Errors surfaced by [`Editor`](crate::Editor) operations.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("editor surface is not mounted")]
    NotMounted,
    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),
}

pub type EditorResult<T> = Result<T, EditorError>;
