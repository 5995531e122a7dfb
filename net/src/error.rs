use backend::CryptoError;
use thiserror::Error;

use crate::model::LayerKind;

pub type BuildResult<T> = Result<T, BuildError>;
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Pipeline construction failures. A build either fully succeeds or fails
/// with one of these; no partial pipeline is ever returned.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unsupported layer kind: {0}")]
    UnsupportedLayerKind(LayerKind),
    #[error("refresh position {position} out of range for {layers} layers")]
    InvalidRefreshPosition { position: usize, layers: usize },
    #[error("malformed {kind} descriptor: {reason}")]
    MalformedDescriptor { kind: LayerKind, reason: String },
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Layer application failures. The pipeline produces no partial output.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("shape mismatch in {layer} layer: expected {expected}, found {found}")]
    ShapeMismatch {
        layer: &'static str,
        expected: String,
        found: String,
    },
    #[error("tensor of shape {shape:?} requires {expected} elements, found {elements}")]
    TensorShape {
        shape: Vec<usize>,
        expected: usize,
        elements: usize,
    },
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
