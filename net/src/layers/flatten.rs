use backend::Backend;

use crate::error::RuntimeResult;
use crate::tensor::EncryptedTensor;

/// Row-major reshape to rank-1. Pure reordering; no homomorphic operation
/// and no noise cost.
pub struct FlattenLayer;

impl FlattenLayer {
    pub fn apply<B: Backend>(&self, input: &EncryptedTensor<B>) -> RuntimeResult<EncryptedTensor<B>> {
        Ok(input.clone().flatten())
    }
}
