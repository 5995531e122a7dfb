use backend::{Backend, Context, RefreshOps};

use crate::error::RuntimeResult;
use crate::tensor::EncryptedTensor;

/// Element-wise re-encryption: same shape, same plaintext values, reset
/// noise budget. Where this layer sits in the pipeline is the caller's
/// choice at build time.
pub struct RefreshLayer;

impl RefreshLayer {
    pub fn apply<B: Backend>(&self, ctx: &Context<B>, input: &EncryptedTensor<B>) -> RuntimeResult<EncryptedTensor<B>>
    where
        Context<B>: RefreshOps<B>,
    {
        let data: Vec<B::Ciphertext> = input
            .iter()
            .map(|ct| ctx.refresh(ct))
            .collect::<Result<_, _>>()?;
        EncryptedTensor::new(input.shape().to_vec(), data)
    }
}
