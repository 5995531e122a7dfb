use backend::{Backend, Context, HomomorphicOps};
use tracing::trace;

use crate::error::RuntimeResult;
use crate::layers::EncryptedLayer;
use crate::tensor::EncryptedTensor;

/// Ordered sequence of encrypted layers. Mirrors the plaintext layer order
/// with at most one refresh insertion; built once, applied to any number of
/// input tensors.
pub struct EncryptedPipeline<B: Backend> {
    layers: Vec<EncryptedLayer<B>>,
}

impl<B: Backend> EncryptedPipeline<B> {
    pub(crate) fn new(layers: Vec<EncryptedLayer<B>>) -> Self {
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[EncryptedLayer<B>] {
        &self.layers
    }

    /// Feeds the input through every layer in order. Layers are strictly
    /// sequential: each output is the next layer's input.
    pub fn apply(&self, ctx: &Context<B>, input: &EncryptedTensor<B>) -> RuntimeResult<EncryptedTensor<B>>
    where
        Context<B>: HomomorphicOps<B>,
    {
        let mut current: EncryptedTensor<B> = input.clone();
        for (index, layer) in self.layers.iter().enumerate() {
            current = layer.apply(ctx, &current)?;
            trace!(
                "applied layer index={index} kind={} out_shape={:?}",
                layer.name(),
                current.shape()
            );
        }
        Ok(current)
    }
}
