mod avg_pool;
mod conv;
mod flatten;
mod linear;
mod refresh;

pub use avg_pool::*;
pub use conv::*;
pub use flatten::*;
pub use linear::*;
pub use refresh::*;

use backend::{Backend, Context, HomomorphicOps};

use crate::error::RuntimeResult;
use crate::tensor::EncryptedTensor;

/// One encrypted counterpart per supported plaintext layer kind, plus the
/// noise-refresh layer the builder may interleave. Variants hold only the
/// constants encoded at build time; `apply` is a pure function of the
/// input tensor.
pub enum EncryptedLayer<B: Backend> {
    Convolution(ConvLayer<B>),
    Linear(LinearLayer<B>),
    AveragePool(AvgPoolLayer<B>),
    Flatten(FlattenLayer),
    Refresh(RefreshLayer),
}

impl<B: Backend> EncryptedLayer<B> {
    pub fn apply(&self, ctx: &Context<B>, input: &EncryptedTensor<B>) -> RuntimeResult<EncryptedTensor<B>>
    where
        Context<B>: HomomorphicOps<B>,
    {
        match self {
            EncryptedLayer::Convolution(layer) => layer.apply(ctx, input),
            EncryptedLayer::Linear(layer) => layer.apply(ctx, input),
            EncryptedLayer::AveragePool(layer) => layer.apply(ctx, input),
            EncryptedLayer::Flatten(layer) => layer.apply(input),
            EncryptedLayer::Refresh(layer) => layer.apply(ctx, input),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EncryptedLayer::Convolution(_) => "convolution",
            EncryptedLayer::Linear(_) => "linear",
            EncryptedLayer::AveragePool(_) => "average-pool",
            EncryptedLayer::Flatten(_) => "flatten",
            EncryptedLayer::Refresh(_) => "refresh",
        }
    }
}
