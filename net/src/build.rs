use backend::{Backend, Context, EncodeOps};
use tracing::debug;

use crate::error::{BuildError, BuildResult};
use crate::layers::{AvgPoolLayer, ConvLayer, EncryptedLayer, FlattenLayer, LinearLayer, RefreshLayer};
use crate::model::LayerDescriptor;
use crate::pipeline::EncryptedPipeline;

/// Closed dispatch from a plaintext layer kind to the matching encrypted
/// constructor. Kinds without an encrypted counterpart are rejected here;
/// all numeric work happens inside the constructors.
pub fn encode_layer<B: Backend>(ctx: &Context<B>, desc: &LayerDescriptor) -> BuildResult<EncryptedLayer<B>>
where
    Context<B>: EncodeOps<B>,
{
    match desc {
        LayerDescriptor::Convolution(d) => Ok(EncryptedLayer::Convolution(ConvLayer::build(ctx, d)?)),
        LayerDescriptor::Linear(d) => Ok(EncryptedLayer::Linear(LinearLayer::build(ctx, d)?)),
        LayerDescriptor::AveragePool(d) => Ok(EncryptedLayer::AveragePool(AvgPoolLayer::build(ctx, d)?)),
        LayerDescriptor::Flatten => Ok(EncryptedLayer::Flatten(FlattenLayer)),
        LayerDescriptor::ReLU | LayerDescriptor::MaxPool(_) => {
            Err(BuildError::UnsupportedLayerKind(desc.kind()))
        }
    }
}

/// Walks the plaintext layer sequence in order and produces the encrypted
/// pipeline, inserting one refresh layer immediately after the layer at
/// `refresh_position` (`None` means no refresh). Either every layer encodes
/// or the whole build fails.
pub fn build<B: Backend>(
    ctx: &Context<B>,
    layers: &[LayerDescriptor],
    refresh_position: Option<usize>,
) -> BuildResult<EncryptedPipeline<B>>
where
    Context<B>: EncodeOps<B>,
{
    if let Some(position) = refresh_position {
        if position >= layers.len() {
            return Err(BuildError::InvalidRefreshPosition {
                position,
                layers: layers.len(),
            });
        }
    }

    let mut encoded: Vec<EncryptedLayer<B>> =
        Vec::with_capacity(layers.len() + usize::from(refresh_position.is_some()));
    for (index, desc) in layers.iter().enumerate() {
        let layer: EncryptedLayer<B> = encode_layer(ctx, desc)?;
        debug!("encoded layer index={index} kind={}", desc.kind());
        encoded.push(layer);
        if refresh_position == Some(index) {
            debug!("inserted refresh layer after index={index}");
            encoded.push(EncryptedLayer::Refresh(RefreshLayer));
        }
    }

    Ok(EncryptedPipeline::new(encoded))
}
