use backend::{Backend, CipherOps, Context, EncodeOps};
use itertools::iproduct;

use crate::error::{BuildError, BuildResult, RuntimeError, RuntimeResult};
use crate::model::{AvgPoolDescriptor, LayerKind};
use crate::tensor::EncryptedTensor;

/// Strided average pooling: homomorphic window sum followed by a plaintext
/// multiply with the reciprocal of the window element count. The reciprocal
/// is encoded once at build time; there is no homomorphic division.
pub struct AvgPoolLayer<B: Backend> {
    kernel: (usize, usize),
    stride: (usize, usize),
    scale: B::Encoded,
}

impl<B: Backend> AvgPoolLayer<B> {
    pub fn build(ctx: &Context<B>, desc: &AvgPoolDescriptor) -> BuildResult<Self>
    where
        Context<B>: EncodeOps<B>,
    {
        let malformed = |reason: &str| BuildError::MalformedDescriptor {
            kind: LayerKind::AveragePool,
            reason: reason.to_string(),
        };

        let (kh, kw) = desc.kernel;
        if kh == 0 || kw == 0 {
            return Err(malformed("kernel dimensions must be nonzero"));
        }
        if desc.stride.0 == 0 || desc.stride.1 == 0 {
            return Err(malformed("stride must be nonzero"));
        }

        Ok(Self {
            kernel: desc.kernel,
            stride: desc.stride,
            scale: ctx.encode(1.0 / (kh * kw) as f64)?,
        })
    }

    pub fn apply(&self, ctx: &Context<B>, input: &EncryptedTensor<B>) -> RuntimeResult<EncryptedTensor<B>>
    where
        Context<B>: CipherOps<B>,
    {
        let &[channels, height, width] = input.shape() else {
            return Err(RuntimeError::ShapeMismatch {
                layer: "average-pool",
                expected: "rank-3 input".to_string(),
                found: format!("rank-{}", input.rank()),
            });
        };
        let (kh, kw) = self.kernel;
        let (sh, sw) = self.stride;
        if height < kh || width < kw {
            return Err(RuntimeError::ShapeMismatch {
                layer: "average-pool",
                expected: format!("spatial extent of at least {kh}x{kw}"),
                found: format!("{height}x{width}"),
            });
        }

        let out_h: usize = (height - kh) / sh + 1;
        let out_w: usize = (width - kw) / sw + 1;

        let mut out: Vec<B::Ciphertext> = Vec::with_capacity(channels * out_h * out_w);
        for c in 0..channels {
            for oy in 0..out_h {
                for ox in 0..out_w {
                    let mut acc: B::Ciphertext = input.at3(c, oy * sh, ox * sw).clone();
                    for (ky, kx) in iproduct!(0..kh, 0..kw).skip(1) {
                        acc = ctx.add(&acc, input.at3(c, oy * sh + ky, ox * sw + kx))?;
                    }
                    out.push(ctx.mul_plain(&acc, &self.scale)?);
                }
            }
        }

        EncryptedTensor::new(vec![channels, out_h, out_w], out)
    }
}
