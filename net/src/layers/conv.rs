use backend::{Backend, CipherOps, Context, EncodeOps};
use itertools::iproduct;

use crate::error::{BuildError, BuildResult, RuntimeError, RuntimeResult};
use crate::model::{ConvDescriptor, LayerKind};
use crate::tensor::EncryptedTensor;

/// Valid (unpadded) convolution over an encrypted rank-3 tensor. The kernel
/// and bias are encoded once at build time; `apply` is a homomorphic
/// multiply-accumulate over sliding windows at the configured stride.
pub struct ConvLayer<B: Backend> {
    weight: Vec<B::Encoded>,
    bias: Vec<B::Encoded>,
    out_channels: usize,
    in_channels: usize,
    kernel: (usize, usize),
    stride: (usize, usize),
}

impl<B: Backend> ConvLayer<B> {
    pub fn build(ctx: &Context<B>, desc: &ConvDescriptor) -> BuildResult<Self>
    where
        Context<B>: EncodeOps<B>,
    {
        let malformed = |reason: String| BuildError::MalformedDescriptor {
            kind: LayerKind::Convolution,
            reason,
        };

        let (kh, kw) = desc.kernel;
        let (sh, sw) = desc.stride;
        if desc.out_channels == 0 || desc.in_channels == 0 {
            return Err(malformed("channel counts must be nonzero".to_string()));
        }
        if kh == 0 || kw == 0 {
            return Err(malformed("kernel dimensions must be nonzero".to_string()));
        }
        if sh == 0 || sw == 0 {
            return Err(malformed("stride must be nonzero".to_string()));
        }
        let expected: usize = desc.out_channels * desc.in_channels * kh * kw;
        if desc.weight.len() != expected {
            return Err(malformed(format!(
                "weight length {} does not match {}x{}x{}x{}",
                desc.weight.len(),
                desc.out_channels,
                desc.in_channels,
                kh,
                kw
            )));
        }
        if desc.bias.len() != desc.out_channels {
            return Err(malformed(format!(
                "bias length {} does not match {} output channels",
                desc.bias.len(),
                desc.out_channels
            )));
        }

        Ok(Self {
            weight: desc.weight.iter().map(|w| ctx.encode(*w)).collect::<Result<_, _>>()?,
            bias: desc.bias.iter().map(|b| ctx.encode(*b)).collect::<Result<_, _>>()?,
            out_channels: desc.out_channels,
            in_channels: desc.in_channels,
            kernel: desc.kernel,
            stride: desc.stride,
        })
    }

    fn weight_at(&self, o: usize, ci: usize, ky: usize, kx: usize) -> &B::Encoded {
        let (kh, kw) = self.kernel;
        &self.weight[((o * self.in_channels + ci) * kh + ky) * kw + kx]
    }

    pub fn apply(&self, ctx: &Context<B>, input: &EncryptedTensor<B>) -> RuntimeResult<EncryptedTensor<B>>
    where
        Context<B>: CipherOps<B>,
    {
        let &[channels, height, width] = input.shape() else {
            return Err(RuntimeError::ShapeMismatch {
                layer: "convolution",
                expected: "rank-3 input".to_string(),
                found: format!("rank-{}", input.rank()),
            });
        };
        if channels != self.in_channels {
            return Err(RuntimeError::ShapeMismatch {
                layer: "convolution",
                expected: format!("{} input channels", self.in_channels),
                found: format!("{channels}"),
            });
        }
        let (kh, kw) = self.kernel;
        let (sh, sw) = self.stride;
        if height < kh || width < kw {
            return Err(RuntimeError::ShapeMismatch {
                layer: "convolution",
                expected: format!("spatial extent of at least {kh}x{kw}"),
                found: format!("{height}x{width}"),
            });
        }

        let out_h: usize = (height - kh) / sh + 1;
        let out_w: usize = (width - kw) / sw + 1;

        let mut out: Vec<B::Ciphertext> = Vec::with_capacity(self.out_channels * out_h * out_w);
        for o in 0..self.out_channels {
            for oy in 0..out_h {
                for ox in 0..out_w {
                    // window is nonempty: channel and kernel dims are
                    // validated nonzero at build time
                    let mut acc: B::Ciphertext =
                        ctx.mul_plain(input.at3(0, oy * sh, ox * sw), self.weight_at(o, 0, 0, 0))?;
                    for (ci, ky, kx) in iproduct!(0..self.in_channels, 0..kh, 0..kw).skip(1) {
                        let term: B::Ciphertext = ctx.mul_plain(
                            input.at3(ci, oy * sh + ky, ox * sw + kx),
                            self.weight_at(o, ci, ky, kx),
                        )?;
                        acc = ctx.add(&acc, &term)?;
                    }
                    out.push(ctx.add_plain(&acc, &self.bias[o])?);
                }
            }
        }

        EncryptedTensor::new(vec![self.out_channels, out_h, out_w], out)
    }
}
