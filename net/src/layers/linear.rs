use backend::{Backend, CipherOps, Context, EncodeOps};

use crate::error::{BuildError, BuildResult, RuntimeError, RuntimeResult};
use crate::model::{LayerKind, LinearDescriptor};
use crate::tensor::EncryptedTensor;

/// Homomorphic matrix-vector multiply with encoded weights, plus the
/// encoded bias vector.
pub struct LinearLayer<B: Backend> {
    weight: Vec<B::Encoded>,
    bias: Vec<B::Encoded>,
    out_features: usize,
    in_features: usize,
}

impl<B: Backend> LinearLayer<B> {
    pub fn build(ctx: &Context<B>, desc: &LinearDescriptor) -> BuildResult<Self>
    where
        Context<B>: EncodeOps<B>,
    {
        let malformed = |reason: String| BuildError::MalformedDescriptor {
            kind: LayerKind::Linear,
            reason,
        };

        if desc.out_features == 0 || desc.in_features == 0 {
            return Err(malformed("feature counts must be nonzero".to_string()));
        }
        if desc.weight.len() != desc.out_features * desc.in_features {
            return Err(malformed(format!(
                "weight length {} does not match {}x{}",
                desc.weight.len(),
                desc.out_features,
                desc.in_features
            )));
        }
        if desc.bias.len() != desc.out_features {
            return Err(malformed(format!(
                "bias length {} does not match {} output features",
                desc.bias.len(),
                desc.out_features
            )));
        }

        Ok(Self {
            weight: desc.weight.iter().map(|w| ctx.encode(*w)).collect::<Result<_, _>>()?,
            bias: desc.bias.iter().map(|b| ctx.encode(*b)).collect::<Result<_, _>>()?,
            out_features: desc.out_features,
            in_features: desc.in_features,
        })
    }

    pub fn apply(&self, ctx: &Context<B>, input: &EncryptedTensor<B>) -> RuntimeResult<EncryptedTensor<B>>
    where
        Context<B>: CipherOps<B>,
    {
        let &[width] = input.shape() else {
            return Err(RuntimeError::ShapeMismatch {
                layer: "linear",
                expected: "rank-1 input".to_string(),
                found: format!("rank-{}", input.rank()),
            });
        };
        if width != self.in_features {
            return Err(RuntimeError::ShapeMismatch {
                layer: "linear",
                expected: format!("input width {}", self.in_features),
                found: format!("{width}"),
            });
        }

        let data: &[B::Ciphertext] = input.data();
        let mut out: Vec<B::Ciphertext> = Vec::with_capacity(self.out_features);
        for row in 0..self.out_features {
            let base: usize = row * self.in_features;
            let mut acc: B::Ciphertext = ctx.mul_plain(&data[0], &self.weight[base])?;
            for col in 1..self.in_features {
                let term: B::Ciphertext = ctx.mul_plain(&data[col], &self.weight[base + col])?;
                acc = ctx.add(&acc, &term)?;
            }
            out.push(ctx.add_plain(&acc, &self.bias[row])?);
        }

        EncryptedTensor::new(vec![self.out_features], out)
    }
}
