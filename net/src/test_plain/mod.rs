use backend::{Context, Plain, PlainParams, Source};

use crate::tensor::EncryptedTensor;

mod avg_pool;
mod build;
mod conv;
mod flatten;
mod linear;
mod pipeline;
mod refresh;

pub(crate) fn plain_ctx() -> Context<Plain> {
    Context::new(PlainParams::default())
}

pub(crate) fn ctx_with_budget(fresh_budget: u32) -> Context<Plain> {
    Context::new(PlainParams {
        fresh_budget,
        ..PlainParams::default()
    })
}

pub(crate) fn encrypt_tensor(
    ctx: &Context<Plain>,
    values: &[f64],
    shape: Vec<usize>,
    source: &mut Source,
) -> EncryptedTensor<Plain> {
    let data: Vec<_> = values.iter().map(|v| ctx.encrypt(*v, source)).collect();
    EncryptedTensor::new(shape, data).unwrap()
}

pub(crate) fn decrypt_tensor(ctx: &Context<Plain>, tensor: &EncryptedTensor<Plain>) -> Vec<f64> {
    tensor.iter().map(|ct| ctx.decrypt(ct).unwrap()).collect()
}
