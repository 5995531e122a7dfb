use backend::{CipherOps, Context, EncodeOps, Plain, Source};
use itertools::izip;

use crate::layers::RefreshLayer;
use crate::tensor::EncryptedTensor;
use crate::test_plain::{ctx_with_budget, decrypt_tensor, encrypt_tensor};

#[test]
fn values_are_preserved() {
    let ctx: Context<Plain> = ctx_with_budget(16);
    let mut source: Source = Source::new([0u8; 32]);

    let values: Vec<f64> = (0..12).map(|_| source.next_f64(-4.0, 4.0)).collect();
    let input = encrypt_tensor(&ctx, &values, vec![3, 2, 2], &mut source);
    let output = RefreshLayer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), input.shape());
    izip!(
        decrypt_tensor(&ctx, &input).iter(),
        decrypt_tensor(&ctx, &output).iter()
    )
    .for_each(|(a, b)| assert_eq!(a, b));
}

#[test]
fn budget_is_reset_for_every_element() {
    let ctx: Context<Plain> = ctx_with_budget(16);
    let mut source: Source = Source::new([0u8; 32]);

    let input = encrypt_tensor(&ctx, &[2.0; 4], vec![4], &mut source);
    let worn: Vec<_> = input
        .iter()
        .map(|ct| ctx.mul_plain(ct, &ctx.encode(1.0).unwrap()).unwrap())
        .collect();
    let worn: EncryptedTensor<Plain> = EncryptedTensor::new(vec![4], worn).unwrap();
    worn.iter().for_each(|ct| assert_eq!(ct.budget(), 12));

    let output = RefreshLayer.apply(&ctx, &worn).unwrap();
    output.iter().for_each(|ct| assert_eq!(ct.budget(), 16));
}

#[test]
fn refresh_rerandomizes() {
    let ctx: Context<Plain> = ctx_with_budget(16);
    let mut source: Source = Source::new([0u8; 32]);

    let input = encrypt_tensor(&ctx, &[2.0; 4], vec![4], &mut source);
    let output = RefreshLayer.apply(&ctx, &input).unwrap();

    izip!(input.iter(), output.iter()).for_each(|(a, b)| assert_ne!(a.randomizer(), b.randomizer()));
}
