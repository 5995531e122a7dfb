use backend::{Context, Plain, Source};
use itertools::izip;

use crate::layers::FlattenLayer;
use crate::test_plain::{decrypt_tensor, encrypt_tensor, plain_ctx};

#[test]
fn row_major_reorder_preserves_values() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let values: Vec<f64> = (0..24).map(|v| v as f64).collect();
    let input = encrypt_tensor(&ctx, &values, vec![2, 3, 4], &mut source);
    let output = FlattenLayer.apply(&input).unwrap();

    assert_eq!(output.shape(), &[24]);
    assert_eq!(output.len(), input.len());
    izip!(values.iter(), decrypt_tensor(&ctx, &output).iter()).for_each(|(a, b)| assert_eq!(a, b));
}

#[test]
fn rank_one_is_unchanged() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let input = encrypt_tensor(&ctx, &[1.0, 2.0, 3.0], vec![3], &mut source);
    let output = FlattenLayer.apply(&input).unwrap();

    assert_eq!(output.shape(), &[3]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![1.0, 2.0, 3.0]);
}

#[test]
fn no_noise_cost() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let input = encrypt_tensor(&ctx, &[1.0; 6], vec![2, 3], &mut source);
    let output = FlattenLayer.apply(&input).unwrap();

    izip!(input.iter(), output.iter()).for_each(|(a, b)| {
        assert_eq!(a.budget(), b.budget());
        assert_eq!(a.randomizer(), b.randomizer());
    });
}
