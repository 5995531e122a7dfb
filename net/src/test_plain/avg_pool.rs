use backend::{Context, Plain, Source};

use crate::error::RuntimeError;
use crate::layers::AvgPoolLayer;
use crate::model::AvgPoolDescriptor;
use crate::test_plain::{decrypt_tensor, encrypt_tensor, plain_ctx};

fn pool(kernel: (usize, usize), stride: (usize, usize)) -> AvgPoolDescriptor {
    AvgPoolDescriptor { kernel, stride }
}

#[test]
fn equal_values_average_exactly() {
    test_equal_values_average_exactly(2.5);
    test_equal_values_average_exactly(-1.25);
    test_equal_values_average_exactly(0.0);
}

fn test_equal_values_average_exactly(v: f64) {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = AvgPoolLayer::build(&ctx, &pool((2, 2), (2, 2))).unwrap();

    let input = encrypt_tensor(&ctx, &[v; 16], vec![1, 4, 4], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[1, 2, 2]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![v; 4]);
}

#[test]
fn known_averages_disjoint_windows() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = AvgPoolLayer::build(&ctx, &pool((2, 2), (2, 2))).unwrap();

    let values: Vec<f64> = vec![1.0, 3.0, 5.0, 7.0, 2.0, 4.0, 6.0, 8.0];
    let input = encrypt_tensor(&ctx, &values, vec![1, 2, 4], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[1, 1, 2]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![2.5, 6.5]);
}

#[test]
fn known_averages_overlapping_windows() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = AvgPoolLayer::build(&ctx, &pool((2, 2), (1, 1))).unwrap();

    let values: Vec<f64> = vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
    let input = encrypt_tensor(&ctx, &values, vec![1, 2, 3], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[1, 1, 2]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![4.0, 6.0]);
}

#[test]
fn channels_pool_independently() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = AvgPoolLayer::build(&ctx, &pool((2, 2), (2, 2))).unwrap();

    let values: Vec<f64> = vec![1.0, 1.0, 1.0, 1.0, 10.0, 10.0, 10.0, 10.0];
    let input = encrypt_tensor(&ctx, &values, vec![2, 2, 2], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[2, 1, 1]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![1.0, 10.0]);
}

#[test]
fn shape_mismatches() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = AvgPoolLayer::build(&ctx, &pool((2, 2), (2, 2))).unwrap();

    let rank1 = encrypt_tensor(&ctx, &[0.0; 4], vec![4], &mut source);
    assert!(matches!(
        layer.apply(&ctx, &rank1),
        Err(RuntimeError::ShapeMismatch { layer: "average-pool", .. })
    ));

    let undersized = encrypt_tensor(&ctx, &[0.0; 2], vec![1, 1, 2], &mut source);
    assert!(matches!(
        layer.apply(&ctx, &undersized),
        Err(RuntimeError::ShapeMismatch { layer: "average-pool", .. })
    ));
}
