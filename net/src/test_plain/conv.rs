use backend::{Context, Plain, Source};
use itertools::izip;

use crate::error::RuntimeError;
use crate::layers::ConvLayer;
use crate::model::ConvDescriptor;
use crate::test_plain::{decrypt_tensor, encrypt_tensor, plain_ctx};

fn conv_desc(out_channels: usize, in_channels: usize, kernel: (usize, usize), stride: (usize, usize), weight: Vec<f64>, bias: Vec<f64>) -> ConvDescriptor {
    ConvDescriptor {
        out_channels,
        in_channels,
        kernel,
        stride,
        weight,
        bias,
    }
}

#[test]
fn zero_input_yields_bias() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = ConvLayer::build(
        &ctx,
        &conv_desc(2, 1, (2, 2), (1, 1), vec![0.25, -1.5, 2.0, 3.0, 1.0, 1.0, 1.0, 1.0], vec![0.5, -1.0]),
    )
    .unwrap();

    let input = encrypt_tensor(&ctx, &[0.0; 9], vec![1, 3, 3], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[2, 2, 2]);
    let have: Vec<f64> = decrypt_tensor(&ctx, &output);
    let want: Vec<f64> = vec![0.5, 0.5, 0.5, 0.5, -1.0, -1.0, -1.0, -1.0];
    izip!(want.iter(), have.iter()).for_each(|(a, b)| assert_eq!(a, b));
}

#[test]
fn known_values_stride_one() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = ConvLayer::build(
        &ctx,
        &conv_desc(1, 1, (2, 2), (1, 1), vec![1.0, 2.0, 3.0, 4.0], vec![0.0]),
    )
    .unwrap();

    let values: Vec<f64> = (0..9).map(|v| v as f64).collect();
    let input = encrypt_tensor(&ctx, &values, vec![1, 3, 3], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[1, 2, 2]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![27.0, 37.0, 57.0, 67.0]);
}

#[test]
fn known_values_stride_two() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = ConvLayer::build(
        &ctx,
        &conv_desc(1, 1, (2, 2), (2, 2), vec![1.0, 1.0, 1.0, 1.0], vec![0.0]),
    )
    .unwrap();

    let values: Vec<f64> = (0..16).map(|v| v as f64).collect();
    let input = encrypt_tensor(&ctx, &values, vec![1, 4, 4], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[1, 2, 2]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![10.0, 18.0, 42.0, 50.0]);
}

#[test]
fn input_channels_are_accumulated() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    // 1x1 kernel over two channels: out = 2*c0 + 3*c1 + 1
    let layer = ConvLayer::build(&ctx, &conv_desc(1, 2, (1, 1), (1, 1), vec![2.0, 3.0], vec![1.0])).unwrap();

    let values: Vec<f64> = vec![1.0, 2.0, 10.0, 20.0];
    let input = encrypt_tensor(&ctx, &values, vec![2, 1, 2], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[1, 1, 2]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![33.0, 65.0]);
}

#[test]
fn shape_mismatches() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = ConvLayer::build(
        &ctx,
        &conv_desc(1, 1, (2, 2), (1, 1), vec![1.0; 4], vec![0.0]),
    )
    .unwrap();

    let rank1 = encrypt_tensor(&ctx, &[0.0; 4], vec![4], &mut source);
    assert!(matches!(
        layer.apply(&ctx, &rank1),
        Err(RuntimeError::ShapeMismatch { layer: "convolution", .. })
    ));

    let two_channels = encrypt_tensor(&ctx, &[0.0; 18], vec![2, 3, 3], &mut source);
    assert!(matches!(
        layer.apply(&ctx, &two_channels),
        Err(RuntimeError::ShapeMismatch { layer: "convolution", .. })
    ));

    let undersized = encrypt_tensor(&ctx, &[0.0; 2], vec![1, 1, 2], &mut source);
    assert!(matches!(
        layer.apply(&ctx, &undersized),
        Err(RuntimeError::ShapeMismatch { layer: "convolution", .. })
    ));
}
