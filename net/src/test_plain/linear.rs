use backend::{Context, Plain, Source};

use crate::error::RuntimeError;
use crate::layers::LinearLayer;
use crate::model::LinearDescriptor;
use crate::test_plain::{decrypt_tensor, encrypt_tensor, plain_ctx};

fn linear_desc(out_features: usize, in_features: usize, weight: Vec<f64>, bias: Vec<f64>) -> LinearDescriptor {
    LinearDescriptor {
        out_features,
        in_features,
        weight,
        bias,
    }
}

#[test]
fn zero_input_yields_bias() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = LinearLayer::build(
        &ctx,
        &linear_desc(3, 2, vec![0.5, -0.5, 2.0, 3.0, -1.0, 1.0], vec![1.0, -2.0, 0.25]),
    )
    .unwrap();

    let input = encrypt_tensor(&ctx, &[0.0, 0.0], vec![2], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[3]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![1.0, -2.0, 0.25]);
}

#[test]
fn identity_plus_bias() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = LinearLayer::build(
        &ctx,
        &linear_desc(2, 2, vec![1.0, 0.0, 0.0, 1.0], vec![1.0, 1.0]),
    )
    .unwrap();

    let input = encrypt_tensor(&ctx, &[2.0, 3.0], vec![2], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(decrypt_tensor(&ctx, &output), vec![3.0, 4.0]);
}

#[test]
fn known_matrix_vector_product() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = LinearLayer::build(
        &ctx,
        &linear_desc(2, 2, vec![1.0, 2.0, 3.0, 4.0], vec![0.5, -0.5]),
    )
    .unwrap();

    let input = encrypt_tensor(&ctx, &[5.0, 6.0], vec![2], &mut source);
    let output = layer.apply(&ctx, &input).unwrap();

    assert_eq!(decrypt_tensor(&ctx, &output), vec![17.5, 38.5]);
}

#[test]
fn shape_mismatches() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let layer = LinearLayer::build(&ctx, &linear_desc(1, 3, vec![1.0, 1.0, 1.0], vec![0.0])).unwrap();

    let wrong_width = encrypt_tensor(&ctx, &[0.0; 2], vec![2], &mut source);
    assert!(matches!(
        layer.apply(&ctx, &wrong_width),
        Err(RuntimeError::ShapeMismatch { layer: "linear", .. })
    ));

    let rank3 = encrypt_tensor(&ctx, &[0.0; 3], vec![1, 1, 3], &mut source);
    assert!(matches!(
        layer.apply(&ctx, &rank3),
        Err(RuntimeError::ShapeMismatch { layer: "linear", .. })
    ));
}
