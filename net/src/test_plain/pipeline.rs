use backend::{Context, CryptoError, Plain, Source};

use crate::build::build;
use crate::error::RuntimeError;
use crate::layers::EncryptedLayer;
use crate::model::{AvgPoolDescriptor, ConvDescriptor, LayerDescriptor, LinearDescriptor};
use crate::test_plain::{ctx_with_budget, decrypt_tensor, encrypt_tensor, plain_ctx};

fn identity_linear() -> LayerDescriptor {
    LayerDescriptor::Linear(LinearDescriptor {
        out_features: 1,
        in_features: 1,
        weight: vec![1.0],
        bias: vec![0.0],
    })
}

#[test]
fn linear_then_flatten_end_to_end() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let model = vec![
        LayerDescriptor::Linear(LinearDescriptor {
            out_features: 2,
            in_features: 2,
            weight: vec![1.0, 0.0, 0.0, 1.0],
            bias: vec![1.0, 1.0],
        }),
        LayerDescriptor::Flatten,
    ];

    let pipeline = build(&ctx, &model, None).unwrap();
    assert_eq!(pipeline.len(), 2);

    let input = encrypt_tensor(&ctx, &[2.0, 3.0], vec![2], &mut source);
    let output = pipeline.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[2]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![3.0, 4.0]);
}

#[test]
fn refresh_after_single_layer() {
    let ctx: Context<Plain> = plain_ctx();

    let pipeline = build(&ctx, &[LayerDescriptor::Flatten], Some(0)).unwrap();
    assert_eq!(pipeline.len(), 2);
    assert!(matches!(pipeline.layers()[1], EncryptedLayer::Refresh(_)));
}

#[test]
fn deep_model_needs_a_refresh() {
    // Three identity linears; each costs one mul_plain and one add_plain,
    // which a fresh budget of 12 cannot cover twice over.
    let ctx: Context<Plain> = ctx_with_budget(12);
    let mut source: Source = Source::new([0u8; 32]);

    let model = vec![identity_linear(), identity_linear(), identity_linear()];
    let input = encrypt_tensor(&ctx, &[7.0], vec![1], &mut source);

    let unrefreshed = build(&ctx, &model, None).unwrap();
    assert!(matches!(
        unrefreshed.apply(&ctx, &input),
        Err(RuntimeError::Crypto(CryptoError::NoiseBudgetExhausted))
    ));

    let refreshed = build(&ctx, &model, Some(1)).unwrap();
    let output = refreshed.apply(&ctx, &input).unwrap();
    assert_eq!(decrypt_tensor(&ctx, &output), vec![7.0]);
}

#[test]
fn cnn_end_to_end() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let model = vec![
        LayerDescriptor::Convolution(ConvDescriptor {
            out_channels: 1,
            in_channels: 1,
            kernel: (2, 2),
            stride: (2, 2),
            weight: vec![1.0; 4],
            bias: vec![0.0],
        }),
        LayerDescriptor::AveragePool(AvgPoolDescriptor {
            kernel: (2, 2),
            stride: (2, 2),
        }),
        LayerDescriptor::Flatten,
        LayerDescriptor::Linear(LinearDescriptor {
            out_features: 1,
            in_features: 1,
            weight: vec![2.0],
            bias: vec![1.0],
        }),
    ];

    let pipeline = build(&ctx, &model, Some(1)).unwrap();
    assert_eq!(pipeline.len(), 5);

    let values: Vec<f64> = (0..16).map(|v| v as f64).collect();
    let input = encrypt_tensor(&ctx, &values, vec![1, 4, 4], &mut source);
    let output = pipeline.apply(&ctx, &input).unwrap();

    // conv sums the disjoint 2x2 windows to [10, 18, 42, 50], the pool
    // averages them to 30, the linear maps that to 2*30 + 1
    assert_eq!(output.shape(), &[1]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![61.0]);
}

#[test]
fn empty_pipeline_is_identity() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let pipeline = build(&ctx, &[], None).unwrap();
    let input = encrypt_tensor(&ctx, &[1.0, 2.0], vec![2], &mut source);
    let output = pipeline.apply(&ctx, &input).unwrap();

    assert_eq!(output.shape(), &[2]);
    assert_eq!(decrypt_tensor(&ctx, &output), vec![1.0, 2.0]);
}

#[test]
fn shape_error_stops_the_pipeline() {
    let ctx: Context<Plain> = plain_ctx();
    let mut source: Source = Source::new([0u8; 32]);

    let model = vec![
        LayerDescriptor::Flatten,
        LayerDescriptor::Linear(LinearDescriptor {
            out_features: 1,
            in_features: 3,
            weight: vec![1.0; 3],
            bias: vec![0.0],
        }),
    ];

    let pipeline = build(&ctx, &model, None).unwrap();
    let input = encrypt_tensor(&ctx, &[1.0, 2.0], vec![2], &mut source);

    assert!(matches!(
        pipeline.apply(&ctx, &input),
        Err(RuntimeError::ShapeMismatch { layer: "linear", .. })
    ));
}
