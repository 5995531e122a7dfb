use backend::{Context, Plain};

use crate::build::{build, encode_layer};
use crate::error::BuildError;
use crate::layers::EncryptedLayer;
use crate::model::{
    AvgPoolDescriptor, ConvDescriptor, LayerDescriptor, LayerKind, LinearDescriptor, MaxPoolDescriptor,
};
use crate::test_plain::plain_ctx;

fn flatten_model(n: usize) -> Vec<LayerDescriptor> {
    (0..n).map(|_| LayerDescriptor::Flatten).collect()
}

fn mixed_model() -> Vec<LayerDescriptor> {
    vec![
        LayerDescriptor::Convolution(ConvDescriptor {
            out_channels: 1,
            in_channels: 1,
            kernel: (2, 2),
            stride: (1, 1),
            weight: vec![1.0; 4],
            bias: vec![0.0],
        }),
        LayerDescriptor::AveragePool(AvgPoolDescriptor {
            kernel: (2, 2),
            stride: (2, 2),
        }),
        LayerDescriptor::Flatten,
        LayerDescriptor::Linear(LinearDescriptor {
            out_features: 2,
            in_features: 1,
            weight: vec![1.0, -1.0],
            bias: vec![0.0, 0.0],
        }),
    ]
}

#[test]
fn refresh_insertion() {
    (1..5).for_each(|n| {
        (0..n).for_each(|p| {
            test_refresh_insertion(n, p);
        });
    });
}

fn test_refresh_insertion(n: usize, p: usize) {
    let ctx: Context<Plain> = plain_ctx();

    let pipeline = build(&ctx, &flatten_model(n), Some(p)).unwrap();
    assert_eq!(pipeline.len(), n + 1);
    pipeline.layers().iter().enumerate().for_each(|(i, layer)| {
        if i == p + 1 {
            assert!(matches!(layer, EncryptedLayer::Refresh(_)));
        } else {
            assert!(matches!(layer, EncryptedLayer::Flatten(_)));
        }
    });
}

#[test]
fn no_refresh_keeps_length() {
    let ctx: Context<Plain> = plain_ctx();

    (0..5).for_each(|n| {
        let pipeline = build(&ctx, &flatten_model(n), None).unwrap();
        assert_eq!(pipeline.len(), n);
    });
}

#[test]
fn refresh_insertion_in_mixed_model() {
    let ctx: Context<Plain> = plain_ctx();
    let model = mixed_model();

    (0..model.len()).for_each(|p| {
        let pipeline = build(&ctx, &model, Some(p)).unwrap();
        assert_eq!(pipeline.len(), model.len() + 1);

        let names: Vec<&str> = pipeline.layers().iter().map(|l| l.name()).collect();
        let mut expected: Vec<&str> = vec!["convolution", "average-pool", "flatten", "linear"];
        expected.insert(p + 1, "refresh");
        assert_eq!(names, expected);
    });
}

#[test]
fn refresh_position_out_of_range() {
    let ctx: Context<Plain> = plain_ctx();

    let result = build(&ctx, &flatten_model(3), Some(3));
    assert!(matches!(
        result,
        Err(BuildError::InvalidRefreshPosition {
            position: 3,
            layers: 3
        })
    ));

    let result = build(&ctx, &[], Some(0));
    assert!(matches!(
        result,
        Err(BuildError::InvalidRefreshPosition {
            position: 0,
            layers: 0
        })
    ));
}

#[test]
fn empty_model_builds_empty_pipeline() {
    let ctx: Context<Plain> = plain_ctx();

    let pipeline = build(&ctx, &[], None).unwrap();
    assert!(pipeline.is_empty());
}

#[test]
fn unsupported_kinds_fail_the_build() {
    let ctx: Context<Plain> = plain_ctx();

    let model = vec![LayerDescriptor::Flatten, LayerDescriptor::ReLU];
    assert!(matches!(
        build(&ctx, &model, None),
        Err(BuildError::UnsupportedLayerKind(LayerKind::ReLU))
    ));

    let model = vec![LayerDescriptor::MaxPool(MaxPoolDescriptor {
        kernel: (2, 2),
        stride: (2, 2),
    })];
    assert!(matches!(
        build(&ctx, &model, None),
        Err(BuildError::UnsupportedLayerKind(LayerKind::MaxPool))
    ));

    assert!(matches!(
        encode_layer(&ctx, &LayerDescriptor::ReLU),
        Err(BuildError::UnsupportedLayerKind(LayerKind::ReLU))
    ));
}

#[test]
fn unencodable_weights_fail_the_build() {
    let ctx: Context<Plain> = plain_ctx();

    let linear = LayerDescriptor::Linear(LinearDescriptor {
        out_features: 1,
        in_features: 2,
        weight: vec![1.0, f64::NAN],
        bias: vec![0.0],
    });
    assert!(matches!(
        build(&ctx, &[linear], None),
        Err(BuildError::Crypto(_))
    ));
}

#[test]
fn malformed_descriptors_fail_the_build() {
    let ctx: Context<Plain> = plain_ctx();

    let conv = LayerDescriptor::Convolution(ConvDescriptor {
        out_channels: 2,
        in_channels: 1,
        kernel: (2, 2),
        stride: (1, 1),
        weight: vec![1.0; 3],
        bias: vec![0.0; 2],
    });
    assert!(matches!(
        build(&ctx, &[conv], None),
        Err(BuildError::MalformedDescriptor {
            kind: LayerKind::Convolution,
            ..
        })
    ));

    let conv = LayerDescriptor::Convolution(ConvDescriptor {
        out_channels: 1,
        in_channels: 1,
        kernel: (2, 2),
        stride: (0, 1),
        weight: vec![1.0; 4],
        bias: vec![0.0],
    });
    assert!(matches!(
        build(&ctx, &[conv], None),
        Err(BuildError::MalformedDescriptor {
            kind: LayerKind::Convolution,
            ..
        })
    ));

    let linear = LayerDescriptor::Linear(LinearDescriptor {
        out_features: 2,
        in_features: 2,
        weight: vec![1.0; 4],
        bias: vec![0.0; 3],
    });
    assert!(matches!(
        build(&ctx, &[linear], None),
        Err(BuildError::MalformedDescriptor {
            kind: LayerKind::Linear,
            ..
        })
    ));

    let pool = LayerDescriptor::AveragePool(AvgPoolDescriptor {
        kernel: (0, 2),
        stride: (1, 1),
    });
    assert!(matches!(
        build(&ctx, &[pool], None),
        Err(BuildError::MalformedDescriptor {
            kind: LayerKind::AveragePool,
            ..
        })
    ));
}
