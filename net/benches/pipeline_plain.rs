use backend::{Context, Plain, PlainParams, Source};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use net::{EncryptedTensor, LayerDescriptor, build};
use net::{AvgPoolDescriptor, ConvDescriptor, LinearDescriptor};

struct Params {
    in_channels: usize,
    height: usize,
    width: usize,
    conv_channels: usize,
    classes: usize,
}

// conv 3x3 stride 1, pool 2x2 stride 2, flatten, linear
fn cnn_model(p: &Params, source: &mut Source) -> Vec<LayerDescriptor> {
    let conv_h: usize = p.height - 2;
    let conv_w: usize = p.width - 2;
    let pooled: usize = p.conv_channels * (conv_h / 2) * (conv_w / 2);

    let conv_weight: Vec<f64> = (0..p.conv_channels * p.in_channels * 9)
        .map(|_| source.next_normal(0.0, 0.5))
        .collect();
    let conv_bias: Vec<f64> = (0..p.conv_channels).map(|_| source.next_normal(0.0, 0.5)).collect();
    let linear_weight: Vec<f64> = (0..p.classes * pooled)
        .map(|_| source.next_normal(0.0, 0.5))
        .collect();
    let linear_bias: Vec<f64> = (0..p.classes).map(|_| source.next_normal(0.0, 0.5)).collect();

    vec![
        LayerDescriptor::Convolution(ConvDescriptor {
            out_channels: p.conv_channels,
            in_channels: p.in_channels,
            kernel: (3, 3),
            stride: (1, 1),
            weight: conv_weight,
            bias: conv_bias,
        }),
        LayerDescriptor::AveragePool(AvgPoolDescriptor {
            kernel: (2, 2),
            stride: (2, 2),
        }),
        LayerDescriptor::Flatten,
        LayerDescriptor::Linear(LinearDescriptor {
            out_features: p.classes,
            in_features: pooled,
            weight: linear_weight,
            bias: linear_bias,
        }),
    ]
}

fn bench_params() -> PlainParams {
    PlainParams {
        fresh_budget: 4096,
        add_cost: 1,
        mul_plain_cost: 4,
    }
}

fn bench_pipeline_build_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_build_plain");

    fn runner(p: Params) -> impl FnMut() {
        let ctx: Context<Plain> = Context::new(bench_params());
        let mut source: Source = Source::new([0u8; 32]);
        let model: Vec<LayerDescriptor> = cnn_model(&p, &mut source);

        move || {
            black_box(build(black_box(&ctx), black_box(&model), Some(1)).unwrap());
        }
    }

    let params_set: Vec<Params> = vec![Params {
        in_channels: 1,
        height: 12,
        width: 12,
        conv_channels: 4,
        classes: 10,
    }];

    for params in params_set {
        let id = BenchmarkId::new("PIPELINE_BUILD_PLAIN", "");
        let mut runner = runner(params);
        group.bench_with_input(id, &(), |b, _| b.iter(&mut runner));
    }

    group.finish();
}

fn bench_pipeline_apply_plain(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_apply_plain");

    fn runner(p: Params) -> impl FnMut() {
        let ctx: Context<Plain> = Context::new(bench_params());
        let mut source: Source = Source::new([0u8; 32]);
        let model: Vec<LayerDescriptor> = cnn_model(&p, &mut source);
        let pipeline = build(&ctx, &model, Some(1)).unwrap();

        let values: Vec<f64> = (0..p.in_channels * p.height * p.width)
            .map(|_| source.next_f64(-1.0, 1.0))
            .collect();
        let data: Vec<_> = values.iter().map(|v| ctx.encrypt(*v, &mut source)).collect();
        let input: EncryptedTensor<Plain> =
            EncryptedTensor::new(vec![p.in_channels, p.height, p.width], data).unwrap();

        move || {
            black_box(pipeline.apply(black_box(&ctx), black_box(&input)).unwrap());
        }
    }

    let params_set: Vec<Params> = vec![Params {
        in_channels: 1,
        height: 12,
        width: 12,
        conv_channels: 4,
        classes: 10,
    }];

    for params in params_set {
        let id = BenchmarkId::new("PIPELINE_APPLY_PLAIN", "");
        let mut runner = runner(params);
        group.bench_with_input(id, &(), |b, _| b.iter(&mut runner));
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pipeline_build_plain,
    bench_pipeline_apply_plain
);
criterion_main!(benches);
