use std::fmt;

/// Convolution parameters as read from the plaintext model. The weight
/// tensor is flat row-major over (out_channels, in_channels, kh, kw).
#[derive(Clone, Debug)]
pub struct ConvDescriptor {
    pub out_channels: usize,
    pub in_channels: usize,
    pub kernel: (usize, usize),
    pub stride: (usize, usize),
    pub weight: Vec<f64>,
    pub bias: Vec<f64>,
}

/// Fully-connected parameters; weight is flat row-major over
/// (out_features, in_features).
#[derive(Clone, Debug)]
pub struct LinearDescriptor {
    pub out_features: usize,
    pub in_features: usize,
    pub weight: Vec<f64>,
    pub bias: Vec<f64>,
}

#[derive(Clone, Copy, Debug)]
pub struct AvgPoolDescriptor {
    pub kernel: (usize, usize),
    pub stride: (usize, usize),
}

#[derive(Clone, Copy, Debug)]
pub struct MaxPoolDescriptor {
    pub kernel: (usize, usize),
    pub stride: (usize, usize),
}

/// The plaintext-model layer vocabulary. It is wider than what the
/// encrypted domain supports: `ReLU` and `MaxPool` appear in common CNNs
/// but have no homomorphic counterpart and are rejected at build time.
#[derive(Clone, Debug)]
pub enum LayerDescriptor {
    Convolution(ConvDescriptor),
    Linear(LinearDescriptor),
    AveragePool(AvgPoolDescriptor),
    Flatten,
    ReLU,
    MaxPool(MaxPoolDescriptor),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Convolution,
    Linear,
    AveragePool,
    Flatten,
    ReLU,
    MaxPool,
}

impl LayerDescriptor {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerDescriptor::Convolution(_) => LayerKind::Convolution,
            LayerDescriptor::Linear(_) => LayerKind::Linear,
            LayerDescriptor::AveragePool(_) => LayerKind::AveragePool,
            LayerDescriptor::Flatten => LayerKind::Flatten,
            LayerDescriptor::ReLU => LayerKind::ReLU,
            LayerDescriptor::MaxPool(_) => LayerKind::MaxPool,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            LayerKind::Convolution => "convolution",
            LayerKind::Linear => "linear",
            LayerKind::AveragePool => "average-pool",
            LayerKind::Flatten => "flatten",
            LayerKind::ReLU => "relu",
            LayerKind::MaxPool => "max-pool",
        };
        f.write_str(name)
    }
}
