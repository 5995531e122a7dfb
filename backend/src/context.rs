/// Marker trait tying a scheme implementation to its concrete ciphertext,
/// encoded-constant and parameter types.
pub trait Backend: Sized {
    type Ciphertext: Clone + Send + Sync;
    type Encoded: Clone + Send + Sync;
    type Params: Clone + Send + Sync;
}

/// Shared, read-only handle to the scheme parameters of a backend.
///
/// Every layer constructor and every homomorphic operation takes the
/// context by shared reference; nothing in the pipeline owns or mutates it.
pub struct Context<B: Backend> {
    params: B::Params,
}

impl<B: Backend> Context<B> {
    pub fn new(params: B::Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &B::Params {
        &self.params
    }
}
