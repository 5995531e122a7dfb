use crate::context::Backend;
use crate::error::CryptoResult;

/// Encoding of plaintext constants into the representation required for
/// homomorphic arithmetic. Encoded constants are not ciphertexts.
pub trait EncodeOps<B: Backend> {
    fn encode(&self, value: f64) -> CryptoResult<B::Encoded>;
}

/// Homomorphic arithmetic over ciphertexts and encoded constants.
pub trait CipherOps<B: Backend> {
    fn add(&self, lhs: &B::Ciphertext, rhs: &B::Ciphertext) -> CryptoResult<B::Ciphertext>;

    fn add_plain(&self, lhs: &B::Ciphertext, rhs: &B::Encoded) -> CryptoResult<B::Ciphertext>;

    fn mul_plain(&self, lhs: &B::Ciphertext, rhs: &B::Encoded) -> CryptoResult<B::Ciphertext>;
}

/// Noise-budget reset preserving the plaintext value, at the cost of a
/// fresh ciphertext.
pub trait RefreshOps<B: Backend> {
    fn refresh(&self, ct: &B::Ciphertext) -> CryptoResult<B::Ciphertext>;
}

/// The full operation surface a pipeline requires from a context.
pub trait HomomorphicOps<B: Backend>: EncodeOps<B> + CipherOps<B> + RefreshOps<B> {}

impl<B: Backend, T> HomomorphicOps<B> for T where T: EncodeOps<B> + CipherOps<B> + RefreshOps<B> {}
