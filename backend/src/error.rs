use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CryptoError {
    #[error("noise budget exhausted")]
    NoiseBudgetExhausted,
    #[error("value {0} cannot be encoded")]
    UnencodableValue(f64),
}
