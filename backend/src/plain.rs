use rand_core::RngCore;

use crate::context::{Backend, Context};
use crate::error::{CryptoError, CryptoResult};
use crate::ops::{CipherOps, EncodeOps, RefreshOps};
use crate::source::Source;

/// Reference scheme: exact plaintext arithmetic with explicit noise-budget
/// accounting. Stands in for a real encryption context wherever decrypted
/// values must be exact, i.e. in tests and benchmarks.
pub struct Plain;

#[derive(Clone, Copy, Debug)]
pub struct PlainParams {
    /// Budget of a freshly encrypted or refreshed ciphertext.
    pub fresh_budget: u32,
    /// Budget spent by `add` and `add_plain`.
    pub add_cost: u32,
    /// Budget spent by `mul_plain`.
    pub mul_plain_cost: u32,
}

impl Default for PlainParams {
    fn default() -> Self {
        Self {
            fresh_budget: 64,
            add_cost: 1,
            mul_plain_cost: 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlainCiphertext {
    value: f64,
    randomizer: u64,
    budget: u32,
}

impl PlainCiphertext {
    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn randomizer(&self) -> u64 {
        self.randomizer
    }
}

impl Backend for Plain {
    type Ciphertext = PlainCiphertext;
    type Encoded = f64;
    type Params = PlainParams;
}

// splitmix64 step; lets refresh derive a fresh randomizer without rng state
fn reseed(r: u64) -> u64 {
    let mut z: u64 = r.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

impl Context<Plain> {
    pub fn encrypt(&self, value: f64, source: &mut Source) -> PlainCiphertext {
        PlainCiphertext {
            value,
            randomizer: source.next_u64(),
            budget: self.params().fresh_budget,
        }
    }

    pub fn decrypt(&self, ct: &PlainCiphertext) -> CryptoResult<f64> {
        if ct.budget == 0 {
            return Err(CryptoError::NoiseBudgetExhausted);
        }
        Ok(ct.value)
    }

    // An operation must leave a decryptable ciphertext behind.
    fn spend(&self, budget: u32, cost: u32) -> CryptoResult<u32> {
        match budget.checked_sub(cost) {
            Some(left) if left > 0 => Ok(left),
            _ => Err(CryptoError::NoiseBudgetExhausted),
        }
    }
}

impl EncodeOps<Plain> for Context<Plain> {
    fn encode(&self, value: f64) -> CryptoResult<f64> {
        if !value.is_finite() {
            return Err(CryptoError::UnencodableValue(value));
        }
        Ok(value)
    }
}

impl CipherOps<Plain> for Context<Plain> {
    fn add(&self, lhs: &PlainCiphertext, rhs: &PlainCiphertext) -> CryptoResult<PlainCiphertext> {
        let budget: u32 = self.spend(lhs.budget.min(rhs.budget), self.params().add_cost)?;
        Ok(PlainCiphertext {
            value: lhs.value + rhs.value,
            randomizer: lhs.randomizer ^ rhs.randomizer,
            budget,
        })
    }

    fn add_plain(&self, lhs: &PlainCiphertext, rhs: &f64) -> CryptoResult<PlainCiphertext> {
        let budget: u32 = self.spend(lhs.budget, self.params().add_cost)?;
        Ok(PlainCiphertext {
            value: lhs.value + rhs,
            randomizer: lhs.randomizer,
            budget,
        })
    }

    fn mul_plain(&self, lhs: &PlainCiphertext, rhs: &f64) -> CryptoResult<PlainCiphertext> {
        let budget: u32 = self.spend(lhs.budget, self.params().mul_plain_cost)?;
        Ok(PlainCiphertext {
            value: lhs.value * rhs,
            randomizer: lhs.randomizer,
            budget,
        })
    }
}

impl RefreshOps<Plain> for Context<Plain> {
    fn refresh(&self, ct: &PlainCiphertext) -> CryptoResult<PlainCiphertext> {
        Ok(PlainCiphertext {
            value: ct.value,
            randomizer: reseed(ct.randomizer),
            budget: self.params().fresh_budget,
        })
    }
}
