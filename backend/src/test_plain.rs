use rand_core::RngCore;

use crate::context::Context;
use crate::error::CryptoError;
use crate::ops::{CipherOps, EncodeOps, RefreshOps};
use crate::plain::{Plain, PlainParams};
use crate::source::Source;

fn test_ctx(fresh_budget: u32) -> Context<Plain> {
    Context::new(PlainParams {
        fresh_budget,
        add_cost: 1,
        mul_plain_cost: 4,
    })
}

#[test]
fn encrypt_decrypt() {
    let ctx: Context<Plain> = test_ctx(8);
    let mut source: Source = Source::new([0u8; 32]);

    let ct = ctx.encrypt(3.5, &mut source);
    assert_eq!(ct.budget(), 8);
    assert_eq!(ctx.decrypt(&ct), Ok(3.5));
}

#[test]
fn encryptions_are_randomized() {
    let ctx: Context<Plain> = test_ctx(8);
    let mut source: Source = Source::new([1u8; 32]);

    let ct0 = ctx.encrypt(1.0, &mut source);
    let ct1 = ctx.encrypt(1.0, &mut source);
    assert_ne!(ct0.randomizer(), ct1.randomizer());
    assert_eq!(ctx.decrypt(&ct0), Ok(1.0));
    assert_eq!(ctx.decrypt(&ct1), Ok(1.0));
}

#[test]
fn ops_track_value_and_budget() {
    let ctx: Context<Plain> = test_ctx(8);
    let mut source: Source = Source::new([0u8; 32]);

    let a = ctx.encrypt(2.0, &mut source);
    let b = ctx.encrypt(3.0, &mut source);

    let sum = ctx.add(&a, &b).unwrap();
    assert_eq!(ctx.decrypt(&sum), Ok(5.0));
    assert_eq!(sum.budget(), 7);

    let scaled = ctx.mul_plain(&sum, &ctx.encode(2.0).unwrap()).unwrap();
    assert_eq!(ctx.decrypt(&scaled), Ok(10.0));
    assert_eq!(scaled.budget(), 3);

    let shifted = ctx.add_plain(&scaled, &ctx.encode(1.5).unwrap()).unwrap();
    assert_eq!(ctx.decrypt(&shifted), Ok(11.5));
    assert_eq!(shifted.budget(), 2);
}

#[test]
fn add_takes_the_smaller_budget() {
    let ctx: Context<Plain> = test_ctx(8);
    let mut source: Source = Source::new([0u8; 32]);

    let fresh = ctx.encrypt(1.0, &mut source);
    let worn = ctx
        .mul_plain(&ctx.encrypt(1.0, &mut source), &ctx.encode(1.0).unwrap())
        .unwrap();
    assert_eq!(worn.budget(), 4);

    let sum = ctx.add(&fresh, &worn).unwrap();
    assert_eq!(sum.budget(), 3);
}

#[test]
fn budget_exhaustion() {
    let ctx: Context<Plain> = test_ctx(2);
    let mut source: Source = Source::new([0u8; 32]);

    let ct = ctx.encrypt(1.0, &mut source);
    assert_eq!(
        ctx.mul_plain(&ct, &ctx.encode(2.0).unwrap()),
        Err(CryptoError::NoiseBudgetExhausted)
    );

    let once = ctx.add_plain(&ct, &ctx.encode(1.0).unwrap()).unwrap();
    assert_eq!(once.budget(), 1);
    assert_eq!(
        ctx.add_plain(&once, &ctx.encode(1.0).unwrap()),
        Err(CryptoError::NoiseBudgetExhausted)
    );
}

#[test]
fn encode_rejects_non_finite_values() {
    let ctx: Context<Plain> = test_ctx(8);

    assert_eq!(ctx.encode(0.25), Ok(0.25));
    assert!(matches!(
        ctx.encode(f64::NAN),
        Err(CryptoError::UnencodableValue(_))
    ));
    assert!(matches!(
        ctx.encode(f64::INFINITY),
        Err(CryptoError::UnencodableValue(_))
    ));
}

#[test]
fn refresh_resets_budget_and_rerandomizes() {
    let ctx: Context<Plain> = test_ctx(8);
    let mut source: Source = Source::new([0u8; 32]);

    let ct = ctx.encrypt(4.0, &mut source);
    let worn = ctx.mul_plain(&ct, &ctx.encode(3.0).unwrap()).unwrap();
    assert_eq!(worn.budget(), 4);

    let fresh = ctx.refresh(&worn).unwrap();
    assert_eq!(fresh.budget(), 8);
    assert_ne!(fresh.randomizer(), worn.randomizer());
    assert_eq!(ctx.decrypt(&fresh), ctx.decrypt(&worn));
    assert_eq!(ctx.decrypt(&fresh), Ok(12.0));
}

#[test]
fn source_is_deterministic() {
    let mut a: Source = Source::new([7u8; 32]);
    let mut b: Source = Source::new([7u8; 32]);

    (0..16).for_each(|_| assert_eq!(a.next_u64(), b.next_u64()));

    let mut branch = a.branch();
    assert_ne!(branch.next_u64(), a.next_u64());
}

#[test]
fn normal_draws_follow_seed() {
    let mut a: Source = Source::new([3u8; 32]);
    let mut b: Source = Source::new([3u8; 32]);

    (0..16).for_each(|_| assert_eq!(a.next_normal(0.0, 1.0), b.next_normal(0.0, 1.0)));
}
