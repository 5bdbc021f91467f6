//! Ideal execution engine.
//!
//! An engine backed by an ideal functionality: both parties' shares meet in a
//! shared trusted state which reconstructs, computes in the clear and hands
//! back fresh shares. Interaction and traffic counters stand in for the wire.

use async_trait::async_trait;

use oram2pc_common::ideal::{ideal_f2p, Alice, Bob};
use oram2pc_core::{prg::Prg, Ring};

use crate::engine::{BitToRing, EngineError, RingMul, Traffic, TrafficStats};

/// The shared state of the ideal engine.
#[derive(Debug, Default)]
pub struct IdealShareOps {
    prg: Prg,
    interactions: u64,
    bytes: u64,
}

impl IdealShareOps {
    fn reshare<R: Ring>(&mut self, values: impl IntoIterator<Item = R>) -> (Vec<R>, Vec<R>) {
        values
            .into_iter()
            .map(|value| {
                let mask = R::rand(&mut self.prg);
                (mask, value.sub(mask))
            })
            .unzip()
    }

    fn account<R: Ring>(&mut self, len: usize) {
        self.interactions += 1;
        self.bytes += (len * R::BITS / 8) as u64;
    }
}

fn convert<R: Ring>(
    f: &mut IdealShareOps,
    alice: Vec<bool>,
    bob: Vec<bool>,
) -> (Vec<R>, Vec<R>) {
    assert_eq!(alice.len(), bob.len(), "parties submitted unequal batches");
    f.account::<R>(alice.len());

    let values: Vec<R> = alice
        .into_iter()
        .zip(bob)
        .map(|(a, b)| R::from_bit(a ^ b))
        .collect();

    f.reshare(values)
}

fn multiply<R: Ring>(
    f: &mut IdealShareOps,
    alice: (Vec<R>, Vec<R>),
    bob: (Vec<R>, Vec<R>),
) -> (Vec<R>, Vec<R>) {
    let (lhs_a, rhs_a) = alice;
    let (lhs_b, rhs_b) = bob;
    assert_eq!(lhs_a.len(), lhs_b.len(), "parties submitted unequal batches");
    assert_eq!(lhs_a.len(), rhs_a.len(), "operand batches have unequal lengths");
    assert_eq!(lhs_b.len(), rhs_b.len(), "operand batches have unequal lengths");
    f.account::<R>(lhs_a.len());

    let products: Vec<R> = lhs_a
        .into_iter()
        .zip(lhs_b)
        .zip(rhs_a.into_iter().zip(rhs_b))
        .map(|((la, lb), (ra, rb))| la.add(lb).mul(ra.add(rb)))
        .collect();

    f.reshare(products)
}

/// The ideal engine from the perspective of the first party.
#[derive(Debug, Clone)]
pub struct IdealEngineAlice(Alice<IdealShareOps>);

/// The ideal engine from the perspective of the second party.
#[derive(Debug, Clone)]
pub struct IdealEngineBob(Bob<IdealShareOps>);

/// Creates an ideal engine, returning the two parties' handles.
pub fn ideal_share_engine() -> (IdealEngineAlice, IdealEngineBob) {
    let (alice, bob) = ideal_f2p(IdealShareOps::default());

    (IdealEngineAlice(alice), IdealEngineBob(bob))
}

impl IdealEngineAlice {
    /// Returns the number of engine interactions executed so far.
    pub fn interactions(&self) -> u64 {
        self.0.lock().interactions
    }
}

impl IdealEngineBob {
    /// Returns the number of engine interactions executed so far.
    pub fn interactions(&self) -> u64 {
        self.0.lock().interactions
    }
}

#[async_trait]
impl<Ctx: Send, R: Ring> BitToRing<Ctx, R> for IdealEngineAlice {
    async fn bit_to_ring(&mut self, _ctx: &mut Ctx, bits: Vec<bool>) -> Result<Vec<R>, EngineError> {
        Ok(self.0.call(bits, convert::<R>).await)
    }
}

#[async_trait]
impl<Ctx: Send, R: Ring> BitToRing<Ctx, R> for IdealEngineBob {
    async fn bit_to_ring(&mut self, _ctx: &mut Ctx, bits: Vec<bool>) -> Result<Vec<R>, EngineError> {
        Ok(self.0.call(bits, convert::<R>).await)
    }
}

#[async_trait]
impl<Ctx: Send, R: Ring> RingMul<Ctx, R> for IdealEngineAlice {
    async fn mul(
        &mut self,
        _ctx: &mut Ctx,
        lhs: Vec<R>,
        rhs: Vec<R>,
    ) -> Result<Vec<R>, EngineError> {
        Ok(self.0.call((lhs, rhs), multiply::<R>).await)
    }
}

#[async_trait]
impl<Ctx: Send, R: Ring> RingMul<Ctx, R> for IdealEngineBob {
    async fn mul(
        &mut self,
        _ctx: &mut Ctx,
        lhs: Vec<R>,
        rhs: Vec<R>,
    ) -> Result<Vec<R>, EngineError> {
        Ok(self.0.call((lhs, rhs), multiply::<R>).await)
    }
}

impl Traffic for IdealEngineAlice {
    fn traffic(&self) -> TrafficStats {
        let f = self.0.lock();

        TrafficStats {
            bytes_sent: f.bytes,
            bytes_recv: f.bytes,
        }
    }
}

impl Traffic for IdealEngineBob {
    fn traffic(&self) -> TrafficStats {
        let f = self.0.lock();

        TrafficStats {
            bytes_sent: f.bytes,
            bytes_recv: f.bytes,
        }
    }
}
