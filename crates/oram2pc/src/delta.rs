use async_trait::async_trait;

use oram2pc_common::{Context, Role};
use oram2pc_core::{
    delta::{apply_selection, candidate_difference, check_delta_inputs},
    Ring,
};

use crate::{
    engine::{BitToRing, RingMul},
    CalculateDelta, OramError,
};

/// The oblivious 1-of-2 selection calculator.
///
/// Computes shares of `delta0 + alpha * (delta1 - delta0)` per batch element,
/// which is `delta1` where the combined selector is set and `delta0`
/// elsewhere. Costs one bit conversion and one multiplication.
#[derive(Debug)]
pub struct ObliviousDeltaCalculator<E> {
    role: Role,
    engine: E,
}

impl<E> ObliviousDeltaCalculator<E> {
    /// Creates a new oblivious delta calculator.
    ///
    /// # Arguments
    ///
    /// * `role` - The party's role.
    /// * `engine` - The execution engine.
    pub fn new(role: Role, engine: E) -> Self {
        Self { role, engine }
    }

    /// Returns the party's role.
    pub fn role(&self) -> Role {
        self.role
    }
}

#[async_trait]
impl<Ctx, R, E> CalculateDelta<Ctx, R> for ObliviousDeltaCalculator<E>
where
    Ctx: Context,
    R: Ring,
    E: BitToRing<Ctx, R> + RingMul<Ctx, R> + Send,
{
    async fn calculate_delta(
        &mut self,
        ctx: &mut Ctx,
        delta0: Vec<R>,
        delta1: Vec<R>,
        alpha: Vec<bool>,
    ) -> Result<Vec<R>, OramError> {
        check_delta_inputs(&delta0, &delta1, &alpha)?;

        let alpha = self.engine.bit_to_ring(ctx, alpha).await?;
        let difference = candidate_difference(&delta0, &delta1);
        let correction = self.engine.mul(ctx, alpha, difference).await?;

        Ok(apply_selection(&delta0, &correction))
    }
}
