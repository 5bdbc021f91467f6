use async_trait::async_trait;

use oram2pc_common::{Context, Role};
use oram2pc_core::{
    diff::{check_difference_inputs, subtract_shares},
    Ring,
};
use tracing::instrument;

use crate::{
    engine::{BitToRing, RingMul},
    CalculateDifference, OramError,
};

/// The conditioned difference calculator.
///
/// Computes shares of `indicator * (minuend - subtrahend)`: the subtraction is
/// local, the indicator conversion and the product each cost one engine
/// interaction.
#[derive(Debug)]
pub struct DifferenceCalculator<E> {
    role: Role,
    engine: E,
}

impl<E> DifferenceCalculator<E> {
    /// Creates a new difference calculator.
    ///
    /// # Arguments
    ///
    /// * `role` - The party's role.
    /// * `engine` - The execution engine.
    pub fn new(role: Role, engine: E) -> Self {
        Self { role, engine }
    }
}

#[async_trait]
impl<Ctx, R, E> CalculateDifference<Ctx, R> for DifferenceCalculator<E>
where
    Ctx: Context,
    R: Ring,
    E: BitToRing<Ctx, R> + RingMul<Ctx, R> + Send,
{
    #[instrument(level = "debug", fields(role = %self.role), skip_all, err)]
    async fn calculate_difference(
        &mut self,
        ctx: &mut Ctx,
        indicator: Vec<bool>,
        minuend: Vec<R>,
        subtrahend: Vec<R>,
    ) -> Result<Vec<R>, OramError> {
        check_difference_inputs(&indicator, &minuend, &subtrahend)?;

        let indicator = self.engine.bit_to_ring(ctx, indicator).await?;
        let difference = subtract_shares(&minuend, &subtrahend);
        let conditioned = self.engine.mul(ctx, indicator, difference).await?;

        Ok(conditioned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oram2pc_common::test_st_executor;
    use oram2pc_core::{prg::Prg, Block};
    use rand::{Rng, SeedableRng};

    use crate::ideal::ideal_share_engine;

    fn reconstruct(a: &[u64], b: &[u64]) -> Vec<u64> {
        a.iter().zip(b).map(|(&x, &y)| x.wrapping_add(y)).collect()
    }

    #[tokio::test]
    async fn test_calculate_difference() {
        let (mut ctx_0, mut ctx_1) = test_st_executor(8);
        let (engine_0, engine_1) = ideal_share_engine();

        let mut calc_0 = DifferenceCalculator::new(Role::Party0, engine_0);
        let mut calc_1 = DifferenceCalculator::new(Role::Party1, engine_1);

        // Element 0: indicator 1, 10 - 4. Element 1: indicator 0, 10 - 4.
        let (out_0, out_1) = tokio::try_join!(
            calc_0.calculate_difference(
                &mut ctx_0,
                vec![true, true],
                vec![7, 7],
                vec![2, 2]
            ),
            calc_1.calculate_difference(
                &mut ctx_1,
                vec![false, true],
                vec![3, 3],
                vec![2, 2]
            ),
        )
        .unwrap();

        assert_eq!(reconstruct(&out_0, &out_1), vec![6, 0]);
    }

    #[tokio::test]
    async fn test_calculate_difference_zero_is_exact() {
        let (mut ctx_0, mut ctx_1) = test_st_executor(8);
        let (engine_0, engine_1) = ideal_share_engine();

        let mut calc_0 = DifferenceCalculator::new(Role::Party0, engine_0);
        let mut calc_1 = DifferenceCalculator::new(Role::Party1, engine_1);

        // Combined indicator is 0: the output must reconstruct to an exact
        // zero regardless of the operands.
        let (out_0, out_1) = tokio::try_join!(
            calc_0.calculate_difference(
                &mut ctx_0,
                vec![true],
                vec![u64::MAX],
                vec![12345]
            ),
            calc_1.calculate_difference(&mut ctx_1, vec![true], vec![99], vec![1]),
        )
        .unwrap();

        assert_eq!(out_0[0].wrapping_add(out_1[0]), 0);
    }

    #[tokio::test]
    async fn test_calculate_difference_batch() {
        let mut rng = Prg::from_seed(Block::from(1u128));
        let (mut ctx_0, mut ctx_1) = test_st_executor(8);
        let (engine_0, engine_1) = ideal_share_engine();

        let mut calc_0 = DifferenceCalculator::new(Role::Party0, engine_0);
        let mut calc_1 = DifferenceCalculator::new(Role::Party1, engine_1);

        let count = 64;
        let indicator: Vec<bool> = (0..count).map(|_| rng.gen()).collect();
        let minuend: Vec<u64> = (0..count).map(|_| rng.gen()).collect();
        let subtrahend: Vec<u64> = (0..count).map(|_| rng.gen()).collect();

        // Party 1 holds zero shares, so the plaintext inputs live at party 0.
        let (out_0, out_1) = tokio::try_join!(
            calc_0.calculate_difference(
                &mut ctx_0,
                indicator.clone(),
                minuend.clone(),
                subtrahend.clone()
            ),
            calc_1.calculate_difference(
                &mut ctx_1,
                vec![false; count],
                vec![0; count],
                vec![0; count]
            ),
        )
        .unwrap();

        for i in 0..count {
            let expected = if indicator[i] {
                minuend[i].wrapping_sub(subtrahend[i])
            } else {
                0
            };
            assert_eq!(out_0[i].wrapping_add(out_1[i]), expected, "element {i}");
        }
    }

    #[tokio::test]
    async fn test_calculate_difference_length_mismatch() {
        let (mut ctx_0, _ctx_1) = test_st_executor(8);
        let (engine_0, _engine_1) = ideal_share_engine();

        let mut calc_0 = DifferenceCalculator::new(Role::Party0, engine_0);

        let err = calc_0
            .calculate_difference(&mut ctx_0, vec![true], vec![1u64, 2], vec![3])
            .await
            .unwrap_err();

        assert!(err.is_length_mismatch());
    }
}
