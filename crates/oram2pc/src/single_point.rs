use async_trait::async_trait;

use oram2pc_common::{Context, Role};
use oram2pc_core::{
    msgs::{correction_opening, CorrectionOpening},
    prg::Prg,
    tree::{check_generator_inputs, GgmFrontier},
    Block, Ring,
};
use serio::{stream::IoStreamExt, SinkExt};
use tracing::instrument;

use crate::{
    engine::{BitToRing, RingMul},
    CalculateDelta, GenerateSinglePointArrays, ObliviousDeltaCalculator, OramError,
};

/// The single-point array generator.
///
/// Grows one PRG-doubling tree per batch instance, level by level. Each level
/// selects its seed correction word obliviously with an
/// [`ObliviousDeltaCalculator`] over the Boolean ring, opens the correction
/// over the channel, and repairs the frontier; after `ceil(log2(n))` levels
/// the leaf control bits are converted into ring shares of the unit arrays.
///
/// A full generation costs `2 * width + 1` engine interactions and `width`
/// channel openings.
#[derive(Debug)]
pub struct SinglePointArrayGenerator<E> {
    role: Role,
    delta: ObliviousDeltaCalculator<E>,
    engine: E,
}

impl<E: Clone> SinglePointArrayGenerator<E> {
    /// Creates a new single-point array generator.
    ///
    /// # Arguments
    ///
    /// * `role` - The party's role.
    /// * `engine` - The execution engine.
    pub fn new(role: Role, engine: E) -> Self {
        Self {
            role,
            delta: ObliviousDeltaCalculator::new(role, engine.clone()),
            engine,
        }
    }
}

#[async_trait]
impl<Ctx, R, E> GenerateSinglePointArrays<Ctx, R> for SinglePointArrayGenerator<E>
where
    Ctx: Context,
    R: Ring,
    E: BitToRing<Ctx, R> + BitToRing<Ctx, Block> + RingMul<Ctx, Block> + Send,
{
    #[instrument(level = "debug", fields(role = %self.role), skip_all, err)]
    async fn generate_single_point_arrays(
        &mut self,
        ctx: &mut Ctx,
        index_bits: Vec<Vec<bool>>,
        array_length: usize,
    ) -> Result<Vec<Vec<R>>, OramError> {
        let (_, instances) = check_generator_inputs(&index_bits, array_length)?;

        let mut prg = Prg::new();
        let mut frontier = GgmFrontier::root(instances, self.role.is_first(), &mut prg);

        for level_bits in &index_bits {
            let expanded = frontier.expand();
            let sums = expanded.sums();

            // The correction word must cancel the seed discrepancy on the
            // side the path does not take: the odd sums where the index bit
            // is 0, the even sums where it is 1.
            let seed_shares = self
                .delta
                .calculate_delta(
                    ctx,
                    sums.odd_seeds.clone(),
                    sums.even_seeds.clone(),
                    level_bits.clone(),
                )
                .await?;

            let own = correction_opening(seed_shares, &sums, level_bits, self.role.is_first());
            ctx.io_mut().send(own.clone()).await?;
            let peer: CorrectionOpening = ctx.io_mut().expect_next().await?;

            let corrections = own.open(peer)?;
            frontier = expanded.apply_corrections(&corrections)?;
        }

        let indicator = frontier.into_indicator_shares(array_length);
        let flat: Vec<bool> = indicator.into_iter().flatten().collect();

        let shares =
            <E as BitToRing<Ctx, R>>::bit_to_ring(&mut self.engine, ctx, flat).await?;

        Ok(shares
            .chunks(array_length)
            .map(|array| array.to_vec())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itybity::ToBits;
    use oram2pc_common::test_st_executor;
    use rstest::rstest;

    use crate::{
        engine::Traffic,
        ideal::{ideal_share_engine, IdealEngineAlice, IdealEngineBob},
    };

    fn index_bit_batches(indices: &[usize], array_length: usize) -> Vec<Vec<bool>> {
        let width = oram2pc_core::tree::tree_width(array_length);

        (0..width)
            .map(|level| {
                indices
                    .iter()
                    .map(|&index| {
                        (index as u32)
                            .iter_msb0()
                            .skip(32 - width)
                            .nth(level)
                            .unwrap()
                    })
                    .collect()
            })
            .collect()
    }

    fn zero_batches(instances: usize, array_length: usize) -> Vec<Vec<bool>> {
        vec![vec![false; instances]; oram2pc_core::tree::tree_width(array_length)]
    }

    async fn generate(
        indices: &[usize],
        array_length: usize,
    ) -> (
        Vec<Vec<u64>>,
        Vec<Vec<u64>>,
        (IdealEngineAlice, IdealEngineBob),
    ) {
        let (mut ctx_0, mut ctx_1) = test_st_executor(8);
        let (engine_0, engine_1) = ideal_share_engine();

        let mut gen_0 = SinglePointArrayGenerator::new(Role::Party0, engine_0.clone());
        let mut gen_1 = SinglePointArrayGenerator::new(Role::Party1, engine_1.clone());

        // Party 0 holds the plaintext index bits, party 1 holds zero shares.
        let (out_0, out_1) = tokio::try_join!(
            gen_0.generate_single_point_arrays(
                &mut ctx_0,
                index_bit_batches(indices, array_length),
                array_length
            ),
            gen_1.generate_single_point_arrays(
                &mut ctx_1,
                zero_batches(indices.len(), array_length),
                array_length
            ),
        )
        .unwrap();

        (out_0, out_1, (engine_0, engine_1))
    }

    fn reconstruct(out_0: &[Vec<u64>], out_1: &[Vec<u64>]) -> Vec<Vec<u64>> {
        out_0
            .iter()
            .zip(out_1)
            .map(|(a, b)| {
                a.iter()
                    .zip(b)
                    .map(|(&x, &y)| x.wrapping_add(y))
                    .collect()
            })
            .collect()
    }

    fn assert_unit(array: &[u64], index: usize) {
        for (j, &value) in array.iter().enumerate() {
            assert_eq!(value, u64::from(j == index), "position {j}");
        }
    }

    #[tokio::test]
    async fn test_generate_single_point_array() {
        let (out_0, out_1, _) = generate(&[2], 4).await;
        let combined = reconstruct(&out_0, &out_1);

        assert_eq!(combined, vec![vec![0, 0, 1, 0]]);
    }

    #[rstest]
    #[case(4, 0)]
    #[case(4, 3)]
    #[case(8, 5)]
    #[case(16, 11)]
    #[case(6, 4)]
    #[case(100, 99)]
    #[case(16384, 12345)]
    #[tokio::test]
    async fn test_generate_positions(#[case] array_length: usize, #[case] index: usize) {
        let (out_0, out_1, _) = generate(&[index], array_length).await;
        let combined = reconstruct(&out_0, &out_1);

        assert_eq!(combined[0].len(), array_length);
        assert_unit(&combined[0], index);
    }

    #[tokio::test]
    async fn test_generate_batch_instances_are_independent() {
        let indices = [0, 7, 3, 3, 5];
        let (out_0, out_1, _) = generate(&indices, 8).await;
        let combined = reconstruct(&out_0, &out_1);

        assert_eq!(combined.len(), indices.len());
        for (instance, &index) in indices.iter().enumerate() {
            assert_unit(&combined[instance], index);
        }
    }

    #[tokio::test]
    async fn test_generate_interaction_count() {
        let array_length = 16;
        let width = oram2pc_core::tree::tree_width(array_length);

        let (_, _, (engine_0, _)) = generate(&[9], array_length).await;

        // One conversion and one multiplication per level, plus the final
        // leaf conversion.
        assert_eq!(engine_0.interactions(), (2 * width + 1) as u64);
    }

    #[tokio::test]
    async fn test_generate_reports_traffic() {
        let (_, _, (engine_0, engine_1)) = generate(&[1], 4).await;

        assert!(engine_0.traffic().bytes_sent > 0);
        assert!(engine_0.traffic().bytes_recv > 0);
        assert_eq!(engine_0.traffic(), engine_1.traffic());
    }

    #[tokio::test]
    async fn test_generate_shares_rerandomize() {
        let (a_0, a_1, _) = generate(&[6], 8).await;
        let (b_0, b_1, _) = generate(&[6], 8).await;

        // Same reconstruction, fresh shares.
        assert_eq!(reconstruct(&a_0, &a_1), reconstruct(&b_0, &b_1));
        assert_ne!(a_0, b_0);
    }

    #[tokio::test]
    async fn test_generate_rejects_bad_inputs() {
        let (mut ctx_0, _ctx_1) = test_st_executor(8);
        let (engine_0, _engine_1) = ideal_share_engine();

        let mut gen_0 = SinglePointArrayGenerator::new(Role::Party0, engine_0);

        // Degenerate array length.
        let err = GenerateSinglePointArrays::<_, u64>::generate_single_point_arrays(
            &mut gen_0,
            &mut ctx_0,
            vec![vec![true]],
            1,
        )
        .await
        .unwrap_err();
        assert!(err.is_config());

        // Wrong level count for the array length.
        let err = GenerateSinglePointArrays::<_, u64>::generate_single_point_arrays(
            &mut gen_0,
            &mut ctx_0,
            vec![vec![true]],
            8,
        )
        .await
        .unwrap_err();
        assert!(err.is_config());

        // Ragged batches.
        let err = GenerateSinglePointArrays::<_, u64>::generate_single_point_arrays(
            &mut gen_0,
            &mut ctx_0,
            vec![vec![true, false], vec![false]],
            4,
        )
        .await
        .unwrap_err();
        assert!(err.is_length_mismatch());
    }
}
