use oram2pc_common::{PartyId, Role};
use tracing::debug;

use crate::{DifferenceCalculator, ObliviousDeltaCalculator, SinglePointArrayGenerator};

/// A factory handing out the ORAM primitive protocols.
///
/// Binds one party's role, identity and execution engine; every calculator it
/// creates shares the engine and drives the same channel.
#[derive(Debug)]
pub struct Factory<E> {
    role: Role,
    party_id: PartyId,
    peer_id: PartyId,
    engine: E,
}

impl<E: Clone> Factory<E> {
    /// Creates a new factory.
    ///
    /// # Arguments
    ///
    /// * `role` - The party's role.
    /// * `party_id` - The party's identity.
    /// * `peer_id` - The peer's identity.
    /// * `engine` - The execution engine.
    pub fn new(role: Role, party_id: PartyId, peer_id: PartyId, engine: E) -> Self {
        debug!(%role, party = %party_id, peer = %peer_id, "creating primitive factory");

        Self {
            role,
            party_id,
            peer_id,
            engine,
        }
    }

    /// Returns the party's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the party's identity.
    pub fn party_id(&self) -> &PartyId {
        &self.party_id
    }

    /// Returns the peer's identity.
    pub fn peer_id(&self) -> &PartyId {
        &self.peer_id
    }

    /// Creates a difference calculator.
    pub fn difference_calculator(&self) -> DifferenceCalculator<E> {
        DifferenceCalculator::new(self.role, self.engine.clone())
    }

    /// Creates an oblivious delta calculator.
    pub fn oblivious_delta_calculator(&self) -> ObliviousDeltaCalculator<E> {
        ObliviousDeltaCalculator::new(self.role, self.engine.clone())
    }

    /// Creates a single-point array generator.
    pub fn single_point_array_generator(&self) -> SinglePointArrayGenerator<E> {
        SinglePointArrayGenerator::new(self.role, self.engine.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oram2pc_common::test_st_executor;

    use crate::{ideal::ideal_share_engine, CalculateDelta, CalculateDifference};

    #[tokio::test]
    async fn test_factory_calculators_share_the_engine() {
        let (mut ctx_0, mut ctx_1) = test_st_executor(8);
        let (engine_0, engine_1) = ideal_share_engine();

        let factory_0 = Factory::new(
            Role::Party0,
            PartyId::from("alice"),
            PartyId::from("bob"),
            engine_0.clone(),
        );
        let factory_1 = Factory::new(
            Role::Party1,
            PartyId::from("bob"),
            PartyId::from("alice"),
            engine_1,
        );

        assert_eq!(factory_0.role(), Role::Party0);
        assert_eq!(factory_0.party_id(), factory_1.peer_id());

        let mut diff_0 = factory_0.difference_calculator();
        let mut diff_1 = factory_1.difference_calculator();

        let (out_0, out_1) = tokio::try_join!(
            diff_0.calculate_difference(&mut ctx_0, vec![true], vec![7u64], vec![2]),
            diff_1.calculate_difference(&mut ctx_1, vec![false], vec![3u64], vec![2]),
        )
        .unwrap();

        assert_eq!(out_0[0].wrapping_add(out_1[0]), 6);
        assert_eq!(engine_0.interactions(), 2);

        let mut delta_0 = factory_0.oblivious_delta_calculator();
        let mut delta_1 = factory_1.oblivious_delta_calculator();

        let (out_0, out_1) = tokio::try_join!(
            delta_0.calculate_delta(&mut ctx_0, vec![1u64], vec![2], vec![true]),
            delta_1.calculate_delta(&mut ctx_1, vec![0u64], vec![0], vec![false]),
        )
        .unwrap();

        assert_eq!(out_0[0].wrapping_add(out_1[0]), 2);
        assert_eq!(engine_0.interactions(), 4);
    }
}
