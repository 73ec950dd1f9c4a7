//! # Signer Set Flow
//!
//! Power table -> signer set request -> confirmations -> slashing window.
//!
//! 1. Validators register foreign addresses
//! 2. Blocks trigger signer set requests from the current power table
//! 3. Orchestrators confirm and the unsigned view shrinks
//! 4. Slashing advances past confirmed sets

#[cfg(test)]
mod tests {
    use crate::support::{
        eth, init_tracing, memory_keeper, orchestrator, validator, MemoryKeeper, BRIDGE_CONTRACT,
    };
    use qc_18_bridge_attestation::{
        decode_unbonding_validators, encode_unbonding_validators, AttestationError,
        AttestationEvent, ConfirmationLedger, DelegationRegistry, EthAddress, SignerSetStore,
        StoreIndex, MAX_NORMALIZED_POWER,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Keeper with four validators, the first three holding foreign addresses.
    fn registered_keeper() -> MemoryKeeper {
        let mut keeper = memory_keeper(4);
        for n in 1..=3 {
            keeper
                .set_orchestrator_validator(&validator(n), &orchestrator(n))
                .unwrap();
            keeper.set_ethereum_address(&validator(n), &eth(n)).unwrap();
        }
        keeper
    }

    fn nonces(sets: &[qc_18_bridge_attestation::SignerSetTx]) -> Vec<u64> {
        sets.iter().map(|s| s.nonce).collect()
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[test]
    fn test_request_snapshots_power_table() {
        init_tracing();
        let mut keeper = registered_keeper();

        let set = keeper.create_signer_set_request(10).unwrap();

        assert_eq!(set.nonce, 10);
        assert_eq!(set.height, 10);
        assert_eq!(set.members.len(), 4);
        assert_eq!(set.members[0].ethereum_address, Some(eth(1)));
        assert_eq!(set.members[3].ethereum_address, None);
        assert!(set.total_power() <= MAX_NORMALIZED_POWER);
        assert!(set.members.windows(2).all(|w| w[0].power >= w[1].power));

        let contract: EthAddress = BRIDGE_CONTRACT.parse().unwrap();
        assert_eq!(
            keeper.events().events(),
            &[AttestationEvent::SignerSetRequested {
                contract,
                chain_id: 5,
                nonce: 10,
            }]
        );
        assert_eq!(keeper.latest_signer_set().unwrap(), Some(set));
    }

    #[test]
    fn test_power_change_produces_new_version() {
        init_tracing();
        let mut keeper = registered_keeper();
        let first = keeper.create_signer_set_request(10).unwrap();

        keeper.power_source_mut().set_power(validator(4), 5_000);
        let second = keeper.create_signer_set_request(20).unwrap();

        assert_ne!(first.members, second.members);
        assert!(second.members[3].power > second.members[0].power);
        assert_eq!(
            nonces(&keeper.signer_sets_descending().unwrap()),
            vec![20, 10]
        );
        assert_eq!(keeper.signer_set(10).unwrap(), Some(first));
    }

    #[test]
    fn test_request_at_older_height_is_rejected() {
        init_tracing();
        let mut keeper = registered_keeper();
        keeper.create_signer_set_request(20).unwrap();

        let err = keeper.create_signer_set_request(15).unwrap_err();

        assert!(matches!(
            err,
            AttestationError::NonceRegression {
                nonce: 15,
                latest: 20
            }
        ));
        assert_eq!(keeper.latest_signer_set_nonce().unwrap(), 20);
        assert_eq!(keeper.events().events().len(), 1);
    }

    #[test]
    fn test_confirmations_shrink_unsigned_view() {
        init_tracing();
        let mut keeper = registered_keeper();
        for height in [10, 20, 30] {
            keeper.create_signer_set_request(height).unwrap();
        }

        keeper
            .put_confirmation(&StoreIndex::signer_set(20), &validator(1), b"sig-20")
            .unwrap();
        keeper
            .put_confirmation(&StoreIndex::signer_set(30), &validator(1), b"sig-30")
            .unwrap();

        assert_eq!(
            nonces(&keeper.signer_sets_unsigned_by(&validator(1)).unwrap()),
            vec![10]
        );
        assert_eq!(
            nonces(&keeper.signer_sets_unsigned_by(&validator(2)).unwrap()),
            vec![30, 20, 10]
        );

        let signatures = keeper
            .confirmations_for(&StoreIndex::signer_set(30))
            .unwrap();
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[&validator(1)], b"sig-30".to_vec());
    }

    #[test]
    fn test_slashing_window_moves_forward() {
        init_tracing();
        let mut keeper = registered_keeper();
        for height in [10, 20, 30, 40] {
            keeper.create_signer_set_request(height).unwrap();
        }

        assert_eq!(
            nonces(&keeper.unslashed_signer_sets(40).unwrap()),
            vec![10, 20, 30]
        );

        keeper.set_last_slashed_signer_set_nonce(20).unwrap();
        assert_eq!(
            nonces(&keeper.unslashed_signer_sets(u64::MAX).unwrap()),
            vec![30, 40]
        );

        let err = keeper.set_last_slashed_signer_set_nonce(10).unwrap_err();
        assert!(matches!(err, AttestationError::CounterRegression { .. }));
        assert_eq!(keeper.last_slashed_signer_set_nonce().unwrap(), 20);
    }

    #[test]
    fn test_unbonding_height_and_validator_list() {
        init_tracing();
        let mut keeper = registered_keeper();
        keeper.set_last_unbonding_block_height(12).unwrap();

        let encoded = encode_unbonding_validators(&[validator(2), validator(3)]).unwrap();
        let unbonding = decode_unbonding_validators(&encoded).unwrap();

        assert_eq!(keeper.last_unbonding_block_height().unwrap(), 12);
        assert_eq!(unbonding, vec![validator(2), validator(3)]);
        assert!(decode_unbonding_validators(&[0xFF]).is_err());
    }
}
