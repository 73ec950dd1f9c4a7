//! # Export / Import
//!
//! A populated keeper exported to JSON and imported into a fresh one must
//! export the same state back.

#[cfg(test)]
mod tests {
    use crate::support::{
        batch, contract_call, eth, init_tracing, memory_keeper, orchestrator, validator,
        MemoryKeeper,
    };
    use qc_18_bridge_attestation::{
        AttestationError, BridgeSnapshot, ConfirmationLedger, DelegationRegistry, OutgoingTxKind,
        OutgoingTxQueue, SignerSetStore, StoreIndex,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn populated_keeper() -> MemoryKeeper {
        let mut keeper = memory_keeper(3);
        for n in 1..=3 {
            keeper
                .set_orchestrator_validator(&validator(n), &orchestrator(n))
                .unwrap();
            keeper
                .set_ethereum_address(&validator(n), &eth(4 - n))
                .unwrap();
        }
        keeper.create_signer_set_request(10).unwrap();
        keeper.create_signer_set_request(20).unwrap();
        keeper.set_last_slashed_signer_set_nonce(10).unwrap();
        keeper.set_last_unbonding_block_height(15).unwrap();

        keeper.put_outgoing_tx(&batch(eth(9), 1, 2)).unwrap();
        keeper.put_outgoing_tx(&contract_call(b"scope", 4)).unwrap();

        keeper
            .put_confirmation(&StoreIndex::signer_set(20), &validator(1), b"a")
            .unwrap();
        keeper
            .put_confirmation(&StoreIndex::batch(&eth(9), 1), &validator(2), b"b")
            .unwrap();
        keeper
            .put_confirmation(
                &StoreIndex::contract_call(b"scope", 4).unwrap(),
                &validator(3),
                b"c",
            )
            .unwrap();
        keeper
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[test]
    fn test_snapshot_survives_json_and_import() {
        init_tracing();
        let source = populated_keeper();
        let exported = source.export_state().unwrap();

        let json = serde_json::to_string_pretty(&exported).unwrap();
        let parsed: BridgeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, exported);

        let mut target = memory_keeper(3);
        target.import_state(&parsed).unwrap();

        assert_eq!(target.export_state().unwrap(), exported);
        assert!(target.events().events().is_empty());
    }

    #[test]
    fn test_exported_contents() {
        init_tracing();
        let snapshot = populated_keeper().export_state().unwrap();

        assert_eq!(
            snapshot
                .signer_sets
                .iter()
                .map(|s| s.nonce)
                .collect::<Vec<_>>(),
            vec![10, 20]
        );
        assert_eq!(snapshot.latest_signer_set_nonce, 20);
        assert_eq!(snapshot.last_slashed_signer_set_nonce, 10);
        assert_eq!(snapshot.last_unbonding_block_height, 15);
        assert_eq!(snapshot.confirmations.len(), 3);
        assert_eq!(snapshot.outgoing_txs.len(), 2);

        // sorted by ethereum address: validator 3 holds eth(1)
        let validators: Vec<_> = snapshot
            .delegate_keys
            .iter()
            .map(|k| k.validator_address.clone())
            .collect();
        assert_eq!(validators, vec![validator(3), validator(2), validator(1)]);
    }

    #[test]
    fn test_imported_state_is_live() {
        init_tracing();
        let snapshot = populated_keeper().export_state().unwrap();
        let mut target = memory_keeper(3);
        target.import_state(&snapshot).unwrap();

        assert_eq!(
            target.orchestrator_validator(&orchestrator(2)).unwrap(),
            Some(validator(2))
        );
        assert!(target
            .has_confirmation(&StoreIndex::signer_set(20), &validator(1))
            .unwrap());
        assert!(target
            .outgoing_txs_unsigned_by(OutgoingTxKind::Batch, &validator(2))
            .unwrap()
            .is_empty());

        // the imported latest nonce still guards new requests
        let err = target.create_signer_set_request(20).unwrap_err();
        assert!(matches!(err, AttestationError::NonceRegression { .. }));
        target.create_signer_set_request(30).unwrap();
        assert_eq!(target.latest_signer_set_nonce().unwrap(), 30);
    }

    #[test]
    fn test_empty_snapshot() {
        init_tracing();
        let keeper = memory_keeper(1);
        assert_eq!(keeper.export_state().unwrap(), BridgeSnapshot::default());
    }
}
