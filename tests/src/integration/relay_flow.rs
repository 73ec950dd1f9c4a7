//! # Relay Flow
//!
//! What a relayer sees: queued outgoing txs of each kind, the confirmations
//! orchestrators still owe, and the recent signer sets.

#[cfg(test)]
mod tests {
    use crate::support::{
        batch, bridge_config, contract_call, eth, init_tracing, memory_keeper, power_table,
        validator, MemoryKeeper,
    };
    use qc_18_bridge_attestation::{
        AttestationError, AttestationEvent, BridgeKeeper, ConfirmationLedger, OutgoingTx,
        OutgoingTxKind, OutgoingTxQueue, SignerSetStore, StoreIndex,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Three batches of token 1, one of token 2, two contract calls on one scope.
    fn queued_keeper() -> MemoryKeeper {
        let mut keeper = memory_keeper(3);
        for tx in [
            batch(eth(1), 1, 2),
            batch(eth(1), 2, 1),
            batch(eth(1), 3, 3),
            batch(eth(2), 1, 1),
            contract_call(b"airdrop", 1),
            contract_call(b"airdrop", 2),
        ] {
            keeper.put_outgoing_tx(&tx).unwrap();
        }
        keeper
    }

    fn indices(txs: &[OutgoingTx]) -> Vec<StoreIndex> {
        txs.iter().map(|tx| tx.store_index().unwrap()).collect()
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[test]
    fn test_kinds_are_listed_separately_and_descending() {
        init_tracing();
        let keeper = queued_keeper();

        let batches = keeper
            .outgoing_txs_by_kind(OutgoingTxKind::Batch, 10)
            .unwrap();
        assert_eq!(
            indices(&batches),
            vec![
                StoreIndex::batch(&eth(2), 1),
                StoreIndex::batch(&eth(1), 3),
                StoreIndex::batch(&eth(1), 2),
                StoreIndex::batch(&eth(1), 1),
            ]
        );

        let calls = keeper
            .outgoing_txs_by_kind(OutgoingTxKind::ContractCall, 10)
            .unwrap();
        assert_eq!(
            indices(&calls),
            vec![
                StoreIndex::contract_call(b"airdrop", 2).unwrap(),
                StoreIndex::contract_call(b"airdrop", 1).unwrap(),
            ]
        );

        let queued = keeper
            .events()
            .events()
            .iter()
            .filter(|e| matches!(e, AttestationEvent::OutgoingTxQueued { .. }))
            .count();
        assert_eq!(queued, 6);
    }

    #[test]
    fn test_limit_truncates_listing() {
        init_tracing();
        let keeper = queued_keeper();

        let batches = keeper
            .outgoing_txs_by_kind(OutgoingTxKind::Batch, 2)
            .unwrap();

        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0], batch(eth(2), 1, 1));
    }

    #[test]
    fn test_confirmations_are_scoped_to_their_artifact() {
        init_tracing();
        let mut keeper = queued_keeper();
        let signed_batch = StoreIndex::batch(&eth(1), 3);
        let signed_call = StoreIndex::contract_call(b"airdrop", 2).unwrap();

        keeper
            .put_confirmation(&signed_batch, &validator(1), b"batch-sig")
            .unwrap();
        keeper
            .put_confirmation(&signed_call, &validator(1), b"call-sig")
            .unwrap();

        let unsigned_batches = keeper
            .outgoing_txs_unsigned_by(OutgoingTxKind::Batch, &validator(1))
            .unwrap();
        assert_eq!(unsigned_batches.len(), 3);
        assert!(!indices(&unsigned_batches).contains(&signed_batch));

        let unsigned_calls = keeper
            .outgoing_txs_unsigned_by(OutgoingTxKind::ContractCall, &validator(1))
            .unwrap();
        assert_eq!(
            indices(&unsigned_calls),
            vec![StoreIndex::contract_call(b"airdrop", 1).unwrap()]
        );

        assert_eq!(
            keeper
                .outgoing_txs_unsigned_by(OutgoingTxKind::Batch, &validator(2))
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn test_query_limit_caps_unsigned_view() {
        init_tracing();
        let mut keeper = BridgeKeeper::new_in_memory(
            power_table(2),
            bridge_config().with_outgoing_query_limit(2),
        );
        for nonce in 1..=5 {
            keeper.put_outgoing_tx(&batch(eth(1), nonce, 1)).unwrap();
        }

        let unsigned = keeper
            .outgoing_txs_unsigned_by(OutgoingTxKind::Batch, &validator(1))
            .unwrap();

        assert_eq!(
            indices(&unsigned),
            vec![StoreIndex::batch(&eth(1), 5), StoreIndex::batch(&eth(1), 4)]
        );
    }

    #[test]
    fn test_duplicate_and_removed_txs() {
        init_tracing();
        let mut keeper = queued_keeper();
        let index = StoreIndex::batch(&eth(1), 2);

        let err = keeper.put_outgoing_tx(&batch(eth(1), 2, 1)).unwrap_err();
        assert!(matches!(err, AttestationError::IntegrityViolation { .. }));

        keeper.delete_outgoing_tx(&index).unwrap();
        assert!(!keeper.has_outgoing_tx(&index).unwrap());
        assert_eq!(keeper.outgoing_tx(&index).unwrap(), None);
        assert_eq!(
            keeper
                .outgoing_txs_by_kind(OutgoingTxKind::Batch, 10)
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn test_relay_sees_recent_signer_sets() {
        init_tracing();
        let mut keeper = memory_keeper(3);
        for height in 1..=7 {
            keeper.create_signer_set_request(height * 10).unwrap();
        }

        let recent = keeper.recent_signer_sets_for_relay().unwrap();

        assert_eq!(
            recent.iter().map(|s| s.nonce).collect::<Vec<_>>(),
            vec![70, 60, 50, 40, 30]
        );
        assert_eq!(keeper.recent_signer_sets(2).unwrap().len(), 2);
    }
}
