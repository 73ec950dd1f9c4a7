//! # Staged Steps
//!
//! One block's writes go through a `StagedStore`: a step that fails part-way
//! is dropped and the committed state is what the previous step left.

#[cfg(test)]
mod tests {
    use crate::support::{batch, bridge_config, eth, init_tracing, power_table, MemoryKeeper};
    use qc_18_bridge_attestation::{
        AttestationResult, BridgeDependencies, BridgeKeeper, InMemoryKVStore, KindRegistry,
        OutgoingTx, OutgoingTxKind, OutgoingTxQueue, RecordingEventSink, SignerSetStore,
        StagedStore, StaticPowerSource,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type StagedKeeper<'a> =
        BridgeKeeper<StagedStore<'a, InMemoryKVStore>, StaticPowerSource, RecordingEventSink>;

    fn staged(base: &mut InMemoryKVStore) -> StagedKeeper<'_> {
        BridgeKeeper::new(
            BridgeDependencies {
                store: StagedStore::new(base),
                power_source: power_table(3),
                events: RecordingEventSink::new(),
                registry: KindRegistry::default(),
            },
            bridge_config(),
        )
    }

    /// One block: a signer set request and a list of outgoing txs.
    fn run_step(
        base: &mut InMemoryKVStore,
        height: u64,
        txs: &[OutgoingTx],
    ) -> AttestationResult<()> {
        let mut keeper = staged(base);
        keeper.create_signer_set_request(height)?;
        for tx in txs {
            keeper.put_outgoing_tx(tx)?;
        }
        keeper.into_store().commit()?;
        Ok(())
    }

    fn reader(base: InMemoryKVStore) -> MemoryKeeper {
        BridgeKeeper::new(
            BridgeDependencies {
                store: base,
                power_source: StaticPowerSource::default(),
                events: RecordingEventSink::new(),
                registry: KindRegistry::default(),
            },
            bridge_config(),
        )
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[test]
    fn test_failed_step_keeps_previous_state() {
        init_tracing();
        let mut base = InMemoryKVStore::new();
        run_step(&mut base, 10, &[batch(eth(1), 1, 1)]).unwrap();
        let committed = base.len();

        // second tx duplicates the first, so the step fails after two writes
        let result = run_step(&mut base, 20, &[batch(eth(1), 2, 1), batch(eth(1), 2, 1)]);
        assert!(result.is_err());
        assert_eq!(base.len(), committed);

        let keeper = reader(base);
        assert_eq!(keeper.latest_signer_set_nonce().unwrap(), 10);
        assert_eq!(
            keeper
                .outgoing_txs_by_kind(OutgoingTxKind::Batch, 10)
                .unwrap(),
            vec![batch(eth(1), 1, 1)]
        );
    }

    #[test]
    fn test_successive_steps_accumulate() {
        init_tracing();
        let mut base = InMemoryKVStore::new();
        run_step(&mut base, 10, &[batch(eth(1), 1, 1)]).unwrap();
        run_step(&mut base, 20, &[batch(eth(1), 2, 1)]).unwrap();

        let keeper = reader(base);
        assert_eq!(
            keeper
                .signer_sets_descending()
                .unwrap()
                .iter()
                .map(|s| s.nonce)
                .collect::<Vec<_>>(),
            vec![20, 10]
        );
        assert_eq!(
            keeper
                .outgoing_txs_by_kind(OutgoingTxKind::Batch, 10)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_staged_reads_see_own_writes() {
        init_tracing();
        let mut base = InMemoryKVStore::new();
        let mut keeper = staged(&mut base);
        keeper.create_signer_set_request(10).unwrap();
        keeper.put_outgoing_tx(&batch(eth(1), 1, 1)).unwrap();

        assert_eq!(keeper.latest_signer_set_nonce().unwrap(), 10);
        assert_eq!(
            keeper
                .outgoing_txs_by_kind(OutgoingTxKind::Batch, 10)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(keeper.store().pending(), 3);

        keeper.into_store().discard();
        assert!(base.is_empty());
    }
}
