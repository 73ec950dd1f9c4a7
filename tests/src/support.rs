//! Fixtures shared by the integration flows and benchmarks.

use qc_18_bridge_attestation::{
    AccountAddress, AttestationConfig, BatchTx, BridgeKeeper, BridgeParams, ContractCallTx,
    Erc20Token, EthAddress, InMemoryKVStore, OutgoingTx, RecordingEventSink, SendToEthereum,
    StaticPowerSource, ValidatorAddress,
};
use tracing_subscriber::EnvFilter;

/// Keeper over the in-memory store used by every flow.
pub type MemoryKeeper = BridgeKeeper<InMemoryKVStore, StaticPowerSource, RecordingEventSink>;

/// Bridge contract the flows point at.
pub const BRIDGE_CONTRACT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

/// Install a fmt subscriber filtered by `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub fn validator(n: u8) -> ValidatorAddress {
    ValidatorAddress::new(vec![0xAA, n])
}

pub fn orchestrator(n: u8) -> AccountAddress {
    AccountAddress::new(vec![0x0C, n])
}

pub fn eth(n: u8) -> EthAddress {
    EthAddress::new([n; 20])
}

/// Config pointing at [`BRIDGE_CONTRACT`] on chain 5.
pub fn bridge_config() -> AttestationConfig {
    AttestationConfig::default().with_params(BridgeParams {
        gravity_id: "bridge-test".to_string(),
        bridge_contract_address: BRIDGE_CONTRACT.to_string(),
        bridge_chain_id: 5,
    })
}

/// Power source with `count` validators of descending power.
pub fn power_table(count: u8) -> StaticPowerSource {
    (1..=count).fold(StaticPowerSource::default(), |source, n| {
        source.with_validator(validator(n), 1_000 - u64::from(n))
    })
}

pub fn memory_keeper(validators: u8) -> MemoryKeeper {
    BridgeKeeper::new_in_memory(power_table(validators), bridge_config())
}

pub fn batch(token: EthAddress, nonce: u64, sends: u64) -> OutgoingTx {
    let transactions = (0..sends)
        .map(|i| SendToEthereum {
            id: nonce * 1_000 + i,
            sender: AccountAddress::new(vec![0x01, i as u8]),
            ethereum_recipient: eth(0xEE),
            erc20_token: Erc20Token {
                contract: token,
                amount: 1_000,
            },
            erc20_fee: Erc20Token {
                contract: token,
                amount: 3,
            },
        })
        .collect();
    OutgoingTx::Batch(BatchTx {
        batch_nonce: nonce,
        timeout: nonce + 500,
        transactions,
        token_contract: token,
        height: nonce,
    })
}

pub fn contract_call(scope: &[u8], nonce: u64) -> OutgoingTx {
    OutgoingTx::ContractCall(ContractCallTx {
        invalidation_scope: scope.to_vec(),
        invalidation_nonce: nonce,
        address: eth(0x42),
        payload: vec![0xde, 0xad, 0xbe, 0xef],
        timeout: nonce + 500,
        tokens: vec![Erc20Token {
            contract: eth(0x10),
            amount: 5,
        }],
        fees: vec![],
        height: nonce,
    })
}
