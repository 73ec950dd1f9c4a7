//! Configuration for the Bridge Attestation Subsystem

use crate::domain::{AttestationError, AttestationResult, EthAddress};
use serde::{Deserialize, Serialize};

/// Bridge identity carried into emitted events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeParams {
    /// Unique id of this bridge deployment, mixed into every signed payload.
    pub gravity_id: String,
    /// Bridge contract on the foreign chain, `0x`-prefixed hex.
    pub bridge_contract_address: String,
    /// Foreign chain id.
    pub bridge_chain_id: u64,
}

impl Default for BridgeParams {
    fn default() -> Self {
        Self {
            gravity_id: "gravity".to_string(),
            bridge_contract_address: "0x0000000000000000000000000000000000000000".to_string(),
            bridge_chain_id: 1,
        }
    }
}

impl BridgeParams {
    /// Parsed bridge contract address.
    pub fn contract_address(&self) -> AttestationResult<EthAddress> {
        self.bridge_contract_address.parse()
    }
}

/// Attestation configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttestationConfig {
    /// Bridge identity
    pub params: BridgeParams,
    /// Signer sets returned by the relayer view
    pub recent_signer_set_count: usize,
    /// Upper bound on outgoing txs returned by one query, `0` returns none
    pub outgoing_query_limit: usize,
}

impl Default for AttestationConfig {
    fn default() -> Self {
        Self {
            params: BridgeParams::default(),
            recent_signer_set_count: 5,
            outgoing_query_limit: 100,
        }
    }
}

impl AttestationConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> AttestationResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AttestationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the bridge params.
    pub fn with_params(mut self, params: BridgeParams) -> Self {
        self.params = params;
        self
    }

    /// Set the relayer view size.
    pub fn with_recent_signer_set_count(mut self, count: usize) -> Self {
        self.recent_signer_set_count = count;
        self
    }

    /// Set the outgoing query limit.
    pub fn with_outgoing_query_limit(mut self, limit: usize) -> Self {
        self.outgoing_query_limit = limit;
        self
    }

    /// Check the config is usable.
    pub fn validate(&self) -> AttestationResult<()> {
        if self.params.gravity_id.is_empty() {
            return Err(AttestationError::Config("gravity_id is empty".to_string()));
        }
        self.params.contract_address().map_err(|e| {
            AttestationError::Config(format!("bridge_contract_address: {}", e))
        })?;
        Ok(())
    }
}
