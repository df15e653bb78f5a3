use classic_types::denom::{validate_denom, ULUNA_DENOM};
use classic_types::gas::{parse_gas_prices, GasPrice};
use cosmwasm_std::{from_json, StdError, StdResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_MEMO_CHARACTERS, DEFAULT_TX_SIZE_COST_PER_BYTE, MAX_ORACLE_MSG_GAS_USAGE,
    TX_GAS_HARD_LIMIT,
};

/// Node-local settings of the admission pipeline. Every field has a
/// default, so an empty JSON object is a valid config.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(default, rename_all = "snake_case")]
pub struct AnteConfig {
    /// The staking denom, never subject to stability tax
    pub bond_denom: String,
    /// Mempool admission refuses transactions asking for more gas than this
    pub tx_gas_hard_limit: u64,
    /// Gas ceiling enforced in every execution mode, when set
    pub consensus_gas_hard_cap: Option<u64>,
    /// Gas each oracle message may use while still skipping the fee floor
    pub oracle_msg_gas_allowance: u64,
    pub max_memo_characters: u64,
    pub tx_size_cost_per_byte: u64,
    /// This validator's minimum gas prices, only enforced in check mode
    pub min_gas_prices: Vec<GasPrice>,
}

impl Default for AnteConfig {
    fn default() -> Self {
        Self {
            bond_denom: ULUNA_DENOM.to_string(),
            tx_gas_hard_limit: TX_GAS_HARD_LIMIT,
            consensus_gas_hard_cap: None,
            oracle_msg_gas_allowance: MAX_ORACLE_MSG_GAS_USAGE,
            max_memo_characters: DEFAULT_MAX_MEMO_CHARACTERS,
            tx_size_cost_per_byte: DEFAULT_TX_SIZE_COST_PER_BYTE,
            min_gas_prices: vec![],
        }
    }
}

impl AnteConfig {
    pub fn from_json(data: impl AsRef<[u8]>) -> StdResult<Self> {
        let config: AnteConfig = from_json(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the minimum gas prices with ones parsed from the app.toml
    /// form, e.g. `0.15uluna,0.1uusd`.
    pub fn with_min_gas_prices(mut self, prices: &str) -> StdResult<Self> {
        self.min_gas_prices = parse_gas_prices(prices)?;
        Ok(self)
    }

    pub fn validate(&self) -> StdResult<()> {
        validate_denom(&self.bond_denom)?;

        if self.tx_gas_hard_limit == 0 {
            return Err(StdError::generic_err("'tx_gas_hard_limit' must be positive"));
        }
        if self.consensus_gas_hard_cap == Some(0) {
            return Err(StdError::generic_err("'consensus_gas_hard_cap' must be positive when set"));
        }
        if self.max_memo_characters == 0 {
            return Err(StdError::generic_err("'max_memo_characters' must be positive"));
        }

        for price in &self.min_gas_prices {
            validate_denom(&price.denom)?;
        }
        let mut denoms: Vec<&str> = self.min_gas_prices.iter().map(|p| p.denom.as_str()).collect();
        denoms.sort_unstable();
        if denoms.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(StdError::generic_err("duplicate denom in 'min_gas_prices'"));
        }

        Ok(())
    }
}
