use cosmwasm_std::SignedDecimal;

pub const FEE_COLLECTOR_NAME: &str = "fee_collector";
pub const BURN_MODULE_NAME: &str = "burn";
pub const DISTRIBUTION_MODULE_NAME: &str = "distribution";

/// Gas an oracle prevote or vote is expected to use at most
pub const MAX_ORACLE_MSG_GAS_USAGE: u64 = 100_000;
/// Default mempool gas ceiling, `tx-gas-hard-limit` in app.toml
pub const TX_GAS_HARD_LIMIT: u64 = 30_000_000;
pub const DEFAULT_MAX_MEMO_CHARACTERS: u64 = 256;
pub const DEFAULT_TX_SIZE_COST_PER_BYTE: u64 = 10;

pub const EVENT_TYPE_TX: &str = "tx";
pub const ATTRIBUTE_KEY_FEE: &str = "fee";
pub const ATTRIBUTE_KEY_FEE_PAYER: &str = "fee_payer";

pub fn default_burn_split_rate() -> SignedDecimal {
    // 10% of taxes go to the community pool
    SignedDecimal::percent(10)
}
