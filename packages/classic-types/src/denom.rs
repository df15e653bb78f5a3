use cosmwasm_std::{StdError, StdResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// LUNA token denomination, the chain's bond denom
pub const ULUNA_DENOM: &str = "uluna";

static IBC_DENOM: Lazy<Regex> =
    Lazy::new(|| Regex::new("^ibc/[a-f0-9]{64}$").expect("valid ibc denom pattern"));

static COIN_DENOM: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^[a-zA-Z][a-zA-Z0-9/:._-]{2,127}$").expect("valid coin denom pattern")
});

/// Returns true for denoms of the form `ibc/<64 hex chars>`, ignoring case.
pub fn is_ibc_denom(denom: &str) -> bool {
    IBC_DENOM.is_match(&denom.to_lowercase())
}

pub fn validate_denom(denom: &str) -> StdResult<()> {
    if COIN_DENOM.is_match(denom) {
        Ok(())
    } else {
        Err(StdError::generic_err(format!("invalid denom: {}", denom)))
    }
}
