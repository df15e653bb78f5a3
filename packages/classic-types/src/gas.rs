use std::fmt;
use std::str::FromStr;

use cosmwasm_std::{Coin, Decimal, StdError, StdResult, Uint128};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::denom::validate_denom;
use crate::{Coins, DecimalCheckedOps};

/// Price of a single unit of gas in one denom.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct GasPrice {
    pub denom: String,
    pub amount: Decimal,
}

impl GasPrice {
    pub fn new(amount: Decimal, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// `ceil(price * gas)` in this price's denom.
    pub fn fee_for_gas(&self, gas: u64) -> StdResult<Coin> {
        Ok(Coin {
            denom: self.denom.clone(),
            amount: self.amount.checked_mul_uint_ceil(Uint128::from(gas))?,
        })
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for GasPrice {
    type Err = StdError;

    fn from_str(s: &str) -> StdResult<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| StdError::generic_err(format!("invalid gas price: {}", s)))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(StdError::generic_err(format!("invalid gas price: {}", s)));
        }
        validate_denom(denom)?;
        Ok(Self::new(Decimal::from_str(amount)?, denom))
    }
}

/// Parses the `minimum-gas-prices` form `0.15uluna,0.1uusd`. Prices come
/// back sorted by denom; duplicate denoms are rejected.
pub fn parse_gas_prices(s: &str) -> StdResult<Vec<GasPrice>> {
    let mut prices = s
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(GasPrice::from_str)
        .collect::<StdResult<Vec<_>>>()?;

    prices.sort_by(|a, b| a.denom.cmp(&b.denom));
    if prices.windows(2).any(|pair| pair[0].denom == pair[1].denom) {
        return Err(StdError::generic_err(format!("duplicate denom in gas prices: {}", s)));
    }
    Ok(prices)
}

/// Fee needed to pay for `gas` at every one of `prices`.
pub fn required_gas_fees(prices: &[GasPrice], gas: u64) -> StdResult<Coins> {
    prices.iter().map(|price| price.fee_for_gas(gas)).collect()
}
