use std::collections::BTreeMap;
use std::fmt;

use cosmwasm_std::{Coin, StdError, StdResult, Uint128};
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::denom::validate_denom;

/// A set of coins kept sorted by denom, with unique denoms and no zero
/// amounts. Building one from a list of coins sums duplicate denoms.
#[derive(Serialize, Clone, Debug, Default, PartialEq, JsonSchema)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from any list of coins, summing duplicate denoms. Fails
    /// when a denom's total does not fit in a `Uint128`.
    pub fn try_from_coins<I: IntoIterator<Item = Coin>>(coins: I) -> StdResult<Self> {
        let mut amounts: BTreeMap<String, Uint128> = BTreeMap::new();
        for coin in coins {
            if coin.amount.is_zero() {
                continue;
            }
            let total = amounts.entry(coin.denom).or_default();
            *total = total.checked_add(coin.amount)?;
        }
        Ok(Self(
            amounts
                .into_iter()
                .map(|(denom, amount)| Coin {
                    denom,
                    amount,
                })
                .collect(),
        ))
    }

    /// Infallible build for coins known to carry unique denoms.
    fn normalize<I: IntoIterator<Item = Coin>>(coins: I) -> Self {
        let mut coins: Vec<Coin> = coins.into_iter().filter(|coin| !coin.amount.is_zero()).collect();
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        coins.dedup_by(|next, kept| {
            if next.denom != kept.denom {
                return false;
            }
            kept.amount = kept.amount.saturating_add(next.amount);
            true
        });
        Self(coins)
    }

    pub fn add(&self, other: &Coins) -> StdResult<Coins> {
        Self::try_from_coins(self.0.iter().chain(other.0.iter()).cloned())
    }

    pub fn add_coin(&mut self, coin: Coin) -> StdResult<()> {
        *self = Self::try_from_coins(self.0.iter().cloned().chain(std::iter::once(coin)))?;
        Ok(())
    }

    /// Subtracts `other` denom by denom. The flag is set when any denom
    /// would go negative; the returned set is meaningless in that case.
    pub fn safe_sub(&self, other: &Coins) -> (Coins, bool) {
        let mut amounts: BTreeMap<&str, Uint128> =
            self.0.iter().map(|c| (c.denom.as_str(), c.amount)).collect();
        let mut went_negative = false;

        for coin in &other.0 {
            let have = amounts.get(coin.denom.as_str()).copied().unwrap_or_default();
            match have.checked_sub(coin.amount) {
                Ok(left) => {
                    amounts.insert(coin.denom.as_str(), left);
                },
                Err(_) => {
                    went_negative = true;
                    amounts.insert(coin.denom.as_str(), Uint128::zero());
                },
            }
        }

        let result = Self::normalize(amounts.into_iter().map(|(denom, amount)| Coin {
            denom: denom.to_string(),
            amount,
        }));
        (result, went_negative)
    }

    pub fn checked_sub(&self, other: &Coins) -> StdResult<Coins> {
        match self.safe_sub(other) {
            (_, true) => {
                Err(StdError::generic_err(format!("insufficient coins: {} < {}", self, other)))
            },
            (coins, false) => Ok(coins),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// True when at least one denom of `other` is matched or exceeded by
    /// this set. Always false against an empty set.
    pub fn is_any_gte(&self, other: &Coins) -> bool {
        other.0.iter().any(|coin| self.amount_of(&coin.denom) >= coin.amount)
    }

    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.0.iter().all(|coin| self.amount_of(&coin.denom) >= coin.amount)
    }

    pub fn amount_of(&self, denom: &str) -> Uint128 {
        self.0
            .binary_search_by(|coin| coin.denom.as_str().cmp(denom))
            .map(|idx| self.0[idx].amount)
            .unwrap_or_default()
    }

    pub fn find(&self, denom: &str) -> Option<&Coin> {
        self.0.iter().find(|coin| coin.denom == denom)
    }

    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|coin| coin.denom.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Coin] {
        &self.0
    }

    pub fn validate(&self) -> StdResult<()> {
        self.0.iter().try_for_each(|coin| validate_denom(&coin.denom))
    }
}

// The conversions below saturate a denom whose duplicates overflow; anything
// decoded from a transaction goes through `try_from_coins` instead.
impl From<Vec<Coin>> for Coins {
    fn from(coins: Vec<Coin>) -> Self {
        Self::normalize(coins)
    }
}

impl From<&[Coin]> for Coins {
    fn from(coins: &[Coin]) -> Self {
        Self::normalize(coins.iter().cloned())
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Self::normalize(std::iter::once(coin))
    }
}

impl FromIterator<Coin> for Coins {
    fn from_iter<I: IntoIterator<Item = Coin>>(iter: I) -> Self {
        Self::normalize(iter)
    }
}

impl IntoIterator for Coins {
    type Item = Coin;
    type IntoIter = std::vec::IntoIter<Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for Coins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let coins = Vec::<Coin>::deserialize(deserializer)?;
        Self::try_from_coins(coins).map_err(D::Error::custom)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|coin| coin.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
