use std::sync::Arc;

use classic_types::msgs::Msg;
use classic_types::tx::Tx;
use classic_types::{Coins, DecimalCheckedOps};
use cosmwasm_std::{Coin, Storage};

use super::{AnteDecorator, Next};
use crate::context::Context;
use crate::error::{AnteError, AnteResult};
use crate::keepers::{GovKeeper, TreasuryKeeper};

/// Refuses governance proposals whose initial deposit is below the
/// treasury's share of the minimum deposit.
pub struct MinInitialDepositDecorator {
    gov_keeper: Arc<dyn GovKeeper>,
    treasury_keeper: Arc<dyn TreasuryKeeper>,
    bond_denom: String,
}

impl MinInitialDepositDecorator {
    pub fn new(
        gov_keeper: Arc<dyn GovKeeper>,
        treasury_keeper: Arc<dyn TreasuryKeeper>,
        bond_denom: impl Into<String>,
    ) -> Self {
        Self {
            gov_keeper,
            treasury_keeper,
            bond_denom: bond_denom.into(),
        }
    }

    /// `floor(min_deposit[0].amount * ratio)` in the bond denom, whatever
    /// the denom of the first minimum deposit coin.
    pub fn required_initial_deposit(&self, storage: &dyn Storage) -> AnteResult<Coin> {
        let min_deposit = self.gov_keeper.deposit_params(storage)?.min_deposit;
        let ratio = self.treasury_keeper.min_initial_deposit_ratio(storage)?;
        let base = min_deposit.as_slice().first().map(|coin| coin.amount).unwrap_or_default();
        Ok(Coin {
            denom: self.bond_denom.clone(),
            amount: ratio.checked_mul_uint(base)?,
        })
    }
}

impl AnteDecorator for MinInitialDepositDecorator {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        if simulate {
            return next.run(ctx, tx, simulate);
        }

        let proposals: Vec<_> = tx
            .msgs()
            .iter()
            .filter_map(|msg| match msg {
                Msg::SubmitProposal(proposal) => Some(proposal),
                _ => None,
            })
            .collect();

        if !proposals.is_empty() {
            let required = self.required_initial_deposit(&*ctx.storage)?;
            let required_coins = Coins::from(required.clone());

            for proposal in proposals {
                let initial_deposit =
                    Coins::try_from_coins(proposal.initial_deposit.iter().cloned())
                        .map_err(|err| AnteError::InvalidCoins(err.to_string()))?;
                if !initial_deposit.is_all_gte(&required_coins) {
                    return Err(AnteError::Unauthorized(format!(
                        "not enough initial deposit provided. Expected \"{}\"; got \"{}\"",
                        required, initial_deposit
                    )));
                }
            }
        }

        next.run(ctx, tx, simulate)
    }
}
