use std::sync::Arc;

use classic_types::msgs::Msg;
use classic_types::tx::Tx;
use classic_types::{round_half_even, Coins};
use cosmwasm_std::{Addr, Coin, Decimal, Fraction, StdError, StdResult, Storage, Uint128, Uint256};
use tracing::warn;

use super::{fee_tx, AnteDecorator, Next};
use crate::constants::FEE_COLLECTOR_NAME;
use crate::context::Context;
use crate::error::{AnteError, AnteResult};
use crate::keepers::{BankKeeper, FeeShareKeeper};

/// Pays a governance-set share of the fee to the developers of the
/// contracts a transaction executes. Runs after the fee has reached the fee
/// collector.
pub struct FeeSharePayoutDecorator {
    bank_keeper: Arc<dyn BankKeeper>,
    feeshare_keeper: Arc<dyn FeeShareKeeper>,
}

impl FeeSharePayoutDecorator {
    pub fn new(bank_keeper: Arc<dyn BankKeeper>, feeshare_keeper: Arc<dyn FeeShareKeeper>) -> Self {
        Self {
            bank_keeper,
            feeshare_keeper,
        }
    }

    fn withdrawers(&self, storage: &dyn Storage, msgs: &[Msg]) -> AnteResult<Vec<Addr>> {
        let mut withdrawers: Vec<Addr> = vec![];

        for msg in msgs {
            let contract = match msg {
                Msg::ExecuteContract(msg) => &msg.contract,
                _ => continue,
            };

            let share = self.feeshare_keeper.fee_share(storage, contract).map_err(|err| {
                warn!(contract = %contract, error = %err, "fee share lookup failed");
                err
            })?;

            if let Some(share) = share.filter(|share| !share.withdrawer_address.is_empty()) {
                let withdrawer = Addr::unchecked(share.withdrawer_address);
                if !withdrawers.contains(&withdrawer) {
                    withdrawers.push(withdrawer);
                }
            }
        }

        Ok(withdrawers)
    }

    fn payout(&self, storage: &mut dyn Storage, fees: &Coins, msgs: &[Msg]) -> AnteResult<()> {
        let params = self.feeshare_keeper.params(&*storage)?;
        if !params.enable_fee_share {
            return Ok(());
        }

        let withdrawers = self.withdrawers(&*storage, msgs)?;
        if withdrawers.is_empty() {
            return Ok(());
        }

        let payable: Coins = if params.allowed_denoms.is_empty() {
            fees.clone()
        } else {
            fees.iter().filter(|coin| params.allowed_denoms.contains(&coin.denom)).cloned().collect()
        };

        let split = fee_pay_logic(&payable, params.developer_shares, withdrawers.len())?;
        if split.is_zero() {
            return Ok(());
        }

        for withdrawer in &withdrawers {
            self.bank_keeper
                .send_coins_from_module_to_account(storage, FEE_COLLECTOR_NAME, withdrawer, &split)
                .map_err(|err| AnteError::FeeSharePayment(err.to_string()))?;
        }

        Ok(())
    }
}

/// What each of `recipients` developers receives:
/// `round(share * amount / recipients)` per denom, ties to even.
pub fn fee_pay_logic(fees: &Coins, share: Decimal, recipients: usize) -> StdResult<Coins> {
    if recipients == 0 {
        return Ok(Coins::new());
    }

    let denominator = Uint256::from(share.denominator()) * Uint256::from(recipients as u128);

    fees.iter()
        .map(|coin| {
            let reward = round_half_even(coin.amount.full_mul(share.numerator()), denominator);
            let amount = Uint128::try_from(reward)
                .map_err(|_| StdError::generic_err(format!("fee share of {} overflows", coin)))?;
            Ok(Coin {
                denom: coin.denom.clone(),
                amount,
            })
        })
        .collect()
}

impl AnteDecorator for FeeSharePayoutDecorator {
    fn ante_handle<'a>(
        &self,
        mut ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        let fee = fee_tx(tx)?.fee();
        self.payout(ctx.storage, fee, tx.msgs())?;

        next.run(ctx, tx, simulate)
    }
}
