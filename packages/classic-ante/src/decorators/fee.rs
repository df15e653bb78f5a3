use std::sync::Arc;

use classic_types::gas::required_gas_fees;
use classic_types::msgs::Msg;
use classic_types::tx::{FeeTx, Tx};
use classic_types::{Coins, DecimalCheckedOps};
use cosmwasm_std::{Addr, Coin, Decimal, Event, SignedDecimal, Storage};
use tracing::debug;

use super::{fee_tx, AnteDecorator, Next};
use crate::constants::{
    ATTRIBUTE_KEY_FEE, ATTRIBUTE_KEY_FEE_PAYER, BURN_MODULE_NAME, EVENT_TYPE_TX,
    FEE_COLLECTOR_NAME,
};
use crate::context::Context;
use crate::error::{AnteError, AnteResult};
use crate::keepers::{
    AccountKeeper, BankKeeper, DistributionKeeper, FeegrantKeeper, TreasuryKeeper,
};
use crate::tax::{is_oracle_tx, TaxPolicy};

/// Checks the declared fee covers the validator's gas price floor plus the
/// stability tax, deducts it from the payer, and routes the tax to the burn
/// account and the community pool.
pub struct FeeDecorator {
    account_keeper: Arc<dyn AccountKeeper>,
    bank_keeper: Arc<dyn BankKeeper>,
    feegrant_keeper: Option<Arc<dyn FeegrantKeeper>>,
    treasury_keeper: Arc<dyn TreasuryKeeper>,
    distribution_keeper: Arc<dyn DistributionKeeper>,
    bond_denom: String,
    oracle_msg_gas_allowance: u64,
}

impl FeeDecorator {
    pub fn new(
        account_keeper: Arc<dyn AccountKeeper>,
        bank_keeper: Arc<dyn BankKeeper>,
        feegrant_keeper: Option<Arc<dyn FeegrantKeeper>>,
        treasury_keeper: Arc<dyn TreasuryKeeper>,
        distribution_keeper: Arc<dyn DistributionKeeper>,
        bond_denom: impl Into<String>,
        oracle_msg_gas_allowance: u64,
    ) -> Self {
        Self {
            account_keeper,
            bank_keeper,
            feegrant_keeper,
            treasury_keeper,
            distribution_keeper,
            bond_denom: bond_denom.into(),
            oracle_msg_gas_allowance,
        }
    }

    /// Validates the fee against the mempool floor and the taxes owed, and
    /// returns the transaction's priority.
    fn check_tx_fee(
        &self,
        ctx: &Context,
        fee_tx: &dyn FeeTx,
        msgs: &[Msg],
        taxes: &Coins,
    ) -> AnteResult<i64> {
        let fee = fee_tx.fee();
        let gas = fee_tx.gas();
        let oracle_tx = is_oracle_tx(msgs);
        let oracle_allowance = (msgs.len() as u64).saturating_mul(self.oracle_msg_gas_allowance);

        // Mempool-only: the floor is local validator config, not consensus
        if ctx.is_check_tx() && !(oracle_tx && gas <= oracle_allowance) {
            let required_gas_fees = required_gas_fees(&ctx.min_gas_prices, gas)?;
            let required_fees = required_gas_fees.add(taxes)?;

            if !required_fees.is_zero() && !fee.is_any_gte(&required_fees) {
                return Err(AnteError::InsufficientFee {
                    got: fee.clone(),
                    required: required_fees,
                    gas: required_gas_fees,
                    tax: taxes.clone(),
                });
            }
        }

        if let (_, true) = fee.safe_sub(taxes) {
            return Err(AnteError::FeeBelowTax {
                got: fee.clone(),
                required: taxes.clone(),
            });
        }

        Ok(if oracle_tx {
            i64::MAX
        } else {
            tx_priority(fee, gas)
        })
    }

    fn check_deduct_fee(
        &self,
        ctx: &mut Context,
        fee_tx: &dyn FeeTx,
        msgs: &[Msg],
        taxes: &Coins,
        simulate: bool,
    ) -> AnteResult<()> {
        let fee_collector = self
            .account_keeper
            .module_address(&*ctx.storage, FEE_COLLECTOR_NAME)?
            .ok_or_else(|| {
                AnteError::Logic(format!(
                    "fee collector module account ({}) has not been set",
                    FEE_COLLECTOR_NAME
                ))
            })?;

        let fee = fee_tx.fee();
        let fee_payer = fee_tx.fee_payer();
        let mut deduct_fees_from = fee_payer.clone();

        if let Some(fee_granter) = fee_tx.fee_granter() {
            let feegrant_keeper = self
                .feegrant_keeper
                .as_ref()
                .ok_or_else(|| AnteError::InvalidRequest("fee grants are not enabled".to_string()))?;

            if *fee_granter != fee_payer {
                feegrant_keeper
                    .use_granted_fees(ctx.storage, fee_granter, &fee_payer, fee, msgs)
                    .map_err(|err| {
                        AnteError::Unauthorized(format!(
                            "{} does not allow to pay fees for {}: {}",
                            fee_granter, fee_payer, err
                        ))
                    })?;
            }

            deduct_fees_from = fee_granter.clone();
        }

        if self.account_keeper.account(&*ctx.storage, &deduct_fees_from)?.is_none() {
            return Err(AnteError::UnknownAddress(format!(
                "fee payer address: {} does not exist",
                deduct_fees_from
            )));
        }

        if !fee.is_zero() {
            self.deduct_fees(ctx.storage, &deduct_fees_from, fee)?;

            if !taxes.is_zero() && !simulate {
                self.burn_tax_split(ctx.storage, &fee_collector, taxes)?;

                if !ctx.is_recheck_tx() {
                    self.treasury_keeper.record_epoch_tax_proceeds(ctx.storage, taxes)?;
                }
            }
        }

        ctx.emit_event(
            Event::new(EVENT_TYPE_TX)
                .add_attribute(ATTRIBUTE_KEY_FEE, fee.to_string())
                .add_attribute(ATTRIBUTE_KEY_FEE_PAYER, deduct_fees_from.to_string()),
        );

        Ok(())
    }

    fn deduct_fees(&self, storage: &mut dyn Storage, payer: &Addr, fee: &Coins) -> AnteResult<()> {
        if fee.validate().is_err() {
            return Err(AnteError::InvalidFeeAmount(fee.clone()));
        }

        self.bank_keeper
            .send_coins_from_account_to_module(storage, payer, FEE_COLLECTOR_NAME, fee)
            .map_err(|err| AnteError::InsufficientFunds(err.to_string()))?;

        debug!(payer = %payer, fee = %fee, "deducted fee");
        Ok(())
    }

    /// Sends `round(rate * tax)` of each taxed coin from the fee collector
    /// to the community pool and the remainder to the burn account.
    fn burn_tax_split(
        &self,
        storage: &mut dyn Storage,
        fee_collector: &Addr,
        taxes: &Coins,
    ) -> AnteResult<()> {
        let rate = self.treasury_keeper.burn_split_rate(&*storage)?;
        let community = community_portion(taxes, rate)?;
        let burn = taxes.checked_sub(&community)?;

        if !community.is_zero() {
            self.distribution_keeper
                .fund_community_pool(storage, &community, fee_collector)
                .map_err(|err| AnteError::InsufficientFunds(err.to_string()))?;
        }

        if !burn.is_zero() {
            self.bank_keeper
                .send_coins_from_module_to_module(
                    storage,
                    FEE_COLLECTOR_NAME,
                    BURN_MODULE_NAME,
                    &burn,
                )
                .map_err(|err| AnteError::InsufficientFunds(err.to_string()))?;
        }

        debug!(rate = %rate, community = %community, burn = %burn, "split tax");
        Ok(())
    }
}

/// Part of `taxes` going to the community pool at burn-split `rate`. A
/// non-positive rate sends nothing; a rate above one sends everything.
pub fn community_portion(taxes: &Coins, rate: SignedDecimal) -> AnteResult<Coins> {
    if rate <= SignedDecimal::zero() {
        return Ok(Coins::new());
    }

    let atomics = u128::try_from(rate.atomics().i128())
        .map_err(|_| AnteError::Logic(format!("invalid burn split rate {}", rate)))?;
    let rate = Decimal::raw(atomics);

    // a product that overflows is above the coin amount and gets clamped
    Ok(taxes
        .iter()
        .map(|coin| {
            let amount = rate.checked_mul_uint_round(coin.amount).unwrap_or(coin.amount);
            Coin {
                denom: coin.denom.clone(),
                amount: amount.min(coin.amount),
            }
        })
        .collect())
}

/// Naive priority: the lowest per-denom gas price offered, saturating at
/// `i64::MAX`.
pub fn tx_priority(fee: &Coins, gas: u64) -> i64 {
    let mut priority = 0i64;
    for coin in fee {
        let price = match gas {
            0 => i64::MAX,
            gas => i64::try_from(coin.amount.u128() / u128::from(gas)).unwrap_or(i64::MAX),
        };
        if priority == 0 || price < priority {
            priority = price;
        }
    }
    priority
}

impl AnteDecorator for FeeDecorator {
    fn ante_handle<'a>(
        &self,
        mut ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        let fee_tx = fee_tx(tx)?;

        if !simulate && ctx.height() > 0 && fee_tx.gas() == 0 {
            return Err(AnteError::InvalidGasLimit("must provide positive gas".to_string()));
        }

        let msgs = tx.msgs();
        let taxes =
            TaxPolicy::load(self.treasury_keeper.as_ref(), &*ctx.storage, &self.bond_denom)?
                .compute_tax(msgs)?;

        let mut priority = 0;
        if !simulate {
            priority = self.check_tx_fee(&ctx, fee_tx, msgs, &taxes)?;
        }

        self.check_deduct_fee(&mut ctx, fee_tx, msgs, &taxes, simulate)?;

        next.run(ctx.with_priority(priority)?, tx, simulate)
    }
}
