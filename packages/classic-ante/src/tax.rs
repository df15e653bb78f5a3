use classic_types::denom::is_ibc_denom;
use classic_types::msgs::Msg;
use classic_types::{Coins, DecimalCheckedOps};
use cosmwasm_std::{Coin, Decimal, StdResult, Storage};

use crate::error::{AnteError, AnteResult};
use crate::keepers::TreasuryKeeper;

/// Read-only view of the treasury policy for one admission attempt. The tax
/// rate is read once when the view is loaded.
pub struct TaxPolicy<'a> {
    treasury: &'a dyn TreasuryKeeper,
    storage: &'a dyn Storage,
    bond_denom: &'a str,
    tax_rate: Decimal,
}

impl<'a> TaxPolicy<'a> {
    pub fn load(
        treasury: &'a dyn TreasuryKeeper,
        storage: &'a dyn Storage,
        bond_denom: &'a str,
    ) -> StdResult<Self> {
        Ok(Self {
            treasury,
            storage,
            bond_denom,
            tax_rate: treasury.tax_rate(storage)?,
        })
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    /// Stability tax owed by `msgs`. Message kinds without a tax rule owe
    /// nothing; an authz exec whose inner messages cannot be decoded fails.
    pub fn compute_tax(&self, msgs: &[Msg]) -> AnteResult<Coins> {
        let mut taxes = Coins::new();

        for msg in msgs {
            let due = match msg {
                Msg::Send(msg) => {
                    let parties = [msg.from_address.as_str(), msg.to_address.as_str()];
                    if self.treasury.has_burn_tax_exemption_address(self.storage, &parties)? {
                        Coins::new()
                    } else {
                        self.tax_on(&msg.amount)?
                    }
                },
                Msg::MultiSend(msg) => {
                    let addresses = msg
                        .inputs
                        .iter()
                        .map(|input| input.address.as_str())
                        .chain(msg.outputs.iter().map(|output| output.address.as_str()));

                    let mut total = 0usize;
                    let mut tainted = 0usize;
                    for addr in addresses {
                        total += 1;
                        if self.treasury.has_burn_tax_exemption_address(self.storage, &[addr])? {
                            tainted += 1;
                        }
                    }

                    // outputs sum to inputs, so only inputs are taxed
                    let mut due = Coins::new();
                    if tainted < total {
                        for input in &msg.inputs {
                            due = due.add(&self.tax_on(&input.coins)?)?;
                        }
                    }
                    due
                },
                Msg::SwapSend(msg) => self.tax_on(std::slice::from_ref(&msg.offer_coin))?,
                Msg::InstantiateContract(msg) => self.tax_on(&msg.funds)?,
                Msg::InstantiateContract2(msg) => self.tax_on(&msg.funds)?,
                Msg::ExecuteContract(msg) => {
                    if self.treasury.has_burn_tax_exemption_contract(self.storage, &msg.contract)? {
                        Coins::new()
                    } else {
                        self.tax_on(&msg.funds)?
                    }
                },
                Msg::Exec(msg) => {
                    let inner = msg.messages().map_err(|err| AnteError::UnpackAny(err.to_string()))?;
                    self.compute_tax(&inner)?
                },
                Msg::AggregateExchangeRatePrevote(_)
                | Msg::AggregateExchangeRateVote(_)
                | Msg::SubmitProposal(_)
                | Msg::Other(_) => Coins::new(),
            };
            taxes = taxes.add(&due)?;
        }

        Ok(taxes)
    }

    /// Applies the per-coin rule: `min(floor(amount * rate), cap)`, skipping
    /// the bond denom and IBC vouchers.
    pub fn tax_on(&self, principal: &[Coin]) -> StdResult<Coins> {
        if self.tax_rate.is_zero() {
            return Ok(Coins::new());
        }

        let mut taxes = Coins::new();
        for coin in principal {
            if coin.denom == self.bond_denom || is_ibc_denom(&coin.denom) {
                continue;
            }

            let due = self.tax_rate.checked_mul_uint(coin.amount)?;
            let cap = self.treasury.tax_cap(self.storage, &coin.denom)?;
            let due = due.min(cap);
            if due.is_zero() {
                continue;
            }

            taxes.add_coin(Coin {
                denom: coin.denom.clone(),
                amount: due,
            })?;
        }

        Ok(taxes)
    }
}

/// One-shot tax computation over `msgs`.
pub fn compute_tax(
    treasury: &dyn TreasuryKeeper,
    storage: &dyn Storage,
    bond_denom: &str,
    msgs: &[Msg],
) -> AnteResult<Coins> {
    TaxPolicy::load(treasury, storage, bond_denom)?.compute_tax(msgs)
}

/// True when every message is an oracle prevote or vote.
pub fn is_oracle_tx(msgs: &[Msg]) -> bool {
    msgs.iter().all(Msg::is_oracle_msg)
}
