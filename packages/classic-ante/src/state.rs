use classic_types::msgs::Msg;
use classic_types::Coins;
use cosmwasm_std::{
    Addr, Coin, Decimal, Empty, Order, SignedDecimal, StdError, StdResult, Storage, Uint128,
};
use cw_storage_plus::{Item, Map};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{
    default_burn_split_rate, BURN_MODULE_NAME, DISTRIBUTION_MODULE_NAME, FEE_COLLECTOR_NAME,
};
use crate::keepers::{
    AccountKeeper, BankKeeper, BaseAccount, DepositParams, DistributionKeeper, FeeShare,
    FeeShareKeeper, FeeShareParams, FeegrantKeeper, GovKeeper, OracleKeeper, TreasuryKeeper,
};

/// Fee allowance a granter extends to a grantee.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct BasicAllowance {
    /// Remaining coins the grantee may spend; unlimited when absent
    pub spend_limit: Option<Coins>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct TreasuryParams {
    pub tax_rate: Decimal,
    /// Cap for denoms without a cap of their own
    pub tax_cap: Uint128,
    pub burn_split_rate: SignedDecimal,
    pub min_initial_deposit_ratio: Decimal,
}

impl Default for TreasuryParams {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::permille(5),
            tax_cap: Uint128::new(1_000_000),
            burn_split_rate: default_burn_split_rate(),
            min_initial_deposit_ratio: Decimal::percent(10),
        }
    }
}

/// Self-contained implementation of every keeper the pipeline consumes,
/// backed by the attempt's storage.
pub struct State<'a> {
    pub accounts: Map<'a, &'a Addr, BaseAccount>,
    pub next_account_number: Item<'a, u64>,
    /// Module name to module account address
    pub module_accounts: Map<'a, &'a str, Addr>,
    pub balances: Map<'a, (&'a Addr, &'a str), Uint128>,
    pub tax_rate: Item<'a, Decimal>,
    pub default_tax_cap: Item<'a, Uint128>,
    pub tax_caps: Map<'a, &'a str, Uint128>,
    pub burn_split_rate: Item<'a, SignedDecimal>,
    pub min_initial_deposit_ratio: Item<'a, Decimal>,
    pub burn_tax_exemption_addresses: Map<'a, &'a str, Empty>,
    pub burn_tax_exemption_contracts: Map<'a, &'a str, Empty>,
    /// Taxes collected during the current epoch
    pub epoch_tax_proceeds: Item<'a, Coins>,
    pub community_pool: Item<'a, Coins>,
    /// Allowances keyed by (granter, grantee)
    pub fee_allowances: Map<'a, (&'a Addr, &'a Addr), BasicAllowance>,
    /// Validator to the feeder it delegated oracle voting to
    pub feeder_delegations: Map<'a, &'a str, String>,
    pub active_validators: Map<'a, &'a str, Empty>,
    pub deposit_params: Item<'a, DepositParams>,
    pub fee_share_params: Item<'a, FeeShareParams>,
    pub fee_shares: Map<'a, &'a str, FeeShare>,
}

impl Default for State<'static> {
    fn default() -> Self {
        Self {
            accounts: Map::new("accounts"),
            next_account_number: Item::new("next_account_number"),
            module_accounts: Map::new("module_accounts"),
            balances: Map::new("balances"),
            tax_rate: Item::new("tax_rate"),
            default_tax_cap: Item::new("default_tax_cap"),
            tax_caps: Map::new("tax_caps"),
            burn_split_rate: Item::new("burn_split_rate"),
            min_initial_deposit_ratio: Item::new("min_initial_deposit_ratio"),
            burn_tax_exemption_addresses: Map::new("burn_tax_exemption_addresses"),
            burn_tax_exemption_contracts: Map::new("burn_tax_exemption_contracts"),
            epoch_tax_proceeds: Item::new("epoch_tax_proceeds"),
            community_pool: Item::new("community_pool"),
            fee_allowances: Map::new("fee_allowances"),
            feeder_delegations: Map::new("feeder_delegations"),
            active_validators: Map::new("active_validators"),
            deposit_params: Item::new("deposit_params"),
            fee_share_params: Item::new("fee_share_params"),
            fee_shares: Map::new("fee_shares"),
        }
    }
}

/// Deterministic address of a module account.
pub fn module_account_address(name: &str) -> Addr {
    Addr::unchecked(format!("terra1module{}", name.replace('_', "")))
}

impl<'a> State<'a> {
    //----------------------------------------------------------------------------------------------
    // Setup
    //----------------------------------------------------------------------------------------------

    /// Registers the fee collector, burn and distribution module accounts.
    pub fn init_module_accounts(&self, storage: &mut dyn Storage) -> StdResult<()> {
        for name in [FEE_COLLECTOR_NAME, BURN_MODULE_NAME, DISTRIBUTION_MODULE_NAME] {
            let addr = module_account_address(name);
            self.module_accounts.save(storage, name, &addr)?;
            self.ensure_account(storage, &addr)?;
        }
        Ok(())
    }

    pub fn init_treasury(&self, storage: &mut dyn Storage, params: &TreasuryParams) -> StdResult<()> {
        self.tax_rate.save(storage, &params.tax_rate)?;
        self.default_tax_cap.save(storage, &params.tax_cap)?;
        self.burn_split_rate.save(storage, &params.burn_split_rate)?;
        self.min_initial_deposit_ratio.save(storage, &params.min_initial_deposit_ratio)?;
        self.epoch_tax_proceeds.save(storage, &Coins::new())?;
        self.community_pool.save(storage, &Coins::new())
    }

    /// Creates the account if it does not exist yet.
    pub fn ensure_account(&self, storage: &mut dyn Storage, addr: &Addr) -> StdResult<BaseAccount> {
        if let Some(account) = self.accounts.may_load(storage, addr)? {
            return Ok(account);
        }

        let account_number = self.next_account_number.may_load(storage)?.unwrap_or_default();
        let account = BaseAccount {
            address: addr.clone(),
            account_number,
            sequence: 0,
        };
        self.accounts.save(storage, addr, &account)?;
        self.next_account_number.save(storage, &(account_number + 1))?;
        Ok(account)
    }

    /// Credits `amount` to `addr` out of thin air. Genesis and tests only.
    pub fn mint(&self, storage: &mut dyn Storage, addr: &Addr, amount: &Coins) -> StdResult<()> {
        self.ensure_account(storage, addr)?;
        for coin in amount {
            self.balances.update(storage, (addr, coin.denom.as_str()), |balance| -> StdResult<_> {
                Ok(balance.unwrap_or_default().checked_add(coin.amount)?)
            })?;
        }
        Ok(())
    }

    pub fn grant_allowance(
        &self,
        storage: &mut dyn Storage,
        granter: &Addr,
        grantee: &Addr,
        allowance: &BasicAllowance,
    ) -> StdResult<()> {
        self.fee_allowances.save(storage, (granter, grantee), allowance)
    }

    //----------------------------------------------------------------------------------------------
    // Queries
    //----------------------------------------------------------------------------------------------

    pub fn balance(&self, storage: &dyn Storage, addr: &Addr, denom: &str) -> StdResult<Uint128> {
        Ok(self.balances.may_load(storage, (addr, denom))?.unwrap_or_default())
    }

    pub fn all_balances(&self, storage: &dyn Storage, addr: &Addr) -> StdResult<Coins> {
        self.balances
            .prefix(addr)
            .range(storage, None, None, Order::Ascending)
            .map(|item| {
                let (denom, amount) = item?;
                Ok(Coin {
                    denom,
                    amount,
                })
            })
            .collect::<StdResult<Vec<Coin>>>()
            .map(Coins::from)
    }

    pub fn module_balance(&self, storage: &dyn Storage, name: &str) -> StdResult<Coins> {
        let addr = self.load_module_address(storage, name)?;
        self.all_balances(storage, &addr)
    }

    //----------------------------------------------------------------------------------------------
    // Helpers
    //----------------------------------------------------------------------------------------------

    fn load_module_address(&self, storage: &dyn Storage, name: &str) -> StdResult<Addr> {
        self.module_accounts
            .may_load(storage, name)?
            .ok_or_else(|| StdError::generic_err(format!("module account {} does not exist", name)))
    }

    /// Moves `amount` between two accounts. Nothing is written unless the
    /// sender holds every coin.
    fn send_coins(
        &self,
        storage: &mut dyn Storage,
        from: &Addr,
        to: &Addr,
        amount: &Coins,
    ) -> StdResult<()> {
        let mut debits = Vec::with_capacity(amount.len());
        for coin in amount {
            let balance = self.balance(storage, from, &coin.denom)?;
            let left = balance.checked_sub(coin.amount).map_err(|_| {
                StdError::generic_err(format!(
                    "spendable balance {}{} is smaller than {}",
                    balance, coin.denom, coin
                ))
            })?;
            debits.push((coin, left));
        }

        self.ensure_account(storage, to)?;
        for (coin, left) in debits {
            if left.is_zero() {
                self.balances.remove(storage, (from, coin.denom.as_str()));
            } else {
                self.balances.save(storage, (from, coin.denom.as_str()), &left)?;
            }
            self.balances.update(storage, (to, coin.denom.as_str()), |balance| -> StdResult<_> {
                Ok(balance.unwrap_or_default().checked_add(coin.amount)?)
            })?;
        }
        Ok(())
    }
}

impl<'a> AccountKeeper for State<'a> {
    fn module_address(&self, storage: &dyn Storage, name: &str) -> StdResult<Option<Addr>> {
        self.module_accounts.may_load(storage, name)
    }

    fn account(&self, storage: &dyn Storage, addr: &Addr) -> StdResult<Option<BaseAccount>> {
        self.accounts.may_load(storage, addr)
    }
}

impl<'a> BankKeeper for State<'a> {
    fn send_coins_from_account_to_module(
        &self,
        storage: &mut dyn Storage,
        sender: &Addr,
        recipient_module: &str,
        amount: &Coins,
    ) -> StdResult<()> {
        let recipient = self.load_module_address(storage, recipient_module)?;
        self.send_coins(storage, sender, &recipient, amount)
    }

    fn send_coins_from_module_to_module(
        &self,
        storage: &mut dyn Storage,
        sender_module: &str,
        recipient_module: &str,
        amount: &Coins,
    ) -> StdResult<()> {
        let sender = self.load_module_address(storage, sender_module)?;
        let recipient = self.load_module_address(storage, recipient_module)?;
        self.send_coins(storage, &sender, &recipient, amount)
    }

    fn send_coins_from_module_to_account(
        &self,
        storage: &mut dyn Storage,
        sender_module: &str,
        recipient: &Addr,
        amount: &Coins,
    ) -> StdResult<()> {
        let sender = self.load_module_address(storage, sender_module)?;
        self.send_coins(storage, &sender, recipient, amount)
    }
}

impl<'a> TreasuryKeeper for State<'a> {
    fn tax_rate(&self, storage: &dyn Storage) -> StdResult<Decimal> {
        Ok(self.tax_rate.may_load(storage)?.unwrap_or_default())
    }

    fn tax_cap(&self, storage: &dyn Storage, denom: &str) -> StdResult<Uint128> {
        match self.tax_caps.may_load(storage, denom)? {
            Some(cap) => Ok(cap),
            None => Ok(self.default_tax_cap.may_load(storage)?.unwrap_or_default()),
        }
    }

    fn burn_split_rate(&self, storage: &dyn Storage) -> StdResult<SignedDecimal> {
        Ok(self.burn_split_rate.may_load(storage)?.unwrap_or_else(default_burn_split_rate))
    }

    fn min_initial_deposit_ratio(&self, storage: &dyn Storage) -> StdResult<Decimal> {
        Ok(self.min_initial_deposit_ratio.may_load(storage)?.unwrap_or_default())
    }

    fn has_burn_tax_exemption_address(
        &self,
        storage: &dyn Storage,
        addresses: &[&str],
    ) -> StdResult<bool> {
        Ok(addresses.iter().all(|addr| self.burn_tax_exemption_addresses.has(storage, *addr)))
    }

    fn has_burn_tax_exemption_contract(
        &self,
        storage: &dyn Storage,
        address: &str,
    ) -> StdResult<bool> {
        Ok(self.burn_tax_exemption_contracts.has(storage, address))
    }

    fn record_epoch_tax_proceeds(
        &self,
        storage: &mut dyn Storage,
        taxes: &Coins,
    ) -> StdResult<()> {
        let proceeds = self.epoch_tax_proceeds.may_load(storage)?.unwrap_or_default();
        self.epoch_tax_proceeds.save(storage, &proceeds.add(taxes)?)
    }
}

impl<'a> OracleKeeper for State<'a> {
    fn validate_feeder(
        &self,
        storage: &dyn Storage,
        feeder: &str,
        validator: &str,
    ) -> StdResult<()> {
        if feeder != validator {
            let delegate = self.feeder_delegations.may_load(storage, validator)?;
            if delegate.as_deref() != Some(feeder) {
                return Err(StdError::generic_err(format!(
                    "{} is not a valid feeder for {}: unauthorized voter",
                    feeder, validator
                )));
            }
        }

        if !self.active_validators.has(storage, validator) {
            return Err(StdError::generic_err(format!(
                "validator {} is not in the active set: unauthorized voter",
                validator
            )));
        }

        Ok(())
    }
}

impl<'a> FeegrantKeeper for State<'a> {
    fn use_granted_fees(
        &self,
        storage: &mut dyn Storage,
        granter: &Addr,
        grantee: &Addr,
        fee: &Coins,
        _msgs: &[Msg],
    ) -> StdResult<()> {
        let allowance = self
            .fee_allowances
            .may_load(storage, (granter, grantee))?
            .ok_or_else(|| StdError::generic_err("fee-grant not found"))?;

        let spend_limit = match allowance.spend_limit {
            None => return Ok(()),
            Some(spend_limit) => spend_limit,
        };

        let (left, went_negative) = spend_limit.safe_sub(fee);
        if went_negative {
            return Err(StdError::generic_err("basic allowance: fee limit exceeded"));
        }

        if left.is_zero() {
            self.fee_allowances.remove(storage, (granter, grantee));
            Ok(())
        } else {
            self.fee_allowances.save(
                storage,
                (granter, grantee),
                &BasicAllowance {
                    spend_limit: Some(left),
                },
            )
        }
    }
}

impl<'a> GovKeeper for State<'a> {
    fn deposit_params(&self, storage: &dyn Storage) -> StdResult<DepositParams> {
        Ok(self.deposit_params.may_load(storage)?.unwrap_or_default())
    }
}

impl<'a> DistributionKeeper for State<'a> {
    fn fund_community_pool(
        &self,
        storage: &mut dyn Storage,
        amount: &Coins,
        sender: &Addr,
    ) -> StdResult<()> {
        let distribution = self.load_module_address(storage, DISTRIBUTION_MODULE_NAME)?;
        self.send_coins(storage, sender, &distribution, amount)?;

        let pool = self.community_pool.may_load(storage)?.unwrap_or_default();
        self.community_pool.save(storage, &pool.add(amount)?)
    }
}

impl<'a> FeeShareKeeper for State<'a> {
    fn params(&self, storage: &dyn Storage) -> StdResult<FeeShareParams> {
        Ok(self.fee_share_params.may_load(storage)?.unwrap_or_default())
    }

    fn fee_share(&self, storage: &dyn Storage, contract: &str) -> StdResult<Option<FeeShare>> {
        self.fee_shares.may_load(storage, contract)
    }
}
