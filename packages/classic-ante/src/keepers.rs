//! Interfaces of the chain modules the admission pipeline reads from and
//! moves funds through. Every call receives the storage of the current
//! admission attempt so that writes are scoped to it.

use classic_types::msgs::Msg;
use classic_types::Coins;
use cosmwasm_std::{Addr, Decimal, SignedDecimal, StdResult, Storage, Uint128};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct BaseAccount {
    pub address: Addr,
    pub account_number: u64,
    pub sequence: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct DepositParams {
    pub min_deposit: Coins,
    /// Maximum deposit period, in seconds
    pub max_deposit_period: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct FeeShareParams {
    pub enable_fee_share: bool,
    /// Fraction of the fee paid out to contract developers
    pub developer_shares: Decimal,
    /// Denoms eligible for payout; empty means all of them
    pub allowed_denoms: Vec<String>,
}

impl Default for FeeShareParams {
    fn default() -> Self {
        Self {
            enable_fee_share: true,
            developer_shares: Decimal::percent(50),
            allowed_denoms: vec![],
        }
    }
}

/// A contract's opt-in to fee sharing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct FeeShare {
    pub contract_address: String,
    pub deployer_address: String,
    pub withdrawer_address: String,
}

pub trait AccountKeeper: Send + Sync {
    fn module_address(&self, storage: &dyn Storage, name: &str) -> StdResult<Option<Addr>>;

    fn account(&self, storage: &dyn Storage, addr: &Addr) -> StdResult<Option<BaseAccount>>;
}

pub trait BankKeeper: Send + Sync {
    fn send_coins_from_account_to_module(
        &self,
        storage: &mut dyn Storage,
        sender: &Addr,
        recipient_module: &str,
        amount: &Coins,
    ) -> StdResult<()>;

    fn send_coins_from_module_to_module(
        &self,
        storage: &mut dyn Storage,
        sender_module: &str,
        recipient_module: &str,
        amount: &Coins,
    ) -> StdResult<()>;

    fn send_coins_from_module_to_account(
        &self,
        storage: &mut dyn Storage,
        sender_module: &str,
        recipient: &Addr,
        amount: &Coins,
    ) -> StdResult<()>;
}

pub trait TreasuryKeeper: Send + Sync {
    fn tax_rate(&self, storage: &dyn Storage) -> StdResult<Decimal>;

    fn tax_cap(&self, storage: &dyn Storage, denom: &str) -> StdResult<Uint128>;

    /// Can be negative or above one if governance set it so.
    fn burn_split_rate(&self, storage: &dyn Storage) -> StdResult<SignedDecimal>;

    fn min_initial_deposit_ratio(&self, storage: &dyn Storage) -> StdResult<Decimal>;

    /// True only when every one of `addresses` is on the exemption list.
    fn has_burn_tax_exemption_address(
        &self,
        storage: &dyn Storage,
        addresses: &[&str],
    ) -> StdResult<bool>;

    fn has_burn_tax_exemption_contract(&self, storage: &dyn Storage, address: &str)
        -> StdResult<bool>;

    fn record_epoch_tax_proceeds(&self, storage: &mut dyn Storage, taxes: &Coins)
        -> StdResult<()>;
}

pub trait OracleKeeper: Send + Sync {
    /// Errors unless `feeder` may submit votes on behalf of `validator`.
    fn validate_feeder(&self, storage: &dyn Storage, feeder: &str, validator: &str)
        -> StdResult<()>;
}

pub trait FeegrantKeeper: Send + Sync {
    fn use_granted_fees(
        &self,
        storage: &mut dyn Storage,
        granter: &Addr,
        grantee: &Addr,
        fee: &Coins,
        msgs: &[Msg],
    ) -> StdResult<()>;
}

pub trait GovKeeper: Send + Sync {
    fn deposit_params(&self, storage: &dyn Storage) -> StdResult<DepositParams>;
}

pub trait DistributionKeeper: Send + Sync {
    fn fund_community_pool(
        &self,
        storage: &mut dyn Storage,
        amount: &Coins,
        sender: &Addr,
    ) -> StdResult<()>;
}

pub trait FeeShareKeeper: Send + Sync {
    fn params(&self, storage: &dyn Storage) -> StdResult<FeeShareParams>;

    fn fee_share(&self, storage: &dyn Storage, contract: &str) -> StdResult<Option<FeeShare>>;
}
