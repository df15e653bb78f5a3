use cosmwasm_std::{to_json_vec, Addr, Binary, StdError, StdResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::msgs::{Any, Msg};
use crate::Coins;

/// Gas limits above this are never accepted.
pub const MAX_GAS_WANTED: u64 = (1 << 63) - 1;

/// A decoded transaction as seen by the admission pipeline.
///
/// Capabilities some decorators need (fees, memo) are exposed through the
/// `as_*` accessors; a transaction that cannot provide one is rejected by
/// the decorator that asks for it.
pub trait Tx {
    fn msgs(&self) -> &[Msg];

    fn validate_basic(&self) -> StdResult<()>;

    /// Encoded length, used for size-proportional gas accounting.
    fn size_bytes(&self) -> usize;

    fn extension_options(&self) -> &[Any] {
        &[]
    }

    fn as_fee_tx(&self) -> Option<&dyn FeeTx> {
        None
    }

    fn as_memo_tx(&self) -> Option<&dyn TxWithMemo> {
        None
    }
}

pub trait FeeTx {
    fn fee(&self) -> &Coins;
    fn gas(&self) -> u64;
    /// Explicit fee payer, or the signer of the first message.
    fn fee_payer(&self) -> Addr;
    fn fee_granter(&self) -> Option<&Addr>;
}

pub trait TxWithMemo {
    fn memo(&self) -> &str;
    fn timeout_height(&self) -> u64;
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct Fee {
    pub amount: Coins,
    pub gas_limit: u64,
    pub payer: Option<Addr>,
    pub granter: Option<Addr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct TxBody {
    pub messages: Vec<Msg>,
    pub memo: String,
    pub timeout_height: u64,
    pub extension_options: Vec<Any>,
    pub non_critical_extension_options: Vec<Any>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct StdTx {
    pub body: TxBody,
    pub fee: Fee,
    pub signatures: Vec<Binary>,
}

impl StdTx {
    pub fn new(messages: Vec<Msg>, amount: Coins, gas_limit: u64) -> Self {
        Self {
            body: TxBody {
                messages,
                ..TxBody::default()
            },
            fee: Fee {
                amount,
                gas_limit,
                ..Fee::default()
            },
            signatures: vec![],
        }
    }

    pub fn with_payer(mut self, payer: Addr) -> Self {
        self.fee.payer = Some(payer);
        self
    }

    pub fn with_granter(mut self, granter: Addr) -> Self {
        self.fee.granter = Some(granter);
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.body.memo = memo.into();
        self
    }

    pub fn with_timeout_height(mut self, height: u64) -> Self {
        self.body.timeout_height = height;
        self
    }
}

impl Tx for StdTx {
    fn msgs(&self) -> &[Msg] {
        &self.body.messages
    }

    fn validate_basic(&self) -> StdResult<()> {
        if self.body.messages.is_empty() {
            return Err(StdError::generic_err("must contain at least one message"));
        }
        if self.fee.gas_limit > MAX_GAS_WANTED {
            return Err(StdError::generic_err(format!(
                "invalid gas supplied; {} > {}",
                self.fee.gas_limit, MAX_GAS_WANTED
            )));
        }
        self.fee.amount.validate()?;
        self.body.messages.iter().try_for_each(Msg::validate_basic)
    }

    fn size_bytes(&self) -> usize {
        to_json_vec(self).map(|bytes| bytes.len()).unwrap_or_default()
    }

    fn extension_options(&self) -> &[Any] {
        &self.body.extension_options
    }

    fn as_fee_tx(&self) -> Option<&dyn FeeTx> {
        Some(self)
    }

    fn as_memo_tx(&self) -> Option<&dyn TxWithMemo> {
        Some(self)
    }
}

impl FeeTx for StdTx {
    fn fee(&self) -> &Coins {
        &self.fee.amount
    }

    fn gas(&self) -> u64 {
        self.fee.gas_limit
    }

    fn fee_payer(&self) -> Addr {
        match &self.fee.payer {
            Some(payer) => payer.clone(),
            None => Addr::unchecked(
                self.body.messages.first().and_then(Msg::signer).unwrap_or_default(),
            ),
        }
    }

    fn fee_granter(&self) -> Option<&Addr> {
        self.fee.granter.as_ref()
    }
}

impl TxWithMemo for StdTx {
    fn memo(&self) -> &str {
        &self.body.memo
    }

    fn timeout_height(&self) -> u64 {
        self.body.timeout_height
    }
}
