mod basic;
mod count_tx;
mod deposit;
mod fee;
mod feeshare;
mod setup;
mod spam;

pub use basic::{
    ConsumeGasForTxSizeDecorator, RejectExtensionOptionsDecorator, TxTimeoutHeightDecorator,
    ValidateBasicDecorator, ValidateMemoDecorator,
};
pub use count_tx::{CountTxDecorator, TxCounter};
pub use deposit::MinInitialDepositDecorator;
pub use fee::{community_portion, tx_priority, FeeDecorator};
pub use feeshare::{fee_pay_logic, FeeSharePayoutDecorator};
pub use setup::SetUpContextDecorator;
pub use spam::SpammingPreventionDecorator;

use classic_types::tx::{FeeTx, Tx};

use crate::context::Context;
use crate::error::{AnteError, AnteResult};

/// One stage of the admission chain. A decorator either fails, which ends
/// the chain, or hands the (possibly updated) context to `next`.
pub trait AnteDecorator: Send + Sync {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>>;
}

/// The stages after the current one.
#[derive(Clone, Copy)]
pub struct Next<'n> {
    decorators: &'n [Box<dyn AnteDecorator>],
}

impl<'n> Next<'n> {
    pub fn new(decorators: &'n [Box<dyn AnteDecorator>]) -> Self {
        Self {
            decorators,
        }
    }

    pub fn run<'a>(self, ctx: Context<'a>, tx: &dyn Tx, simulate: bool) -> AnteResult<Context<'a>> {
        match self.decorators.split_first() {
            Some((decorator, rest)) => decorator.ante_handle(ctx, tx, simulate, Next::new(rest)),
            None => Ok(ctx),
        }
    }
}

pub(crate) fn fee_tx(tx: &dyn Tx) -> AnteResult<&dyn FeeTx> {
    tx.as_fee_tx().ok_or_else(|| AnteError::TxDecode("Tx must be a FeeTx".to_string()))
}
