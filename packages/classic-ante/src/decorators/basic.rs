use classic_types::tx::Tx;

use super::{fee_tx, AnteDecorator, Next};
use crate::context::Context;
use crate::error::{AnteError, AnteResult};

pub struct RejectExtensionOptionsDecorator;

impl AnteDecorator for RejectExtensionOptionsDecorator {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        if !tx.extension_options().is_empty() {
            return Err(AnteError::UnknownExtensionOptions);
        }
        next.run(ctx, tx, simulate)
    }
}

/// Stateless checks. Skipped on re-check since the transaction passed them
/// when first admitted.
pub struct ValidateBasicDecorator;

impl AnteDecorator for ValidateBasicDecorator {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        if ctx.is_recheck_tx() {
            return next.run(ctx, tx, simulate);
        }

        let fee = fee_tx(tx)?.fee();
        fee.validate().map_err(|err| AnteError::InvalidCoins(format!("{}: {}", fee, err)))?;
        tx.validate_basic().map_err(|err| AnteError::InvalidRequest(err.to_string()))?;

        next.run(ctx, tx, simulate)
    }
}

pub struct TxTimeoutHeightDecorator;

impl AnteDecorator for TxTimeoutHeightDecorator {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        let memo_tx = tx
            .as_memo_tx()
            .ok_or_else(|| AnteError::TxDecode("Tx must be a TxWithTimeoutHeight".to_string()))?;

        let timeout = memo_tx.timeout_height();
        if timeout > 0 && ctx.height() > timeout {
            return Err(AnteError::TxTimeoutHeight {
                height: ctx.height(),
                timeout,
            });
        }

        next.run(ctx, tx, simulate)
    }
}

pub struct ValidateMemoDecorator {
    pub max_memo_characters: u64,
}

impl AnteDecorator for ValidateMemoDecorator {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        let memo_tx = tx
            .as_memo_tx()
            .ok_or_else(|| AnteError::TxDecode("invalid transaction type".to_string()))?;

        let length = memo_tx.memo().chars().count() as u64;
        if length > self.max_memo_characters {
            return Err(AnteError::MemoTooLarge {
                max: self.max_memo_characters,
                got: length,
            });
        }

        next.run(ctx, tx, simulate)
    }
}

/// Charges gas in proportion to the encoded transaction size.
pub struct ConsumeGasForTxSizeDecorator {
    pub tx_size_cost_per_byte: u64,
}

impl AnteDecorator for ConsumeGasForTxSizeDecorator {
    fn ante_handle<'a>(
        &self,
        mut ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        let size = tx.size_bytes() as u64;
        ctx.gas_meter.consume(size.saturating_mul(self.tx_size_cost_per_byte), "txSize")?;

        next.run(ctx, tx, simulate)
    }
}
