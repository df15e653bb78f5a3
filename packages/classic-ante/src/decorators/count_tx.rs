use classic_types::tx::Tx;
use cosmwasm_std::Storage;
use cw_storage_plus::Item;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{AnteDecorator, Next};
use crate::context::Context;
use crate::error::AnteResult;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct TxCounter {
    pub height: u64,
    pub counter: u32,
}

const TX_COUNTER: Item<TxCounter> = Item::new("tx_counter");

/// Hands every transaction its index within the current block.
pub struct CountTxDecorator;

impl CountTxDecorator {
    pub fn current(storage: &dyn Storage) -> AnteResult<Option<TxCounter>> {
        Ok(TX_COUNTER.may_load(storage)?)
    }
}

impl AnteDecorator for CountTxDecorator {
    fn ante_handle<'a>(
        &self,
        mut ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        let height = ctx.height();
        let counter = match TX_COUNTER.may_load(&*ctx.storage)? {
            Some(last) if last.height == height => last.counter.saturating_add(1),
            _ => 0,
        };

        if !simulate {
            TX_COUNTER.save(
                ctx.storage,
                &TxCounter {
                    height,
                    counter,
                },
            )?;
        }

        next.run(ctx.with_tx_counter(counter), tx, simulate)
    }
}
