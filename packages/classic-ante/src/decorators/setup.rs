use classic_types::tx::Tx;

use super::{fee_tx, AnteDecorator, Next};
use crate::context::{Context, GasMeter};
use crate::error::AnteResult;

/// Outermost stage: installs a gas meter limited to the transaction's gas
/// limit. Simulations and genesis run unmetered.
pub struct SetUpContextDecorator;

impl AnteDecorator for SetUpContextDecorator {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        let gas = fee_tx(tx)?.gas();

        let meter = if simulate || ctx.height() == 0 {
            GasMeter::infinite()
        } else {
            GasMeter::new(gas)
        };

        next.run(ctx.with_gas_meter(meter), tx, simulate)
    }
}
