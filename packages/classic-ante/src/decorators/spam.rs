use std::collections::HashMap;
use std::sync::Arc;

use classic_types::msgs::Msg;
use classic_types::tx::Tx;
use cosmwasm_std::Storage;
use parking_lot::Mutex;

use super::{fee_tx, AnteDecorator, Next};
use crate::context::Context;
use crate::error::{AnteError, AnteResult};
use crate::keepers::OracleKeeper;

/// Last height at which each validator got an oracle message admitted.
#[derive(Debug, Default)]
struct Submissions {
    prevotes: HashMap<String, u64>,
    votes: HashMap<String, u64>,
}

/// Caps the gas a transaction may ask for and keeps validators from
/// flooding the mempool with oracle messages.
pub struct SpammingPreventionDecorator {
    oracle_keeper: Arc<dyn OracleKeeper>,
    tx_gas_hard_limit: u64,
    consensus_gas_hard_cap: Option<u64>,
    submissions: Mutex<Submissions>,
}

impl SpammingPreventionDecorator {
    pub fn new(
        oracle_keeper: Arc<dyn OracleKeeper>,
        tx_gas_hard_limit: u64,
        consensus_gas_hard_cap: Option<u64>,
    ) -> Self {
        Self {
            oracle_keeper,
            tx_gas_hard_limit,
            consensus_gas_hard_cap,
            submissions: Mutex::new(Submissions::default()),
        }
    }

    /// Every oracle message must come from an authorized feeder, and each
    /// validator gets one prevote and one vote per height. Checking stops at
    /// the first non-oracle message.
    fn check_oracle_spamming(
        &self,
        storage: &dyn Storage,
        height: u64,
        msgs: &[Msg],
    ) -> AnteResult<()> {
        let mut submissions = self.submissions.lock();

        for msg in msgs {
            let (feeder, validator, seen, kind) = match msg {
                Msg::AggregateExchangeRatePrevote(msg) => {
                    (&msg.feeder, &msg.validator, &mut submissions.prevotes, "prevote")
                },
                Msg::AggregateExchangeRateVote(msg) => {
                    (&msg.feeder, &msg.validator, &mut submissions.votes, "vote")
                },
                _ => break,
            };

            self.oracle_keeper
                .validate_feeder(storage, feeder, validator)
                .map_err(|err| AnteError::Unauthorized(err.to_string()))?;

            if seen.get(validator.as_str()) == Some(&height) {
                return Err(AnteError::InvalidRequest(format!(
                    "the validator has already been submitted {} at the current height",
                    kind
                )));
            }
            seen.insert(validator.clone(), height);
        }

        Ok(())
    }
}

impl AnteDecorator for SpammingPreventionDecorator {
    fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context<'a>> {
        let gas = fee_tx(tx)?.gas();

        if ctx.is_check_tx() {
            if gas > self.tx_gas_hard_limit {
                return Err(AnteError::TxGasLimitExceeded {
                    limit: self.tx_gas_hard_limit,
                    gas,
                });
            }

            if !simulate {
                self.check_oracle_spamming(&*ctx.storage, ctx.height(), tx.msgs())?;
            }
        }

        if let Some(cap) = self.consensus_gas_hard_cap {
            if gas > cap {
                return Err(AnteError::OutOfGas("Tx exceed max gas usage".to_string()));
            }
        }

        next.run(ctx, tx, simulate)
    }
}
