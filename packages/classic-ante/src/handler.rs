use std::sync::Arc;

use classic_types::tx::Tx;
use cosmwasm_std::{BlockInfo, Event, Storage};
use tracing::debug;

use crate::cache::CacheStorage;
use crate::config::AnteConfig;
use crate::context::{Context, ExecMode};
use crate::decorators::{
    AnteDecorator, ConsumeGasForTxSizeDecorator, CountTxDecorator, FeeDecorator,
    FeeSharePayoutDecorator, MinInitialDepositDecorator, Next, RejectExtensionOptionsDecorator,
    SetUpContextDecorator, SpammingPreventionDecorator, TxTimeoutHeightDecorator,
    ValidateBasicDecorator, ValidateMemoDecorator,
};
use crate::error::{AnteError, AnteResult};
use crate::keepers::{
    AccountKeeper, BankKeeper, DistributionKeeper, FeeShareKeeper, FeegrantKeeper, GovKeeper,
    OracleKeeper, TreasuryKeeper,
};

/// Everything needed to assemble the admission chain. Only the fee-grant
/// keeper is optional.
#[derive(Default)]
pub struct HandlerOptions {
    pub account_keeper: Option<Arc<dyn AccountKeeper>>,
    pub bank_keeper: Option<Arc<dyn BankKeeper>>,
    pub feegrant_keeper: Option<Arc<dyn FeegrantKeeper>>,
    pub treasury_keeper: Option<Arc<dyn TreasuryKeeper>>,
    pub oracle_keeper: Option<Arc<dyn OracleKeeper>>,
    pub gov_keeper: Option<Arc<dyn GovKeeper>>,
    pub distribution_keeper: Option<Arc<dyn DistributionKeeper>>,
    pub feeshare_keeper: Option<Arc<dyn FeeShareKeeper>>,
    pub config: AnteConfig,
    /// Host stages run after fee-share payout, e.g. signature verification
    pub extra_decorators: Vec<Box<dyn AnteDecorator>>,
}

impl HandlerOptions {
    /// Options with every keeper served by one object.
    pub fn with_keepers<K>(keepers: Arc<K>, config: AnteConfig) -> Self
    where
        K: AccountKeeper
            + BankKeeper
            + FeegrantKeeper
            + TreasuryKeeper
            + OracleKeeper
            + GovKeeper
            + DistributionKeeper
            + FeeShareKeeper
            + 'static,
    {
        Self {
            account_keeper: Some(keepers.clone()),
            bank_keeper: Some(keepers.clone()),
            feegrant_keeper: Some(keepers.clone()),
            treasury_keeper: Some(keepers.clone()),
            oracle_keeper: Some(keepers.clone()),
            gov_keeper: Some(keepers.clone()),
            distribution_keeper: Some(keepers.clone()),
            feeshare_keeper: Some(keepers),
            config,
            extra_decorators: vec![],
        }
    }
}

fn required<T: ?Sized>(keeper: Option<Arc<T>>, name: &str) -> AnteResult<Arc<T>> {
    keeper.ok_or_else(|| AnteError::Logic(format!("{} keeper is required for ante builder", name)))
}

/// Builds the admission chain in its canonical order.
pub fn new_ante_handler(options: HandlerOptions) -> AnteResult<AnteHandler> {
    let account_keeper = required(options.account_keeper, "account")?;
    let bank_keeper = required(options.bank_keeper, "bank")?;
    let treasury_keeper = required(options.treasury_keeper, "treasury")?;
    let oracle_keeper = required(options.oracle_keeper, "oracle")?;
    let gov_keeper = required(options.gov_keeper, "governance")?;
    let distribution_keeper = required(options.distribution_keeper, "distribution")?;
    let feeshare_keeper = required(options.feeshare_keeper, "fee share")?;

    let config = options.config;
    config.validate()?;

    let mut decorators: Vec<Box<dyn AnteDecorator>> = vec![
        Box::new(SetUpContextDecorator),
        Box::new(RejectExtensionOptionsDecorator),
        Box::new(SpammingPreventionDecorator::new(
            oracle_keeper,
            config.tx_gas_hard_limit,
            config.consensus_gas_hard_cap,
        )),
        Box::new(CountTxDecorator),
        Box::new(MinInitialDepositDecorator::new(
            gov_keeper,
            treasury_keeper.clone(),
            config.bond_denom.clone(),
        )),
        Box::new(FeeDecorator::new(
            account_keeper,
            bank_keeper.clone(),
            options.feegrant_keeper,
            treasury_keeper,
            distribution_keeper,
            config.bond_denom.clone(),
            config.oracle_msg_gas_allowance,
        )),
        Box::new(ValidateBasicDecorator),
        Box::new(TxTimeoutHeightDecorator),
        Box::new(ValidateMemoDecorator {
            max_memo_characters: config.max_memo_characters,
        }),
        Box::new(ConsumeGasForTxSizeDecorator {
            tx_size_cost_per_byte: config.tx_size_cost_per_byte,
        }),
        Box::new(FeeSharePayoutDecorator::new(bank_keeper, feeshare_keeper)),
    ];
    decorators.extend(options.extra_decorators);

    Ok(AnteHandler {
        decorators,
        config,
    })
}

/// What a successful admission attempt leaves behind.
#[derive(Clone, Debug, PartialEq)]
pub struct AnteOutcome {
    pub priority: i64,
    pub gas_wanted: Option<u64>,
    pub gas_used: u64,
    pub tx_counter: Option<u32>,
    pub events: Vec<Event>,
}

impl From<Context<'_>> for AnteOutcome {
    fn from(ctx: Context<'_>) -> Self {
        Self {
            priority: ctx.priority(),
            gas_wanted: ctx.gas_meter.limit(),
            gas_used: ctx.gas_meter.consumed(),
            tx_counter: ctx.tx_counter(),
            events: ctx.into_events(),
        }
    }
}

pub struct AnteHandler {
    decorators: Vec<Box<dyn AnteDecorator>>,
    config: AnteConfig,
}

impl AnteHandler {
    pub fn config(&self) -> &AnteConfig {
        &self.config
    }

    /// Runs the chain against a caller-provided context. Writes land
    /// directly in the context's storage, even if a later stage fails.
    pub fn ante_handle<'a>(
        &self,
        ctx: Context<'a>,
        tx: &dyn Tx,
        simulate: bool,
    ) -> AnteResult<Context<'a>> {
        Next::new(&self.decorators).run(ctx, tx, simulate)
    }

    /// Runs one admission attempt in a cache over `storage`. The attempt's
    /// writes are committed only if every stage succeeds, and never for a
    /// simulation.
    pub fn run_tx(
        &self,
        storage: &mut dyn Storage,
        block: &BlockInfo,
        mode: ExecMode,
        tx: &dyn Tx,
        simulate: bool,
    ) -> AnteResult<AnteOutcome> {
        let mut cache = CacheStorage::new(&*storage);

        let ctx = Context::new(&mut cache, block.clone(), mode)
            .with_min_gas_prices(self.config.min_gas_prices.clone());
        let result = self.ante_handle(ctx, tx, simulate).map(AnteOutcome::from);

        match result {
            Ok(outcome) => {
                if !simulate {
                    cache.into_writes().apply(storage);
                }
                Ok(outcome)
            },
            Err(err) => {
                debug!(
                    height = block.height,
                    mode = ?mode,
                    codespace = err.codespace(),
                    code = err.code(),
                    error = %err,
                    "transaction rejected"
                );
                Err(err)
            },
        }
    }
}
