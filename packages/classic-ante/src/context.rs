use classic_types::gas::GasPrice;
use cosmwasm_std::{BlockInfo, Event, Storage};

use crate::error::{AnteError, AnteResult};

/// Which kind of admission attempt a context belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecMode {
    /// First mempool admission of a transaction
    Check,
    /// Mempool re-validation after a block was committed
    ReCheck,
    /// Execution inside a block being committed
    Deliver,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GasMeter {
    limit: Option<u64>,
    consumed: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            consumed: 0,
        }
    }

    pub fn infinite() -> Self {
        Self::default()
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn consume(&mut self, amount: u64, descriptor: &str) -> AnteResult<()> {
        let consumed = self
            .consumed
            .checked_add(amount)
            .ok_or_else(|| AnteError::OutOfGas(format!("gas overflow: {}", descriptor)))?;
        self.consumed = consumed;

        match self.limit {
            Some(limit) if consumed > limit => Err(AnteError::OutOfGas(format!(
                "{}; gasWanted: {}, gasUsed: {}",
                descriptor, limit, consumed
            ))),
            _ => Ok(()),
        }
    }
}

/// State of one admission attempt, threaded by value through the decorator
/// chain. Created fresh for every attempt and never persisted.
pub struct Context<'a> {
    pub storage: &'a mut dyn Storage,
    pub block: BlockInfo,
    pub mode: ExecMode,
    pub min_gas_prices: Vec<GasPrice>,
    pub gas_meter: GasMeter,
    priority: Option<i64>,
    tx_counter: Option<u32>,
    events: Vec<Event>,
}

impl<'a> Context<'a> {
    pub fn new(storage: &'a mut dyn Storage, block: BlockInfo, mode: ExecMode) -> Self {
        Self {
            storage,
            block,
            mode,
            min_gas_prices: vec![],
            gas_meter: GasMeter::infinite(),
            priority: None,
            tx_counter: None,
            events: vec![],
        }
    }

    pub fn with_min_gas_prices(mut self, min_gas_prices: Vec<GasPrice>) -> Self {
        self.min_gas_prices = min_gas_prices;
        self
    }

    pub fn with_gas_meter(mut self, gas_meter: GasMeter) -> Self {
        self.gas_meter = gas_meter;
        self
    }

    /// Sets the mempool priority. It may only be set once per attempt.
    pub fn with_priority(mut self, priority: i64) -> AnteResult<Self> {
        if self.priority.is_some() {
            return Err(AnteError::Logic("tx priority has already been set".to_string()));
        }
        self.priority = Some(priority);
        Ok(self)
    }

    pub fn with_tx_counter(mut self, counter: u32) -> Self {
        self.tx_counter = Some(counter);
        self
    }

    pub fn height(&self) -> u64 {
        self.block.height
    }

    pub fn is_check_tx(&self) -> bool {
        matches!(self.mode, ExecMode::Check | ExecMode::ReCheck)
    }

    pub fn is_recheck_tx(&self) -> bool {
        self.mode == ExecMode::ReCheck
    }

    pub fn priority(&self) -> i64 {
        self.priority.unwrap_or_default()
    }

    pub fn tx_counter(&self) -> Option<u32> {
        self.tx_counter
    }

    pub fn emit_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
