pub mod cache;
pub mod config;
pub mod constants;
pub mod context;
pub mod decorators;
pub mod error;
pub mod handler;
pub mod keepers;
pub mod state;
pub mod tax;

#[cfg(test)]
mod testing;

pub use crate::config::AnteConfig;
pub use crate::context::{Context, ExecMode, GasMeter};
pub use crate::error::{AnteError, AnteResult};
pub use crate::handler::{new_ante_handler, AnteHandler, AnteOutcome, HandlerOptions};
pub use crate::tax::{compute_tax, TaxPolicy};
