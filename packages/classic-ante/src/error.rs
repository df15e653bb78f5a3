use classic_types::Coins;
use cosmwasm_std::StdError;
use thiserror::Error;

pub type AnteResult<T> = Result<T, AnteError>;

pub const SDK_CODESPACE: &str = "sdk";
pub const FEESHARE_CODESPACE: &str = "feeshare";

/// Every way a transaction can be refused admission.
///
/// Each variant maps to a registered (codespace, code) pair so that hosts
/// can surface the same ABCI result codes as the reference chain.
#[derive(Error, Debug)]
pub enum AnteError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("tx parse error: {0}")]
    TxDecode(String),

    #[error("unable to unpack message: {0}")]
    UnpackAny(String),

    #[error("invalid gas limit: {0}")]
    InvalidGasLimit(String),

    #[error("Tx cannot spend more than {limit} gas: invalid request")]
    TxGasLimitExceeded { limit: u64, gas: u64 },

    #[error("out of gas: {0}")]
    OutOfGas(String),

    #[error(
        "insufficient fees; got: \"{got}\", required: \"{required}\" = \"{gas}\"(gas) + \"{tax}\"(stability): insufficient fee"
    )]
    InsufficientFee { got: Coins, required: Coins, gas: Coins, tax: Coins },

    #[error("insufficient fees; got: {got} required: {required}: insufficient fee")]
    FeeBelowTax { got: Coins, required: Coins },

    #[error("{0}: invalid coins")]
    InvalidCoins(String),

    #[error("invalid fee amount: {0}: insufficient fee")]
    InvalidFeeAmount(Coins),

    #[error("{0}: insufficient funds")]
    InsufficientFunds(String),

    #[error("{0}: unknown address")]
    UnknownAddress(String),

    #[error("{0}: unauthorized")]
    Unauthorized(String),

    #[error("{0}: invalid request")]
    InvalidRequest(String),

    #[error("unknown extension options")]
    UnknownExtensionOptions,

    #[error("maximum number of characters is {max} but received {got} characters: memo too large")]
    MemoTooLarge { max: u64, got: u64 },

    #[error("block height: {height}, timeout height: {timeout}: tx timeout height")]
    TxTimeoutHeight { height: u64, timeout: u64 },

    #[error("failed to pay fees to contract developer: {0}")]
    FeeSharePayment(String),

    #[error("{0}: internal logic error")]
    Logic(String),
}

impl AnteError {
    pub fn codespace(&self) -> &'static str {
        match self {
            AnteError::FeeSharePayment(_) => FEESHARE_CODESPACE,
            _ => SDK_CODESPACE,
        }
    }

    /// ABCI response code within [`AnteError::codespace`].
    pub fn code(&self) -> u32 {
        match self {
            AnteError::TxDecode(_) => 2,
            AnteError::Unauthorized(_) => 4,
            AnteError::InsufficientFunds(_) => 5,
            AnteError::UnknownAddress(_) => 9,
            AnteError::InvalidCoins(_) => 10,
            AnteError::OutOfGas(_) => 11,
            AnteError::MemoTooLarge { .. } => 12,
            AnteError::InsufficientFee { .. }
            | AnteError::FeeBelowTax { .. }
            | AnteError::InvalidFeeAmount(_) => 13,
            AnteError::TxGasLimitExceeded { .. } | AnteError::InvalidRequest(_) => 18,
            AnteError::TxTimeoutHeight { .. } => 30,
            AnteError::UnknownExtensionOptions => 31,
            AnteError::UnpackAny(_) => 34,
            AnteError::Std(_) | AnteError::Logic(_) => 35,
            AnteError::InvalidGasLimit(_) => 41,
            AnteError::FeeSharePayment(_) => 1,
        }
    }
}
