use cosmwasm_std::{from_json, to_json_binary, Binary, Coin, StdError, StdResult};
use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::Coins;

pub const MSG_SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
pub const MSG_MULTI_SEND: &str = "/cosmos.bank.v1beta1.MsgMultiSend";
pub const MSG_SWAP_SEND: &str = "/terra.market.v1beta1.MsgSwapSend";
pub const MSG_INSTANTIATE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgInstantiateContract";
pub const MSG_INSTANTIATE_CONTRACT2: &str = "/cosmwasm.wasm.v1.MsgInstantiateContract2";
pub const MSG_EXECUTE_CONTRACT: &str = "/cosmwasm.wasm.v1.MsgExecuteContract";
pub const MSG_EXEC: &str = "/cosmos.authz.v1beta1.MsgExec";
pub const MSG_AGGREGATE_EXCHANGE_RATE_PREVOTE: &str =
    "/terra.oracle.v1beta1.MsgAggregateExchangeRatePrevote";
pub const MSG_AGGREGATE_EXCHANGE_RATE_VOTE: &str =
    "/terra.oracle.v1beta1.MsgAggregateExchangeRateVote";
pub const MSG_SUBMIT_PROPOSAL: &str = "/cosmos.gov.v1beta1.MsgSubmitProposal";

/// A type-tagged, encoded message as carried inside authz `MsgExec` or a
/// transaction's extension options.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct Any {
    pub type_url: String,
    pub value: Binary,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct Input {
    pub address: String,
    pub coins: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct Output {
    pub address: String,
    pub coins: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgMultiSend {
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgSwapSend {
    pub from_address: String,
    pub to_address: String,
    pub offer_coin: Coin,
    pub ask_denom: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgInstantiateContract {
    pub sender: String,
    pub admin: Option<String>,
    pub code_id: u64,
    pub label: String,
    pub msg: Binary,
    pub funds: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgInstantiateContract2 {
    pub sender: String,
    pub admin: Option<String>,
    pub code_id: u64,
    pub label: String,
    pub msg: Binary,
    pub funds: Vec<Coin>,
    pub salt: Binary,
    pub fix_msg: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgExecuteContract {
    pub sender: String,
    pub contract: String,
    pub msg: Binary,
    pub funds: Vec<Coin>,
}

/// authz `MsgExec`: the grantee executes `msgs` on behalf of their granters.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgExec {
    pub grantee: String,
    pub msgs: Vec<Any>,
}

impl MsgExec {
    /// Decodes the wrapped messages. Any envelope that fails to decode fails
    /// the whole list.
    pub fn messages(&self) -> StdResult<Vec<Msg>> {
        self.msgs.iter().map(Msg::from_any).collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgAggregateExchangeRatePrevote {
    pub hash: String,
    pub feeder: String,
    pub validator: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgAggregateExchangeRateVote {
    pub salt: String,
    pub exchange_rates: String,
    pub feeder: String,
    pub validator: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct MsgSubmitProposal {
    pub content: Option<Any>,
    pub initial_deposit: Vec<Coin>,
    pub proposer: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Msg {
    Send(MsgSend),
    MultiSend(MsgMultiSend),
    SwapSend(MsgSwapSend),
    InstantiateContract(MsgInstantiateContract),
    InstantiateContract2(MsgInstantiateContract2),
    ExecuteContract(MsgExecuteContract),
    Exec(MsgExec),
    AggregateExchangeRatePrevote(MsgAggregateExchangeRatePrevote),
    AggregateExchangeRateVote(MsgAggregateExchangeRateVote),
    SubmitProposal(MsgSubmitProposal),
    /// Any message kind the pipeline has no special handling for
    Other(Any),
}

fn decode<T: DeserializeOwned>(any: &Any) -> StdResult<T> {
    from_json(&any.value).map_err(|err| {
        StdError::parse_err(any.type_url.clone(), format!("cannot unpack message: {}", err))
    })
}

impl Msg {
    pub fn type_url(&self) -> &str {
        match self {
            Msg::Send(_) => MSG_SEND,
            Msg::MultiSend(_) => MSG_MULTI_SEND,
            Msg::SwapSend(_) => MSG_SWAP_SEND,
            Msg::InstantiateContract(_) => MSG_INSTANTIATE_CONTRACT,
            Msg::InstantiateContract2(_) => MSG_INSTANTIATE_CONTRACT2,
            Msg::ExecuteContract(_) => MSG_EXECUTE_CONTRACT,
            Msg::Exec(_) => MSG_EXEC,
            Msg::AggregateExchangeRatePrevote(_) => MSG_AGGREGATE_EXCHANGE_RATE_PREVOTE,
            Msg::AggregateExchangeRateVote(_) => MSG_AGGREGATE_EXCHANGE_RATE_VOTE,
            Msg::SubmitProposal(_) => MSG_SUBMIT_PROPOSAL,
            Msg::Other(any) => any.type_url.as_str(),
        }
    }

    /// Decodes an envelope by its type URL. Unknown type URLs are kept as
    /// [`Msg::Other`]; a known type URL with a malformed payload is an error.
    pub fn from_any(any: &Any) -> StdResult<Msg> {
        Ok(match any.type_url.as_str() {
            MSG_SEND => Msg::Send(decode(any)?),
            MSG_MULTI_SEND => Msg::MultiSend(decode(any)?),
            MSG_SWAP_SEND => Msg::SwapSend(decode(any)?),
            MSG_INSTANTIATE_CONTRACT => Msg::InstantiateContract(decode(any)?),
            MSG_INSTANTIATE_CONTRACT2 => Msg::InstantiateContract2(decode(any)?),
            MSG_EXECUTE_CONTRACT => Msg::ExecuteContract(decode(any)?),
            MSG_EXEC => Msg::Exec(decode(any)?),
            MSG_AGGREGATE_EXCHANGE_RATE_PREVOTE => Msg::AggregateExchangeRatePrevote(decode(any)?),
            MSG_AGGREGATE_EXCHANGE_RATE_VOTE => Msg::AggregateExchangeRateVote(decode(any)?),
            MSG_SUBMIT_PROPOSAL => Msg::SubmitProposal(decode(any)?),
            _ => Msg::Other(any.clone()),
        })
    }

    pub fn to_any(&self) -> StdResult<Any> {
        let value = match self {
            Msg::Send(msg) => to_json_binary(msg)?,
            Msg::MultiSend(msg) => to_json_binary(msg)?,
            Msg::SwapSend(msg) => to_json_binary(msg)?,
            Msg::InstantiateContract(msg) => to_json_binary(msg)?,
            Msg::InstantiateContract2(msg) => to_json_binary(msg)?,
            Msg::ExecuteContract(msg) => to_json_binary(msg)?,
            Msg::Exec(msg) => to_json_binary(msg)?,
            Msg::AggregateExchangeRatePrevote(msg) => to_json_binary(msg)?,
            Msg::AggregateExchangeRateVote(msg) => to_json_binary(msg)?,
            Msg::SubmitProposal(msg) => to_json_binary(msg)?,
            Msg::Other(any) => return Ok(any.clone()),
        };
        Ok(Any {
            type_url: self.type_url().to_string(),
            value,
        })
    }

    /// The account expected to sign this message.
    pub fn signer(&self) -> Option<&str> {
        match self {
            Msg::Send(msg) => Some(&msg.from_address),
            Msg::MultiSend(msg) => msg.inputs.first().map(|input| input.address.as_str()),
            Msg::SwapSend(msg) => Some(&msg.from_address),
            Msg::InstantiateContract(msg) => Some(&msg.sender),
            Msg::InstantiateContract2(msg) => Some(&msg.sender),
            Msg::ExecuteContract(msg) => Some(&msg.sender),
            Msg::Exec(msg) => Some(&msg.grantee),
            Msg::AggregateExchangeRatePrevote(msg) => Some(&msg.feeder),
            Msg::AggregateExchangeRateVote(msg) => Some(&msg.feeder),
            Msg::SubmitProposal(msg) => Some(&msg.proposer),
            Msg::Other(_) => None,
        }
    }

    pub fn is_oracle_msg(&self) -> bool {
        matches!(self, Msg::AggregateExchangeRatePrevote(_) | Msg::AggregateExchangeRateVote(_))
    }

    /// Stateless checks on the message's own fields.
    pub fn validate_basic(&self) -> StdResult<()> {
        match self {
            Msg::Send(msg) => {
                require_address("from_address", &msg.from_address)?;
                require_address("to_address", &msg.to_address)?;
                require_positive_coins(&msg.amount)
            },
            Msg::MultiSend(msg) => {
                if msg.inputs.is_empty() {
                    return Err(StdError::generic_err("no inputs to send transaction"));
                }
                if msg.outputs.is_empty() {
                    return Err(StdError::generic_err("no outputs to send transaction"));
                }
                let mut total_in = Coins::new();
                for input in &msg.inputs {
                    require_address("input address", &input.address)?;
                    require_positive_coins(&input.coins)?;
                    total_in = total_in.add(&Coins::try_from_coins(input.coins.iter().cloned())?)?;
                }
                let mut total_out = Coins::new();
                for output in &msg.outputs {
                    require_address("output address", &output.address)?;
                    require_positive_coins(&output.coins)?;
                    total_out = total_out.add(&Coins::try_from_coins(output.coins.iter().cloned())?)?;
                }
                if total_in != total_out {
                    return Err(StdError::generic_err("sum inputs != sum outputs"));
                }
                Ok(())
            },
            Msg::SwapSend(msg) => {
                require_address("from_address", &msg.from_address)?;
                require_address("to_address", &msg.to_address)?;
                require_positive_coins(std::slice::from_ref(&msg.offer_coin))?;
                crate::denom::validate_denom(&msg.ask_denom)?;
                if msg.offer_coin.denom == msg.ask_denom {
                    return Err(StdError::generic_err("offer denom equals ask denom"));
                }
                Ok(())
            },
            Msg::InstantiateContract(msg) => {
                require_address("sender", &msg.sender)?;
                validate_instantiate(msg.code_id, &msg.label, &msg.funds)
            },
            Msg::InstantiateContract2(msg) => {
                require_address("sender", &msg.sender)?;
                if msg.salt.is_empty() {
                    return Err(StdError::generic_err("salt is required"));
                }
                validate_instantiate(msg.code_id, &msg.label, &msg.funds)
            },
            Msg::ExecuteContract(msg) => {
                require_address("sender", &msg.sender)?;
                require_address("contract", &msg.contract)?;
                validate_funds(&msg.funds)
            },
            Msg::Exec(msg) => {
                require_address("grantee", &msg.grantee)?;
                if msg.msgs.is_empty() {
                    return Err(StdError::generic_err("messages cannot be empty"));
                }
                Ok(())
            },
            Msg::AggregateExchangeRatePrevote(msg) => {
                require_address("feeder", &msg.feeder)?;
                require_address("validator", &msg.validator)?;
                if msg.hash.is_empty() {
                    return Err(StdError::generic_err("prevote hash cannot be empty"));
                }
                Ok(())
            },
            Msg::AggregateExchangeRateVote(msg) => {
                require_address("feeder", &msg.feeder)?;
                require_address("validator", &msg.validator)?;
                if msg.exchange_rates.is_empty() {
                    return Err(StdError::generic_err("exchange rates cannot be empty"));
                }
                Ok(())
            },
            Msg::SubmitProposal(msg) => {
                require_address("proposer", &msg.proposer)?;
                validate_funds(&msg.initial_deposit)
            },
            Msg::Other(_) => Ok(()),
        }
    }
}

fn require_address(field: &str, addr: &str) -> StdResult<()> {
    if addr.trim().is_empty() {
        return Err(StdError::generic_err(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Coins must have valid denoms, no duplicates and no zero amounts.
fn validate_funds(coins: &[Coin]) -> StdResult<()> {
    let normalized = Coins::try_from_coins(coins.iter().cloned())?;
    if normalized.len() != coins.len() {
        return Err(StdError::generic_err(format!(
            "invalid coins: {}",
            coins.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",")
        )));
    }
    normalized.validate()
}

fn require_positive_coins(coins: &[Coin]) -> StdResult<()> {
    if coins.is_empty() {
        return Err(StdError::generic_err("coins cannot be empty"));
    }
    validate_funds(coins)
}

fn validate_instantiate(code_id: u64, label: &str, funds: &[Coin]) -> StdResult<()> {
    if code_id == 0 {
        return Err(StdError::generic_err("code id is required"));
    }
    if label.is_empty() {
        return Err(StdError::generic_err("label is required"));
    }
    validate_funds(funds)
}
