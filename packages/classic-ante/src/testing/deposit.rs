use std::sync::Arc;

use classic_types::msgs::{Msg, MsgSubmitProposal};
use classic_types::tx::StdTx;
use classic_types::Coins;
use cosmwasm_std::{coin, Coin, Decimal};

use super::helpers::{coins, send, Suite, SENDER};
use crate::context::ExecMode;
use crate::decorators::MinInitialDepositDecorator;
use crate::error::AnteError;
use crate::keepers::DepositParams;
use crate::state::State;

fn setup() -> Suite {
    let mut suite = Suite::new();
    let params = DepositParams {
        min_deposit: coins(vec![coin(10_000_000, "uluna")]),
        max_deposit_period: 172_800,
    };
    suite.state.deposit_params.save(&mut suite.storage, &params).unwrap();
    suite
}

fn proposal_tx(initial_deposit: Vec<Coin>) -> StdTx {
    let msg = Msg::SubmitProposal(MsgSubmitProposal {
        content: None,
        initial_deposit,
        proposer: SENDER.to_string(),
    });
    StdTx::new(vec![msg], Coins::new(), 200_000)
}

#[test]
fn computing_required_deposit() {
    let suite = setup();
    let state = Arc::new(State::default());
    let decorator = MinInitialDepositDecorator::new(state.clone(), state, "uluna");

    // 10% of the 10,000,000uluna minimum
    let required = decorator.required_initial_deposit(&suite.storage).unwrap();
    assert_eq!(required, coin(1_000_000, "uluna"));
}

#[test]
fn requiring_initial_deposit() {
    let mut suite = setup();

    let err = suite.deliver(&proposal_tx(vec![coin(999_999, "uluna")])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "not enough initial deposit provided. Expected \"1000000uluna\"; got \"999999uluna\": unauthorized"
    );
    assert_eq!(err.code(), 4);

    // other denoms do not count towards it
    let err = suite.check(&proposal_tx(vec![coin(5_000_000, "uusd")])).unwrap_err();
    assert!(matches!(err, AnteError::Unauthorized(_)));

    suite.deliver(&proposal_tx(vec![coin(1_000_000, "uluna")])).unwrap();
    suite.check(&proposal_tx(vec![coin(2_000_000, "uluna"), coin(1, "uusd")])).unwrap();
}

#[test]
fn checking_every_proposal() {
    let mut suite = setup();

    let proposal = |amount: u128| {
        Msg::SubmitProposal(MsgSubmitProposal {
            content: None,
            initial_deposit: vec![coin(amount, "uluna")],
            proposer: SENDER.to_string(),
        })
    };
    let msgs = vec![
        proposal(1_000_000),
        Msg::Send(send(vec![coin(1_000, "uluna")])),
        proposal(10),
    ];
    let err = suite.deliver(&StdTx::new(msgs, Coins::new(), 200_000)).unwrap_err();
    assert!(err.to_string().contains("got \"10uluna\""));
}

#[test]
fn skipping_deposit_check() {
    let mut suite = setup();

    // simulations only estimate gas
    suite.run(ExecMode::Deliver, &proposal_tx(vec![]), true).unwrap();

    // nothing is required without a ratio
    suite.state.min_initial_deposit_ratio.save(&mut suite.storage, &Decimal::zero()).unwrap();
    suite.deliver(&proposal_tx(vec![])).unwrap();
}

#[test]
fn requiring_bond_denom_for_foreign_min_deposit() {
    let mut suite = Suite::new();
    let params = DepositParams {
        min_deposit: coins(vec![coin(10_000_000, "uusd")]),
        max_deposit_period: 172_800,
    };
    suite.state.deposit_params.save(&mut suite.storage, &params).unwrap();

    // the ratio applies to the first min deposit amount, paid in uluna
    let err = suite.deliver(&proposal_tx(vec![])).unwrap_err();
    assert!(err.to_string().contains("Expected \"1000000uluna\""));

    let err = suite.deliver(&proposal_tx(vec![coin(10_000_000, "uusd")])).unwrap_err();
    assert!(matches!(err, AnteError::Unauthorized(_)));

    suite.deliver(&proposal_tx(vec![coin(1_000_000, "uluna")])).unwrap();
}

#[test]
fn nothing_required_without_min_deposit() {
    let mut suite = Suite::new();
    let params = DepositParams {
        min_deposit: Coins::new(),
        max_deposit_period: 172_800,
    };
    suite.state.deposit_params.save(&mut suite.storage, &params).unwrap();

    suite.deliver(&proposal_tx(vec![])).unwrap();
}

#[test]
fn overflowing_initial_deposit() {
    let mut suite = setup();

    let tx = proposal_tx(vec![coin(u128::MAX, "uluna"), coin(1, "uluna")]);
    let err = suite.check(&tx).unwrap_err();
    assert!(matches!(err, AnteError::InvalidCoins(_)));
    assert_eq!(err.code(), 10);
}
