use std::sync::Arc;

use classic_types::msgs::Msg;
use classic_types::tx::StdTx;
use classic_types::Coins;
use cosmwasm_std::{coin, Addr, Coin, SignedDecimal, Uint128};

use super::helpers::{block, coins, send, vote, Suite, FEEDER, HEIGHT, SENDER};
use crate::config::AnteConfig;
use crate::constants::{
    BURN_MODULE_NAME, DISTRIBUTION_MODULE_NAME, EVENT_TYPE_TX, FEE_COLLECTOR_NAME,
};
use crate::context::{Context, ExecMode};
use crate::error::AnteError;
use crate::handler::HandlerOptions;
use crate::state::{BasicAllowance, State};

const GAS: u64 = 200_000;

fn send_tx(amount: Vec<Coin>, fee: Vec<Coin>) -> StdTx {
    StdTx::new(vec![Msg::Send(send(amount))], coins(fee), GAS)
}

fn with_min_gas_prices(prices: &str) -> Suite {
    Suite::with_config(AnteConfig::default().with_min_gas_prices(prices).unwrap())
}

#[test]
fn fee_covering_tax() {
    let mut suite = Suite::new();

    // a 1,000,000usdr send at the default 0.5% rate owes 5000usdr
    let tx = send_tx(vec![coin(1_000_000, "usdr")], vec![coin(5_000, "usdr")]);
    let outcome = suite.check(&tx).unwrap();
    assert_eq!(outcome.priority, 0);
    assert_eq!(outcome.gas_wanted, Some(GAS));
    assert_eq!(suite.balance(SENDER, "usdr"), Uint128::new(10_000_000_000 - 5_000));

    // the whole fee was tax; the default split sends 10% to the community pool
    assert!(suite.module_balance(FEE_COLLECTOR_NAME).is_zero());
    assert_eq!(suite.module_balance(DISTRIBUTION_MODULE_NAME), coins(vec![coin(500, "usdr")]));
    assert_eq!(suite.module_balance(BURN_MODULE_NAME), coins(vec![coin(4_500, "usdr")]));

    let event = &outcome.events[0];
    assert_eq!(event.ty, EVENT_TYPE_TX);
    assert_eq!(event.attributes[0].value, "5000usdr");
    assert_eq!(event.attributes[1].value, SENDER);
}

#[test]
fn fee_below_tax() {
    let mut suite = Suite::new();
    let tx = send_tx(vec![coin(1_000_000, "usdr")], vec![coin(4_999, "usdr")]);

    let err = suite.check(&tx).unwrap_err();
    assert!(matches!(err, AnteError::InsufficientFee { .. }));
    assert_eq!(err.code(), 13);

    // block execution skips the gas price floor but still wants the tax
    let err = suite.deliver(&tx).unwrap_err();
    assert!(matches!(err, AnteError::FeeBelowTax { .. }));
    assert_eq!(err.code(), 13);

    assert_eq!(suite.balance(SENDER, "usdr"), Uint128::new(10_000_000_000));
}

#[test]
fn enforcing_min_gas_prices() {
    let mut suite = with_min_gas_prices("0.15uusd");
    let amount = vec![coin(1_000_000, "usdr")];

    // 0.15 * 200,000 = 30000uusd for gas on top of 5000usdr tax
    let tx = send_tx(amount.clone(), vec![coin(29_999, "uusd"), coin(4_999, "usdr")]);
    let err = suite.check(&tx).unwrap_err();
    assert_eq!(
        err.to_string(),
        "insufficient fees; got: \"4999usdr,29999uusd\", required: \"5000usdr,30000uusd\" = \"30000uusd\"(gas) + \"5000usdr\"(stability): insufficient fee"
    );

    let tx = send_tx(amount.clone(), vec![coin(30_000, "uusd"), coin(5_000, "usdr")]);
    let outcome = suite.check(&tx).unwrap();
    assert_eq!(outcome.priority, 0);

    // meeting the gas price alone still leaves the tax unpaid
    let tx = send_tx(amount.clone(), vec![coin(30_000, "uusd")]);
    let err = suite.check(&tx).unwrap_err();
    assert!(matches!(err, AnteError::FeeBelowTax { .. }));

    // any one denom meeting its requirement passes the floor
    let tx = send_tx(amount, vec![coin(5_000, "usdr")]);
    suite.check(&tx).unwrap();
}

#[test]
fn min_gas_prices_outside_check() {
    let mut suite = with_min_gas_prices("0.15uluna");
    let tx = send_tx(vec![coin(1_000, "uluna")], vec![]);

    let err = suite.check(&tx).unwrap_err();
    assert!(matches!(err, AnteError::InsufficientFee { .. }));

    suite.run(ExecMode::ReCheck, &tx, false).unwrap_err();
    suite.deliver(&tx).unwrap();
    suite.run(ExecMode::Check, &tx, true).unwrap();
}

#[test]
fn prioritizing_by_gas_price() {
    let mut suite = Suite::new();

    let fee = vec![coin(400_000, "uluna"), coin(2_000_000, "uusd")];
    let tx = send_tx(vec![coin(1_000, "uluna")], fee);
    let outcome = suite.check(&tx).unwrap();
    assert_eq!(outcome.priority, 2);

    // simulations are never prioritized
    let outcome = suite.run(ExecMode::Check, &tx, true).unwrap();
    assert_eq!(outcome.priority, 0);
    assert_eq!(outcome.gas_wanted, None);
}

#[test]
fn splitting_tax_between_burn_and_community() {
    let mut suite = Suite::new();
    suite.state.burn_split_rate.save(&mut suite.storage, &SignedDecimal::percent(50)).unwrap();

    // 0.5% of 1,000,200 is 5001; half of it rounds to the even 2500
    let tx = send_tx(vec![coin(1_000_200, "usdr")], vec![coin(6_001, "usdr")]);
    suite.deliver(&tx).unwrap();

    assert_eq!(suite.module_balance(FEE_COLLECTOR_NAME), coins(vec![coin(1_000, "usdr")]));
    assert_eq!(suite.module_balance(DISTRIBUTION_MODULE_NAME), coins(vec![coin(2_500, "usdr")]));
    assert_eq!(suite.module_balance(BURN_MODULE_NAME), coins(vec![coin(2_501, "usdr")]));

    let pool = suite.state.community_pool.load(&suite.storage).unwrap();
    assert_eq!(pool, coins(vec![coin(2_500, "usdr")]));
    let proceeds = suite.state.epoch_tax_proceeds.load(&suite.storage).unwrap();
    assert_eq!(proceeds, coins(vec![coin(5_001, "usdr")]));
}

#[test]
fn burning_everything_with_negative_split() {
    let mut suite = Suite::new();
    let rate = SignedDecimal::percent(-10);
    suite.state.burn_split_rate.save(&mut suite.storage, &rate).unwrap();

    let tx = send_tx(vec![coin(1_000_000, "usdr")], vec![coin(5_000, "usdr")]);
    suite.deliver(&tx).unwrap();

    assert!(suite.module_balance(DISTRIBUTION_MODULE_NAME).is_zero());
    assert_eq!(suite.module_balance(BURN_MODULE_NAME), coins(vec![coin(5_000, "usdr")]));
}

#[test]
fn recording_tax_proceeds() {
    let mut suite = Suite::new();
    let tx = send_tx(vec![coin(1_000_000, "usdr")], vec![coin(5_000, "usdr")]);

    // re-check moves the tax but leaves the epoch record alone
    suite.run(ExecMode::ReCheck, &tx, false).unwrap();
    assert!(suite.state.epoch_tax_proceeds.load(&suite.storage).unwrap().is_zero());
    assert_eq!(suite.module_balance(BURN_MODULE_NAME), coins(vec![coin(4_500, "usdr")]));

    suite.deliver(&tx).unwrap();
    let proceeds = suite.state.epoch_tax_proceeds.load(&suite.storage).unwrap();
    assert_eq!(proceeds, coins(vec![coin(5_000, "usdr")]));
}

#[test]
fn simulating_fees() {
    let mut suite = Suite::new();

    // no sufficiency check and no tax split, but the fee still moves
    let tx = send_tx(vec![coin(1_000_000, "usdr")], vec![coin(1_000, "usdr")]);
    let ctx = Context::new(&mut suite.storage, block(HEIGHT), ExecMode::Deliver);
    suite.handler.ante_handle(ctx, &tx, true).unwrap();

    assert_eq!(suite.module_balance(FEE_COLLECTOR_NAME), coins(vec![coin(1_000, "usdr")]));
    assert!(suite.module_balance(BURN_MODULE_NAME).is_zero());
    assert!(suite.state.epoch_tax_proceeds.load(&suite.storage).unwrap().is_zero());
}

#[test]
fn admitting_oracle_votes_for_free() {
    let mut suite = with_min_gas_prices("0.15uluna");
    let tx = StdTx::new(vec![Msg::AggregateExchangeRateVote(vote())], Coins::new(), 100_000);

    let outcome = suite.check(&tx).unwrap();
    assert_eq!(outcome.priority, i64::MAX);
    assert_eq!(outcome.events[0].attributes[1].value, FEEDER);

    let outcome = suite.deliver(&tx).unwrap();
    assert_eq!(outcome.priority, i64::MAX);
}

#[test]
fn oracle_votes_over_allowance() {
    let mut suite = with_min_gas_prices("0.15uluna");
    let tx = StdTx::new(vec![Msg::AggregateExchangeRateVote(vote())], Coins::new(), 100_001);

    let err = suite.check(&tx).unwrap_err();
    match err {
        AnteError::InsufficientFee {
            required,
            ..
        } => assert_eq!(required, coins(vec![coin(15_001, "uluna")])),
        err => panic!("unexpected error: {}", err),
    }
}

#[test]
fn requiring_positive_gas() {
    let mut suite = Suite::new();
    let tx = StdTx::new(vec![Msg::Send(send(vec![coin(1_000, "uluna")]))], Coins::new(), 0);

    let err = suite.deliver(&tx).unwrap_err();
    assert!(matches!(err, AnteError::InvalidGasLimit(_)));
    assert_eq!(err.code(), 41);

    // genesis transactions carry no gas
    suite.run_at(0, ExecMode::Deliver, &tx, false).unwrap();
}

#[test]
fn paying_with_fee_grant() {
    let mut suite = Suite::new();
    let granter = Addr::unchecked("terra1granter");
    let grantee = Addr::unchecked(SENDER);
    suite
        .state
        .mint(&mut suite.storage, &granter, &coins(vec![coin(1_000_000, "uluna")]))
        .unwrap();

    let tx = send_tx(vec![coin(1_000, "uluna")], vec![coin(4_000, "uluna")])
        .with_granter(granter.clone());

    // no allowance yet
    let err = suite.deliver(&tx).unwrap_err();
    assert!(matches!(err, AnteError::Unauthorized(_)));
    assert_eq!(err.code(), 4);

    let allowance = BasicAllowance {
        spend_limit: Some(coins(vec![coin(10_000, "uluna")])),
    };
    suite.state.grant_allowance(&mut suite.storage, &granter, &grantee, &allowance).unwrap();

    let outcome = suite.deliver(&tx).unwrap();
    assert_eq!(outcome.events[0].attributes[1].value, "terra1granter");
    assert_eq!(suite.balance("terra1granter", "uluna"), Uint128::new(996_000));
    assert_eq!(suite.balance(SENDER, "uluna"), Uint128::new(10_000_000_000));

    let left = suite.state.fee_allowances.load(&suite.storage, (&granter, &grantee)).unwrap();
    assert_eq!(left.spend_limit, Some(coins(vec![coin(6_000, "uluna")])));
}

#[test]
fn paying_own_fee_as_granter() {
    let mut suite = Suite::new();
    let tx = send_tx(vec![coin(1_000, "uluna")], vec![coin(4_000, "uluna")])
        .with_granter(Addr::unchecked(SENDER));

    suite.deliver(&tx).unwrap();
    assert_eq!(suite.balance(SENDER, "uluna"), Uint128::new(10_000_000_000 - 4_000));
}

#[test]
fn fee_grants_disabled() {
    let mut options = HandlerOptions::with_keepers(Arc::new(State::default()), AnteConfig::default());
    options.feegrant_keeper = None;
    let mut suite = Suite::with_options(options);

    let tx = send_tx(vec![coin(1_000, "uluna")], vec![coin(4_000, "uluna")])
        .with_granter(Addr::unchecked("terra1granter"));
    let err = suite.deliver(&tx).unwrap_err();
    assert_eq!(err.to_string(), "fee grants are not enabled: invalid request");

    // fees without a granter are unaffected
    let tx = send_tx(vec![coin(1_000, "uluna")], vec![coin(4_000, "uluna")]);
    suite.deliver(&tx).unwrap();
}

#[test]
fn unknown_fee_payer() {
    let mut suite = Suite::new();
    let tx = send_tx(vec![coin(1_000, "uluna")], vec![coin(4_000, "uluna")])
        .with_payer(Addr::unchecked("terra1nobody"));

    let err = suite.deliver(&tx).unwrap_err();
    assert_eq!(err.to_string(), "fee payer address: terra1nobody does not exist: unknown address");
    assert_eq!(err.code(), 9);
}

#[test]
fn fee_payer_without_funds() {
    let mut suite = Suite::new();

    // the feeder account exists but holds nothing
    let tx = send_tx(vec![coin(1_000, "uluna")], vec![coin(4_000, "uluna")])
        .with_payer(Addr::unchecked(FEEDER));
    let err = suite.deliver(&tx).unwrap_err();
    assert!(matches!(err, AnteError::InsufficientFunds(_)));
    assert_eq!(err.code(), 5);
}

#[test]
fn invalid_fee_denom() {
    let mut suite = Suite::new();
    let tx = send_tx(vec![coin(1_000, "uluna")], vec![coin(4_000, "1uluna")]);

    let err = suite.deliver(&tx).unwrap_err();
    assert!(matches!(err, AnteError::InvalidFeeAmount(_)));
}

#[test]
fn zero_fee_without_floor() {
    let mut suite = Suite::new();
    let tx = send_tx(vec![coin(1_000, "uluna")], vec![]);

    let outcome = suite.check(&tx).unwrap();
    assert_eq!(outcome.priority, 0);
    assert_eq!(outcome.events[0].attributes[0].value, "");
    assert!(suite.module_balance(FEE_COLLECTOR_NAME).is_zero());
}
