use classic_types::msgs::{
    Any, Input, Msg, MsgExec, MsgInstantiateContract, MsgInstantiateContract2, MsgMultiSend,
    MsgSubmitProposal, MsgSwapSend, Output, MSG_SEND,
};
use cosmwasm_std::testing::MockStorage;
use cosmwasm_std::{coin, Binary, Decimal, Empty, Uint128};

use super::helpers::{coins, execute, prevote, send, vote, CONTRACT, RECEIVER, SENDER};
use crate::error::AnteError;
use crate::state::{State, TreasuryParams};
use crate::tax::{compute_tax, is_oracle_tx, TaxPolicy};

fn setup() -> (MockStorage, State<'static>) {
    let mut storage = MockStorage::new();
    let state = State::default();
    state.init_module_accounts(&mut storage).unwrap();
    state.init_treasury(&mut storage, &TreasuryParams::default()).unwrap();
    (storage, state)
}

fn multi_send(inputs: Vec<(&str, u128)>, outputs: Vec<(&str, u128)>) -> Msg {
    Msg::MultiSend(MsgMultiSend {
        inputs: inputs
            .into_iter()
            .map(|(address, amount)| Input {
                address: address.to_string(),
                coins: vec![coin(amount, "usdr")],
            })
            .collect(),
        outputs: outputs
            .into_iter()
            .map(|(address, amount)| Output {
                address: address.to_string(),
                coins: vec![coin(amount, "usdr")],
            })
            .collect(),
    })
}

#[test]
fn taxing_sends() {
    let (mut storage, state) = setup();

    let msgs = vec![Msg::Send(send(vec![coin(1_000_000, "usdr")]))];
    let taxes = compute_tax(&state, &storage, "uluna", &msgs).unwrap();
    assert_eq!(taxes, coins(vec![coin(5_000, "usdr")]));

    // amounts too small to owe anything
    let msgs = vec![Msg::Send(send(vec![coin(199, "usdr")]))];
    assert!(compute_tax(&state, &storage, "uluna", &msgs).unwrap().is_zero());

    // per-denom cap
    state.tax_caps.save(&mut storage, "usdr", &Uint128::new(100)).unwrap();
    let msgs = vec![Msg::Send(send(vec![coin(1_000_000, "usdr"), coin(1_000_000, "uusd")]))];
    let taxes = compute_tax(&state, &storage, "uluna", &msgs).unwrap();
    assert_eq!(taxes, coins(vec![coin(100, "usdr"), coin(5_000, "uusd")]));
}

#[test]
fn skipping_untaxed_denoms() {
    let (storage, state) = setup();

    let msgs = vec![Msg::Send(send(vec![
        coin(1_000_000, "uluna"),
        coin(1_000_000, "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"),
    ]))];
    assert!(compute_tax(&state, &storage, "uluna", &msgs).unwrap().is_zero());

    // the bond denom is whatever the chain stakes
    let taxes = compute_tax(&state, &storage, "ustake", &msgs).unwrap();
    assert_eq!(taxes, coins(vec![coin(5_000, "uluna")]));
}

#[test]
fn zero_tax_rate() {
    let (mut storage, state) = setup();
    state.tax_rate.save(&mut storage, &Decimal::zero()).unwrap();

    let msgs = vec![
        Msg::Send(send(vec![coin(1_000_000, "usdr")])),
        Msg::ExecuteContract(execute(CONTRACT, vec![coin(1_000_000, "uusd")])),
    ];
    let policy = TaxPolicy::load(&state, &storage, "uluna").unwrap();
    assert_eq!(policy.tax_rate(), Decimal::zero());
    assert!(policy.compute_tax(&msgs).unwrap().is_zero());
}

#[test]
fn exempting_sends() {
    let (mut storage, state) = setup();
    let msgs = vec![Msg::Send(send(vec![coin(1_000_000, "usdr")]))];

    // one exempt party is not enough
    state.burn_tax_exemption_addresses.save(&mut storage, SENDER, &Empty {}).unwrap();
    let taxes = compute_tax(&state, &storage, "uluna", &msgs).unwrap();
    assert_eq!(taxes, coins(vec![coin(5_000, "usdr")]));

    state.burn_tax_exemption_addresses.remove(&mut storage, SENDER);
    state.burn_tax_exemption_addresses.save(&mut storage, RECEIVER, &Empty {}).unwrap();
    let taxes = compute_tax(&state, &storage, "uluna", &msgs).unwrap();
    assert_eq!(taxes, coins(vec![coin(5_000, "usdr")]));

    state.burn_tax_exemption_addresses.save(&mut storage, SENDER, &Empty {}).unwrap();
    assert!(compute_tax(&state, &storage, "uluna", &msgs).unwrap().is_zero());
}

#[test]
fn exempting_multi_sends() {
    let (mut storage, state) = setup();
    let msg = multi_send(
        vec![(SENDER, 600_000), ("terra1other", 400_000)],
        vec![(RECEIVER, 1_000_000)],
    );

    // inputs are taxed, not outputs
    let taxes = compute_tax(&state, &storage, "uluna", &[msg.clone()]).unwrap();
    assert_eq!(taxes, coins(vec![coin(5_000, "usdr")]));

    state.burn_tax_exemption_addresses.save(&mut storage, SENDER, &Empty {}).unwrap();
    state.burn_tax_exemption_addresses.save(&mut storage, RECEIVER, &Empty {}).unwrap();
    let taxes = compute_tax(&state, &storage, "uluna", &[msg.clone()]).unwrap();
    assert_eq!(taxes, coins(vec![coin(5_000, "usdr")]));

    state.burn_tax_exemption_addresses.save(&mut storage, "terra1other", &Empty {}).unwrap();
    assert!(compute_tax(&state, &storage, "uluna", &[msg]).unwrap().is_zero());
}

#[test]
fn taxing_swaps_and_instantiations() {
    let (storage, state) = setup();

    let msgs = vec![
        Msg::SwapSend(MsgSwapSend {
            from_address: SENDER.to_string(),
            to_address: RECEIVER.to_string(),
            offer_coin: coin(1_000_000, "uusd"),
            ask_denom: "usdr".to_string(),
        }),
        Msg::InstantiateContract(MsgInstantiateContract {
            sender: SENDER.to_string(),
            admin: None,
            code_id: 1,
            label: "vault".to_string(),
            msg: Binary::from(b"{}".to_vec()),
            funds: vec![coin(2_000_000, "usdr")],
        }),
        Msg::InstantiateContract2(MsgInstantiateContract2 {
            sender: SENDER.to_string(),
            admin: None,
            code_id: 1,
            label: "vault".to_string(),
            msg: Binary::from(b"{}".to_vec()),
            funds: vec![coin(400_000, "usdr")],
            salt: Binary::from(b"salt".to_vec()),
            fix_msg: false,
        }),
    ];

    let taxes = compute_tax(&state, &storage, "uluna", &msgs).unwrap();
    assert_eq!(taxes, coins(vec![coin(12_000, "usdr"), coin(5_000, "uusd")]));
}

#[test]
fn exempting_contracts() {
    let (mut storage, state) = setup();
    let msgs = vec![Msg::ExecuteContract(execute(CONTRACT, vec![coin(2_000_000, "usdr")]))];

    let taxes = compute_tax(&state, &storage, "uluna", &msgs).unwrap();
    assert_eq!(taxes, coins(vec![coin(10_000, "usdr")]));

    state.burn_tax_exemption_contracts.save(&mut storage, CONTRACT, &Empty {}).unwrap();
    assert!(compute_tax(&state, &storage, "uluna", &msgs).unwrap().is_zero());
}

#[test]
fn taxing_authz_exec() {
    let (storage, state) = setup();
    let inner = Msg::Send(send(vec![coin(1_000_000, "usdr")]));

    let exec = Msg::Exec(MsgExec {
        grantee: "terra1grantee".to_string(),
        msgs: vec![inner.to_any().unwrap()],
    });
    let taxes = compute_tax(&state, &storage, "uluna", &[exec.clone()]).unwrap();
    assert_eq!(taxes, compute_tax(&state, &storage, "uluna", &[inner]).unwrap());

    // nested exec is unwrapped as well
    let nested = Msg::Exec(MsgExec {
        grantee: "terra1grantee".to_string(),
        msgs: vec![exec.to_any().unwrap()],
    });
    let taxes = compute_tax(&state, &storage, "uluna", &[nested]).unwrap();
    assert_eq!(taxes, coins(vec![coin(5_000, "usdr")]));

    let malformed = Msg::Exec(MsgExec {
        grantee: "terra1grantee".to_string(),
        msgs: vec![Any {
            type_url: MSG_SEND.to_string(),
            value: Binary::from(b"not json".to_vec()),
        }],
    });
    let err = compute_tax(&state, &storage, "uluna", &[malformed]).unwrap_err();
    assert!(matches!(err, AnteError::UnpackAny(_)));
    assert_eq!(err.code(), 34);
}

#[test]
fn untaxed_messages() {
    let (storage, state) = setup();

    let msgs = vec![
        Msg::AggregateExchangeRatePrevote(prevote()),
        Msg::AggregateExchangeRateVote(vote()),
        Msg::SubmitProposal(MsgSubmitProposal {
            content: None,
            initial_deposit: vec![coin(1_000_000, "usdr")],
            proposer: SENDER.to_string(),
        }),
        Msg::Other(Any {
            type_url: "/cosmos.staking.v1beta1.MsgDelegate".to_string(),
            value: Binary::from(b"{}".to_vec()),
        }),
    ];
    assert!(compute_tax(&state, &storage, "uluna", &msgs).unwrap().is_zero());
}

#[test]
fn detecting_oracle_txs() {
    let oracle =
        vec![Msg::AggregateExchangeRatePrevote(prevote()), Msg::AggregateExchangeRateVote(vote())];
    assert!(is_oracle_tx(&oracle));

    let mixed = vec![
        Msg::AggregateExchangeRateVote(vote()),
        Msg::Send(send(vec![coin(1, "uluna")])),
    ];
    assert!(!is_oracle_tx(&mixed));
}
