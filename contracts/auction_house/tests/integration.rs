use auction_house::contract::{execute, instantiate, query};
use auction_house::msg::{
    Cw721HookMsg, ExecuteMsg, InstantiateMsg, PendingReturnsResponse, QueryMsg,
};
use auction_house::ContractError;
use cosmwasm_std::{coins, to_binary, Addr, Uint128};
use cw721::Cw721ReceiveMsg;
use cw_multi_test::{App, ContractWrapper, Executor};

const DENOM: &str = "uatom";

fn mock_app() -> App {
    App::new(|router, _api, storage| {
        for bidder in ["alice", "bob"] {
            router
                .bank
                .init_balance(storage, &Addr::unchecked(bidder), coins(1_000, DENOM))
                .unwrap();
        }
    })
}

fn setup() -> (App, Addr) {
    let mut app = mock_app();
    let code_id = app.store_code(Box::new(ContractWrapper::new(execute, instantiate, query)));
    let contract = app
        .instantiate_contract(
            code_id,
            Addr::unchecked("deployer"),
            &InstantiateMsg {
                operator: "operator".to_string(),
                fee_bps: 250,
                fee_collector: "collector".to_string(),
                denom: DENOM.to_string(),
            },
            &[],
            "auction-house",
            None,
        )
        .unwrap();
    (app, contract)
}

fn create_auction(app: &mut App, contract: &Addr) {
    let hook = to_binary(&Cw721HookMsg::CreateAuction {
        starting_bid: Uint128::new(100),
        duration: 3600,
    })
    .unwrap();
    app.execute_contract(
        Addr::unchecked("nft"),
        contract.clone(),
        &ExecuteMsg::ReceiveNft(Cw721ReceiveMsg {
            sender: "seller".to_string(),
            token_id: "token-1".to_string(),
            msg: hook,
        }),
        &[],
    )
    .unwrap();
}

fn balance(app: &App, addr: &str) -> u128 {
    app.wrap().query_balance(addr, DENOM).unwrap().amount.u128()
}

#[test]
fn deposits_are_escrowed_and_refunds_move_real_funds() {
    let (mut app, contract) = setup();
    create_auction(&mut app, &contract);

    app.execute_contract(
        Addr::unchecked("alice"),
        contract.clone(),
        &ExecuteMsg::Bid { auction_id: 1 },
        &coins(100, DENOM),
    )
    .unwrap();
    assert_eq!(balance(&app, "alice"), 900);
    assert_eq!(balance(&app, contract.as_str()), 100);

    app.execute_contract(
        Addr::unchecked("bob"),
        contract.clone(),
        &ExecuteMsg::Bid { auction_id: 1 },
        &coins(105, DENOM),
    )
    .unwrap();
    assert_eq!(balance(&app, contract.as_str()), 205);

    let res: PendingReturnsResponse = app
        .wrap()
        .query_wasm_smart(
            &contract,
            &QueryMsg::PendingReturns {
                auction_id: 1,
                bidder: "alice".to_string(),
            },
        )
        .unwrap();
    assert_eq!(res.amount, Uint128::new(100));

    // the outbid deposit comes back in full, the escrow keeps the high bid
    app.execute_contract(
        Addr::unchecked("alice"),
        contract.clone(),
        &ExecuteMsg::Withdraw { auction_id: 1 },
        &[],
    )
    .unwrap();
    assert_eq!(balance(&app, "alice"), 1_000);
    assert_eq!(balance(&app, contract.as_str()), 105);

    let err: ContractError = app
        .execute_contract(
            Addr::unchecked("alice"),
            contract.clone(),
            &ExecuteMsg::Withdraw { auction_id: 1 },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert_eq!(err, ContractError::NothingToWithdraw {});
}

#[test]
fn bid_without_deposit_is_rejected() {
    let (mut app, contract) = setup();
    create_auction(&mut app, &contract);

    let err: ContractError = app
        .execute_contract(
            Addr::unchecked("alice"),
            contract,
            &ExecuteMsg::Bid { auction_id: 1 },
            &[],
        )
        .unwrap_err()
        .downcast()
        .unwrap();
    assert!(matches!(err, ContractError::Payment(_)));
}
