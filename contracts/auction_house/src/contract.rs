#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coin, from_binary, to_binary, Addr, BankMsg, Binary, CosmosMsg, Deps, DepsMut, Env,
    MessageInfo, Order, Response, StdResult, Uint128, WasmMsg,
};
use cw2::set_contract_version;
use cw721::{Cw721ExecuteMsg, Cw721ReceiveMsg};
use cw_storage_plus::Bound;
use cw_utils::must_pay;

use crate::error::ContractError;
use crate::msg::{
    AuctionListResponse, AuctionResponse, ConfigResponse, Cw721HookMsg, ExecuteMsg,
    InstantiateMsg, PendingReturnsResponse, QueryMsg,
};
use crate::state::{
    Auction, Config, ANTI_SNIPE_WINDOW, AUCTIONS, BPS_DENOMINATOR, CONFIG, NEXT_AUCTION_ID,
    PENDING_RETURNS,
};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:auction_house";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    if msg.fee_bps as u128 > BPS_DENOMINATOR {
        return Err(ContractError::InvalidFeeRate {});
    }

    let config = Config {
        operator: deps.api.addr_validate(&msg.operator)?,
        fee_bps: msg.fee_bps,
        fee_collector: deps.api.addr_validate(&msg.fee_collector)?,
        denom: msg.denom,
    };

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    CONFIG.save(deps.storage, &config)?;
    NEXT_AUCTION_ID.save(deps.storage, &1u64)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("operator", config.operator)
        .add_attribute("fee_bps", msg.fee_bps.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::ReceiveNft(wrapper) => execute_receive_nft(deps, env, info, wrapper),
        ExecuteMsg::Bid { auction_id } => execute_bid(deps, env, info, auction_id),
        ExecuteMsg::Withdraw { auction_id } => execute_withdraw(deps, info, auction_id),
        ExecuteMsg::EndAuction { auction_id } => execute_end_auction(deps, env, info, auction_id),
        ExecuteMsg::CancelAuction { auction_id } => {
            execute_cancel_auction(deps, info, auction_id)
        }
        ExecuteMsg::UpdateFeeRate { fee_bps } => execute_update_fee_rate(deps, info, fee_bps),
        ExecuteMsg::UpdateOperator { new_operator } => {
            execute_update_operator(deps, info, new_operator)
        }
    }
}

/// Custody intake. The sending cw721 contract has already moved the token
/// into this contract within the current transaction; any error below rolls
/// that transfer back as well, so create is all-or-nothing.
pub fn execute_receive_nft(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    wrapper: Cw721ReceiveMsg,
) -> Result<Response, ContractError> {
    let msg: Cw721HookMsg = from_binary(&wrapper.msg)?;
    let seller = deps.api.addr_validate(&wrapper.sender)?;

    match msg {
        Cw721HookMsg::CreateAuction {
            starting_bid,
            duration,
        } => {
            if starting_bid.is_zero() || duration == 0 {
                return Err(ContractError::InvalidAuctionParams {});
            }

            let end_time = env
                .block
                .time
                .seconds()
                .checked_add(duration)
                .ok_or(ContractError::InvalidAuctionParams {})?;

            let id = NEXT_AUCTION_ID.load(deps.storage)?;
            let auction = Auction {
                id,
                seller: seller.clone(),
                nft_contract: info.sender,
                token_id: wrapper.token_id,
                starting_bid,
                highest_bid: Uint128::zero(),
                highest_bidder: None,
                end_time,
                ended: false,
            };

            AUCTIONS.save(deps.storage, id, &auction)?;
            NEXT_AUCTION_ID.save(deps.storage, &(id + 1))?;

            Ok(Response::new()
                .add_attribute("method", "create_auction")
                .add_attribute("auction_id", id.to_string())
                .add_attribute("seller", seller)
                .add_attribute("token_id", auction.token_id)
                .add_attribute("starting_bid", starting_bid)
                .add_attribute("end_time", auction.end_time.to_string()))
        }
    }
}

pub fn execute_bid(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    auction_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut auction = AUCTIONS
        .may_load(deps.storage, auction_id)?
        .ok_or(ContractError::AuctionNotFound {})?;

    if auction.ended {
        return Err(ContractError::AuctionEnded {});
    }

    let now = env.block.time.seconds();
    if now >= auction.end_time {
        return Err(ContractError::AuctionEnded {});
    }

    if info.sender == auction.seller {
        return Err(ContractError::SellerCannotBid {});
    }

    let amount = must_pay(&info, &config.denom)?;
    let min_bid = auction.min_next_bid();
    if amount < min_bid {
        return Err(ContractError::BidTooLow { min_bid });
    }

    // Credit the outbid deposit before the high bid is overwritten, so no
    // value ever leaves the books.
    if let Some(prev_bidder) = &auction.highest_bidder {
        PENDING_RETURNS.update(
            deps.storage,
            (auction.id, prev_bidder),
            |credit| -> StdResult<_> { Ok(credit.unwrap_or_default() + auction.highest_bid) },
        )?;
    }

    auction.highest_bidder = Some(info.sender.clone());
    auction.highest_bid = amount;

    // Anti-sniping: a bid inside the closing window moves the deadline out
    // to one full window past the bid. Consecutive late bids keep pushing
    // it further; the deadline never moves backwards.
    if auction.end_time - now < ANTI_SNIPE_WINDOW {
        auction.end_time = now + ANTI_SNIPE_WINDOW;
    }

    AUCTIONS.save(deps.storage, auction.id, &auction)?;

    Ok(Response::new()
        .add_attribute("method", "bid")
        .add_attribute("auction_id", auction_id.to_string())
        .add_attribute("bidder", info.sender)
        .add_attribute("amount", amount)
        .add_attribute("end_time", auction.end_time.to_string()))
}

pub fn execute_withdraw(
    deps: DepsMut,
    info: MessageInfo,
    auction_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let credit = PENDING_RETURNS
        .may_load(deps.storage, (auction_id, &info.sender))?
        .unwrap_or_default();
    if credit.is_zero() {
        return Err(ContractError::NothingToWithdraw {});
    }

    // The entry is gone before the bank message runs; a reentrant withdraw
    // observes a zero balance.
    PENDING_RETURNS.remove(deps.storage, (auction_id, &info.sender));

    Ok(Response::new()
        .add_message(BankMsg::Send {
            to_address: info.sender.to_string(),
            amount: vec![coin(credit.u128(), &config.denom)],
        })
        .add_attribute("method", "withdraw")
        .add_attribute("auction_id", auction_id.to_string())
        .add_attribute("recipient", info.sender)
        .add_attribute("amount", credit))
}

pub fn execute_end_auction(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    auction_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut auction = AUCTIONS
        .may_load(deps.storage, auction_id)?
        .ok_or(ContractError::AuctionNotFound {})?;

    if auction.ended {
        return Err(ContractError::AuctionEnded {});
    }

    let is_operator = info.sender == config.operator;
    if !is_operator && info.sender != auction.seller {
        return Err(ContractError::Unauthorized {});
    }

    // The operator may force-end early; the seller must wait out the clock.
    if !is_operator && env.block.time.seconds() < auction.end_time {
        return Err(ContractError::AuctionStillActive {});
    }

    // Terminal flag is committed before any outbound transfer message.
    auction.ended = true;
    AUCTIONS.save(deps.storage, auction.id, &auction)?;

    let mut messages: Vec<CosmosMsg> = vec![];
    let mut fee = Uint128::zero();

    match &auction.highest_bidder {
        Some(winner) => {
            fee = compute_fee(auction.highest_bid, config.fee_bps);
            let proceeds = auction.highest_bid - fee;
            if !proceeds.is_zero() {
                messages.push(CosmosMsg::Bank(BankMsg::Send {
                    to_address: auction.seller.to_string(),
                    amount: vec![coin(proceeds.u128(), &config.denom)],
                }));
            }
            if !fee.is_zero() {
                messages.push(CosmosMsg::Bank(BankMsg::Send {
                    to_address: config.fee_collector.to_string(),
                    amount: vec![coin(fee.u128(), &config.denom)],
                }));
            }
            messages.push(transfer_nft_msg(&auction, winner)?);
        }
        None => {
            // No bids: the token goes back to the seller, no funds move.
            messages.push(transfer_nft_msg(&auction, &auction.seller)?);
        }
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("method", "end_auction")
        .add_attribute("auction_id", auction_id.to_string())
        .add_attribute(
            "winner",
            auction
                .highest_bidder
                .map(|a| a.to_string())
                .unwrap_or_else(|| "none".to_string()),
        )
        .add_attribute("winning_bid", auction.highest_bid)
        .add_attribute("fee", fee))
}

pub fn execute_cancel_auction(
    deps: DepsMut,
    info: MessageInfo,
    auction_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut auction = AUCTIONS
        .may_load(deps.storage, auction_id)?
        .ok_or(ContractError::AuctionNotFound {})?;

    if auction.ended {
        return Err(ContractError::AuctionEnded {});
    }

    if info.sender != auction.seller && info.sender != config.operator {
        return Err(ContractError::Unauthorized {});
    }

    // An auction that has received a bid can only be settled, never
    // cancelled. Bidders get a fair resolution once they commit funds.
    if auction.has_bid() {
        return Err(ContractError::AuctionHasBids {});
    }

    auction.ended = true;
    AUCTIONS.save(deps.storage, auction.id, &auction)?;

    Ok(Response::new()
        .add_message(transfer_nft_msg(&auction, &auction.seller)?)
        .add_attribute("method", "cancel_auction")
        .add_attribute("auction_id", auction_id.to_string())
        .add_attribute("seller", auction.seller))
}

pub fn execute_update_fee_rate(
    deps: DepsMut,
    info: MessageInfo,
    fee_bps: u64,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {});
    }

    if fee_bps as u128 > BPS_DENOMINATOR {
        return Err(ContractError::InvalidFeeRate {});
    }

    config.fee_bps = fee_bps;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_fee_rate")
        .add_attribute("fee_bps", fee_bps.to_string()))
}

pub fn execute_update_operator(
    deps: DepsMut,
    info: MessageInfo,
    new_operator: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {});
    }

    config.operator = deps.api.addr_validate(&new_operator)?;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "update_operator")
        .add_attribute("operator", config.operator))
}

/// Platform cut of a settled auction, floor-rounded in the seller's favor.
fn compute_fee(amount: Uint128, fee_bps: u64) -> Uint128 {
    amount.multiply_ratio(fee_bps as u128, BPS_DENOMINATOR)
}

fn transfer_nft_msg(auction: &Auction, recipient: &Addr) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: auction.nft_contract.to_string(),
        msg: to_binary(&Cw721ExecuteMsg::TransferNft {
            recipient: recipient.to_string(),
            token_id: auction.token_id.clone(),
        })?,
        funds: vec![],
    }))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_binary(&query_config(deps)?),
        QueryMsg::Auction { auction_id } => to_binary(&query_auction(deps, auction_id)?),
        QueryMsg::AuctionList { start_after, limit } => {
            to_binary(&query_auction_list(deps, start_after, limit)?)
        }
        QueryMsg::PendingReturns { auction_id, bidder } => {
            to_binary(&query_pending_returns(deps, auction_id, bidder)?)
        }
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        operator: config.operator,
        fee_bps: config.fee_bps,
        fee_collector: config.fee_collector,
        denom: config.denom,
    })
}

fn query_auction(deps: Deps, auction_id: u64) -> StdResult<AuctionResponse> {
    let auction = AUCTIONS.load(deps.storage, auction_id)?;
    Ok(auction_response(auction))
}

fn query_auction_list(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<AuctionListResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    let auctions = AUCTIONS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, auction)| auction_response(auction)))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(AuctionListResponse { auctions })
}

fn query_pending_returns(
    deps: Deps,
    auction_id: u64,
    bidder: String,
) -> StdResult<PendingReturnsResponse> {
    let bidder = deps.api.addr_validate(&bidder)?;
    let amount = PENDING_RETURNS
        .may_load(deps.storage, (auction_id, &bidder))?
        .unwrap_or_default();
    Ok(PendingReturnsResponse { amount })
}

fn auction_response(auction: Auction) -> AuctionResponse {
    let min_next_bid = auction.min_next_bid();
    AuctionResponse {
        id: auction.id,
        seller: auction.seller,
        nft_contract: auction.nft_contract,
        token_id: auction.token_id,
        starting_bid: auction.starting_bid,
        highest_bid: auction.highest_bid,
        highest_bidder: auction.highest_bidder,
        end_time: auction.end_time,
        ended: auction.ended,
        min_next_bid,
    }
}
