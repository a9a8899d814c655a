use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};
use cw721::Cw721ReceiveMsg;

#[cw_serde]
pub struct InstantiateMsg {
    pub operator: String,
    /// Service fee taken from the winning bid, in basis points.
    pub fee_bps: u64,
    pub fee_collector: String,
    /// Native denom bids must be paid in.
    pub denom: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Custody intake: a cw721 contract delivers a token via `send_nft`
    /// together with a `Cw721HookMsg` payload.
    ReceiveNft(Cw721ReceiveMsg),
    /// Place a bid; the deposit is the native coin attached to this call.
    Bid { auction_id: u64 },
    /// Claim an outbid refund credited to the caller.
    Withdraw { auction_id: u64 },
    /// Settle an auction (seller after the deadline, operator any time).
    EndAuction { auction_id: u64 },
    /// Cancel an auction that has not received any bid.
    CancelAuction { auction_id: u64 },
    /// Update the service fee rate (operator only).
    UpdateFeeRate { fee_bps: u64 },
    /// Hand the operator role to a new address (operator only).
    UpdateOperator { new_operator: String },
}

#[cw_serde]
pub enum Cw721HookMsg {
    CreateAuction {
        starting_bid: Uint128,
        /// Auction length in seconds from the time of creation.
        duration: u64,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    /// Get a single auction record
    #[returns(AuctionResponse)]
    Auction { auction_id: u64 },
    /// Page through auctions by ascending id
    #[returns(AuctionListResponse)]
    AuctionList {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Withdrawable outbid credit for one bidder on one auction
    #[returns(PendingReturnsResponse)]
    PendingReturns { auction_id: u64, bidder: String },
}

#[cw_serde]
pub struct ConfigResponse {
    pub operator: Addr,
    pub fee_bps: u64,
    pub fee_collector: Addr,
    pub denom: String,
}

#[cw_serde]
pub struct AuctionResponse {
    pub id: u64,
    pub seller: Addr,
    pub nft_contract: Addr,
    pub token_id: String,
    pub starting_bid: Uint128,
    pub highest_bid: Uint128,
    pub highest_bidder: Option<Addr>,
    pub end_time: u64,
    pub ended: bool,
    /// Smallest bid the engine would currently accept.
    pub min_next_bid: Uint128,
}

#[cw_serde]
pub struct AuctionListResponse {
    pub auctions: Vec<AuctionResponse>,
}

#[cw_serde]
pub struct PendingReturnsResponse {
    pub amount: Uint128,
}
