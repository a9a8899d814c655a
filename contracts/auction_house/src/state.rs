use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum raise over the current high bid, in basis points.
pub const MIN_BID_INCREMENT_BPS: u128 = 500;
pub const BPS_DENOMINATOR: u128 = 10_000;
/// A bid landing closer than this to the deadline moves the deadline out
/// to one window past the bid, in seconds.
pub const ANTI_SNIPE_WINDOW: u64 = 300;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct Config {
    pub operator: Addr,
    pub fee_bps: u64,
    pub fee_collector: Addr,
    pub denom: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct Auction {
    pub id: u64,
    pub seller: Addr,
    pub nft_contract: Addr,
    pub token_id: String,
    pub starting_bid: Uint128,
    pub highest_bid: Uint128,
    pub highest_bidder: Option<Addr>,
    pub end_time: u64,
    pub ended: bool,
}

impl Auction {
    pub fn has_bid(&self) -> bool {
        self.highest_bidder.is_some()
    }

    /// Smallest acceptable next bid: the starting bid while no bid exists,
    /// afterwards the high bid plus a 5% raise rounded up.
    pub fn min_next_bid(&self) -> Uint128 {
        if self.highest_bid.is_zero() {
            self.starting_bid
        } else {
            let raise = (self.highest_bid.u128() * MIN_BID_INCREMENT_BPS + BPS_DENOMINATOR - 1)
                / BPS_DENOMINATOR;
            self.highest_bid + Uint128::new(raise)
        }
    }
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const NEXT_AUCTION_ID: Item<u64> = Item::new("next_auction_id");
pub const AUCTIONS: Map<u64, Auction> = Map::new("auctions");
pub const PENDING_RETURNS: Map<(u64, &Addr), Uint128> = Map::new("pending_returns");
