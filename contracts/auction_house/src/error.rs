use cosmwasm_std::{StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Auction not found")]
    AuctionNotFound {},

    #[error("Auction already ended")]
    AuctionEnded {},

    #[error("Auction still active")]
    AuctionStillActive {},

    #[error("Seller cannot bid on own auction")]
    SellerCannotBid {},

    #[error("Bid below minimum increment, need at least {min_bid}")]
    BidTooLow { min_bid: Uint128 },

    #[error("Nothing to withdraw")]
    NothingToWithdraw {},

    #[error("Auction already has a bid")]
    AuctionHasBids {},

    #[error("Invalid auction parameters")]
    InvalidAuctionParams {},

    #[error("Fee rate exceeds 100%")]
    InvalidFeeRate {},
}
