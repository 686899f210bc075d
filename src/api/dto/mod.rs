//! Request/response DTOs, kept separate from domain types.

pub mod common_dto;
pub mod hold_dto;
pub mod referral_dto;
pub mod wallet_dto;

pub use common_dto::{PaginationMeta, PaginationParams};
pub use hold_dto::{HoldDto, HoldFilterParams, HoldListResponse};
pub use referral_dto::CreateReferralHoldRequest;
pub use wallet_dto::{
    BalanceResponse, CreateWalletRequest, EntryDto, EntryListResponse, RechargeRequest,
    WalletResponse, WithdrawalRequest,
};
