//! Governance voting subsystem.
//!
//! # Data Flow
//! ```text
//! voter.rs
//!     → api.rs (GET voting status)
//!     → types.rs (status → Eligibility)
//!     → signature.rs (CastVoteBySig typed data)
//!     → blockchain::AccountClient (EIP-712 signature)
//!     → api.rs (PUT signed vote)
//! ```

pub mod api;
pub mod signature;
pub mod types;
pub mod voter;

pub use api::{GovernanceApi, HttpGovernanceApi};
pub use types::{Eligibility, GovernanceError, VoteOutcome, VoteSubmission, VotingStatus};
pub use voter::VoteRunner;
