//! # Partner File-Record Marshaling
//!
//! Fixed-width record parsing and building for the daily partner file
//! feeds: the MasterCard clearing extract (inbound, degrade-gracefully),
//! the outbound MasterCard filtering registration file, and the Reward
//! Network merchant feed (inbound, fail-closed).
//!
//! All parsers accumulate per-field diagnostics instead of stopping at the
//! first bad column, and none of them raise errors for malformed data —
//! `Err` is reserved for unreadable streams. Parser values hold no state
//! across calls; every parse is an independent invocation.

pub mod clearing;
pub mod codec;
pub mod filtering;
pub mod reward_network;

pub use clearing::{
    ClearingDataRecord, ClearingFile, ClearingFileParser, ClearingHeader, ClearingTrailer,
};
pub use codec::{FieldReader, FieldWriter, RecordContext};
pub use filtering::{FilteringFileBuilder, FilteringRecord};
pub use reward_network::{Merchant, RewardNetworkFileParser};
