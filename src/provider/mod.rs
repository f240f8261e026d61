//! DNS Made Easy provider
//!
//! Signed REST calls against the managed DNS API plus the zone and record
//! lookups the solver builds on. Zone and record ids are resolved per call
//! and never cached.

pub mod client;
pub mod records;
pub mod signer;
pub mod types;
pub mod zones;

pub use client::DnsMadeEasyClient;
pub use records::select_record;
pub use types::{
    CreateRecordRequest, ProviderCredentials, RecordId, RecordListing, ZoneId, ZoneListing,
    CHALLENGE_TTL,
};
pub use zones::select_zone;
