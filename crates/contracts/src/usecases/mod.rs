pub mod common;
pub mod u501_sync_offers;
