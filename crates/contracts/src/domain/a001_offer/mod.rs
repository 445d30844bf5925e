pub mod aggregate;

pub use aggregate::{
    Bandwidth, BandwidthScope, Capacity, Catalog, ClientType, Database, Dns, Offer, OfferId,
    OfferSpec, PayMode, Port, ResourceAttributes, Vpn, DEFAULT_UNIT,
};
