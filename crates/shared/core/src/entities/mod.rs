mod ad_format;
mod consent;
mod device;
mod lookup_key;
mod page;
mod request;

pub use ad_format::{AdFormat, AdPosition, AdSize};
pub use consent::ConsentSnapshot;
pub use device::{ConnectionType, DeviceType};
pub use lookup_key::LookupKey;
pub use page::PageType;
pub use request::{ClassifiedRequest, GeneratedIds};
