//! Typed SpaceX launch records decoded from API payloads
pub mod config;
pub mod decode;
pub mod domain;
pub mod errors;
pub mod utils;

pub use decode::{decode_launch, decode_launches, decode_launches_lenient};
pub use domain::{DatePrecision, FlickrLinks, Launch, LaunchLinks};
pub use errors::{DecodeError, DecodeResult};
