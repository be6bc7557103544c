//! Token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod policy;

pub use claims::{TokenClaims, TokenData};
pub use decoder::TokenDecoder;
pub use encoder::{MintedToken, TokenEncoder};
pub use policy::DurationPolicy;
