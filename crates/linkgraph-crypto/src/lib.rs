pub mod error;
pub mod eth;
pub mod hashing;
pub mod jws;
pub mod keys;
pub mod signing;

pub use error::CryptoError;
pub use eth::{keccak256, recover_personal_signer, EthKey};
pub use hashing::{derive_secret, hash, Hash};
pub use jws::{sign_jws, verify_jws};
pub use keys::{KeyPair, PublicKey};
pub use signing::{sign, verify, Signature};
