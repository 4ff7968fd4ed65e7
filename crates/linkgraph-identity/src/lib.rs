//! Linkgraph Identity Layer
//!
//! Turns a wallet signature into a DID session:
//! - Chain signer adapters for Ethereum and Solana wallets
//! - Local key-file wallets for both chain families
//! - Ed25519 `did:key` providers seeded from the signature
//! - Session manager with an idempotent authentication flow
//! - Account binder publishing wallet ↔ DID binding records

pub mod binding;
pub mod did;
pub mod error;
pub mod session;
pub mod signer;
pub mod wallets;

pub use binding::{
    binding_message, AccountBinder, AccountBinding, BindingProof, BindingRegistry, HttpBindingRegistry,
    MemoryBindingRegistry,
};
pub use did::{DidFactory, Ed25519DidFactory, Ed25519DidProvider};
pub use error::{BindingError, SessionError, SignerError};
pub use session::{Session, SessionManager, AUTH_CHALLENGE};
pub use signer::{ChainSigner, EthProvider, SignerProvider, SolanaWallet};
pub use wallets::{LocalEthWallet, LocalSolanaWallet};
