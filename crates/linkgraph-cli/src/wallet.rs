//! Local wallet key files.

use anyhow::Context;
use linkgraph::{Chain, LocalEthWallet, LocalSolanaWallet, SignerProvider};
use std::path::Path;
use std::sync::Arc;
use zeroize::Zeroizing;

/// A freshly generated secret and the address it controls.
pub fn generate(chain: Chain) -> (Zeroizing<String>, String) {
    match chain {
        Chain::Eth => {
            let wallet = LocalEthWallet::generate();
            (wallet.secret_hex(), wallet.address().to_string())
        }
        Chain::Solana => {
            let wallet = LocalSolanaWallet::generate();
            (wallet.secret_hex(), wallet.address())
        }
    }
}

/// Read the key file at `path` and wrap it as a signer for `chain`.
pub fn load(chain: Chain, path: &Path) -> anyhow::Result<SignerProvider> {
    let secret = Zeroizing::new(
        std::fs::read_to_string(path)
            .with_context(|| format!("could not read key file {}", path.display()))?,
    );
    let provider = match chain {
        Chain::Eth => SignerProvider::Eth(Arc::new(LocalEthWallet::from_hex(secret.trim())?)),
        Chain::Solana => {
            SignerProvider::Solana(Arc::new(LocalSolanaWallet::from_hex(secret.trim())?))
        }
    };
    Ok(provider)
}
