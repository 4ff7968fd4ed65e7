use zeroize::Zeroizing;

/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Derive the session secret from a wallet signature.
///
/// `0x`-prefixed hex signatures are hashed as their decoded bytes; any other
/// encoding (base58 from Solana wallets) is hashed as text. The same
/// signature always yields the same secret, so a DID seeded from it is
/// stable for a given wallet and challenge.
pub fn derive_secret(signature: &str) -> Zeroizing<[u8; 32]> {
    let decoded = signature
        .strip_prefix("0x")
        .and_then(|body| hex::decode(body).ok())
        .map(Zeroizing::new);
    match decoded {
        Some(bytes) => Zeroizing::new(hash(&bytes)),
        None => Zeroizing::new(hash(signature.as_bytes())),
    }
}
