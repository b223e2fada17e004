//! Artifact signing and offline verification (Ed25519).
//!
//! The signer only ever sees the artifact hash, never the full artifact:
//! signing a 64-char hex string keeps key-holding collaborators (local key,
//! KMS) interchangeable behind [`ArtifactSigner`].

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::domain::artifact::DecisionArtifact;
use crate::domain::error::{Result, SignatureError, TribunalError};

/// Signature scheme identifier recorded alongside published keys.
pub const SIGNATURE_ALGORITHM: &str = "ed25519";

/// Key-holding collaborator that signs artifact hashes.
///
/// Guarantees:
/// - `sign` input is always the artifact hash hex string's bytes.
/// - Output is a hex-encoded signature verifiable with `public_key_hex`.
/// - A failed signing must surface as an error; implementations never
///   return placeholder signatures.
#[async_trait]
pub trait ArtifactSigner: Send + Sync {
    async fn sign(&self, artifact_hash: &str) -> Result<String>;

    /// Hex-encoded public key that verifies this signer's signatures.
    fn public_key_hex(&self) -> String;
}

/// In-process Ed25519 signer backed by a 32-byte seed.
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Build a signer from a hex-encoded 32-byte seed (64 hex chars).
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self> {
        let bytes = hex::decode(seed_hex.trim())
            .map_err(|_| TribunalError::Signing("signing seed is not valid hex".to_string()))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| TribunalError::Signing("signing seed must be 32 bytes".to_string()))?;
        Ok(Self::from_bytes(&seed))
    }

    pub fn from_bytes(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Ed25519Signer")
            .field("public_key", &self.public_key_hex())
            .finish()
    }
}

#[async_trait]
impl ArtifactSigner for Ed25519Signer {
    async fn sign(&self, artifact_hash: &str) -> Result<String> {
        let signature = self.signing_key.sign(artifact_hash.as_bytes());
        Ok(hex::encode(signature.to_bytes()))
    }

    fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }
}

/// Signer that refuses every request. Abort-path tests only.
#[derive(Debug, Default)]
pub struct FailingSigner;

#[async_trait]
impl ArtifactSigner for FailingSigner {
    async fn sign(&self, _artifact_hash: &str) -> Result<String> {
        Err(TribunalError::Signing("signer unavailable".to_string()))
    }

    fn public_key_hex(&self) -> String {
        String::new()
    }
}

/// Verify an Ed25519 signature over an artifact hash.
pub fn verify_signature(
    public_key_hex: &str,
    artifact_hash: &str,
    signature_hex: &str,
) -> std::result::Result<(), SignatureError> {
    let key_bytes: [u8; 32] = hex::decode(public_key_hex.trim())
        .map_err(|_| SignatureError::InvalidPublicKey)?
        .try_into()
        .map_err(|_| SignatureError::InvalidPublicKey)?;
    let verifying_key =
        VerifyingKey::from_bytes(&key_bytes).map_err(|_| SignatureError::InvalidPublicKey)?;

    let sig_bytes =
        hex::decode(signature_hex.trim()).map_err(|_| SignatureError::InvalidSignatureEncoding)?;
    let signature =
        Signature::from_slice(&sig_bytes).map_err(|_| SignatureError::InvalidSignatureEncoding)?;

    verifying_key
        .verify(artifact_hash.as_bytes(), &signature)
        .map_err(|_| SignatureError::Verification)
}

/// Full offline artifact check: content hash, then signature over it.
pub fn verify_artifact(artifact: &DecisionArtifact, public_key_hex: &str) -> Result<()> {
    artifact.verify_integrity()?;
    verify_signature(public_key_hex, &artifact.artifact_hash, &artifact.signature)?;
    Ok(())
}
