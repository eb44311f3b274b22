use seloria_core::{verify, Hash, PublicKey, QuorumCertificate, Sig, ValidatorSignature};
use std::collections::HashSet;
use tracing::debug;

use crate::error::ConsensusError;

/// Quorum certificate builder/collector
pub struct QcBuilder {
    block_hash: Hash,
    signatures: Vec<ValidatorSignature>,
    validators: HashSet<PublicKey>,
    threshold: usize,
}

impl QcBuilder {
    /// Create a new QC builder for a block
    pub fn new(block_hash: Hash, validators: &[PublicKey], threshold: usize) -> Self {
        QcBuilder {
            block_hash,
            signatures: Vec::new(),
            validators: validators.iter().copied().collect(),
            threshold,
        }
    }

    /// Add a validator signature
    pub fn add_signature(
        &mut self,
        validator: PublicKey,
        signature: Sig,
    ) -> Result<bool, ConsensusError> {
        // Check validator is in our set
        if !self.validators.contains(&validator) {
            return Err(ConsensusError::ValidatorNotFound(validator.to_hex()));
        }

        // Verify signature
        verify(&validator, self.block_hash.as_bytes(), &signature)?;

        // Check for duplicate
        if self
            .signatures
            .iter()
            .any(|vs| vs.validator_pubkey == validator)
        {
            debug!("Duplicate signature from {}", validator);
            return Ok(self.has_quorum());
        }

        self.signatures.push(ValidatorSignature {
            validator_pubkey: validator,
            signature,
        });

        debug!(
            "Added signature from {}, total: {}/{}",
            validator,
            self.signatures.len(),
            self.threshold
        );

        Ok(self.has_quorum())
    }

    /// Check if we have enough signatures
    pub fn has_quorum(&self) -> bool {
        self.signatures.len() >= self.threshold
    }

    /// Get current signature count
    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Build the quorum certificate (only if we have quorum)
    pub fn build(self) -> Result<QuorumCertificate, ConsensusError> {
        if !self.has_quorum() {
            return Err(ConsensusError::InsufficientSignatures {
                have: self.signatures.len(),
                need: self.threshold,
            });
        }

        Ok(QuorumCertificate {
            block_hash: self.block_hash,
            signatures: self.signatures,
        })
    }
}

/// Verify a quorum certificate
pub fn verify_qc(
    qc: &QuorumCertificate,
    validators: &[PublicKey],
    threshold: usize,
) -> Result<(), ConsensusError> {
    let validator_set: HashSet<_> = validators.iter().collect();

    // Check we have enough signatures
    if qc.signatures.len() < threshold {
        return Err(ConsensusError::InsufficientSignatures {
            have: qc.signatures.len(),
            need: threshold,
        });
    }

    // Verify each signature
    for vs in &qc.signatures {
        if !validator_set.contains(&vs.validator_pubkey) {
            return Err(ConsensusError::ValidatorNotFound(
                vs.validator_pubkey.to_hex(),
            ));
        }

        verify(&vs.validator_pubkey, qc.block_hash.as_bytes(), &vs.signature)?;
    }

    Ok(())
}
