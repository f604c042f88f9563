use alloy::primitives::{Address, B256, Signature};
use std::fmt::Debug;
use tracing::debug;

/// Checks the validity proof submitted with a batch commitment.
pub trait ValidityVerifier: Debug + Send + Sync {
    /// Returns true if `proof` attests to `root`.
    fn verify(&self, root: &B256, proof: &[u8]) -> bool;
}

/// Accepts every proof.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAccept;

impl ValidityVerifier for AlwaysAccept {
    fn verify(&self, _root: &B256, _proof: &[u8]) -> bool {
        true
    }
}

/// Accepts a root signed by a trusted operator.
///
/// The proof is the 65 byte `r ‖ s ‖ v` signature over the root itself.
#[derive(Debug, Clone, Copy)]
pub struct OperatorAttestation {
    operator: Address,
}

impl OperatorAttestation {
    /// Creates a verifier trusting `operator`.
    pub const fn new(operator: Address) -> Self {
        Self { operator }
    }

    /// The trusted operator.
    pub const fn operator(&self) -> Address {
        self.operator
    }
}

impl ValidityVerifier for OperatorAttestation {
    fn verify(&self, root: &B256, proof: &[u8]) -> bool {
        let recovered = Signature::from_raw(proof)
            .and_then(|signature| signature.recover_address_from_prehash(root));

        match recovered {
            Ok(signer) if signer == self.operator => true,
            Ok(signer) => {
                debug!(%signer, operator = %self.operator, %root, "Attestation signed by unknown signer");
                false
            }
            Err(err) => {
                debug!(%err, %root, "Malformed attestation");
                false
            }
        }
    }
}
