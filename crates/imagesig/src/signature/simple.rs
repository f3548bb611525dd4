/// An OpenPGP "simple signing" signature, treated as opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSigningSignature {
    untrusted_signature: Vec<u8>,
}

impl SimpleSigningSignature {
    pub fn new(untrusted_signature: Vec<u8>) -> Self {
        Self {
            untrusted_signature,
        }
    }

    /// The raw signature; must go through a signing mechanism before use.
    pub fn untrusted_signature(&self) -> &[u8] {
        &self.untrusted_signature
    }
}
