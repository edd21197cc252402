//! # zkid-credential — Selective Disclosure
//!
//! A credential is a Groth16 proof plus whichever attribute values the holder
//! chose to reveal. The proof binds all five attributes through the
//! commitment regardless of which are revealed, so disclosure choices never
//! affect proof validity.
//!
//! - [`PrivacySettings`]: per-attribute reveal flags.
//! - [`DisclosureBundle`]: the transferable credential.
//! - [`DisclosureCodec`]: encoding and QR-payload JSON.

pub mod bundle;
pub mod codec;
pub mod error;
pub mod privacy;

pub use bundle::{DisclosureBundle, RevealedDetails};
pub use codec::{DisclosureCodec, DEFAULT_PROOF_TYPE};
pub use error::CodecError;
pub use privacy::PrivacySettings;
