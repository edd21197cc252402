//! # Key Files
//!
//! The offline half of the pipeline: generate the circuit-specific Groth16
//! keys once, write them to a directory, and load them at service start.
//!
//! | File                    | Contents |
//! |-------------------------|----------|
//! | `identity.pk`           | proving key, arkworks uncompressed |
//! | `identity.vk`           | verifying key, arkworks compressed |
//! | `verification_key.json` | verifying key, snarkjs layout (for contract generators and external verifiers) |

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ark_bn254::Bn254;
use ark_groth16::{ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand::{CryptoRng, RngCore};
use thiserror::Error;

use crate::encoding::verifying_key_json;
use crate::groth16::{Groth16ProofSystem, IdentityProvingKey, IdentityVerifyingKey};

/// Proving key file name.
pub const PROVING_KEY_FILE: &str = "identity.pk";
/// Verifying key file name.
pub const VERIFYING_KEY_FILE: &str = "identity.vk";
/// snarkjs-layout verifying key file name.
pub const VERIFICATION_KEY_JSON: &str = "verification_key.json";

/// Errors reading, writing, or generating key files.
#[derive(Error, Debug)]
pub enum KeyError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file does not hold a valid key.
    #[error("invalid key file {path}: {message}")]
    Serialization {
        /// The file involved.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
    /// Key generation failed.
    #[error("key generation failed: {0}")]
    Setup(String),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> KeyError + '_ {
    move |source| KeyError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ser_err(path: &Path) -> impl FnOnce(ark_serialize::SerializationError) -> KeyError + '_ {
    move |e| KeyError::Serialization {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// A matched proving and verifying key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    /// Proving key.
    pub proving: IdentityProvingKey,
    /// Verifying key.
    pub verifying: IdentityVerifyingKey,
}

impl KeyPair {
    /// Run the circuit-specific setup.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, KeyError> {
        let (proving, verifying) =
            Groth16ProofSystem::setup(rng).map_err(|e| KeyError::Setup(e.to_string()))?;
        Ok(Self { proving, verifying })
    }

    /// Write all three key files into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<(), KeyError> {
        std::fs::create_dir_all(dir).map_err(io_err(dir))?;

        let pk_path = dir.join(PROVING_KEY_FILE);
        let file = File::create(&pk_path).map_err(io_err(&pk_path))?;
        let mut writer = BufWriter::new(file);
        self.proving
            .inner()
            .serialize_uncompressed(&mut writer)
            .map_err(ser_err(&pk_path))?;
        writer.flush().map_err(io_err(&pk_path))?;

        let vk_path = dir.join(VERIFYING_KEY_FILE);
        let file = File::create(&vk_path).map_err(io_err(&vk_path))?;
        let mut writer = BufWriter::new(file);
        self.verifying
            .inner()
            .serialize_compressed(&mut writer)
            .map_err(ser_err(&vk_path))?;
        writer.flush().map_err(io_err(&vk_path))?;

        let json_path = dir.join(VERIFICATION_KEY_JSON);
        let json = serde_json::to_string_pretty(&verifying_key_json(self.verifying.inner()))
            .map_err(|e| KeyError::Serialization {
                path: json_path.clone(),
                message: e.to_string(),
            })?;
        std::fs::write(&json_path, json).map_err(io_err(&json_path))?;

        tracing::info!(dir = %dir.display(), "wrote identity circuit keys");
        Ok(())
    }

    /// Load both binary keys from `dir`.
    pub fn load(dir: &Path) -> Result<Self, KeyError> {
        Ok(Self {
            proving: load_proving_key(&dir.join(PROVING_KEY_FILE))?,
            verifying: load_verifying_key(&dir.join(VERIFYING_KEY_FILE))?,
        })
    }
}

/// Load a proving key. Curve checks are skipped: the file is produced by
/// [`KeyPair::save`] and checking every point would dominate startup.
pub fn load_proving_key(path: &Path) -> Result<IdentityProvingKey, KeyError> {
    let file = File::open(path).map_err(io_err(path))?;
    let pk = ProvingKey::<Bn254>::deserialize_uncompressed_unchecked(BufReader::new(file))
        .map_err(ser_err(path))?;
    Ok(IdentityProvingKey(pk))
}

/// Load and fully check a verifying key.
pub fn load_verifying_key(path: &Path) -> Result<IdentityVerifyingKey, KeyError> {
    let file = File::open(path).map_err(io_err(path))?;
    let vk = VerifyingKey::<Bn254>::deserialize_compressed(BufReader::new(file))
        .map_err(ser_err(path))?;
    IdentityVerifyingKey::new(vk).map_err(|e| KeyError::Serialization {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
