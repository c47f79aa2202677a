//! Hashing utilities for rule keys.
//!
//! A rule key identifies everything that influences a capture's output. It
//! is the truncated SHA-256 of the JSON serialization of the keyed value, so
//! any change to a flag, path or setting produces a different key.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::OBJ_HASH_PREFIX_LEN;

pub type HashError = serde_json::Error;

/// A content-addressed hash identifying a unique object.
///
/// The hash is a 20-character truncated SHA-256 of the JSON-serialized value,
/// as lowercase hex, e.g. `"a1b2c3d4e5f6789012ab"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHash(pub String);

impl std::fmt::Display for ObjectHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn compute_hash(&self) -> Result<ObjectHash, HashError> {
    let serialized = serde_json::to_string(self)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let full = format!("{:x}", hasher.finalize());
    Ok(ObjectHash(full[..OBJ_HASH_PREFIX_LEN].to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Serialize)]
  struct Keyed {
    name: &'static str,
    flags: Vec<&'static str>,
  }

  impl Hashable for Keyed {}

  #[test]
  fn hash_is_deterministic_and_truncated() {
    let value = Keyed {
      name: "a",
      flags: vec!["-DFOO"],
    };

    let first = value.compute_hash().unwrap();
    let second = value.compute_hash().unwrap();

    assert_eq!(first, second);
    assert_eq!(first.0.len(), OBJ_HASH_PREFIX_LEN);
    assert!(first.0.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn flag_order_changes_hash() {
    let a = Keyed {
      name: "a",
      flags: vec!["-DFOO", "-DBAR"],
    };
    let b = Keyed {
      name: "a",
      flags: vec!["-DBAR", "-DFOO"],
    };

    assert_ne!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
  }
}
