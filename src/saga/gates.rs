//! Pre-condition gates checked against the key set fetched at the start of a run.
//!
//! Both gates read a snapshot, so two concurrent runs for the same curve can
//! both pass. The backend's registration conflict is the real guard.

use crate::config::Curve;
use crate::error::{KeyShareError, KeyShareResult};
use crate::waas::KeyRecord;

/// Reject generation when the user already holds a key for `curve`.
pub fn ensure_no_key_for_curve(keys: &[KeyRecord], curve: Curve) -> KeyShareResult<()> {
    if keys.iter().any(|key| key.is_curve(curve)) {
        return Err(KeyShareError::PolicyViolation(format!(
            "{curve} key already exists for this user. Cannot create duplicate key"
        )));
    }
    Ok(())
}

/// Select the key recovery starts from: the first record for `curve`, in
/// backend order.
pub fn find_source_key(keys: &[KeyRecord], curve: Curve) -> KeyShareResult<&KeyRecord> {
    keys.iter().find(|key| key.is_curve(curve)).ok_or_else(|| {
        KeyShareError::PolicyViolation(format!(
            "no key found for curve {curve}. Please create the key first"
        ))
    })
}
