use seloria_core::{Hash, KvData, KvValue, NamespaceMeta, NamespacePolicy, PublicKey};
use seloria_state::{ChainState, Storage};
use tracing::debug;

use crate::error::VmError;

/// Execute NAMESPACE_CREATE operation
pub fn execute_namespace_create<S: Storage>(
    state: &mut ChainState<S>,
    sender: &PublicKey,
    ns_id: &Hash,
    policy: NamespacePolicy,
    allowlist: Vec<PublicKey>,
    min_write_stake: u64,
) -> Result<(), VmError> {
    // Check namespace doesn't already exist
    if state.get_namespace(ns_id).is_some() {
        return Err(VmError::NamespaceExists(ns_id.to_hex()));
    }

    // Create namespace metadata
    let ns_meta = NamespaceMeta {
        ns_id: *ns_id,
        owner: *sender,
        policy,
        allowlist,
        min_write_stake,
    };

    state.add_namespace(ns_meta);

    debug!("Created namespace {} owned by {}", ns_id, sender);

    Ok(())
}

/// Execute KV_PUT operation
pub fn execute_kv_put<S: Storage>(
    state: &mut ChainState<S>,
    sender: &PublicKey,
    ns_id: &Hash,
    key: &str,
    value: KvValue,
) -> Result<(), VmError> {
    // Check namespace exists
    let ns = state
        .get_namespace(ns_id)
        .ok_or_else(|| VmError::NamespaceNotFound(ns_id.to_hex()))?;

    // Check write permission
    let sender_balance = state.get_balance(sender);
    if !ns.can_write(sender, sender_balance) {
        return Err(VmError::NamespaceUnauthorized);
    }

    // Put the value
    state.kv_put(*ns_id, key.to_string(), value);

    debug!("Put key '{}' in namespace {}", key, ns_id);

    Ok(())
}

/// Execute KV_DEL operation
pub fn execute_kv_del<S: Storage>(
    state: &mut ChainState<S>,
    sender: &PublicKey,
    ns_id: &Hash,
    key: &str,
) -> Result<(), VmError> {
    // Check namespace exists
    let ns = state
        .get_namespace(ns_id)
        .ok_or_else(|| VmError::NamespaceNotFound(ns_id.to_hex()))?;

    // Check write permission
    let sender_balance = state.get_balance(sender);
    if !ns.can_write(sender, sender_balance) {
        return Err(VmError::NamespaceUnauthorized);
    }

    // Check key exists
    if state.kv_get(ns_id, key).is_none() {
        return Err(VmError::KeyNotFound(key.to_string()));
    }

    // Delete the key
    state.kv_delete(ns_id, key);

    debug!("Deleted key '{}' from namespace {}", key, ns_id);

    Ok(())
}

/// Execute KV_APPEND operation
pub fn execute_kv_append<S: Storage>(
    state: &mut ChainState<S>,
    sender: &PublicKey,
    ns_id: &Hash,
    key: &str,
    value: KvValue,
) -> Result<(), VmError> {
    // Check namespace exists
    let ns = state
        .get_namespace(ns_id)
        .ok_or_else(|| VmError::NamespaceNotFound(ns_id.to_hex()))?;

    // Check write permission
    let sender_balance = state.get_balance(sender);
    if !ns.can_write(sender, sender_balance) {
        return Err(VmError::NamespaceUnauthorized);
    }

    // Get existing value or create empty
    let existing = state.kv_get(ns_id, key).cloned();

    let new_value = match existing {
        Some(existing_val) => {
            // Append to existing inline data
            match (existing_val.data, &value.data) {
                (KvData::Inline(mut existing_data), KvData::Inline(new_data)) => {
                    existing_data.extend_from_slice(new_data);
                    KvValue {
                        codec: existing_val.codec,
                        data: KvData::Inline(existing_data),
                    }
                }
                _ => {
                    // Can't append to/with references, just replace
                    value
                }
            }
        }
        None => value,
    };

    state.kv_put(*ns_id, key.to_string(), new_value);

    debug!("Appended to key '{}' in namespace {}", key, ns_id);

    Ok(())
}
