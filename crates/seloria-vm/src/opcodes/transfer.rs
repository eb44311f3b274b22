use seloria_core::PublicKey;
use seloria_state::{ChainState, Storage};
use tracing::debug;

use crate::error::VmError;

/// Execute TRANSFER operation
pub fn execute_transfer<S: Storage>(
    state: &mut ChainState<S>,
    sender: &PublicKey,
    to: &PublicKey,
    amount: u64,
) -> Result<(), VmError> {
    // Check sender has sufficient balance
    let sender_balance = state.get_balance(sender);
    if sender_balance < amount {
        return Err(VmError::InsufficientBalance {
            have: sender_balance,
            need: amount,
        });
    }

    // Perform transfer
    state.transfer(sender, to, amount)?;

    debug!("Transferred {} from {} to {}", amount, sender, to);

    Ok(())
}
