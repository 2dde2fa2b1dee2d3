use soroban_sdk::{token, Address, Env};

use crate::ContractError;

// Token calls go through the `try_` client so a failing transfer surfaces as
// `ExternalTransferFailed` instead of trapping the whole invocation.

/// Move `amount` from `owner` into ledger custody using the allowance the
/// owner granted this contract.
pub fn pull(env: &Env, token: &Address, owner: &Address, amount: i128) -> Result<(), ContractError> {
    let custodian = env.current_contract_address();
    match token::TokenClient::new(env, token).try_transfer_from(
        &custodian,
        owner,
        &custodian,
        &amount,
    ) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::ExternalTransferFailed),
    }
}

/// Move `amount` from `from` into ledger custody on `from`'s own authority.
pub fn deposit(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), ContractError> {
    match token::TokenClient::new(env, token).try_transfer(
        from,
        &env.current_contract_address(),
        &amount,
    ) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::ExternalTransferFailed),
    }
}

/// Move `amount` out of ledger custody to `recipient`.
pub fn push(
    env: &Env,
    token: &Address,
    recipient: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    match token::TokenClient::new(env, token).try_transfer(
        &env.current_contract_address(),
        recipient,
        &amount,
    ) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::ExternalTransferFailed),
    }
}

/// Ledger's custody balance of `token`.
pub fn balance(env: &Env, token: &Address) -> Result<i128, ContractError> {
    match token::TokenClient::new(env, token).try_balance(&env.current_contract_address()) {
        Ok(Ok(amount)) => Ok(amount),
        _ => Err(ContractError::ExternalTransferFailed),
    }
}
