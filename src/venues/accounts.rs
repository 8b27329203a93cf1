/// Account decoding and token-account instruction helpers shared by venues
use crate::constants::WSOL_MINT;
use crate::errors::{SwapError, SwapResult, TransportError};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

/// SPL token account: amount follows mint (32) and owner (32)
const TOKEN_ACCOUNT_AMOUNT_OFFSET: usize = 64;

fn invalid(address: &Pubkey, reason: String) -> TransportError {
    TransportError::InvalidAccountData {
        address: *address,
        reason,
    }
}

pub fn read_pubkey(address: &Pubkey, data: &[u8], offset: usize) -> Result<Pubkey, TransportError> {
    data.get(offset..offset + 32)
        .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok())
        .map(Pubkey::new_from_array)
        .ok_or_else(|| invalid(address, format!("no pubkey at offset {} ({} bytes)", offset, data.len())))
}

pub fn read_u64(address: &Pubkey, data: &[u8], offset: usize) -> Result<u64, TransportError> {
    data.get(offset..offset + 8)
        .and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
        .map(u64::from_le_bytes)
        .ok_or_else(|| invalid(address, format!("no u64 at offset {} ({} bytes)", offset, data.len())))
}

pub fn read_u8(address: &Pubkey, data: &[u8], offset: usize) -> Result<u8, TransportError> {
    data.get(offset)
        .copied()
        .ok_or_else(|| invalid(address, format!("no byte at offset {} ({} bytes)", offset, data.len())))
}

/// Balance of an SPL token account (Token and Token-2022 share the prefix)
pub fn read_token_amount(address: &Pubkey, data: &[u8]) -> Result<u64, TransportError> {
    read_u64(address, data, TOKEN_ACCOUNT_AMOUNT_OFFSET)
}

pub fn associated_account(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, token_program)
}

pub fn create_ata_idempotent(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Instruction {
    create_associated_token_account_idempotent(owner, owner, mint, token_program)
}

/// Create the WSOL account, fund it with `lamports` and sync its balance
pub fn wrap_sol(owner: &Pubkey, lamports: u64) -> SwapResult<Vec<Instruction>> {
    let wsol_account = associated_account(owner, &WSOL_MINT, &spl_token::id());
    let sync = spl_token::instruction::sync_native(&spl_token::id(), &wsol_account)
        .map_err(|e| SwapError::InstructionBuild(format!("sync_native: {}", e)))?;

    Ok(vec![
        create_ata_idempotent(owner, &WSOL_MINT, &spl_token::id()),
        system_instruction::transfer(owner, &wsol_account, lamports),
        sync,
    ])
}

/// Close the WSOL account, returning its lamports to the owner
pub fn unwrap_sol(owner: &Pubkey) -> SwapResult<Instruction> {
    let wsol_account = associated_account(owner, &WSOL_MINT, &spl_token::id());
    spl_token::instruction::close_account(&spl_token::id(), &wsol_account, owner, owner, &[])
        .map_err(|e| SwapError::InstructionBuild(format!("close_account: {}", e)))
}

/// ceil(value * numerator / denominator) without overflow
pub fn mul_div_ceil(value: u64, numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let product = value as u128 * numerator as u128;
    ((product + denominator as u128 - 1) / denominator as u128).min(u64::MAX as u128) as u64
}

/// floor(value * numerator / denominator) without overflow
pub fn mul_div_floor(value: u64, numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (value as u128 * numerator as u128 / denominator as u128).min(u64::MAX as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readers_check_bounds() {
        let address = Pubkey::new_unique();
        let key = Pubkey::new_unique();
        let mut data = vec![0u8; 72];
        data[8..40].copy_from_slice(&key.to_bytes());
        data[64..72].copy_from_slice(&42u64.to_le_bytes());

        assert_eq!(read_pubkey(&address, &data, 8).unwrap(), key);
        assert_eq!(read_token_amount(&address, &data).unwrap(), 42);
        assert!(read_pubkey(&address, &data, 50).is_err());
        assert!(read_u64(&address, &data, 65).is_err());
        assert!(read_u8(&address, &data, 72).is_err());
    }

    #[test]
    fn test_wrap_and_unwrap_target_same_account() {
        let owner = Pubkey::new_unique();
        let wrap = wrap_sol(&owner, 5_000).unwrap();
        assert_eq!(wrap.len(), 3);
        assert_eq!(wrap[0].program_id, spl_associated_token_account::id());
        assert_eq!(wrap[1].program_id, solana_sdk::system_program::id());
        assert_eq!(wrap[2].program_id, spl_token::id());

        let wsol_account = associated_account(&owner, &WSOL_MINT, &spl_token::id());
        assert_eq!(wrap[1].accounts[1].pubkey, wsol_account);
        let close = unwrap_sol(&owner).unwrap();
        assert_eq!(close.accounts[0].pubkey, wsol_account);
    }

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div_ceil(1_000, 2_500, 1_000_000), 3);
        assert_eq!(mul_div_floor(1_000, 2_500, 1_000_000), 2);
        assert_eq!(mul_div_ceil(u64::MAX, 1, 1), u64::MAX);
        assert_eq!(mul_div_floor(10, 1, 0), 0);
        assert_eq!(mul_div_ceil(u64::MAX, 2, 1), u64::MAX);
        assert_eq!(mul_div_floor(u64::MAX, 3, 2), u64::MAX);
    }
}
