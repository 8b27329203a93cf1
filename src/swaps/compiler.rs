/// Swap transaction compiler
///
/// Fixed instruction order: compute budget, optional tip, venue swap
/// instructions. Venue instructions are concatenated as-is apart from any
/// compute-budget instruction, which only this module may emit.
use super::amounts::compute_unit_price;
use crate::errors::{SwapError, SwapResult};
use crate::logger::{self, LogTag};
use crate::venues::{is_compute_budget, strip_compute_budget};
use serde::Serialize;
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;

/// Inputs for one compilation
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub payer: Pubkey,
    pub venue_instructions: Vec<Instruction>,
    pub slippage: f64,
    pub priority_fee_sol: f64,
    pub compute_unit_budget: u32,
    /// Emit `set_compute_unit_limit` only when set
    pub compute_unit_limit: Option<u32>,
    /// Tip transfer placed right after the compute-budget block
    pub upfront_tip: Option<(Pubkey, u64)>,
}

/// Ordered, unsigned instruction list for one swap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSkeleton {
    #[serde(serialize_with = "serialize_payer")]
    pub payer: Pubkey,
    #[serde(skip)]
    pub instructions: Vec<Instruction>,
    /// Number of leading compute-budget instructions
    pub compute_budget_len: usize,
    /// Position of the tip transfer, if any
    pub tip_index: Option<usize>,
}

fn serialize_payer<S: serde::Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&key.to_string())
}

impl TransactionSkeleton {
    pub fn compute_budget_instructions(&self) -> &[Instruction] {
        &self.instructions[..self.compute_budget_len]
    }

    pub fn tip_instruction(&self) -> Option<&Instruction> {
        self.tip_index.and_then(|index| self.instructions.get(index))
    }

    /// Instructions after the compute-budget block and tip
    pub fn swap_instructions(&self) -> &[Instruction] {
        let start = match self.tip_index {
            Some(index) => index + 1,
            None => self.compute_budget_len,
        };
        &self.instructions[start.min(self.instructions.len())..]
    }

    /// Insert a tip transfer directly after the compute-budget block.
    /// An existing tip is replaced.
    pub fn insert_tip(&mut self, tip_address: &Pubkey, lamports: u64) {
        let tip = system_instruction::transfer(&self.payer, tip_address, lamports);
        match self.tip_index {
            Some(index) => self.instructions[index] = tip,
            None => {
                self.instructions.insert(self.compute_budget_len, tip);
                self.tip_index = Some(self.compute_budget_len);
            }
        }
    }

    pub fn to_message(&self, recent_blockhash: &Hash) -> Message {
        Message::new_with_blockhash(&self.instructions, Some(&self.payer), recent_blockhash)
    }

    pub fn to_unsigned_transaction(&self, recent_blockhash: &Hash) -> Transaction {
        Transaction::new_unsigned(self.to_message(recent_blockhash))
    }
}

/// Slippage must be a fraction in [0, 1]
pub fn validate_slippage(slippage: f64) -> SwapResult<()> {
    if slippage.is_nan() || !(0.0..=1.0).contains(&slippage) {
        return Err(SwapError::invalid(
            "slippage",
            format!("{} is outside [0, 1]", slippage),
        ));
    }
    Ok(())
}

pub fn compile(request: CompileRequest) -> SwapResult<TransactionSkeleton> {
    validate_slippage(request.slippage)?;

    let mut instructions = Vec::with_capacity(request.venue_instructions.len() + 3);

    if let Some(limit) = request.compute_unit_limit {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(limit));
    }
    let price = compute_unit_price(request.priority_fee_sol, request.compute_unit_budget);
    if price > 0 {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_price(price));
    }
    let compute_budget_len = instructions.len();

    let mut skeleton = TransactionSkeleton {
        payer: request.payer,
        instructions,
        compute_budget_len,
        tip_index: None,
    };

    if let Some((tip_address, lamports)) = request.upfront_tip {
        skeleton.insert_tip(&tip_address, lamports);
    }

    let venue_count = request.venue_instructions.len();
    let venue_instructions = strip_compute_budget(request.venue_instructions);
    if venue_instructions.len() != venue_count {
        logger::warning(
            LogTag::Compiler,
            &format!(
                "Dropped {} venue compute-budget instruction(s)",
                venue_count - venue_instructions.len()
            ),
        );
    }
    skeleton.instructions.extend(venue_instructions);

    logger::debug(
        LogTag::Compiler,
        &format!(
            "Compiled {} instructions (compute budget {}, cu price {} micro-lamports, tip {})",
            skeleton.instructions.len(),
            skeleton.compute_budget_len,
            price,
            skeleton.tip_index.is_some()
        ),
    );

    debug_assert!(skeleton
        .swap_instructions()
        .iter()
        .all(|ix| !is_compute_budget(ix)));

    Ok(skeleton)
}
