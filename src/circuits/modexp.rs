// src/circuits/modexp.rs

//! Controlled modular multiplication `|x> -> |a^k x mod 15>` on a 4-qubit register.
//!
//! Two realizations are available and produce the same unitary:
//!
//! * [`ModExpRealization::LookupTable`] emits one `ControlledPermutation`
//!   whose table is computed from modular arithmetic.
//! * [`ModExpRealization::SwapNetwork`] emits the gate-level network (register
//!   swaps selected by case on `a`, then a full bit flip for `a ∈ {7, 11, 13}`),
//!   repeated `k mod 4` times, with every gate sharing the same control.
//!
//! Multiplication by a unit of Z/15 is a rotation of the 4-bit register,
//! complemented when the unit is `-2^j`. The two register values outside the
//! group (0 and 15) are mapped the way that rotation/complement maps them, so
//! both realizations are permutations of all 16 states.

use crate::core::constants::{AUX_QUBITS, MODULUS, is_allowed_base};
use crate::core::{QubitId, ShorError};
use crate::operations::Operation;

/// Number of basis states of the auxiliary register.
pub const REGISTER_STATES: usize = 1 << AUX_QUBITS;

/// Exponent of the unit group mod 15: every single-step network `U` has `U^4 = I`
/// on all 16 register states.
pub const NETWORK_PERIOD: u64 = 4;

/// How the controlled multiplication is lowered to operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModExpRealization {
    /// A single controlled permutation built from a precomputed table.
    #[default]
    LookupTable,
    /// Controlled swaps and bit flips, one network per multiplication.
    SwapNetwork,
}

/// A gate of the single-multiplication network, addressed by register position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterGate {
    /// Exchange register bits `i` and `j`.
    Swap(usize, usize),
    /// Flip register bit `i`.
    Flip(usize),
}

impl RegisterGate {
    /// Classical action of the gate on a register value.
    pub fn apply(self, value: usize) -> usize {
        match self {
            RegisterGate::Swap(i, j) => {
                let bi = (value >> i) & 1;
                let bj = (value >> j) & 1;
                if bi == bj { value } else { value ^ ((1 << i) | (1 << j)) }
            }
            RegisterGate::Flip(i) => value ^ (1 << i),
        }
    }
}

/// `base^exp mod modulus` by square-and-multiply.
pub(crate) fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let mut result = 1u64;
    let mut b = base % modulus;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % modulus;
        }
        b = b * b % modulus;
        exp >>= 1;
    }
    result
}

/// Builds controlled `x -> a^k x mod 15` blocks for a fixed base `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModExpBuilder {
    base: u64,
}

impl ModExpBuilder {
    /// # Errors
    /// `ShorError::InvalidBase` unless `base` is one of 2, 4, 7, 8, 11, 13.
    pub fn new(base: u64) -> Result<Self, ShorError> {
        if !is_allowed_base(base) {
            return Err(ShorError::InvalidBase { base });
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    /// `a^power mod 15`.
    pub fn multiplier(&self, power: u64) -> u64 {
        mod_pow(self.base, power, MODULUS)
    }

    /// Image of every register value under multiplication by `a^power`.
    pub fn permutation_table(&self, power: u64) -> [usize; REGISTER_STATES] {
        let n = MODULUS as usize;
        let m = self.multiplier(power) as usize;
        let mut table = [0usize; REGISTER_STATES];
        for (x, image) in table.iter_mut().enumerate().take(n).skip(1) {
            *image = x * m % n;
        }
        // Units 1, 2, 4, 8 are pure rotations; 7, 11, 13, 14 are complemented rotations.
        let complemented = !m.is_power_of_two();
        table[0] = if complemented { n } else { 0 };
        table[n] = if complemented { 0 } else { n };
        table
    }

    /// Gates realizing a single multiplication by `a`.
    pub fn single_step_network(&self) -> Vec<RegisterGate> {
        let mut gates = Vec::with_capacity(7);
        match self.base {
            2 | 13 => gates.extend([RegisterGate::Swap(2, 3), RegisterGate::Swap(1, 2), RegisterGate::Swap(0, 1)]),
            7 | 8 => gates.extend([RegisterGate::Swap(0, 1), RegisterGate::Swap(1, 2), RegisterGate::Swap(2, 3)]),
            4 | 11 => gates.extend([RegisterGate::Swap(1, 3), RegisterGate::Swap(0, 2)]),
            _ => {}
        }
        if matches!(self.base, 7 | 11 | 13) {
            gates.extend((0..AUX_QUBITS).map(RegisterGate::Flip));
        }
        gates
    }

    /// Lookup-table realization: one controlled permutation labelled `"{a}^{power} mod 15"`.
    pub fn controlled(&self, control: QubitId, targets: &[QubitId], power: u64) -> Result<Operation, ShorError> {
        check_register(control, targets)?;
        Ok(Operation::ControlledPermutation {
            control,
            targets: targets.to_vec(),
            table: self.permutation_table(power).to_vec(),
            label: format!("{}^{} mod {}", self.base, power, MODULUS),
        })
    }

    /// Swap-network realization: the single-step network repeated `power mod 4` times.
    pub fn controlled_network(&self, control: QubitId, targets: &[QubitId], power: u64) -> Result<Vec<Operation>, ShorError> {
        check_register(control, targets)?;
        let step: Vec<Operation> = self
            .single_step_network()
            .into_iter()
            .map(|gate| controlled_register_gate(control, targets, gate))
            .collect();
        let repeats = (power % NETWORK_PERIOD) as usize;
        let mut ops = Vec::with_capacity(step.len() * repeats);
        for _ in 0..repeats {
            ops.extend(step.iter().cloned());
        }
        Ok(ops)
    }

    /// Dispatches on `realization`.
    pub fn controlled_with(
        &self,
        realization: ModExpRealization,
        control: QubitId,
        targets: &[QubitId],
        power: u64,
    ) -> Result<Vec<Operation>, ShorError> {
        match realization {
            ModExpRealization::LookupTable => Ok(vec![self.controlled(control, targets, power)?]),
            ModExpRealization::SwapNetwork => self.controlled_network(control, targets, power),
        }
    }
}

fn check_register(control: QubitId, targets: &[QubitId]) -> Result<(), ShorError> {
    if targets.len() != AUX_QUBITS {
        return Err(ShorError::InvalidOperation {
            message: format!("Modular exponentiation needs {} target qubits, got {}", AUX_QUBITS, targets.len()),
        });
    }
    if targets.contains(&control) {
        return Err(ShorError::InvalidOperation {
            message: format!("Control {} is also a target", control),
        });
    }
    Ok(())
}

fn controlled_register_gate(control: QubitId, targets: &[QubitId], gate: RegisterGate) -> Operation {
    match gate {
        RegisterGate::Swap(i, j) => Operation::ControlledPermutation {
            control,
            targets: vec![targets[i], targets[j]],
            table: vec![0, 2, 1, 3],
            label: "swap".to_string(),
        },
        RegisterGate::Flip(i) => Operation::ControlledPermutation {
            control,
            targets: vec![targets[i]],
            table: vec![1, 0],
            label: "X".to_string(),
        },
    }
}
