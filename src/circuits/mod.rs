// src/circuits/mod.rs

//! Ordered sequences of `Operation`s and the builders that produce the
//! circuits used by phase estimation.
//!
//! `Circuit` is the description handed to a `Backend`: a gate list over qubit
//! indices plus the width of the classical register measurements write into.
//! The `modexp` and `qft` submodules build the two reusable blocks of the
//! factoring circuit.

pub mod modexp;
pub mod qft;

use crate::core::{QubitId, ShorError};
use crate::operations::Operation;
use std::fmt;

/// An ordered list of operations over `num_qubits` qubits and `num_clbits`
/// classical bits.
///
/// The register widths grow automatically to cover every index an added
/// operation mentions; they can also be declared larger up front.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    num_clbits: usize,
    operations: Vec<Operation>,
    name: Option<String>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self {
            num_qubits: 0,
            num_clbits: 0,
            operations: Vec::new(),
            name: None,
        }
    }

    /// Adds a single operation to the end of the circuit's sequence,
    /// widening the registers if needed.
    pub fn add_operation(&mut self, op: Operation) {
        for qubit in op.involved_qubits() {
            self.num_qubits = self.num_qubits.max(qubit.0 + 1);
        }
        if let Some(clbit) = op.clbit() {
            self.num_clbits = self.num_clbits.max(clbit + 1);
        }
        self.operations.push(op);
    }

    /// Adds multiple operations from an iterator to the end of the circuit's sequence.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op);
        }
    }

    /// Appends `other`, sending its qubit `i` to `mapping[i]`.
    /// Classical bits are appended unchanged.
    ///
    /// # Errors
    /// `ShorError::InvalidOperation` if `mapping` does not cover every qubit
    /// of `other` or maps two qubits onto the same one.
    pub fn append_mapped(&mut self, other: &Circuit, mapping: &[QubitId]) -> Result<(), ShorError> {
        if mapping.len() < other.num_qubits() {
            return Err(ShorError::InvalidOperation {
                message: format!(
                    "Qubit mapping of length {} cannot place a {}-qubit circuit",
                    mapping.len(),
                    other.num_qubits()
                ),
            });
        }
        let mut seen = mapping.to_vec();
        seen.sort();
        seen.dedup();
        if seen.len() != mapping.len() {
            return Err(ShorError::InvalidOperation { message: "Qubit mapping contains duplicates".to_string() });
        }
        for op in other.operations() {
            self.add_operation(op.map_qubits(|q| mapping[q.0]));
        }
        Ok(())
    }

    /// Number of qubits the circuit acts on.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Width of the classical register.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Returns a slice containing the ordered sequence of operations in this circuit.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the total number of operations defined in the circuit.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns `true` if any operation is a measurement.
    pub fn has_measurements(&self) -> bool {
        self.operations.iter().any(|op| matches!(op, Operation::Measure { .. }))
    }

    /// Optional name, e.g. `"QFT†"`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Declares the qubit register to be at least `n` wide.
    pub fn with_qubits(mut self, n: usize) -> Self {
        self.circuit.num_qubits = self.circuit.num_qubits.max(n);
        self
    }

    /// Declares the classical register to be at least `n` wide.
    pub fn with_clbits(mut self, n: usize) -> Self {
        self.circuit.num_clbits = self.circuit.num_clbits.max(n);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.circuit.set_name(name);
        self
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Appends a sub-circuit placed on `mapping`. See [`Circuit::append_mapped`].
    pub fn append_mapped(mut self, other: &Circuit, mapping: &[QubitId]) -> Result<Self, ShorError> {
        self.circuit.append_mapped(other, mapping)?;
        Ok(self)
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.name.as_deref().unwrap_or("Circuit");
        if self.operations.is_empty() || self.num_qubits == 0 {
            return writeln!(f, "{}[0 operations on {} qubits]", title, self.num_qubits);
        }

        let ops = &self.operations;
        let num_ops = ops.len();
        let num_qubits = self.num_qubits;

        let max_label_width = format!("{}", QubitId(num_qubits - 1)).len();
        let label_padding = " ".repeat(max_label_width + 2);

        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] holds the gate/wire segment,
        // v_connect[row][time] the connector drawn below that row.
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_qubits];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        fn connect(v_connect: &mut [Vec<char>], rows: &[usize], t: usize) {
            if let (Some(r_min), Some(r_max)) = (rows.iter().min(), rows.iter().max()) {
                for row_vec in v_connect.iter_mut().take(*r_max).skip(*r_min) {
                    row_vec[t] = V_WIRE;
                }
            }
        }

        for (t, op) in ops.iter().enumerate() {
            match op {
                Operation::Hadamard { target } => op_grid[target.0][t] = format_gate("H"),
                Operation::PauliX { target } => op_grid[target.0][t] = format_gate("X"),
                Operation::Swap { qubit1, qubit2 } => {
                    op_grid[qubit1.0][t] = format_gate("x");
                    op_grid[qubit2.0][t] = format_gate("x");
                    connect(&mut v_connect, &[qubit1.0, qubit2.0], t);
                }
                Operation::ControlledPhase { control, target, .. } => {
                    op_grid[control.0][t] = format_gate("@");
                    op_grid[target.0][t] = format_gate("P");
                    connect(&mut v_connect, &[control.0, target.0], t);
                }
                Operation::ControlledPermutation { control, targets, label, .. } => {
                    op_grid[control.0][t] = format_gate("@");
                    let symbol = label.split_whitespace().next().unwrap_or("U");
                    for target in targets {
                        op_grid[target.0][t] = format_gate(symbol);
                    }
                    let rows: Vec<usize> = op.involved_qubits().iter().map(|q| q.0).collect();
                    connect(&mut v_connect, &rows, t);
                }
                Operation::Measure { qubit, .. } => op_grid[qubit.0][t] = format_gate("M"),
            }
        }

        writeln!(f, "{}[{} operations on {} qubits, {} clbits]", title, num_ops, num_qubits, self.num_clbits)?;
        for r in 0..num_qubits {
            let label = format!("{}: ", QubitId(r));
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
