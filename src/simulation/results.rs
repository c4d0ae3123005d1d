// src/simulation/results.rs
use std::collections::BTreeMap;
use std::fmt;

/// Measurement record of a simulated run.
/// One bitstring per shot, classical bit `n-1` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    memory: Vec<String>,
}

impl SimulationResult {
    pub(crate) fn new() -> Self {
        Self { memory: Vec::new() }
    }

    pub(crate) fn record_shot(&mut self, bitstring: String) {
        self.memory.push(bitstring);
    }

    /// Per-shot bitstrings in execution order.
    pub fn memory(&self) -> &[String] {
        &self.memory
    }

    pub fn into_memory(self) -> Vec<String> {
        self.memory
    }

    /// Number of shots recorded.
    pub fn shots(&self) -> usize {
        self.memory.len()
    }

    /// Histogram of observed bitstrings.
    pub fn counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for bits in &self.memory {
            *counts.entry(bits.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// The most often observed bitstring; ties go to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<String> {
        self.counts()
            .into_iter()
            .fold(None, |best: Option<(String, usize)>, (bits, n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((bits, n)),
            })
            .map(|(bits, _)| bits)
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results ({} shots):", self.shots())?;
        if self.memory.is_empty() {
            writeln!(f, "  No shots were recorded.")?;
        } else {
            for (bits, n) in self.counts() {
                writeln!(f, "    {}: {}", bits, n)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_of(shots: &[&str]) -> SimulationResult {
        let mut result = SimulationResult::new();
        for s in shots {
            result.record_shot(s.to_string());
        }
        result
    }

    #[test]
    fn counts_and_most_frequent() {
        let result = result_of(&["01", "11", "01", "00"]);
        assert_eq!(result.shots(), 4);
        assert_eq!(result.counts().get("01"), Some(&2));
        assert_eq!(result.most_frequent().as_deref(), Some("01"));
    }

    #[test]
    fn most_frequent_tie_prefers_smallest() {
        let result = result_of(&["11", "10"]);
        assert_eq!(result.most_frequent().as_deref(), Some("10"));
        assert_eq!(SimulationResult::new().most_frequent(), None);
    }
}
