//! Random variant selection
//!
//! A record may hold several alternative texts separated by
//! [`Token::SubrecordSeparator`]. [`VariantGroup`] splits a record into those
//! runs and picks one, either with any [`rand::Rng`] or with [`LegacyRng`],
//! which reproduces the legacy game's generator bit for bit.
//!
//! [`LegacyRng`] picks only through [`VariantGroup::choose_legacy`], which
//! takes the generator's next value modulo the run count as the index.

use rand::Rng;

use crate::error::{Error, Result};
use crate::formats::token::{Token, TokenSequence};

/// Linear congruential generator of the legacy engine.
///
/// `state = state * 1103515245 + 12345`, yielding 15-bit outputs from bits
/// 16..31 of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRng {
    state: u32,
}

impl LegacyRng {
    /// Seed used by the legacy engine before any explicit seeding
    pub const DEFAULT_SEED: u32 = 0;

    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next 15-bit value
    pub fn next_value(&mut self) -> u16 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((self.state >> 16) & 0x7FFF) as u16
    }

    /// Value in `[0, n)`, or 0 when `n` is 0
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        usize::from(self.next_value()) % n
    }
}

impl Default for LegacyRng {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

/// A record split into its alternative runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantGroup {
    runs: Vec<Vec<Token>>,
}

impl VariantGroup {
    /// Split at every separator.
    ///
    /// Separators are excluded from the runs and scanning stops at the first
    /// `EndOfRecord`. There is always at least one run, and the number of runs
    /// is the number of separators plus one.
    #[must_use]
    pub fn split(sequence: &TokenSequence) -> Self {
        let mut runs = vec![Vec::new()];
        for token in sequence {
            match token {
                Token::EndOfRecord => break,
                Token::SubrecordSeparator => runs.push(Vec::new()),
                token => {
                    if let Some(run) = runs.last_mut() {
                        run.push(token.clone());
                    }
                }
            }
        }
        Self { runs }
    }

    /// Number of runs (at least 1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether the group has no runs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    #[must_use]
    pub fn runs(&self) -> &[Vec<Token>] {
        &self.runs
    }

    /// Select the run at `index`.
    ///
    /// An empty run falls back to the run just before it, once, without
    /// re-randomising. The returned sequence is not re-terminated.
    ///
    /// # Errors
    ///
    /// [`Error::VariantIndexOutOfRange`] for an index past the last run and
    /// [`Error::DegenerateVariantSplit`] when run 0 is selected and empty.
    pub fn select(&self, index: usize) -> Result<TokenSequence> {
        let run = self.runs.get(index).ok_or(Error::VariantIndexOutOfRange {
            index,
            count: self.runs.len(),
        })?;
        if !run.is_empty() {
            return Ok(TokenSequence::new(run.clone()));
        }
        match index.checked_sub(1) {
            Some(previous) => Ok(TokenSequence::new(self.runs[previous].clone())),
            None => Err(Error::DegenerateVariantSplit { index }),
        }
    }

    /// First run with at least one token
    #[must_use]
    pub fn first_non_empty(&self) -> Option<TokenSequence> {
        self.runs
            .iter()
            .find(|run| !run.is_empty())
            .map(|run| TokenSequence::new(run.clone()))
    }

    /// Pick a run uniformly with a general-purpose generator
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TokenSequence> {
        self.select(rng.gen_range(0..self.runs.len()))
    }

    /// Pick a run with the legacy generator
    pub fn choose_legacy(&self, rng: &mut LegacyRng) -> Result<TokenSequence> {
        self.select(rng.below(self.runs.len()))
    }
}

/// Split `sequence` and pick a run with `rng`
pub fn select_variant<R: Rng + ?Sized>(sequence: &TokenSequence, rng: &mut R) -> Result<TokenSequence> {
    VariantGroup::split(sequence).choose(rng)
}

/// Split `sequence` and pick a run with the legacy generator
pub fn select_variant_legacy(sequence: &TokenSequence, rng: &mut LegacyRng) -> Result<TokenSequence> {
    VariantGroup::split(sequence).choose_legacy(rng)
}

/// Payload of the first text token, or `""`
#[must_use]
pub fn select_first_text(sequence: Option<&TokenSequence>) -> String {
    sequence
        .and_then(|s| s.texts().next())
        .map(str::to_string)
        .unwrap_or_default()
}

/// One text payload chosen uniformly, ignoring markers, or `""` if there is
/// no text at all
pub fn select_random_text_line<R: Rng + ?Sized>(sequence: &TokenSequence, rng: &mut R) -> String {
    let lines: Vec<&str> = sequence.texts().collect();
    if lines.is_empty() {
        return String::new();
    }
    lines[rng.gen_range(0..lines.len())].to_string()
}
