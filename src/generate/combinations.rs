//! Depth-first username enumerator with inline filtering and a global result cap

use regex::Regex;
use std::iter::FusedIterator;

use crate::error::Result;
use crate::types::GenerationConfig;

/// Search spaces above this size get a warning when a pattern may reject most of them
const LARGE_SEARCH_SPACE: u128 = 10_000_000;

/// Validate `config` and build a generator for it
pub fn generate(config: &GenerationConfig) -> Result<CombinationGenerator> {
    CombinationGenerator::new(config)
}

/// A validated, immutable generation plan.
///
/// Every call to [`CombinationGenerator::iter`] starts a fresh enumeration, so the
/// same plan can be replayed and always yields the same sequence.
#[derive(Debug, Clone)]
pub struct CombinationGenerator {
    alphabet: Vec<char>,
    min_length: usize,
    max_length: usize,
    pattern: Option<Regex>,
    result_cap: usize,
}

impl CombinationGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        config.validate()?;

        let pattern = config
            .pattern
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(Regex::new)
            .transpose()?;

        // Repeated characters would yield the same string twice.
        let mut alphabet = Vec::with_capacity(config.alphabet.len());
        for ch in &config.alphabet {
            if !alphabet.contains(ch) {
                alphabet.push(*ch);
            }
        }

        let generator = Self {
            alphabet,
            min_length: config.min_length,
            max_length: config.max_length,
            pattern,
            result_cap: config.result_cap,
        };

        if generator.pattern.is_some() {
            match generator.search_space() {
                Some(space) if space <= LARGE_SEARCH_SPACE => {}
                space => tracing::warn!(
                    search_space = ?space,
                    min_length = generator.min_length,
                    max_length = generator.max_length,
                    "Pattern filter over a large search space; a rarely matching pattern walks all of it"
                ),
            }
        }

        Ok(generator)
    }

    /// Start a new enumeration from the first candidate
    pub fn iter(&self) -> Combinations<'_> {
        Combinations {
            plan: self,
            length: self.min_length,
            indices: Vec::with_capacity(self.min_length),
            in_length: false,
            accepted: 0,
            evaluated: 0,
            done: false,
        }
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn result_cap(&self) -> usize {
        self.result_cap
    }

    /// Unfiltered number of strings across all lengths, `None` on overflow
    pub fn search_space(&self) -> Option<u128> {
        let base = self.alphabet.len() as u128;
        if base == 1 {
            return Some((self.max_length - self.min_length) as u128 + 1);
        }
        (self.min_length..=self.max_length).try_fold(0u128, |total, length| {
            let per_length = base.checked_pow(u32::try_from(length).ok()?)?;
            total.checked_add(per_length)
        })
    }

    fn accepts(&self, candidate: &str) -> bool {
        self.pattern.as_ref().map_or(true, |re| re.is_match(candidate))
    }
}

impl<'a> IntoIterator for &'a CombinationGenerator {
    type Item = String;
    type IntoIter = Combinations<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy candidate sequence.
///
/// Lengths are walked in ascending order; within a length the rightmost position
/// varies fastest, which is the depth-first order over the alphabet as given.
/// Memory stays proportional to the current length no matter how large the space is.
#[derive(Debug)]
pub struct Combinations<'a> {
    plan: &'a CombinationGenerator,
    length: usize,
    indices: Vec<usize>,
    in_length: bool,
    accepted: usize,
    evaluated: u64,
    done: bool,
}

impl Combinations<'_> {
    /// Number of completed strings tested against the pattern so far
    pub fn evaluated(&self) -> u64 {
        self.evaluated
    }

    fn render(&self) -> String {
        self.indices.iter().map(|&i| self.plan.alphabet[i]).collect()
    }

    /// Step to the next sibling, backtracking to shallower positions as they run out.
    /// Returns false once every string of the current length has been visited.
    fn advance(&mut self) -> bool {
        let base = self.plan.alphabet.len();
        for position in (0..self.indices.len()).rev() {
            self.indices[position] += 1;
            if self.indices[position] < base {
                return true;
            }
            self.indices[position] = 0;
        }
        false
    }

    fn next_unfiltered(&mut self) -> Option<String> {
        loop {
            if self.length > self.plan.max_length {
                return None;
            }
            if !self.in_length {
                self.indices.clear();
                self.indices.resize(self.length, 0);
                self.in_length = true;
                return Some(self.render());
            }
            if self.advance() {
                return Some(self.render());
            }
            self.length += 1;
            self.in_length = false;
        }
    }
}

impl Iterator for Combinations<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while let Some(candidate) = self.next_unfiltered() {
            self.evaluated += 1;
            if self.plan.accepts(&candidate) {
                self.accepted += 1;
                // The cap halts every remaining length, not only the current one.
                if self.accepted >= self.plan.result_cap {
                    self.done = true;
                }
                return Some(candidate);
            }
        }

        self.done = true;
        None
    }
}

impl FusedIterator for Combinations<'_> {}
