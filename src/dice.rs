//! Abstract randomness for the encounter engine.
//!
//! The engine never calls `rand` directly — every roll goes through a
//! [`DiceService`], so a deterministic sequence can be substituted in tests
//! and replays without touching engine code. Formula grammar:
//! `[N]d<S>[+M|-M]`, `N` defaults to 1, `S` is required and positive.

use crate::error::EngineFault;
use rand::Rng;
use std::fmt;

/// A parsed `NdS+/-M` formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceFormula {
    pub count: u32,
    pub sides: u32,
    pub modifier: i64,
}

impl DiceFormula {
    pub fn parse(expr: &str) -> Result<Self, EngineFault> {
        let s = expr.trim().replace(' ', "");
        let bad = || EngineFault::Internal(format!("malformed dice formula: {expr}"));

        let d_pos = s.find('d').ok_or_else(bad)?;
        let (count_str, rest) = s.split_at(d_pos);
        let rest = &rest[1..]; // drop the 'd'

        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str.parse().map_err(|_| bad())?
        };

        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(sign_pos) => {
                let (sides_str, mod_str) = rest.split_at(sign_pos);
                let modifier: i64 = mod_str.parse().map_err(|_| bad())?;
                (sides_str, modifier)
            }
            None => (rest, 0),
        };
        let sides: u32 = sides_str.parse().map_err(|_| bad())?;
        if sides == 0 {
            return Err(bad());
        }

        Ok(DiceFormula { count, sides, modifier })
    }
}

/// Abstract dice roller, injected into the engine and threaded into every action.
pub trait DiceService: fmt::Debug {
    /// Evaluate a formula string, e.g. `"2d6+1"`.
    fn roll(&mut self, expr: &str) -> Result<i64, EngineFault> {
        let formula = DiceFormula::parse(expr)?;
        let mut total = formula.modifier;
        for _ in 0..formula.count {
            total += self.roll_die(formula.sides)?;
        }
        Ok(total)
    }

    /// Roll a single d20.
    fn d20(&mut self) -> Result<i64, EngineFault> {
        self.roll_die(20)
    }

    /// Roll a single die of the given number of sides, returning a value in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> Result<i64, EngineFault>;

    /// Pick an index uniformly at random in `0..len`. `len` must be nonzero.
    fn choice_index(&mut self, len: usize) -> Result<usize, EngineFault>;
}

/// Choose an element from a non-empty slice via the dice service.
pub fn choose<'a, T>(dice: &mut dyn DiceService, items: &'a [T]) -> Result<&'a T, EngineFault> {
    if items.is_empty() {
        return Err(EngineFault::Internal("choice from empty sequence".to_string()));
    }
    let idx = dice.choice_index(items.len())?;
    Ok(&items[idx])
}

/// Production dice service backed by true randomness.
#[derive(Debug, Default)]
pub struct RandomDice;

impl DiceService for RandomDice {
    fn roll_die(&mut self, sides: u32) -> Result<i64, EngineFault> {
        Ok(rand::thread_rng().gen_range(1..=sides as i64))
    }

    fn choice_index(&mut self, len: usize) -> Result<usize, EngineFault> {
        Ok(rand::thread_rng().gen_range(0..len))
    }
}

/// Deterministic dice service: a fixed sequence of raw face values consumed
/// front-to-back, one value per atomic die rolled (regardless of the die's
/// side count) or per choice made. Raises [`EngineFault::DiceExhausted`]
/// rather than panicking when the sequence underflows.
#[derive(Debug, Clone, Default)]
pub struct FixedDice {
    sequence: std::collections::VecDeque<i64>,
}

impl FixedDice {
    pub fn new(sequence: impl IntoIterator<Item = i64>) -> Self {
        Self { sequence: sequence.into_iter().collect() }
    }

    fn next_value(&mut self) -> Result<i64, EngineFault> {
        self.sequence.pop_front().ok_or_else(|| {
            EngineFault::DiceExhausted("fixed dice sequence underflowed".to_string())
        })
    }
}

impl DiceService for FixedDice {
    fn roll_die(&mut self, _sides: u32) -> Result<i64, EngineFault> {
        self.next_value()
    }

    fn choice_index(&mut self, len: usize) -> Result<usize, EngineFault> {
        if len == 0 {
            return Err(EngineFault::Internal("choice from empty sequence".to_string()));
        }
        let raw = self.next_value()?;
        Ok((raw.unsigned_abs() as usize) % len)
    }
}
