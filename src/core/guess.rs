//! Type guessing
//!
//! Guessers look at external metadata about a class property (ORM mapping,
//! validation constraints, ...) and suggest a block type, its options, and
//! secondary values such as whether the field is required. Each suggestion
//! carries a [`Confidence`]; a [`TypeGuesserChain`] asks every guesser and keeps
//! the most confident answer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::BlockError;
use super::options::Options;

/// Confidence of a guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl TryFrom<i64> for Confidence {
    type Error = BlockError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Confidence::Low),
            1 => Ok(Confidence::Medium),
            2 => Ok(Confidence::High),
            other => Err(BlockError::InvalidArgument(format!(
                "The confidence should be one of Low (0), Medium (1) or High (2), {other} given"
            ))),
        }
    }
}

/// Anything ranked by a confidence
pub trait Guess {
    fn confidence(&self) -> Confidence;
}

/// Return the guess with the highest confidence; ties go to the first one seen
pub fn best_guess<G: Guess>(guesses: impl IntoIterator<Item = G>) -> Option<G> {
    guesses.into_iter().fold(None, |best, guess| match best {
        Some(best) if best.confidence() >= guess.confidence() => Some(best),
        _ => Some(guess),
    })
}

/// Suggested block type with its options
#[derive(Debug, Clone, PartialEq)]
pub struct TypeGuess {
    type_name: String,
    options: Options,
    confidence: Confidence,
}

impl TypeGuess {
    pub fn new(type_name: impl Into<String>, options: Options, confidence: Confidence) -> Self {
        Self {
            type_name: type_name.into(),
            options,
            confidence,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl Guess for TypeGuess {
    fn confidence(&self) -> Confidence {
        self.confidence
    }
}

/// Suggested scalar value
#[derive(Debug, Clone, PartialEq)]
pub struct ValueGuess<T> {
    value: T,
    confidence: Confidence,
}

impl<T> ValueGuess<T> {
    pub fn new(value: T, confidence: Confidence) -> Self {
        Self { value, confidence }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T> Guess for ValueGuess<T> {
    fn confidence(&self) -> Confidence {
        self.confidence
    }
}

/// Metadata-driven guesser
pub trait TypeGuesser: Send + Sync {
    /// Guess the block type of `class::property`
    fn guess_type(&self, class: &str, property: &str) -> Option<TypeGuess>;

    /// Guess whether `class::property` is required
    fn guess_required(&self, _class: &str, _property: &str) -> Option<ValueGuess<bool>> {
        None
    }

    /// Guess the maximum length of `class::property`
    fn guess_max_length(&self, _class: &str, _property: &str) -> Option<ValueGuess<u64>> {
        None
    }
}

/// Asks every guesser and returns the best answer of each kind
#[derive(Clone, Default)]
pub struct TypeGuesserChain {
    guessers: Vec<Arc<dyn TypeGuesser>>,
}

impl TypeGuesserChain {
    pub fn new(guessers: Vec<Arc<dyn TypeGuesser>>) -> Self {
        Self { guessers }
    }

    pub fn len(&self) -> usize {
        self.guessers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guessers.is_empty()
    }
}

impl TypeGuesser for TypeGuesserChain {
    fn guess_type(&self, class: &str, property: &str) -> Option<TypeGuess> {
        best_guess(self.guessers.iter().filter_map(|g| g.guess_type(class, property)))
    }

    fn guess_required(&self, class: &str, property: &str) -> Option<ValueGuess<bool>> {
        best_guess(self.guessers.iter().filter_map(|g| g.guess_required(class, property)))
    }

    fn guess_max_length(&self, class: &str, property: &str) -> Option<ValueGuess<u64>> {
        best_guess(self.guessers.iter().filter_map(|g| g.guess_max_length(class, property)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGuesser(&'static str, Confidence);

    impl TypeGuesser for FixedGuesser {
        fn guess_type(&self, _class: &str, _property: &str) -> Option<TypeGuess> {
            Some(TypeGuess::new(self.0, Options::new(), self.1))
        }

        fn guess_required(&self, _class: &str, _property: &str) -> Option<ValueGuess<bool>> {
            Some(ValueGuess::new(self.1 == Confidence::High, self.1))
        }
    }

    #[test]
    fn test_best_guess_picks_highest_confidence() {
        let guesses = vec![
            TypeGuess::new("a", Options::new(), Confidence::Low),
            TypeGuess::new("b", Options::new(), Confidence::Low),
            TypeGuess::new("c", Options::new(), Confidence::High),
            TypeGuess::new("d", Options::new(), Confidence::Medium),
        ];
        assert_eq!(best_guess(guesses).unwrap().type_name(), "c");
    }

    #[test]
    fn test_best_guess_ties_keep_first_seen() {
        let guesses = vec![
            ValueGuess::new(1, Confidence::Medium),
            ValueGuess::new(2, Confidence::Medium),
            ValueGuess::new(3, Confidence::Low),
        ];
        assert_eq!(best_guess(guesses).unwrap().into_value(), 1);
        assert!(best_guess(Vec::<ValueGuess<u8>>::new()).is_none());
    }

    #[test]
    fn test_confidence_out_of_range_is_rejected() {
        assert_eq!(Confidence::try_from(2).unwrap(), Confidence::High);
        assert!(matches!(Confidence::try_from(3), Err(BlockError::InvalidArgument(_))));
        assert!(matches!(Confidence::try_from(-1), Err(BlockError::InvalidArgument(_))));
    }

    #[test]
    fn test_chain_returns_best_of_each_kind() {
        let chain = TypeGuesserChain::new(vec![
            Arc::new(FixedGuesser("text", Confidence::Medium)),
            Arc::new(FixedGuesser("date", Confidence::High)),
            Arc::new(FixedGuesser("integer", Confidence::High)),
        ]);
        assert_eq!(chain.guess_type("User", "born").unwrap().type_name(), "date");
        assert_eq!(chain.guess_required("User", "born").map(|g| *g.value()), Some(true));
        assert!(chain.guess_max_length("User", "born").is_none());
    }
}
