use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Per-letter verdict for a guessed word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LetterFeedback {
    Correct,       // Green
    WrongLocation, // Yellow
    Wrong,         // Gray
}

impl LetterFeedback {
    /// Single-character notation: G (green), Y (yellow), X (gray).
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Self::Correct => 'G',
            Self::WrongLocation => 'Y',
            Self::Wrong => 'X',
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'G' => Some(Self::Correct),
            'Y' => Some(Self::WrongLocation),
            'X' => Some(Self::Wrong),
            _ => None,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Wrong => 0,
            Self::WrongLocation => 1,
            Self::Correct => 2,
        }
    }
}

/// How repeated letters in a guess are scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedbackRule {
    /// A letter that is not in place is `WrongLocation` whenever the target
    /// contains it anywhere, however many times it was already used.
    #[default]
    Simple,
    /// A letter is `WrongLocation` only while unmatched occurrences of it
    /// remain in the target.
    Standard,
}

/// An evaluated guess. Always as long as the target it was scored against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Guess {
    word: String,
    letters: Vec<(char, LetterFeedback)>,
    is_correct: bool,
}

impl Guess {
    pub(crate) fn from_parts(
        word: String,
        letters: Vec<(char, LetterFeedback)>,
        is_correct: bool,
    ) -> Self {
        Self {
            word,
            letters,
            is_correct,
        }
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn letters(&self) -> &[(char, LetterFeedback)] {
        &self.letters
    }

    pub fn feedback(&self) -> impl Iterator<Item = LetterFeedback> + '_ {
        self.letters.iter().map(|&(_, state)| state)
    }

    /// Whether the guessed word equals the target word.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Feedback in G/Y/X notation, e.g. `GGYYX`.
    #[must_use]
    pub fn pattern(&self) -> String {
        self.feedback().map(LetterFeedback::to_char).collect()
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.word.to_uppercase(), self.pattern())
    }
}

/// Score `candidate` against `target` with the simple rule.
#[must_use]
pub fn evaluate_guess(candidate: &str, target: &str) -> Guess {
    evaluate_guess_with(candidate, target, FeedbackRule::Simple)
}

#[must_use]
pub fn evaluate_guess_with(candidate: &str, target: &str, rule: FeedbackRule) -> Guess {
    let guess_chars: Vec<char> = candidate.chars().collect();
    let target_chars: Vec<char> = target.chars().collect();

    let states = match rule {
        FeedbackRule::Simple => simple_feedback(&guess_chars, &target_chars),
        FeedbackRule::Standard => standard_feedback(&guess_chars, &target_chars),
    };

    let letters = guess_chars.into_iter().zip(states).collect();
    Guess::from_parts(candidate.to_string(), letters, candidate == target)
}

fn simple_feedback(guess: &[char], target: &[char]) -> Vec<LetterFeedback> {
    guess
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if target.get(i) == Some(c) {
                LetterFeedback::Correct
            } else if target.contains(c) {
                LetterFeedback::WrongLocation
            } else {
                LetterFeedback::Wrong
            }
        })
        .collect()
}

fn standard_feedback(guess: &[char], target: &[char]) -> Vec<LetterFeedback> {
    let mut feedback = vec![LetterFeedback::Wrong; guess.len()];
    let mut remaining: Vec<Option<char>> = target.iter().copied().map(Some).collect();

    // First pass: greens
    for (i, c) in guess.iter().enumerate() {
        if target.get(i) == Some(c) {
            feedback[i] = LetterFeedback::Correct;
            remaining[i] = None;
        }
    }
    // Second pass: yellows, each consuming one unmatched target letter
    for (i, c) in guess.iter().enumerate() {
        if feedback[i] == LetterFeedback::Correct {
            continue;
        }
        if let Some(pos) = remaining.iter().position(|&r| r == Some(*c)) {
            feedback[i] = LetterFeedback::WrongLocation;
            remaining[pos] = None;
        }
    }
    feedback
}

/// True iff every letter of the guess is in place.
#[must_use]
pub fn is_win(guess: &Guess) -> bool {
    !guess.is_empty() && guess.feedback().all(|state| state == LetterFeedback::Correct)
}

/// Best feedback seen so far for each guessed letter, for colouring a keyboard.
pub fn keyboard_hints<'a, I>(guesses: I) -> BTreeMap<char, LetterFeedback>
where
    I: IntoIterator<Item = &'a Guess>,
{
    let mut hints = BTreeMap::new();
    for guess in guesses {
        for &(letter, state) in guess.letters() {
            hints
                .entry(letter)
                .and_modify(|best: &mut LetterFeedback| {
                    if state.rank() > best.rank() {
                        *best = state;
                    }
                })
                .or_insert(state);
        }
    }
    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use LetterFeedback::{Correct, Wrong, WrongLocation};

    #[test]
    fn test_cream_against_crane() {
        let guess = evaluate_guess("cream", "crane");
        let states: Vec<LetterFeedback> = guess.feedback().collect();
        assert_eq!(
            states,
            vec![Correct, Correct, WrongLocation, WrongLocation, Wrong]
        );
        assert!(!guess.is_correct());
        assert!(!is_win(&guess));
        assert_eq!(guess.pattern(), "GGYYX");
    }

    #[test]
    fn test_exact_match_is_all_correct() {
        let guess = evaluate_guess("crane", "crane");
        assert!(guess.feedback().all(|s| s == Correct));
        assert!(guess.is_correct());
        assert!(is_win(&guess));
    }

    #[test]
    fn test_feedback_length_matches_target() {
        for word in ["slate", "eerie", "zzzzz", "abbey"] {
            assert_eq!(evaluate_guess(word, "crane").len(), 5);
            assert_eq!(
                evaluate_guess_with(word, "crane", FeedbackRule::Standard).len(),
                5
            );
        }
    }

    #[test]
    fn test_absent_letters_are_always_wrong() {
        let guess = evaluate_guess("dusty", "crane");
        assert!(guess.feedback().all(|s| s == Wrong));

        let guess = evaluate_guess_with("dusty", "crane", FeedbackRule::Standard);
        assert!(guess.feedback().all(|s| s == Wrong));
    }

    #[test]
    fn test_simple_rule_marks_every_repeated_letter() {
        // Target has a single E; the simple rule flags both misplaced E's.
        let guess = evaluate_guess("eerie", "crane");
        let states: Vec<LetterFeedback> = guess.feedback().collect();
        assert_eq!(
            states,
            vec![WrongLocation, WrongLocation, WrongLocation, Wrong, Correct]
        );
    }

    #[test]
    fn test_standard_rule_counts_remaining_letters() {
        // The trailing E is green, so no E remains for the leading pair.
        let guess = evaluate_guess_with("eerie", "crane", FeedbackRule::Standard);
        let states: Vec<LetterFeedback> = guess.feedback().collect();
        assert_eq!(states, vec![Wrong, Wrong, WrongLocation, Wrong, Correct]);

        // One misplaced L in the target: only the first L is yellow.
        let guess = evaluate_guess_with("llama", "world", FeedbackRule::Standard);
        assert_eq!(guess.pattern(), "YXXXX");
        let guess = evaluate_guess("llama", "world");
        assert_eq!(guess.pattern(), "YYXXX");
    }

    #[test]
    fn test_standard_rule_agrees_on_distinct_letters() {
        let simple = evaluate_guess("cream", "crane");
        let standard = evaluate_guess_with("cream", "crane", FeedbackRule::Standard);
        assert_eq!(simple, standard);
    }

    #[test]
    fn test_feedback_char_notation() {
        for state in [Correct, WrongLocation, Wrong] {
            assert_eq!(LetterFeedback::from_char(state.to_char()), Some(state));
        }
        assert_eq!(LetterFeedback::from_char('g'), Some(Correct));
        assert_eq!(LetterFeedback::from_char('A'), None);
    }

    #[test]
    fn test_keyboard_hints_keep_best_state() {
        let first = evaluate_guess("react", "crane");
        let second = evaluate_guess("crane", "crane");
        let hints = keyboard_hints([&first, &second]);

        assert_eq!(hints[&'r'], Correct);
        assert_eq!(hints[&'c'], Correct);
        assert_eq!(hints[&'t'], Wrong);
        assert!(!hints.contains_key(&'z'));

        // A later, worse verdict never downgrades a letter.
        let third = evaluate_guess("rrrrr", "crane");
        let hints = keyboard_hints([&second, &third]);
        assert_eq!(hints[&'r'], Correct);
    }

    #[test]
    fn test_display_shows_word_and_pattern() {
        let guess = evaluate_guess("cream", "crane");
        assert_eq!(guess.to_string(), "CREAM GGYYX");
    }
}
