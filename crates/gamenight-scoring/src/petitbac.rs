//! Petit bac scoring: letter assignment, answer validation, and
//! majority-vote points.

use rand::Rng;

/// The letters a round can be played on. X, Y and Z are excluded —
/// too few usable words.
pub const LETTER_POOL: [char; 23] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N',
    'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W',
];

/// Draws a letter not yet used this session, uniformly.
///
/// Once every letter has been used the draw falls back to the full
/// pool, so sessions longer than 23 rounds repeat letters instead of
/// failing.
pub fn assign_letter(used: &[char]) -> char {
    let mut rng = rand::rng();

    let available: Vec<char> = LETTER_POOL
        .iter()
        .copied()
        .filter(|c| !used.contains(c))
        .collect();

    if available.is_empty() {
        LETTER_POOL[rng.random_range(0..LETTER_POOL.len())]
    } else {
        available[rng.random_range(0..available.len())]
    }
}

/// Whether an answer is playable for the round letter: its literal
/// first character must match, case-insensitively. No trimming, so a
/// leading space makes the answer invalid.
pub fn validates_letter(answer: &str, letter: char) -> bool {
    match answer.chars().next() {
        Some(first) => first.eq_ignore_ascii_case(&letter),
        None => false,
    }
}

/// Number of validation votes required for an answer to be accepted:
/// two thirds of the voters, rounded down.
pub fn majority_threshold(total_voters: u32) -> u32 {
    total_voters * 2 / 3
}

/// Whether the vote count clears the two-thirds threshold.
pub fn is_accepted(validations: u32, total_voters: u32) -> bool {
    validations >= majority_threshold(total_voters)
}

/// Points for one answer in one category: 2 if the answer is playable,
/// accepted by the voters and unique among the submissions, 1 if
/// accepted but duplicated, 0 otherwise.
pub fn round_points(
    answer: &str,
    letter: char,
    validations: u32,
    total_voters: u32,
    unique: bool,
) -> u32 {
    if !validates_letter(answer, letter) {
        return 0;
    }
    if !is_accepted(validations, total_voters) {
        return 0;
    }
    if unique {
        2
    } else {
        1
    }
}
