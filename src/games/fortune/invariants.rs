//! First-class invariants for a round.
//!
//! Invariants are logical properties that must hold after every guess and
//! every roster change. The round engine checks them in debug builds; tests
//! check them directly.

use super::round::RoundEngine;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples so sets compose without boxing.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = match <(I1, I2) as InvariantSet<S>>::check_all(state) {
            Ok(()) => Vec::new(),
            Err(v) => v,
        };
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }
        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}

/// Invariant: the turn index points into the round's player order.
pub struct TurnInBounds;

impl Invariant<RoundEngine> for TurnInBounds {
    fn holds(round: &RoundEngine) -> bool {
        round.order().is_empty() || round.turn_index() < round.order().len()
    }

    fn description() -> &'static str {
        "Turn index is within the player order"
    }
}

/// Invariant: revealed letters never exceed the phrase's scoreable length.
pub struct RevealWithinPhrase;

impl Invariant<RoundEngine> for RevealWithinPhrase {
    fn holds(round: &RoundEngine) -> bool {
        round.total_guessed() <= round.phrase().scoreable_len()
    }

    fn description() -> &'static str {
        "Total guessed letters do not exceed the scoreable length"
    }
}

/// Invariant: ignored characters are always part of the revealed set.
pub struct IgnoredAlwaysRevealed;

impl Invariant<RoundEngine> for IgnoredAlwaysRevealed {
    fn holds(round: &RoundEngine) -> bool {
        round.rules().ignored.iter().all(|c| round.guessed().contains(&c))
    }

    fn description() -> &'static str {
        "Ignored characters are always revealed"
    }
}

/// All round invariants as a composable set.
pub type RoundInvariants = (TurnInBounds, RevealWithinPhrase, IgnoredAlwaysRevealed);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::fortune::{
        GameRng, Phrase, PlayerId, PlayerRoster, PrizeWheel, RoundRules, Player,
    };

    fn round() -> (RoundEngine, PlayerRoster, GameRng) {
        let rules = RoundRules::default();
        let mut roster = PlayerRoster::new();
        roster.add(Player::new(1u64, "a"));
        roster.add(Player::new(2u64, "b"));
        let mut rng = GameRng::new(1);
        let phrase = Phrase::new("Hello, world", None, &rules.ignored);
        let (round, _) = RoundEngine::begin(
            1,
            roster.snapshot(),
            phrase,
            0,
            PrizeWheel::default(),
            rules,
            &mut rng,
        )
        .unwrap();
        (round, roster, rng)
    }

    #[test]
    fn fresh_round_satisfies_all() {
        let (round, _, _) = round();
        assert!(RoundInvariants::check_all(&round).is_ok());
    }

    #[test]
    fn invariants_hold_through_a_round() {
        let (mut round, mut roster, mut rng) = round();
        for letter in ["l", "o", "z", "h", "e", "w", "r", "d"] {
            let player = round.current_player().unwrap();
            let _ = round.submit_guess(&mut roster, &mut rng, player, letter);
            assert!(RoundInvariants::check_all(&round).is_ok(), "after {letter}");
        }
        assert!(round.is_complete());
    }

    #[test]
    fn invariants_hold_after_removal() {
        let (mut round, _, mut rng) = round();
        round.remove_player(PlayerId(1), &mut rng).unwrap();
        assert!(RoundInvariants::check_all(&round).is_ok());
        assert_eq!(round.current_player(), Some(PlayerId(2)));
    }
}
