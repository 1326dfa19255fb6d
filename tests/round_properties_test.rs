//! Property tests for the round engine, wheel and turn remapping.

use proptest::prelude::*;
use std::collections::BTreeSet;
use strictly_fortune::{
    Event, GameRng, Phrase, Player, PlayerId, PlayerRoster, PrizeWheel, Rejection, RoundEngine,
    RoundError, RoundRules, TurnRemap, remap_turn,
};

fn phrase_text() -> impl Strategy<Value = String> {
    "[a-zA-Z]{1,8}([ ,'-][a-zA-Z]{1,8}){0,3}"
}

fn distinct_letters(text: &str) -> Vec<char> {
    text.chars()
        .filter(|c| c.is_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn table(text: &str, players: u64, seed: u64) -> (RoundEngine, PlayerRoster, GameRng) {
    let rules = RoundRules::default();
    let mut roster = PlayerRoster::new();
    for id in 1..=players {
        roster.add(Player::new(id, format!("p{id}")));
    }
    let mut rng = GameRng::new(seed);
    let phrase = Phrase::new(text, None, &rules.ignored);
    let (round, _) = RoundEngine::begin(
        1,
        roster.snapshot(),
        phrase,
        0,
        PrizeWheel::default(),
        rules,
        &mut rng,
    )
    .expect("round starts");
    (round, roster, rng)
}

proptest! {
    /// Property: guessing every distinct letter, in any order, completes the round
    /// exactly at the last one
    #[test]
    fn prop_all_letters_complete_round(
        (text, letters) in phrase_text().prop_flat_map(|text| {
            let letters = distinct_letters(&text);
            (Just(text), Just(letters).prop_shuffle())
        }),
        seed in any::<u64>()
    ) {
        let (mut round, mut roster, mut rng) = table(&text, 1, seed);
        let last = letters.len() - 1;
        for (i, letter) in letters.iter().enumerate() {
            prop_assert!(!round.is_complete());
            round
                .submit_guess(&mut roster, &mut rng, PlayerId(1), &letter.to_string())
                .expect("fresh letter is accepted");
            prop_assert_eq!(round.is_complete(), i == last);
        }
        prop_assert_eq!(round.masked_phrase(), text);
    }

    /// Property: whatever the turn holder guesses, a round ends at most once
    #[test]
    fn prop_round_ends_once(
        text in phrase_text(),
        guesses in prop::collection::vec("[a-z]|[a-z]{2,6}|[ 0-9?]", 1..60),
        seed in any::<u64>()
    ) {
        let (mut round, mut roster, mut rng) = table(&text, 3, seed);
        let mut endings = 0;
        for guess in &guesses {
            let owner = round.current_player().expect("seated players");
            let was_complete = round.is_complete();
            match round.submit_guess(&mut roster, &mut rng, owner, guess) {
                Ok(events) => {
                    prop_assert!(!was_complete);
                    endings += events
                        .iter()
                        .filter(|e| matches!(e, Event::RoundEnded { .. }))
                        .count();
                }
                Err(RoundError::Rejected(_)) => {}
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
            prop_assert!(round.turn_index() < round.order().len());
        }
        prop_assert_eq!(endings, usize::from(round.is_complete()));
    }

    /// Property: ignored characters are visible before any guess
    #[test]
    fn prop_ignored_characters_start_revealed(text in phrase_text()) {
        let (round, _, _) = table(&text, 1, 0);
        for (shown, original) in round.masked_phrase().chars().zip(text.chars()) {
            if !original.is_alphabetic() {
                prop_assert_eq!(shown, original);
            } else {
                prop_assert_eq!(shown, '_');
            }
        }
    }

    /// Property: a guess from a player without the turn changes nothing
    #[test]
    fn prop_off_turn_guess_is_inert(
        text in phrase_text(),
        guess in ".{0,12}",
        seed in any::<u64>()
    ) {
        let (mut round, mut roster, mut rng) = table(&text, 3, seed);
        let before = (
            round.masked_phrase(),
            round.prize(),
            round.turn_index(),
            round.total_guessed(),
            round.guessed().clone(),
        );

        let result = round.submit_guess(&mut roster, &mut rng, PlayerId(2), &guess);

        prop_assert_eq!(result, Err(RoundError::Rejected(Rejection::InvalidTurn)));
        let after = (
            round.masked_phrase(),
            round.prize(),
            round.turn_index(),
            round.total_guessed(),
            round.guessed().clone(),
        );
        prop_assert_eq!(before, after);
        prop_assert!(roster.iter().all(|p| p.score == 0));
    }

    /// Property: the wheel only lands on configured values
    #[test]
    fn prop_spin_stays_on_wheel(
        denominations in prop::collection::vec(1u64..100_000, 1..12),
        seed in any::<u64>()
    ) {
        let wheel = PrizeWheel::new(denominations.clone()).unwrap();
        let mut rng = GameRng::new(seed);
        for _ in 0..32 {
            prop_assert!(denominations.contains(&wheel.spin(&mut rng)));
        }
    }

    /// Property: after a departure the turn lands on a seated player, and stays with
    /// its owner if they remain
    #[test]
    fn prop_remap_keeps_turn_valid(
        (players, current, removed) in (1usize..10).prop_flat_map(|n| (Just(n), 0..n, 0..n))
    ) {
        let order: Vec<usize> = (0..players).collect();
        let mut remaining = order.clone();
        remaining.remove(removed);

        match remap_turn(current, removed, remaining.len()) {
            TurnRemap::Vacant => prop_assert!(remaining.is_empty()),
            TurnRemap::Unchanged(turn) | TurnRemap::Shifted(turn) => {
                prop_assert_ne!(current, removed);
                prop_assert_eq!(remaining[turn], order[current]);
            }
            TurnRemap::Passed(turn) => {
                prop_assert_eq!(current, removed);
                prop_assert!(turn < remaining.len());
                // The successor in the old order takes over.
                prop_assert_eq!(remaining[turn], order[(current + 1) % players]);
            }
        }
    }
}
