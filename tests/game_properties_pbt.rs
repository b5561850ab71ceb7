//! Property-Based Tests for the game sessions
//!
//! Tests the following invariants:
//! - Shuffle is a permutation of its input
//! - Generated questions carry the correct option exactly once, with the expected option count
//! - Fill-the-gap score only grows on correct answers and never passes the answered count
//! - Answers inside the auto-advance window change nothing
//! - Flashcards known/skipped stay disjoint and the countdown stops once finished
//! - A flipped verb card never changes index before the flip delay

use std::collections::HashSet;
use std::time::Duration;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use danci_games::config::TimingConfig;
use danci_games::error::Phase;
use danci_games::fill_gap::{build_questions, FillGapSession, QuestionKind};
use danci_games::flashcards::FlashcardSession;
use danci_games::narration::Narrator;
use danci_games::shuffle::shuffle;
use danci_games::types::{IrregularVerb, Lesson, VocabItem, MAX_QUESTIONS};
use danci_games::verbs::{CardNavigator, CollectionPolicy, VerbCollection};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{1,8})?"
}

fn arb_lesson() -> impl Strategy<Value = Lesson> {
    (
        prop::collection::hash_set(arb_word(), 4..12),
        prop::collection::hash_set("[a-z]{3,9}", 2..6),
    )
        .prop_map(|(vocab, adverbs)| Lesson {
            id: "P1".to_string(),
            lesson: 1,
            title: "Generated".to_string(),
            title_ru: None,
            grammar: String::new(),
            vocabulary: vocab.into_iter().map(|en| VocabItem::new(en, "ru")).collect(),
            prompts: Vec::new(),
            adverbs: adverbs.into_iter().collect(),
        })
}

#[derive(Debug, Clone)]
enum Step {
    Answer(usize),
    Wait(u64),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0usize..4).prop_map(Step::Answer),
        (0u64..2000).prop_map(Step::Wait),
    ]
}

#[derive(Debug, Clone, Copy)]
enum CardAction {
    Flip,
    Known,
    Skip,
    Wait(u64),
}

fn arb_card_action() -> impl Strategy<Value = CardAction> {
    prop_oneof![
        Just(CardAction::Flip),
        Just(CardAction::Known),
        Just(CardAction::Skip),
        (0u64..90).prop_map(CardAction::Wait),
    ]
}

fn deck(n: usize) -> Vec<VocabItem> {
    (0..n)
        .map(|i| VocabItem::new(format!("en{i}"), format!("ru{i}")))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn shuffle_is_permutation(items in prop::collection::vec(any::<u16>(), 0..64), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut out = shuffle(&items, &mut rng);
        let mut expected = items.clone();
        out.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn questions_are_well_formed(lesson in arb_lesson(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let questions = build_questions(&lesson, &mut rng);

        prop_assert!(!questions.is_empty());
        prop_assert!(questions.len() <= MAX_QUESTIONS);
        for q in &questions {
            prop_assert_eq!(q.options.iter().filter(|o| **o == q.correct).count(), 1);
            match q.kind {
                QuestionKind::Phrase => prop_assert_eq!(q.options.len(), 4),
                QuestionKind::Adverb => prop_assert_eq!(q.options.len(), lesson.adverbs.len()),
            }
        }
    }

    #[test]
    fn score_tracks_correct_answers(
        lesson in arb_lesson(),
        seed in any::<u64>(),
        steps in prop::collection::vec(arb_step(), 0..40),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut session = FillGapSession::new(&lesson, &mut rng, &TimingConfig::default());
        session.start().unwrap();
        let mut answered = 0usize;

        for step in steps {
            match step {
                Step::Answer(choice) => {
                    let before = (session.score(), session.index(), session.selected().map(str::to_string));
                    let option = session.current().and_then(|q| q.options.get(choice % q.options.len()).cloned());
                    let correct = session.current().map(|q| q.correct.clone());
                    let Some(option) = option else { continue };

                    match session.select_answer(&option) {
                        Some(outcome) => {
                            answered += 1;
                            prop_assert_eq!(outcome.correct, Some(&option) == correct.as_ref());
                            let gained = session.score() - before.0;
                            prop_assert_eq!(gained, usize::from(outcome.correct));
                        }
                        None => {
                            // locked until the auto-advance fires
                            prop_assert_eq!(session.score(), before.0);
                            prop_assert_eq!(session.index(), before.1);
                            prop_assert_eq!(session.selected().map(str::to_string), before.2);
                        }
                    }
                }
                Step::Wait(millis) => session.advance(Duration::from_millis(millis)),
            }
            prop_assert!(session.score() <= answered);
        }
    }

    #[test]
    fn flashcards_known_and_skipped_stay_disjoint(
        size in 0usize..12,
        actions in prop::collection::vec(arb_card_action(), 0..60),
    ) {
        let mut session = FlashcardSession::from_deck("P1", deck(size), &TimingConfig::default());
        session.start().unwrap();
        let mut accepted = 0usize;

        for action in actions {
            let seconds_before = session.seconds_left();
            let was_finished = session.phase() == Phase::Finished;
            match action {
                CardAction::Flip => {
                    session.flip();
                }
                CardAction::Known => accepted += usize::from(session.mark_known()),
                CardAction::Skip => accepted += usize::from(session.skip()),
                CardAction::Wait(secs) => session.advance(Duration::from_secs(secs)),
            }
            if was_finished {
                prop_assert_eq!(session.seconds_left(), seconds_before);
            }

            let known: HashSet<_> = session.known().iter().copied().collect();
            prop_assert!(session.skipped().iter().all(|i| !known.contains(i)));
            prop_assert_eq!(session.known().len() + session.skipped().len(), accepted);

            let finished = session.index() >= size || session.seconds_left() == 0;
            prop_assert_eq!(session.phase() == Phase::Finished, finished);
        }
    }

    #[test]
    fn flipped_card_waits_for_flip_delay(start in 0usize..6, early in 0u64..500) {
        let verbs = (0..8)
            .map(|i| IrregularVerb::new(format!("v{i}"), "p", "pp", "ru"))
            .collect();
        let timing = TimingConfig::default();
        let mut nav = CardNavigator::with_seed(
            vec![VerbCollection::new("t", "T", verbs)],
            CollectionPolicy::Ordered,
            &timing,
            Narrator::silent(),
            Some(1),
        );
        for _ in 0..start {
            nav.go_next();
        }
        nav.flip();
        nav.go_next();

        prop_assert!(!nav.show_back());
        nav.advance(Duration::from_millis(early));
        prop_assert_eq!(nav.index(), start);
        nav.advance(timing.flip_duration());
        prop_assert_eq!(nav.index(), start + 1);
    }
}
