//! Fill-the-gap question generation
//!
//! Two families of sentence templates:
//! - adverb templates, answered from the lesson's adverb list (all adverbs are offered)
//! - phrase templates, answered from the vocabulary (correct phrase + 3 distractors)
//!
//! The result is shuffled and capped at [`MAX_QUESTIONS`]. An empty result
//! means the lesson cannot host the game.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::shuffle::{choose, pick_random, shuffle};
use crate::types::{Lesson, MAX_QUESTIONS, MIN_ADVERBS, MIN_PHRASES, PHRASE_DISTRACTORS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Adverb,
    Phrase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub kind: QuestionKind,
    pub sentence_before: String,
    pub sentence_after: String,
    pub correct: String,
    pub options: Vec<String>,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct == option
    }

    /// The sentence with the gap filled by `fill`
    pub fn render(&self, fill: &str) -> String {
        format!("{}{}{}", self.sentence_before, fill, self.sentence_after)
    }
}

struct Template {
    before: &'static str,
    after: &'static str,
}

const ADVERB_TEMPLATES: [Template; 6] = [
    Template { before: "I ", after: " go on holiday in summer." },
    Template { before: "She ", after: " goes shopping at weekends." },
    Template { before: "We ", after: " have a barbecue." },
    Template { before: "They ", after: " have time off." },
    Template { before: "He ", after: " plays games." },
    Template { before: "I ", after: " do exercise." },
];

const PHRASE_TEMPLATES: [Template; 4] = [
    Template { before: "I like ", after: "." },
    Template { before: "They want ", after: "." },
    Template { before: "She likes ", after: "." },
    Template { before: "He wants ", after: "." },
];

/// Builds at most [`MAX_QUESTIONS`] questions for `lesson` in random order.
pub fn build_questions<R: Rng + ?Sized>(lesson: &Lesson, rng: &mut R) -> Vec<Question> {
    let adverbs = unique(lesson.adverbs.iter().map(String::as_str));
    let phrases = unique(lesson.vocabulary.iter().map(|v| v.en.as_str()));

    let mut questions = adverb_questions(&adverbs, rng);
    questions.extend(phrase_questions(&phrases, rng));

    let mut questions = shuffle(&questions, rng);
    questions.truncate(MAX_QUESTIONS);
    questions
}

fn adverb_questions<R: Rng + ?Sized>(adverbs: &[String], rng: &mut R) -> Vec<Question> {
    if adverbs.len() < MIN_ADVERBS {
        return Vec::new();
    }

    ADVERB_TEMPLATES
        .iter()
        .filter_map(|template| {
            let correct = choose(adverbs, rng)?.clone();
            Some(Question {
                kind: QuestionKind::Adverb,
                sentence_before: template.before.to_string(),
                sentence_after: template.after.to_string(),
                correct,
                options: shuffle(adverbs, rng),
            })
        })
        .collect()
}

fn phrase_questions<R: Rng + ?Sized>(phrases: &[String], rng: &mut R) -> Vec<Question> {
    if phrases.len() < MIN_PHRASES {
        return Vec::new();
    }

    let mut used: HashSet<String> = HashSet::new();
    let mut questions = Vec::with_capacity(PHRASE_TEMPLATES.len());

    for template in &PHRASE_TEMPLATES {
        let available: Vec<String> = phrases
            .iter()
            .filter(|p| !used.contains(*p))
            .cloned()
            .collect();
        if available.len() < MIN_PHRASES {
            continue;
        }

        let Some(correct) = choose(&available, rng).cloned() else {
            continue;
        };
        used.insert(correct.clone());

        let mut options = pick_random(phrases, PHRASE_DISTRACTORS, Some(&correct), rng);
        options.push(correct.clone());

        questions.push(Question {
            kind: QuestionKind::Phrase,
            sentence_before: template.before.to_string(),
            sentence_after: template.after.to_string(),
            correct,
            options: shuffle(&options, rng),
        });
    }

    questions
}

/// Drops repeated entries, keeping first occurrences in order
fn unique<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VocabItem;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn lesson(vocab: &[&str], adverbs: &[&str]) -> Lesson {
        Lesson {
            id: "T1".to_string(),
            lesson: 1,
            title: "Test".to_string(),
            title_ru: None,
            grammar: String::new(),
            vocabulary: vocab.iter().map(|en| VocabItem::new(*en, "ru")).collect(),
            prompts: Vec::new(),
            adverbs: adverbs.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn test_no_content_no_questions() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(build_questions(&lesson(&["a", "b", "c"], &["usually"]), &mut rng).is_empty());
    }

    #[test]
    fn test_adverbs_only() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let questions = build_questions(&lesson(&[], &["usually", "never", "often"]), &mut rng);
        assert_eq!(questions.len(), ADVERB_TEMPLATES.len());
        for q in &questions {
            assert_eq!(q.kind, QuestionKind::Adverb);
            assert_eq!(q.options.len(), 3);
            assert_eq!(q.options.iter().filter(|o| **o == q.correct).count(), 1);
        }
    }

    #[test]
    fn test_phrases_only_uses_each_correct_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let vocab = ["a", "b", "c", "d", "e", "f", "g"];
        let questions = build_questions(&lesson(&vocab, &[]), &mut rng);
        assert_eq!(questions.len(), PHRASE_TEMPLATES.len());
        let corrects: HashSet<_> = questions.iter().map(|q| q.correct.clone()).collect();
        assert_eq!(corrects.len(), questions.len());
        for q in &questions {
            assert_eq!(q.options.len(), 4);
            let distinct: HashSet<_> = q.options.iter().collect();
            assert_eq!(distinct.len(), 4);
        }
    }

    #[test]
    fn test_template_skipped_when_unused_phrases_run_low() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let questions = build_questions(&lesson(&["a", "b", "c", "d", "e"], &[]), &mut rng);
        // 5 phrases: the third template only sees 3 unused phrases
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn test_capped_at_max_questions() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let vocab = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let questions = build_questions(&lesson(&vocab, &["usually", "sometimes"]), &mut rng);
        assert_eq!(questions.len(), MAX_QUESTIONS);
    }

    #[test]
    fn test_duplicate_adverbs_are_collapsed() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let questions = build_questions(&lesson(&[], &["often", "often", "never"]), &mut rng);
        assert!(questions.iter().all(|q| q.options.len() == 2));
    }

    #[test]
    fn test_render_fills_gap() {
        let q = Question {
            kind: QuestionKind::Adverb,
            sentence_before: "I ".to_string(),
            sentence_after: " do exercise.".to_string(),
            correct: "usually".to_string(),
            options: vec!["usually".to_string(), "never".to_string()],
        };
        assert_eq!(q.render("usually"), "I usually do exercise.");
        assert!(q.is_correct("usually"));
        assert!(!q.is_correct("never"));
    }
}
