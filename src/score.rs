use std::collections::BTreeSet;

use crate::model::{Question, Quiz};
use crate::session::AnswerState;

/// Per-question outcome, carrying the texts the results view needs to show
/// selected-vs-correct side by side.
#[derive(Debug, Clone)]
pub struct QuestionResult {
    pub question_id: String,
    pub prompt: String,
    pub selected_ids: Vec<String>,
    pub selected_texts: Vec<String>,
    pub correct_ids: Vec<String>,
    pub correct_texts: Vec<String>,
    pub explanation: Option<String>,
    pub is_correct: bool,
}

#[derive(Debug, Clone)]
pub struct ScoreReport {
    pub results: Vec<QuestionResult>,
    pub correct: usize,
    pub total: usize,
    pub percent: u32,
}

pub fn correct_set(question: &Question) -> BTreeSet<&str> {
    question
        .options
        .iter()
        .filter(|o| o.correct)
        .map(|o| o.id.as_str())
        .collect()
}

/// A question is correct iff the selected set equals the correct set exactly.
/// Unanswered counts as incorrect, never excluded.
pub fn is_correct(question: &Question, selected: Option<&BTreeSet<String>>) -> bool {
    let Some(selected) = selected else {
        return false;
    };
    let selected: BTreeSet<&str> = selected.iter().map(|s| s.as_str()).collect();
    !selected.is_empty() && selected == correct_set(question)
}

pub fn score(quiz: &Quiz, answers: &AnswerState) -> ScoreReport {
    let results: Vec<QuestionResult> = quiz
        .questions
        .iter()
        .map(|q| {
            let selected = answers.selected(&q.id);
            // Ids reported in the question's option order, not selection order.
            let selected_ids: Vec<String> = q
                .options
                .iter()
                .filter(|o| selected.is_some_and(|s| s.contains(&o.id)))
                .map(|o| o.id.clone())
                .collect();
            let selected_texts: Vec<String> = q
                .options
                .iter()
                .filter(|o| selected.is_some_and(|s| s.contains(&o.id)))
                .map(|o| o.text.clone())
                .collect();
            let correct_ids: Vec<String> = q
                .options
                .iter()
                .filter(|o| o.correct)
                .map(|o| o.id.clone())
                .collect();
            let correct_texts: Vec<String> = q
                .options
                .iter()
                .filter(|o| o.correct)
                .map(|o| o.text.clone())
                .collect();
            QuestionResult {
                question_id: q.id.clone(),
                prompt: q.prompt.clone(),
                is_correct: is_correct(q, selected),
                selected_ids,
                selected_texts,
                correct_ids,
                correct_texts,
                explanation: q.explanation.clone(),
            }
        })
        .collect();

    let correct = results.iter().filter(|r| r.is_correct).count();
    let total = quiz.questions.len();
    ScoreReport {
        results,
        correct,
        total,
        percent: percent(correct, total),
    }
}

/// Integer percentage, rounded half-up.
pub fn percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as u32
}
