use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Question, QuestionKind, Quiz};
use crate::score::{self, ScoreReport};

/// Recorded selections, question id -> set of option ids. A value type:
/// session transitions build a new `AnswerState` instead of mutating one
/// shared map, so snapshots taken by callers never alias live state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerState(BTreeMap<String, BTreeSet<String>>);

impl AnswerState {
    pub fn selected(&self, question_id: &str) -> Option<&BTreeSet<String>> {
        self.0.get(question_id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn answered(&self, question_id: &str) -> bool {
        self.0.get(question_id).is_some_and(|s| !s.is_empty())
    }

    fn with_single(&self, question_id: &str, option_id: &str) -> Self {
        let mut next = self.0.clone();
        next.insert(
            question_id.to_string(),
            BTreeSet::from([option_id.to_string()]),
        );
        Self(next)
    }

    fn with_toggled(&self, question_id: &str, option_id: &str) -> Self {
        let mut next = self.0.clone();
        let set = next.entry(question_id.to_string()).or_default();
        if !set.remove(option_id) {
            set.insert(option_id.to_string());
        }
        Self(next)
    }
}

/// One learner's pass through a quiz. Ephemeral: created when the quiz is
/// opened, thrown away on navigation, fully reset by `retry`.
///
/// Locking: single-choice and true/false questions lock on first selection;
/// multi-select questions toggle freely until `submit_multi_select`.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    current_index: usize,
    answers: AnswerState,
    locked: BTreeSet<String>,
    completed: bool,
}

impl QuizSession {
    /// Expects a quiz that already passed the store's validation gate
    /// (non-empty question list in particular).
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            current_index: 0,
            answers: AnswerState::default(),
            locked: BTreeSet::new(),
            completed: false,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.current_index]
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn answers(&self) -> &AnswerState {
        &self.answers
    }

    pub fn is_locked(&self, question_id: &str) -> bool {
        self.locked.contains(question_id)
    }

    /// Records a selection on the current question. Returns false when the
    /// call is a no-op: wrong question, unknown option, locked question, or a
    /// finished session.
    pub fn select_answer(&mut self, question_id: &str, option_id: &str) -> bool {
        if self.completed || question_id != self.current_question().id {
            return false;
        }
        let kind = self.current_question().kind;
        if !self
            .current_question()
            .options
            .iter()
            .any(|o| o.id == option_id)
        {
            return false;
        }
        if self.locked.contains(question_id) {
            return false;
        }
        match kind {
            QuestionKind::SingleChoice | QuestionKind::TrueFalse => {
                self.answers = self.answers.with_single(question_id, option_id);
                self.locked.insert(question_id.to_string());
            }
            QuestionKind::MultiSelect => {
                self.answers = self.answers.with_toggled(question_id, option_id);
            }
        }
        true
    }

    /// Locks a multi-select question so feedback can be shown. Rejected with
    /// zero selections.
    pub fn submit_multi_select(&mut self, question_id: &str) -> bool {
        if self.completed || question_id != self.current_question().id {
            return false;
        }
        if self.current_question().kind != QuestionKind::MultiSelect {
            return false;
        }
        if self.locked.contains(question_id) || !self.answers.answered(question_id) {
            return false;
        }
        self.locked.insert(question_id.to_string());
        true
    }

    /// The current question has been locked (single/true-false) or submitted
    /// (multi-select).
    pub fn can_proceed(&self) -> bool {
        !self.completed && self.locked.contains(&self.current_question().id)
    }

    /// Moves forward one question; at the last question, completes the
    /// session instead. Rejected while the current question is unanswered.
    pub fn advance(&mut self) -> bool {
        if !self.can_proceed() {
            return false;
        }
        if self.current_index + 1 == self.quiz.questions.len() {
            self.completed = true;
        } else {
            self.current_index += 1;
        }
        true
    }

    /// Moves back one question. No-op at the first question or after
    /// completion. Answers and locks are untouched.
    pub fn retreat(&mut self) {
        if !self.completed && self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    /// Back to question one with a clean slate.
    pub fn retry(&mut self) {
        self.current_index = 0;
        self.answers = AnswerState::default();
        self.locked.clear();
        self.completed = false;
    }

    /// Re-derivable at any time; the presentation layer calls it on entry to
    /// the completed state.
    pub fn score(&self) -> ScoreReport {
        score::score(&self.quiz, &self.answers)
    }
}
