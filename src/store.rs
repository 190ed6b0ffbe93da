use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, warn};

use crate::error::{Error, Result};
use crate::model::{QuestionKind, Quiz};

/// Reads quiz definitions from the quizzes content area. One quiz per post,
/// stored as `<slug>-quiz.json`.
pub struct QuizStore {
    quizzes_dir: PathBuf,
}

impl QuizStore {
    pub fn new(content_dir: &Path) -> Self {
        Self {
            quizzes_dir: content_dir.join("blog").join("quizzes"),
        }
    }

    fn quiz_path(&self, slug: &str) -> PathBuf {
        self.quizzes_dir.join(format!("{slug}-quiz.json"))
    }

    pub fn exists(&self, slug: &str) -> bool {
        self.quiz_path(slug).is_file()
    }

    /// `Ok(None)` when no quiz file exists for the slug — a valid empty
    /// state, not a failure. Malformed or invalid data is an error and is
    /// never partially returned.
    pub fn load(&self, slug: &str) -> Result<Option<Quiz>> {
        let path = self.quiz_path(slug);
        if !path.is_file() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path).map_err(|source| Error::QuizLoad {
            slug: slug.to_string(),
            source,
        })?;

        let quiz: Quiz = serde_json::from_str(&raw).map_err(|e| {
            error!(slug, error = %e, "quiz is not valid JSON");
            Error::QuizValidation {
                slug: slug.to_string(),
                reason: e.to_string(),
            }
        })?;

        if let Err(reason) = validate(&quiz) {
            error!(slug, quiz_id = %quiz.id, %reason, "quiz failed validation");
            return Err(Error::QuizValidation {
                slug: slug.to_string(),
                reason,
            });
        }

        Ok(Some(quiz))
    }
}

/// Checks run in order and stop at the first failure. Unknown question kinds
/// are already rejected during deserialization.
pub fn validate(quiz: &Quiz) -> std::result::Result<(), String> {
    if quiz.id.is_empty() {
        return Err("quiz id is empty".to_string());
    }
    if quiz.title.is_empty() {
        return Err("quiz title is empty".to_string());
    }
    if quiz.questions.is_empty() {
        return Err("quiz has no questions".to_string());
    }

    for question in &quiz.questions {
        if question.id.is_empty() {
            return Err("question with empty id".to_string());
        }
        if question.prompt.is_empty() {
            return Err(format!("question `{}` has an empty prompt", question.id));
        }
        if question.options.is_empty() {
            return Err(format!("question `{}` has no options", question.id));
        }
        for option in &question.options {
            if option.id.is_empty() {
                return Err(format!("question `{}` has an option with empty id", question.id));
            }
            if option.text.is_empty() {
                return Err(format!(
                    "question `{}` option `{}` has empty text",
                    question.id, option.id
                ));
            }
        }

        let correct_count = question.options.iter().filter(|o| o.correct).count();
        match question.kind {
            QuestionKind::SingleChoice => {
                if correct_count != 1 {
                    return Err(format!(
                        "multiple-choice question `{}` must have exactly one correct option (found {})",
                        question.id, correct_count
                    ));
                }
            }
            QuestionKind::TrueFalse => {
                if question.options.len() != 2 {
                    return Err(format!(
                        "true-false question `{}` must have exactly two options (found {})",
                        question.id,
                        question.options.len()
                    ));
                }
                if correct_count != 1 {
                    return Err(format!(
                        "true-false question `{}` must have exactly one correct option (found {})",
                        question.id, correct_count
                    ));
                }
            }
            QuestionKind::MultiSelect => {
                // Accepted at the data level, but the question cannot be
                // answered correctly. Authoring footgun worth surfacing.
                if correct_count == 0 {
                    warn!(
                        question_id = %question.id,
                        "multiple-select question has no correct options and is unwinnable"
                    );
                }
            }
        }
    }

    Ok(())
}
