//! Referential integrity enforced in application code.
//!
//! Children are only written once their parent has been found, and parents
//! are only deleted together with their dependents. Every multi-step write
//! runs inside one [`UnitOfWork`], so a failure midway leaves nothing behind.

use thiserror::Error;

use crate::db::{
    is_unique_violation, Category, Db, Filter, Question, Quiz, Record, Store, Table, UnitOfWork,
    User,
};
use crate::models::AnswerChoice;
use crate::names;
use crate::validation::{
    NoteDraft, QuestionDraft, QuizAnswersDraft, ResultDraft, SessionDraft, UserAnswerDraft,
};

#[derive(Debug, Error)]
pub enum IntegrityError {
    /// A referenced row does not exist.
    #[error("{0}")]
    Missing(&'static str),

    /// A uniqueness rule would be broken.
    #[error("{0}")]
    Duplicate(&'static str),

    #[error("storage failure: {0}")]
    Storage(color_eyre::Report),
}

impl From<color_eyre::Report> for IntegrityError {
    fn from(e: color_eyre::Report) -> Self {
        IntegrityError::Storage(e)
    }
}

pub type Result<T> = std::result::Result<T, IntegrityError>;

// ---------------------------------------------------------------------------
// Parent checks
// ---------------------------------------------------------------------------

pub async fn require_quiz<S: Store>(store: &mut S, quiz_id: i64) -> Result<Quiz> {
    store
        .get::<Quiz>(Table::Quizzes, &Filter::by("id", quiz_id))
        .await?
        .ok_or(IntegrityError::Missing(names::QUIZ_NOT_FOUND))
}

pub async fn require_question<S: Store>(store: &mut S, question_id: i64) -> Result<Question> {
    store
        .get::<Question>(Table::Questions, &Filter::by("id", question_id))
        .await?
        .ok_or(IntegrityError::Missing(names::QUESTION_NOT_FOUND))
}

/// The question must exist *and* belong to `quiz_id`.
pub async fn require_quiz_question<S: Store>(
    store: &mut S,
    quiz_id: i64,
    question_id: i64,
) -> Result<Question> {
    store
        .get::<Question>(
            Table::Questions,
            &Filter::by("quiz_id", quiz_id).and("id", question_id),
        )
        .await?
        .ok_or(IntegrityError::Missing(names::QUESTION_NOT_FOUND))
}

pub async fn require_user<S: Store>(store: &mut S, user_id: i64) -> Result<User> {
    store
        .get::<User>(Table::Users, &Filter::by("id", user_id))
        .await?
        .ok_or(IntegrityError::Missing(names::USER_NOT_FOUND))
}

pub async fn require_category<S: Store>(store: &mut S, category_id: i64) -> Result<Category> {
    store
        .get::<Category>(Table::Categories, &Filter::by("id", category_id))
        .await?
        .ok_or(IntegrityError::Missing(names::CATEGORY_NOT_FOUND))
}

// ---------------------------------------------------------------------------
// Questions and their answers
// ---------------------------------------------------------------------------

fn question_record(draft: &QuestionDraft<'_>) -> Record {
    Record::new()
        .set("text", draft.text)
        .set("correct_answer_id", draft.correct_answer_id)
        .set("points", draft.points)
}

async fn insert_answers<S: Store>(
    store: &mut S,
    question_id: i64,
    answers: &[AnswerChoice],
) -> Result<()> {
    for answer in answers {
        store
            .insert(
                Table::Answers,
                &Record::new()
                    .set("text", answer.text.as_str())
                    .set("is_correct", answer.is_correct)
                    .set("question_id", question_id),
            )
            .await?;
    }
    Ok(())
}

/// Adds a question and its answers to an existing quiz. Returns the question id.
pub async fn create_question(db: &Db, quiz_id: i64, draft: &QuestionDraft<'_>) -> Result<i64> {
    let mut uow = db.begin().await?;

    require_quiz(&mut uow, quiz_id).await?;
    let question_id = uow
        .insert(Table::Questions, &question_record(draft).set("quiz_id", quiz_id))
        .await?;
    insert_answers(&mut uow, question_id, draft.answers).await?;

    uow.commit().await?;
    tracing::info!(
        "new question created with id: {question_id} for quiz_id: {quiz_id} ({} answers)",
        draft.answers.len()
    );
    Ok(question_id)
}

/// Rewrites a question and replaces its whole answer set.
pub async fn replace_question(
    db: &Db,
    quiz_id: i64,
    question_id: i64,
    draft: &QuestionDraft<'_>,
) -> Result<()> {
    let mut uow = db.begin().await?;

    require_quiz_question(&mut uow, quiz_id, question_id).await?;
    uow.update(
        Table::Questions,
        &Filter::by("quiz_id", quiz_id).and("id", question_id),
        &question_record(draft),
    )
    .await?;
    uow.delete(Table::Answers, &Filter::by("question_id", question_id))
        .await?;
    insert_answers(&mut uow, question_id, draft.answers).await?;

    uow.commit().await?;
    tracing::info!("question {question_id} of quiz {quiz_id} updated");
    Ok(())
}

/// Deletes a question after its answers and the user answers that point at it.
pub async fn delete_question(db: &Db, quiz_id: i64, question_id: i64) -> Result<()> {
    let mut uow = db.begin().await?;

    require_quiz_question(&mut uow, quiz_id, question_id).await?;
    let dependents = cascade_question(&mut uow, question_id).await?;
    uow.delete(
        Table::Questions,
        &Filter::by("quiz_id", quiz_id).and("id", question_id),
    )
    .await?;

    uow.commit().await?;
    tracing::info!("question {question_id} of quiz {quiz_id} deleted with {dependents} dependent rows");
    Ok(())
}

async fn cascade_question(uow: &mut UnitOfWork, question_id: i64) -> Result<u64> {
    let user_answers = uow
        .delete(Table::UserAnswers, &Filter::by("question_id", question_id))
        .await?;
    let answers = uow
        .delete(Table::Answers, &Filter::by("question_id", question_id))
        .await?;
    Ok(user_answers + answers)
}

/// Updates the text and note of a question, wherever it lives.
pub async fn annotate_question(db: &Db, question_id: i64, draft: &NoteDraft<'_>) -> Result<()> {
    let mut uow = db.begin().await?;

    require_question(&mut uow, question_id).await?;
    uow.update(
        Table::Questions,
        &Filter::by("id", question_id),
        &Record::new().set("text", draft.text).set("note", draft.note),
    )
    .await?;

    uow.commit().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Sessions, results and user answers
// ---------------------------------------------------------------------------

pub async fn create_session(db: &Db, draft: &SessionDraft) -> Result<i64> {
    let mut uow = db.begin().await?;

    require_quiz(&mut uow, draft.quiz_id).await?;
    let session_id = uow
        .insert(
            Table::Sessions,
            &Record::new()
                .set("quiz_id", draft.quiz_id)
                .set("start_time", draft.start_time)
                .set("end_time", draft.end_time),
        )
        .await?;

    uow.commit().await?;
    tracing::info!("new session created with id: {session_id} for quiz_id: {}", draft.quiz_id);
    Ok(session_id)
}

pub async fn record_result(db: &Db, draft: &ResultDraft) -> Result<i64> {
    let mut uow = db.begin().await?;

    require_user(&mut uow, draft.user_id).await?;
    require_quiz(&mut uow, draft.quiz_id).await?;
    let result_id = uow
        .insert(
            Table::Results,
            &Record::new()
                .set("user_id", draft.user_id)
                .set("quiz_id", draft.quiz_id)
                .set("score", draft.score),
        )
        .await?;

    uow.commit().await?;
    tracing::info!(
        "result recorded for user_id: {} quiz_id: {} score: {}",
        draft.user_id,
        draft.quiz_id,
        draft.score
    );
    Ok(result_id)
}

pub async fn submit_answer(db: &Db, question_id: i64, draft: &UserAnswerDraft<'_>) -> Result<i64> {
    let mut uow = db.begin().await?;

    require_question(&mut uow, question_id).await?;
    require_user(&mut uow, draft.user_id).await?;
    let answer_id = uow
        .insert(
            Table::UserAnswers,
            &Record::new()
                .set("user_id", draft.user_id)
                .set("question_id", question_id)
                .set("answer", draft.answer),
        )
        .await?;

    uow.commit().await?;
    Ok(answer_id)
}

/// Stores a batch of answers to one quiz. Every answered question must belong
/// to that quiz; otherwise nothing is stored. Returns the number of answers written.
pub async fn submit_quiz_answers(
    db: &Db,
    quiz_id: i64,
    draft: &QuizAnswersDraft<'_>,
) -> Result<usize> {
    let mut uow = db.begin().await?;

    require_quiz(&mut uow, quiz_id).await?;
    require_user(&mut uow, draft.user_id).await?;
    for answer in &draft.answers {
        require_quiz_question(&mut uow, quiz_id, answer.question_id).await?;
        uow.insert(
            Table::UserAnswers,
            &Record::new()
                .set("user_id", draft.user_id)
                .set("question_id", answer.question_id)
                .set("answer", answer.answer),
        )
        .await?;
    }

    uow.commit().await?;
    tracing::info!(
        "{} answers submitted for quiz_id: {quiz_id} by user_id: {}",
        draft.answers.len(),
        draft.user_id
    );
    Ok(draft.answers.len())
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// A write refused by a `UNIQUE` column becomes `Duplicate(message)`.
fn duplicate_or_storage(e: color_eyre::Report, message: &'static str) -> IntegrityError {
    if is_unique_violation(&e) {
        IntegrityError::Duplicate(message)
    } else {
        IntegrityError::Storage(e)
    }
}

async fn category_named<S: Store>(store: &mut S, name: &str) -> Result<Option<Category>> {
    Ok(store
        .get::<Category>(Table::Categories, &Filter::by("name", name))
        .await?)
}

pub async fn create_category(db: &Db, name: &str) -> Result<i64> {
    let mut uow = db.begin().await?;

    if category_named(&mut uow, name).await?.is_some() {
        return Err(IntegrityError::Duplicate(names::CATEGORY_EXISTS));
    }
    let category_id = uow
        .insert(Table::Categories, &Record::new().set("name", name))
        .await
        .map_err(|e| duplicate_or_storage(e, names::CATEGORY_EXISTS))?;

    uow.commit().await?;
    tracing::info!("new category created with id: {category_id}");
    Ok(category_id)
}

pub async fn rename_category(db: &Db, category_id: i64, name: &str) -> Result<()> {
    let mut uow = db.begin().await?;

    require_category(&mut uow, category_id).await?;
    if let Some(other) = category_named(&mut uow, name).await? {
        if other.id != category_id {
            return Err(IntegrityError::Duplicate(names::CATEGORY_EXISTS));
        }
    }
    uow.update(
        Table::Categories,
        &Filter::by("id", category_id),
        &Record::new().set("name", name),
    )
    .await
    .map_err(|e| duplicate_or_storage(e, names::CATEGORY_EXISTS))?;

    uow.commit().await?;
    Ok(())
}

pub async fn delete_category(db: &Db, category_id: i64) -> Result<()> {
    let mut uow = db.begin().await?;

    require_category(&mut uow, category_id).await?;
    uow.delete(Table::Categories, &Filter::by("id", category_id))
        .await?;

    uow.commit().await?;
    tracing::info!("category {category_id} deleted");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{Answer, UserAnswer};
    use crate::validation::AnswerDraft;

    async fn db_with_quiz() -> (Db, i64) {
        let mut db = Db::new("sqlite::memory:").await.unwrap();
        let quiz_id = db
            .insert(Table::Quizzes, &Record::new().set("title", "Arithmetic"))
            .await
            .unwrap();
        (db, quiz_id)
    }

    async fn add_user(db: &mut Db) -> i64 {
        db.insert(
            Table::Users,
            &Record::new()
                .set("username", "ada")
                .set("email", "ada@example.com")
                .set("password", "hash"),
        )
        .await
        .unwrap()
    }

    fn choices() -> Vec<AnswerChoice> {
        vec![
            AnswerChoice {
                text: "4".into(),
                is_correct: true,
            },
            AnswerChoice {
                text: "5".into(),
                is_correct: false,
            },
        ]
    }

    fn draft(answers: &[AnswerChoice]) -> QuestionDraft<'_> {
        QuestionDraft {
            text: "2+2?",
            answers,
            correct_answer_id: None,
            points: Some(10),
        }
    }

    async fn answers_of(db: &mut Db, question_id: i64) -> Vec<Answer> {
        db.list(Table::Answers, &Filter::by("question_id", question_id))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_question_writes_question_and_answers() {
        let (mut db, quiz_id) = db_with_quiz().await;
        let answers = choices();

        let question_id = create_question(&db, quiz_id, &draft(&answers)).await.unwrap();

        let question = require_quiz_question(&mut db, quiz_id, question_id).await.unwrap();
        assert_eq!(question.text, "2+2?");
        assert_eq!(question.points, Some(10));
        let stored = answers_of(&mut db, question_id).await;
        assert_eq!(stored.len(), 2);
        assert!(stored[0].is_correct);
        assert!(!stored[1].is_correct);
    }

    #[tokio::test]
    async fn create_question_for_missing_quiz_writes_nothing() {
        let (mut db, quiz_id) = db_with_quiz().await;
        let answers = choices();

        let err = create_question(&db, quiz_id + 1, &draft(&answers)).await.unwrap_err();
        assert!(matches!(err, IntegrityError::Missing(names::QUIZ_NOT_FOUND)));

        let questions: Vec<Question> = db.list(Table::Questions, &Filter::all()).await.unwrap();
        assert!(questions.is_empty());
        let answers: Vec<Answer> = db.list(Table::Answers, &Filter::all()).await.unwrap();
        assert!(answers.is_empty());
    }

    #[tokio::test]
    async fn failed_step_rolls_back_earlier_writes() {
        let (mut db, quiz_id) = db_with_quiz().await;
        let answers = choices();

        {
            let mut uow = db.begin().await.unwrap();
            uow.insert(
                Table::Questions,
                &question_record(&draft(&answers)).set("quiz_id", quiz_id),
            )
            .await
            .unwrap();
            // No question 999: the foreign key rejects the answer rows.
            let failed = insert_answers(&mut uow, 999, &answers).await;
            assert!(matches!(failed, Err(IntegrityError::Storage(_))));
        }

        let questions: Vec<Question> = db.list(Table::Questions, &Filter::all()).await.unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn replace_question_swaps_answer_set() {
        let (mut db, quiz_id) = db_with_quiz().await;
        let answers = choices();
        let question_id = create_question(&db, quiz_id, &draft(&answers)).await.unwrap();

        let replacement = vec![
            AnswerChoice {
                text: "four".into(),
                is_correct: true,
            },
            AnswerChoice {
                text: "three".into(),
                is_correct: false,
            },
            AnswerChoice {
                text: "twenty-two".into(),
                is_correct: false,
            },
        ];
        let new_draft = QuestionDraft {
            text: "two plus two?",
            answers: &replacement,
            correct_answer_id: None,
            points: Some(5),
        };
        replace_question(&db, quiz_id, question_id, &new_draft).await.unwrap();

        let question = require_question(&mut db, question_id).await.unwrap();
        assert_eq!(question.text, "two plus two?");
        assert_eq!(question.points, Some(5));
        let stored = answers_of(&mut db, question_id).await;
        let texts: Vec<_> = stored.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, ["four", "three", "twenty-two"]);
    }

    #[tokio::test]
    async fn replace_question_in_wrong_quiz_is_missing() {
        let (db, quiz_id) = db_with_quiz().await;
        let answers = choices();
        let question_id = create_question(&db, quiz_id, &draft(&answers)).await.unwrap();

        let err = replace_question(&db, quiz_id + 1, question_id, &draft(&answers))
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrityError::Missing(names::QUESTION_NOT_FOUND)));
    }

    #[tokio::test]
    async fn delete_question_cascades_to_dependents() {
        let (mut db, quiz_id) = db_with_quiz().await;
        let user_id = add_user(&mut db).await;
        let answers = choices();
        let question_id = create_question(&db, quiz_id, &draft(&answers)).await.unwrap();
        submit_answer(
            &db,
            question_id,
            &UserAnswerDraft {
                user_id,
                answer: "4",
            },
        )
        .await
        .unwrap();

        delete_question(&db, quiz_id, question_id).await.unwrap();

        assert!(answers_of(&mut db, question_id).await.is_empty());
        let user_answers: Vec<UserAnswer> = db
            .list(Table::UserAnswers, &Filter::by("question_id", question_id))
            .await
            .unwrap();
        assert!(user_answers.is_empty());
        assert!(matches!(
            require_question(&mut db, question_id).await,
            Err(IntegrityError::Missing(_))
        ));
    }

    #[tokio::test]
    async fn session_requires_existing_quiz() {
        let (mut db, quiz_id) = db_with_quiz().await;
        let start = "2024-05-01T10:00:00Z".parse().unwrap();
        let end = "2024-05-01T11:00:00Z".parse().unwrap();

        let err = create_session(
            &db,
            &SessionDraft {
                quiz_id: quiz_id + 1,
                start_time: start,
                end_time: end,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, IntegrityError::Missing(names::QUIZ_NOT_FOUND)));

        let sessions: Vec<crate::db::QuizSession> =
            db.list(Table::Sessions, &Filter::all()).await.unwrap();
        assert!(sessions.is_empty());

        create_session(
            &db,
            &SessionDraft {
                quiz_id,
                start_time: start,
                end_time: end,
            },
        )
        .await
        .unwrap();
        let sessions: Vec<crate::db::QuizSession> =
            db.list(Table::Sessions, &Filter::all()).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start_time, start);
    }

    #[tokio::test]
    async fn result_requires_user_and_quiz() {
        let (mut db, quiz_id) = db_with_quiz().await;

        let err = record_result(
            &db,
            &ResultDraft {
                user_id: 1,
                quiz_id,
                score: 3,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, IntegrityError::Missing(names::USER_NOT_FOUND)));

        let user_id = add_user(&mut db).await;
        record_result(
            &db,
            &ResultDraft {
                user_id,
                quiz_id,
                score: 3,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn quiz_answers_for_foreign_question_store_nothing() {
        let (mut db, quiz_id) = db_with_quiz().await;
        let user_id = add_user(&mut db).await;
        let answers = choices();
        let own = create_question(&db, quiz_id, &draft(&answers)).await.unwrap();

        let other_quiz = db
            .insert(Table::Quizzes, &Record::new().set("title", "Other"))
            .await
            .unwrap();
        let foreign = create_question(&db, other_quiz, &draft(&answers)).await.unwrap();

        let submission = QuizAnswersDraft {
            user_id,
            answers: vec![
                AnswerDraft {
                    question_id: own,
                    answer: "4",
                },
                AnswerDraft {
                    question_id: foreign,
                    answer: "4",
                },
            ],
        };
        let err = submit_quiz_answers(&db, quiz_id, &submission).await.unwrap_err();
        assert!(matches!(err, IntegrityError::Missing(names::QUESTION_NOT_FOUND)));

        let stored: Vec<UserAnswer> = db.list(Table::UserAnswers, &Filter::all()).await.unwrap();
        assert!(stored.is_empty());
    }

    #[test]
    fn unique_constraint_failures_read_as_duplicates() {
        let other =
            duplicate_or_storage(color_eyre::eyre::eyre!("disk full"), names::CATEGORY_EXISTS);
        assert!(matches!(other, IntegrityError::Storage(_)));
    }

    #[tokio::test]
    async fn category_insert_refused_by_unique_index_is_duplicate() {
        let (db, _) = db_with_quiz().await;
        create_category(&db, "Math").await.unwrap();

        // Bypass the lookup so only the UNIQUE index stands in the way.
        let mut uow = db.begin().await.unwrap();
        let err = uow
            .insert(Table::Categories, &Record::new().set("name", "Math"))
            .await
            .map_err(|e| duplicate_or_storage(e, names::CATEGORY_EXISTS))
            .unwrap_err();
        assert!(matches!(err, IntegrityError::Duplicate(names::CATEGORY_EXISTS)));
    }

    #[tokio::test]
    async fn category_names_stay_unique() {
        let (db, _) = db_with_quiz().await;

        let math = create_category(&db, "Math").await.unwrap();
        let err = create_category(&db, "Math").await.unwrap_err();
        assert!(matches!(err, IntegrityError::Duplicate(names::CATEGORY_EXISTS)));

        let history = create_category(&db, "History").await.unwrap();
        let err = rename_category(&db, history, "Math").await.unwrap_err();
        assert!(matches!(err, IntegrityError::Duplicate(_)));

        // Renaming a category to its own name is fine.
        rename_category(&db, math, "Math").await.unwrap();

        delete_category(&db, math).await.unwrap();
        assert!(matches!(
            delete_category(&db, math).await,
            Err(IntegrityError::Missing(names::CATEGORY_NOT_FOUND))
        ));
    }
}
