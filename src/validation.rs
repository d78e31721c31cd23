//! Shape checks on incoming payloads.
//!
//! Every function here is pure: it either hands back a borrowed, fully
//! present view of the payload or the first rule that failed.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    AnswerChoice, CategoryBody, LegacyQuestionBody, QuestionBody, QuestionNoteBody,
    QuizAnswersBody, QuizBody, ResultBody, SessionBody, SignupBody, UserAnswerBody,
};
use crate::names;

pub const MIN_ANSWERS: usize = 2;

/// A failed rule, carrying the message returned to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Invalid(pub &'static str);

#[derive(Debug, Clone, Copy)]
pub struct SignupDraft<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct QuestionDraft<'a> {
    pub text: &'a str,
    pub answers: &'a [AnswerChoice],
    pub correct_answer_id: Option<i64>,
    pub points: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub struct NoteDraft<'a> {
    pub text: &'a str,
    pub note: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionDraft {
    pub quiz_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct ResultDraft {
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct UserAnswerDraft<'a> {
    pub user_id: i64,
    pub answer: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct AnswerDraft<'a> {
    pub question_id: i64,
    pub answer: &'a str,
}

#[derive(Debug, Clone)]
pub struct QuizAnswersDraft<'a> {
    pub user_id: i64,
    pub answers: Vec<AnswerDraft<'a>>,
}

/// Trimmed, non-empty text or `Invalid(message)`.
fn required<'a>(value: Option<&'a String>, message: &'static str) -> Result<&'a str, Invalid> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(Invalid(message))
}

pub fn signup(body: &SignupBody) -> Result<SignupDraft<'_>, Invalid> {
    let username = required(body.username.as_ref(), names::SIGNUP_FIELDS_REQUIRED)?;
    let email = required(body.email.as_ref(), names::SIGNUP_FIELDS_REQUIRED)?;
    // Passwords are taken verbatim; only emptiness is rejected.
    let password = body
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or(Invalid(names::SIGNUP_FIELDS_REQUIRED))?;

    Ok(SignupDraft {
        username,
        email,
        password,
    })
}

pub fn question(body: &QuestionBody) -> Result<QuestionDraft<'_>, Invalid> {
    let text = required(body.text.as_ref(), names::QUESTION_TEXT_REQUIRED)?;

    let answers = body.answers.as_deref().unwrap_or_default();
    if answers.len() < MIN_ANSWERS {
        return Err(Invalid(names::QUESTION_TWO_ANSWERS));
    }

    if !answers.iter().any(|a| a.is_correct) {
        return Err(Invalid(names::QUESTION_CORRECT_ANSWER));
    }

    Ok(QuestionDraft {
        text,
        answers,
        correct_answer_id: body.correct_answer_id,
        points: body.points,
    })
}

/// The standalone route checks the question itself before the quiz it targets.
pub fn legacy_question(body: &LegacyQuestionBody) -> Result<(i64, QuestionDraft<'_>), Invalid> {
    let draft = question(&body.question)?;
    let quiz_id = body.quiz_id.ok_or(Invalid(names::QUIZ_ID_REQUIRED))?;
    Ok((quiz_id, draft))
}

pub fn note(body: &QuestionNoteBody) -> Result<NoteDraft<'_>, Invalid> {
    let text = required(body.text.as_ref(), names::QUESTION_TEXT_REQUIRED)?;
    Ok(NoteDraft {
        text,
        note: body.note,
    })
}

pub fn quiz(body: &QuizBody) -> Result<&str, Invalid> {
    required(body.title.as_ref(), names::QUIZ_TITLE_REQUIRED)
}

pub fn category(body: &CategoryBody) -> Result<&str, Invalid> {
    required(body.name.as_ref(), names::CATEGORY_NAME_REQUIRED)
}

pub fn session(body: &SessionBody) -> Result<SessionDraft, Invalid> {
    let quiz_id = body.quiz_id.ok_or(Invalid(names::QUIZ_ID_REQUIRED))?;
    let (Some(start_time), Some(end_time)) = (body.start_time, body.end_time) else {
        return Err(Invalid(names::SESSION_TIMES_REQUIRED));
    };
    if end_time < start_time {
        return Err(Invalid(names::SESSION_TIMES_ORDER));
    }

    Ok(SessionDraft {
        quiz_id,
        start_time,
        end_time,
    })
}

pub fn result(body: &ResultBody) -> Result<ResultDraft, Invalid> {
    Ok(ResultDraft {
        user_id: body.user_id.ok_or(Invalid(names::USER_ID_REQUIRED))?,
        quiz_id: body.quiz_id.ok_or(Invalid(names::QUIZ_ID_REQUIRED))?,
        score: body.score.ok_or(Invalid(names::SCORE_REQUIRED))?,
    })
}

pub fn user_answer(body: &UserAnswerBody) -> Result<UserAnswerDraft<'_>, Invalid> {
    let user_id = body.user_id.ok_or(Invalid(names::USER_ID_REQUIRED))?;
    let answer = required(body.answer.as_ref(), names::ANSWER_TEXT_REQUIRED)?;
    Ok(UserAnswerDraft { user_id, answer })
}

pub fn quiz_answers(body: &QuizAnswersBody) -> Result<QuizAnswersDraft<'_>, Invalid> {
    let user_id = body.user_id.ok_or(Invalid(names::USER_ID_REQUIRED))?;

    let submitted = body.answers.as_deref().unwrap_or_default();
    if submitted.is_empty() {
        return Err(Invalid(names::ANSWERS_REQUIRED));
    }

    let answers = submitted
        .iter()
        .map(|a| {
            let question_id = a.question_id.ok_or(Invalid(names::ANSWER_INCOMPLETE))?;
            let answer = required(a.answer.as_ref(), names::ANSWER_INCOMPLETE)?;
            Ok(AnswerDraft {
                question_id,
                answer,
            })
        })
        .collect::<Result<Vec<_>, Invalid>>()?;

    Ok(QuizAnswersDraft { user_id, answers })
}
