mod common;

use common::{create_test_db, test_db_url};
use quizdesk::db::{Answer, Category, Db, Filter, Question, Quiz, Record, Store, Table, User};
use quizdesk::integrity::{self, IntegrityError};
use quizdesk::models::AnswerChoice;
use quizdesk::names;
use quizdesk::services::account::AccountRepository;
use quizdesk::validation::QuestionDraft;

fn choices() -> Vec<AnswerChoice> {
    vec![
        AnswerChoice {
            text: "3".to_string(),
            is_correct: false,
        },
        AnswerChoice {
            text: "4".to_string(),
            is_correct: true,
        },
    ]
}

#[tokio::test]
async fn file_database_survives_reopening() {
    let (url, path) = test_db_url();

    {
        let mut db = Db::new(&url).await.unwrap();
        db.insert(Table::Categories, &Record::new().set("name", "Math"))
            .await
            .unwrap();
    }

    // Schema creation is idempotent and existing rows are kept.
    let mut db = Db::new(&url).await.unwrap();
    let categories: Vec<Category> = db.list(Table::Categories, &Filter::all()).await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Math");

    drop(db);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn question_and_answers_are_written_together() {
    let mut db = create_test_db().await;
    let quiz_id = db
        .insert(Table::Quizzes, &Record::new().set("title", "Arithmetic"))
        .await
        .unwrap();

    let answers = choices();
    let draft = QuestionDraft {
        text: "2+2",
        answers: &answers,
        correct_answer_id: None,
        points: Some(1),
    };
    let question_id = integrity::create_question(&db, quiz_id, &draft)
        .await
        .unwrap();

    let question: Question = db
        .get(Table::Questions, &Filter::by("id", question_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(question.quiz_id, quiz_id);
    assert_eq!(question.points, Some(1));

    let stored: Vec<Answer> = db
        .list(Table::Answers, &Filter::by("question_id", question_id))
        .await
        .unwrap();
    let texts: Vec<_> = stored.iter().map(|a| a.text.as_str()).collect();
    assert_eq!(texts, ["3", "4"]);
    assert!(stored[1].is_correct);
}

#[tokio::test]
async fn question_for_unknown_quiz_leaves_no_rows() {
    let mut db = create_test_db().await;

    let answers = choices();
    let draft = QuestionDraft {
        text: "2+2",
        answers: &answers,
        correct_answer_id: None,
        points: None,
    };
    let err = integrity::create_question(&db, 99, &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, IntegrityError::Missing(names::QUIZ_NOT_FOUND)));

    let questions: Vec<Question> = db.list(Table::Questions, &Filter::all()).await.unwrap();
    let answers: Vec<Answer> = db.list(Table::Answers, &Filter::all()).await.unwrap();
    assert!(questions.is_empty());
    assert!(answers.is_empty());
}

#[tokio::test]
async fn quizzes_are_listed_in_creation_order() {
    let mut db = create_test_db().await;
    for title in ["History", "Geography", "Algebra"] {
        db.insert(Table::Quizzes, &Record::new().set("title", title))
            .await
            .unwrap();
    }

    let quizzes: Vec<Quiz> = db.list(Table::Quizzes, &Filter::all()).await.unwrap();
    let titles: Vec<_> = quizzes.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, ["History", "Geography", "Algebra"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_to_a_file_database_all_land() {
    let (url, path) = test_db_url();
    let mut db = Db::new(&url).await.unwrap();

    let tasks: Vec<_> = (0..40)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                let name = format!("cat-{i}");
                integrity::create_category(&db, &name).await
            })
        })
        .collect();

    let mut failures = Vec::new();
    for task in tasks {
        if let Err(e) = task.await.unwrap() {
            failures.push(e.to_string());
        }
    }
    assert!(failures.is_empty(), "failed writes: {failures:?}");

    let categories: Vec<Category> = db.list(Table::Categories, &Filter::all()).await.unwrap();
    assert_eq!(categories.len(), 40);

    drop(db);
    let _ = std::fs::remove_file(path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_categories_keep_one_row() {
    let (url, path) = test_db_url();
    let mut db = Db::new(&url).await.unwrap();

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move { integrity::create_category(&db, "Math").await })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => created += 1,
            Err(IntegrityError::Duplicate(message)) => {
                assert_eq!(message, names::CATEGORY_EXISTS)
            }
            Err(e) => panic!("unexpected failure: {e}"),
        }
    }
    assert_eq!(created, 1);

    let categories: Vec<Category> = db.list(Table::Categories, &Filter::all()).await.unwrap();
    assert_eq!(categories.len(), 1);

    drop(db);
    let _ = std::fs::remove_file(path);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_signups_with_one_email_store_one_user() {
    let (url, path) = test_db_url();
    let mut db = Db::new(&url).await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let db = db.clone();
            tokio::spawn(async move {
                db.create_user(&format!("user-{i}"), "ada@example.com", "s3cret")
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap().unwrap().is_some() {
            created += 1;
        }
    }
    assert_eq!(created, 1);

    let users: Vec<User> = db.list(Table::Users, &Filter::all()).await.unwrap();
    assert_eq!(users.len(), 1);

    drop(db);
    let _ = std::fs::remove_file(path);
}
