pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:3000";

// Accounts
pub const SIGNUP_OK: &str = "Inscription réussie";
pub const SIGNUP_FAILED: &str = "Erreur lors de l'inscription";
pub const USER_EXISTS: &str = "Cet utilisateur existe déjà";
pub const USER_NOT_FOUND: &str = "Utilisateur non trouvé";
pub const LOGIN_OK: &str = "Authentification réussie";
pub const LOGIN_FAILED: &str = "Erreur lors de l'authentification";
pub const BAD_CREDENTIALS: &str = "Adresse e-mail ou mot de passe incorrect";

// Results
pub const RESULT_SAVED: &str = "Résultats enregistrés avec succès";
pub const RESULT_SAVE_FAILED: &str = "Erreur lors de l'enregistrement des résultats";
pub const RESULT_FETCH_FAILED: &str = "Erreur lors de la récupération des résultats";
pub const RESULT_NOT_FOUND: &str = "Aucun résultat trouvé";

// Sessions
pub const SESSION_CREATED: &str = "Session de formation créée avec succès";
pub const SESSION_CREATE_FAILED: &str = "Erreur lors de la création de la session";
pub const SESSIONS_FETCH_FAILED: &str = "Erreur lors de la récupération des sessions";
pub const SESSION_FETCH_FAILED: &str = "Erreur lors de la récupération de la session";
pub const SESSION_NOT_FOUND: &str = "Session de formation non trouvée";

// Quizzes
pub const QUIZZES_FETCH_FAILED: &str = "Erreur lors de la récupération des quiz";
pub const QUIZ_FETCH_FAILED: &str = "Erreur lors de la récupération du quiz";
pub const QUIZ_CREATE_FAILED: &str = "Erreur lors de la création du quiz";
pub const QUIZ_NOT_FOUND: &str = "Quiz non trouvé";

// Questions
pub const QUESTION_ADDED: &str = "Question ajoutée avec succès";
pub const QUESTION_ADD_FAILED: &str = "Erreur lors de l'ajout de la question";
pub const QUESTIONS_FETCH_FAILED: &str = "Erreur lors de la récupération des questions";
pub const QUESTION_FETCH_FAILED: &str = "Erreur lors de la récupération de la question";
pub const QUESTION_NOT_FOUND: &str = "Question non trouvée";
pub const QUESTION_UPDATED: &str = "Question mise à jour avec succès";
pub const QUESTION_UPDATE_FAILED: &str = "Erreur lors de la mise à jour de la question";
pub const QUESTION_DELETED: &str = "Question supprimée avec succès";
pub const QUESTION_DELETE_FAILED: &str = "Erreur lors de la suppression de la question";

// Categories
pub const CATEGORY_CREATED: &str = "Catégorie créée avec succès";
pub const CATEGORY_CREATE_FAILED: &str = "Erreur lors de la création de la catégorie";
pub const CATEGORY_EXISTS: &str = "Cette catégorie existe déjà";
pub const CATEGORIES_FETCH_FAILED: &str = "Erreur lors de la récupération des catégories";
pub const CATEGORY_FETCH_FAILED: &str = "Erreur lors de la récupération de la catégorie";
pub const CATEGORY_NOT_FOUND: &str = "Catégorie non trouvée";
pub const CATEGORY_UPDATED: &str = "Catégorie mise à jour avec succès";
pub const CATEGORY_UPDATE_FAILED: &str = "Erreur lors de la mise à jour de la catégorie";
pub const CATEGORY_DELETED: &str = "Catégorie supprimée avec succès";
pub const CATEGORY_DELETE_FAILED: &str = "Erreur lors de la suppression de la catégorie";

// User answers
pub const ANSWER_SUBMITTED: &str = "Réponse soumise avec succès";
pub const ANSWERS_SUBMITTED: &str = "Réponses soumises avec succès";
pub const ANSWER_SUBMIT_FAILED: &str = "Erreur lors de la soumission de la réponse";
pub const ANSWER_FETCH_FAILED: &str = "Erreur lors de la récupération de la réponse";
pub const ANSWER_NOT_FOUND: &str = "Réponse non trouvée";

// Validation
pub const MALFORMED_BODY: &str = "Corps de requête JSON invalide";
pub const SIGNUP_FIELDS_REQUIRED: &str =
    "Le nom d'utilisateur, l'e-mail et le mot de passe sont requis.";
pub const QUESTION_TEXT_REQUIRED: &str = "Le texte de la question est requis.";
pub const QUESTION_TWO_ANSWERS: &str = "La question doit avoir au moins deux réponses.";
pub const QUESTION_CORRECT_ANSWER: &str =
    "La question doit avoir au moins une réponse correcte.";
pub const USER_ID_REQUIRED: &str = "Le userId est requis.";
pub const QUIZ_ID_REQUIRED: &str = "Le quizId est requis.";
pub const SCORE_REQUIRED: &str = "Le score est requis.";
pub const ANSWERS_REQUIRED: &str = "Veuillez fournir au moins une réponse.";
pub const ANSWER_INCOMPLETE: &str =
    "Chaque réponse doit avoir une questionId et une réponse non vide.";
pub const ANSWER_TEXT_REQUIRED: &str = "La réponse ne peut pas être vide.";
pub const CATEGORY_NAME_REQUIRED: &str = "Le nom de la catégorie est requis.";
pub const QUIZ_TITLE_REQUIRED: &str = "Le titre du quiz est requis.";
pub const SESSION_TIMES_REQUIRED: &str = "Les heures de début et de fin sont requises.";
pub const SESSION_TIMES_ORDER: &str = "L'heure de fin doit suivre l'heure de début.";
