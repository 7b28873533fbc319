// src/content_bank.rs

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Deserialize)]
pub struct QuizHeader {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionEntry {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: AnswerOption,
    #[serde(default)]
    pub hint: Option<String>,
}

/// A `*-quiz.json` file.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizFile {
    pub quiz: QuizHeader,
    pub questions: Vec<QuestionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetHeader {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardEntry {
    pub front: String,
    pub back: String,
    #[serde(default)]
    pub hint: Option<String>,
}

/// A `*-flashcard.json` file.
#[derive(Debug, Clone, Deserialize)]
pub struct FlashcardFile {
    pub set: SetHeader,
    pub cards: Vec<CardEntry>,
}

#[derive(Debug, Clone)]
pub enum ParsedContent {
    Quiz(QuizFile),
    FlashcardSet(FlashcardFile),
}

impl ParsedContent {
    pub fn title(&self) -> &str {
        match self {
            ParsedContent::Quiz(file) => &file.quiz.title,
            ParsedContent::FlashcardSet(file) => &file.set.title,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ParsedContent::Quiz(_) => ContentKind::Quiz,
            ParsedContent::FlashcardSet(_) => ContentKind::FlashcardSet,
        }
    }

    /// Category carried inside the file itself, used by the flat layout.
    pub fn embedded_category(&self) -> Option<&str> {
        match self {
            ParsedContent::Quiz(_) => None,
            ParsedContent::FlashcardSet(file) => file.set.category.as_deref(),
        }
    }
}

/// Parses the raw bytes of a classified content file.
///
/// Returns `Ok(None)` for an empty or whitespace-only file.
pub fn parse_content(path: &Path, kind: ContentKind, bytes: &[u8]) -> Result<Option<ParsedContent>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let parsed = match kind {
        ContentKind::Quiz => serde_json::from_slice::<QuizFile>(bytes).map(ParsedContent::Quiz),
        ContentKind::FlashcardSet => {
            serde_json::from_slice::<FlashcardFile>(bytes).map(ParsedContent::FlashcardSet)
        }
        ContentKind::Unrecognized => {
            return Err(ContentError::malformed(path, "unrecognized content kind"));
        }
    }
    .map_err(|e| ContentError::malformed(path, e.to_string()))?;

    if parsed.title().trim().is_empty() {
        return Err(ContentError::malformed(path, "title must not be blank"));
    }

    Ok(Some(parsed))
}

/// Reads and parses one content file from disk.
pub fn load_content(path: &Path, kind: ContentKind) -> Result<Option<ParsedContent>> {
    let bytes = std::fs::read(path).map_err(|e| ContentError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_content(path, kind, &bytes)
}

use crate::classifier::ContentKind;
use crate::error::{ContentError, Result};
use crate::quizzes::AnswerOption;
use serde::Deserialize;
use std::path::Path;

#[cfg(test)]
mod tests {
    use super::*;

    const MIDTERM: &str = r#"{
        "quiz": {"title": "Midterm", "description": "d"},
        "questions": [{
            "question_text": "2+2?",
            "option_a": "3", "option_b": "4", "option_c": "5", "option_d": "6",
            "correct_answer": "B",
            "hint": "basic math"
        }]
    }"#;

    #[test]
    fn parses_quiz_file() {
        let parsed = parse_content(Path::new("m-quiz.json"), ContentKind::Quiz, MIDTERM.as_bytes())
            .unwrap()
            .unwrap();
        let ParsedContent::Quiz(file) = parsed else {
            panic!("expected a quiz");
        };
        assert_eq!(file.quiz.title, "Midterm");
        assert_eq!(file.quiz.description.as_deref(), Some("d"));
        assert_eq!(file.questions.len(), 1);
        assert_eq!(file.questions[0].correct_answer, AnswerOption::B);
        assert_eq!(file.questions[0].hint.as_deref(), Some("basic math"));
    }

    #[test]
    fn parses_flashcard_file_with_optional_fields() {
        let json = r#"{
            "set": {"title": "Acids", "description": "pH", "category": "CHEM-112"},
            "cards": [{"front": "HCl", "back": "strong"}, {"front": "pH 7", "back": "neutral", "hint": "water"}]
        }"#;
        let parsed = parse_content(Path::new("a.json"), ContentKind::FlashcardSet, json.as_bytes())
            .unwrap()
            .unwrap();
        assert_eq!(parsed.title(), "Acids");
        assert_eq!(parsed.embedded_category(), Some("CHEM-112"));
        let ParsedContent::FlashcardSet(file) = parsed else {
            panic!("expected a flashcard set");
        };
        assert_eq!(file.cards.len(), 2);
        assert!(file.cards[0].hint.is_none());
    }

    #[test]
    fn blank_files_are_skipped() {
        let path = Path::new("empty-quiz.json");
        assert!(parse_content(path, ContentKind::Quiz, b"").unwrap().is_none());
        assert!(parse_content(path, ContentKind::Quiz, b"  \n\t ").unwrap().is_none());
        assert!(parse_content(path, ContentKind::Quiz, b"\xEF\xBB\xBF\n").unwrap().is_none());
    }

    #[test]
    fn syntax_errors_are_malformed() {
        let err = parse_content(Path::new("bad-quiz.json"), ContentKind::Quiz, b"{ \"quiz\": ")
            .unwrap_err();
        assert!(matches!(err, ContentError::MalformedContent { .. }));
    }

    #[test]
    fn missing_title_is_malformed() {
        let json = r#"{"quiz": {"description": "no title"}, "questions": []}"#;
        let err = parse_content(Path::new("x-quiz.json"), ContentKind::Quiz, json.as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("title"));

        let blank = r#"{"set": {"title": "   "}, "cards": []}"#;
        let err = parse_content(Path::new("x.json"), ContentKind::FlashcardSet, blank.as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn unknown_answer_label_is_malformed() {
        let json = MIDTERM.replace("\"B\"", "\"E\"");
        assert!(parse_content(Path::new("m-quiz.json"), ContentKind::Quiz, json.as_bytes()).is_err());
    }
}
