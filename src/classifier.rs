const QUIZ_SUFFIX: &str = "-quiz.json";
const FLASHCARD_SUFFIX: &str = "-flashcard.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Quiz,
    FlashcardSet,
    Unrecognized,
}

/// Classifies a content file by its name.
pub fn classify(path: &Path, layout: LayoutStrategy) -> ContentKind {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return ContentKind::Unrecognized;
    };

    if name.ends_with(QUIZ_SUFFIX) {
        return ContentKind::Quiz;
    }
    if name.ends_with(FLASHCARD_SUFFIX) {
        return ContentKind::FlashcardSet;
    }

    match layout {
        LayoutStrategy::Flat { kind } if name.ends_with(".json") => kind,
        _ => ContentKind::Unrecognized,
    }
}

/// Returns the first path segment under `root`, i.e. the course folder.
///
/// `None` when `path` is not under `root` or sits directly in it.
pub fn derive_category(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components = relative.components();

    let category = match components.next()? {
        Component::Normal(segment) => segment.to_str()?,
        _ => return None,
    };
    // The segment must be a folder, not the file itself.
    components.next()?;

    Some(category.to_string())
}

use crate::config::LayoutStrategy;
use std::path::{Component, Path};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn suffix_decides_kind() {
        let nested = LayoutStrategy::NestedByCourse;
        assert_eq!(classify(Path::new("/c/unit1-quiz.json"), nested), ContentKind::Quiz);
        assert_eq!(
            classify(Path::new("/c/terms-flashcard.json"), nested),
            ContentKind::FlashcardSet
        );
        assert_eq!(classify(Path::new("/c/notes.json"), nested), ContentKind::Unrecognized);
        assert_eq!(classify(Path::new("/c/readme.md"), nested), ContentKind::Unrecognized);
        // Suffix must include the dash.
        assert_eq!(classify(Path::new("/c/quiz.json"), nested), ContentKind::Unrecognized);
    }

    #[test]
    fn flat_layout_accepts_any_json() {
        let flat = LayoutStrategy::Flat {
            kind: ContentKind::FlashcardSet,
        };
        assert_eq!(classify(Path::new("/f/biology.json"), flat), ContentKind::FlashcardSet);
        assert_eq!(classify(Path::new("/f/x-quiz.json"), flat), ContentKind::Quiz);
        assert_eq!(classify(Path::new("/f/biology.txt"), flat), ContentKind::Unrecognized);
    }

    #[test]
    fn category_is_first_folder_under_root() {
        let root = PathBuf::from("/data/Courses");
        assert_eq!(
            derive_category(&root, Path::new("/data/Courses/CMPT-215/unit1-quiz.json")),
            Some("CMPT-215".to_string())
        );
        assert_eq!(
            derive_category(&root, Path::new("/data/Courses/STAT-245/week3/lab-quiz.json")),
            Some("STAT-245".to_string())
        );
    }

    #[test]
    fn no_category_outside_the_pattern() {
        let root = PathBuf::from("/data/Courses");
        assert_eq!(derive_category(&root, Path::new("/data/Courses/loose-quiz.json")), None);
        assert_eq!(derive_category(&root, Path::new("/data/Other/CMPT-215/a-quiz.json")), None);
    }
}
