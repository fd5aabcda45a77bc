//! Question records and the reader for the line-oriented question file.

mod error;
mod parser;

use std::path::PathBuf;

pub use error::QuestionFileError;
pub use parser::{QuestionReader, read_questions};

/// One quiz question as declared between two blank lines of a question file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Question {
    pub title: Option<String>,
    pub question: String,
    pub options: Vec<String>,
    /// Supporting images, already resolved against the question file's directory.
    pub images: Vec<PathBuf>,
    /// 1-based index into `options`; `0` when unset. Any other value,
    /// negative ones included, simply matches no option.
    pub answer: i64,
    pub final_text: Option<String>,
    pub final_image: Option<PathBuf>,
}

impl Question {
    /// Text shown as the body line. Once revealed, `final_text` wins when present.
    pub fn body(&self, revealed: bool) -> &str {
        if revealed {
            self.final_text.as_deref().unwrap_or(&self.question)
        } else {
            &self.question
        }
    }

    /// Whether the option at the 1-based `position` is the correct one.
    ///
    /// An `answer` outside of `options` never matches, so it highlights nothing.
    pub fn is_answer(&self, position: usize) -> bool {
        position != 0
            && position <= self.options.len()
            && i64::try_from(position).is_ok_and(|position| position == self.answer)
    }
}

/// Letter prefix for the option at 1-based `position`: `a`..`z`, then `A`..`Z`,
/// then the plain position number.
pub fn option_label(position: usize) -> String {
    match position {
        1..=26 => char::from(b'a' + (position - 1) as u8).to_string(),
        27..=52 => char::from(b'A' + (position - 27) as u8).to_string(),
        _ => position.to_string(),
    }
}
