use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::iter::FusedIterator;
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::{Question, QuestionFileError};

type FieldSetter = fn(&mut Question, &str, &Path) -> Result<(), String>;

const FIELDS: &[(&str, FieldSetter)] = &[
    ("title", set_title),
    ("question", set_question),
    ("option", push_option),
    ("image", push_image),
    ("answer", set_answer),
    ("final_text", set_final_text),
    ("final_image", set_final_image),
];

fn set_title(question: &mut Question, value: &str, _: &Path) -> Result<(), String> {
    question.title = non_empty(value);
    Ok(())
}

fn set_question(question: &mut Question, value: &str, _: &Path) -> Result<(), String> {
    question.question = value.to_string();
    Ok(())
}

fn push_option(question: &mut Question, value: &str, _: &Path) -> Result<(), String> {
    question.options.push(value.to_string());
    Ok(())
}

fn push_image(question: &mut Question, value: &str, base_dir: &Path) -> Result<(), String> {
    question.images.push(base_dir.join(value));
    Ok(())
}

fn set_answer(question: &mut Question, value: &str, _: &Path) -> Result<(), String> {
    // Integers past the i64 range saturate; they match no option either way.
    question.answer = match value.parse::<i64>() {
        Ok(answer) => answer,
        Err(err) if *err.kind() == IntErrorKind::PosOverflow => i64::MAX,
        Err(err) if *err.kind() == IntErrorKind::NegOverflow => i64::MIN,
        Err(_) => return Err(format!("expected a 1-based option index, got {:?}", value)),
    };
    Ok(())
}

fn set_final_text(question: &mut Question, value: &str, _: &Path) -> Result<(), String> {
    question.final_text = non_empty(value);
    Ok(())
}

fn set_final_image(question: &mut Question, value: &str, base_dir: &Path) -> Result<(), String> {
    question.final_image = Some(base_dir.join(value));
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Opens `path` and returns a lazy reader over its questions.
pub fn read_questions(
    path: impl AsRef<Path>,
) -> Result<QuestionReader<BufReader<File>>, QuestionFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| QuestionFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("reading questions from {}", path.display());
    Ok(QuestionReader::new(BufReader::new(file), path))
}

/// Single forward pass over a question file, yielding one record per
/// blank-line separated block. Nothing is read ahead of the record being built.
///
/// After the first error, or once the input is exhausted, the reader yields `None`.
pub struct QuestionReader<R> {
    lines: Lines<R>,
    path: PathBuf,
    base_dir: PathBuf,
    line_number: usize,
    pending: Question,
    finished: bool,
}

impl<R: BufRead> QuestionReader<R> {
    /// `path` names the source in error messages; relative image paths are
    /// resolved against its parent directory.
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            lines: reader.lines(),
            path,
            base_dir,
            line_number: 0,
            pending: Question::default(),
            finished: false,
        }
    }

    fn take_pending(&mut self) -> Option<Question> {
        let record = std::mem::take(&mut self.pending);
        if record.question.is_empty() {
            return None;
        }
        debug!(
            "parsed question ending at {}:{}: {:?}",
            self.path.display(),
            self.line_number,
            record.question
        );
        Some(record)
    }

    fn apply_line(&mut self, line: &str) -> Result<(), QuestionFileError> {
        let Some((name, value)) = line.split_once(':') else {
            return Err(QuestionFileError::MissingSeparator {
                path: self.path.clone(),
                line: self.line_number,
                text: line.to_string(),
            });
        };
        let name = name.trim();
        let value = value.trim();
        let Some((_, setter)) = FIELDS.iter().find(|(field, _)| *field == name) else {
            return Err(QuestionFileError::UnknownField {
                path: self.path.clone(),
                line: self.line_number,
                name: name.to_string(),
                text: line.to_string(),
            });
        };
        setter(&mut self.pending, value, &self.base_dir).map_err(|reason| {
            QuestionFileError::InvalidValue {
                path: self.path.clone(),
                line: self.line_number,
                name: name.to_string(),
                reason,
            }
        })
    }
}

impl<R: BufRead> Iterator for QuestionReader<R> {
    type Item = Result<Question, QuestionFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(source)) => {
                    self.finished = true;
                    return Some(Err(QuestionFileError::Io {
                        path: self.path.clone(),
                        source,
                    }));
                }
                None => {
                    self.finished = true;
                    return self.take_pending().map(Ok);
                }
            };
            self.line_number += 1;
            let line = line.trim_end();
            trace!("{}:{}: {}", self.path.display(), self.line_number, line);

            if line.is_empty() {
                if let Some(record) = self.take_pending() {
                    return Some(Ok(record));
                }
                continue;
            }
            if line.trim_start().starts_with('#') {
                continue;
            }
            if let Err(err) = self.apply_line(line) {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}

impl<R: BufRead> FusedIterator for QuestionReader<R> {}
