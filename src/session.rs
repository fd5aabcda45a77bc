//! The reveal/advance state machine over a lazily read question sequence.

use anyhow::Result;
use tracing::debug;

use crate::questions::Question;

/// A read-only view of where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState<'a> {
    Active {
        question: &'a Question,
        revealed: bool,
    },
    Exhausted,
}

enum Cursor {
    /// Nothing pulled from the source yet.
    Pending,
    Active { question: Question, revealed: bool },
    Exhausted,
}

/// Walks forward through a question source, one `act` at a time.
///
/// Questions are pulled only when the session needs one, and never twice.
pub struct Session<I> {
    source: I,
    cursor: Cursor,
    position: usize,
}

impl<I, E> Session<I>
where
    I: Iterator<Item = Result<Question, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    pub fn new(source: I) -> Self {
        Self {
            source,
            cursor: Cursor::Pending,
            position: 0,
        }
    }

    /// Current state, pulling the first question on first use.
    pub fn state(&mut self) -> Result<SessionState<'_>> {
        if matches!(self.cursor, Cursor::Pending) {
            self.pull()?;
        }
        Ok(match &self.cursor {
            Cursor::Active { question, revealed } => SessionState::Active {
                question,
                revealed: *revealed,
            },
            Cursor::Pending | Cursor::Exhausted => SessionState::Exhausted,
        })
    }

    pub fn current(&mut self) -> Result<Option<&Question>> {
        Ok(match self.state()? {
            SessionState::Active { question, .. } => Some(question),
            SessionState::Exhausted => None,
        })
    }

    /// The single user action: reveal the current question, or move past a
    /// revealed one. Does nothing once the questions are exhausted.
    ///
    /// Returns `true` when the current question was left behind.
    pub fn act(&mut self) -> Result<bool> {
        if matches!(self.cursor, Cursor::Pending) {
            self.pull()?;
        }
        let revealed = match &mut self.cursor {
            Cursor::Active { revealed, .. } => revealed,
            Cursor::Pending | Cursor::Exhausted => return Ok(false),
        };
        if *revealed {
            self.pull()?;
            Ok(true)
        } else {
            *revealed = true;
            debug!("revealed question {}", self.position);
            Ok(false)
        }
    }

    /// 1-based position of the current question; `0` before the first pull.
    pub fn position(&self) -> usize {
        self.position
    }

    fn pull(&mut self) -> Result<()> {
        // A failed pull leaves the session exhausted; the error is fatal anyway.
        self.cursor = Cursor::Exhausted;
        match self.source.next().transpose()? {
            Some(question) => {
                self.position += 1;
                debug!("showing question {}: {:?}", self.position, question.question);
                self.cursor = Cursor::Active {
                    question,
                    revealed: false,
                };
            }
            None => debug!("no more questions after {}", self.position),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QuestionReader;
    use std::cell::Cell;
    use std::io::Cursor as IoCursor;

    fn question(text: &str) -> Question {
        Question {
            question: text.to_string(),
            ..Question::default()
        }
    }

    fn session_over(
        questions: Vec<Question>,
    ) -> Session<impl Iterator<Item = Result<Question, std::io::Error>>> {
        Session::new(questions.into_iter().map(Ok))
    }

    fn describe<I, E>(session: &mut Session<I>) -> String
    where
        I: Iterator<Item = Result<Question, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        match session.state().expect("state") {
            SessionState::Active { question, revealed } => {
                format!("{}{}", question.question, if revealed { "!" } else { "" })
            }
            SessionState::Exhausted => "done".to_string(),
        }
    }

    #[test]
    fn reveal_then_advance_until_exhausted() {
        let mut session = session_over(vec![question("one"), question("two")]);
        let mut seen = vec![describe(&mut session)];
        let mut left = Vec::new();
        for _ in 0..6 {
            left.push(session.act().expect("act"));
            seen.push(describe(&mut session));
        }
        assert_eq!(seen, ["one", "one!", "two", "two!", "done", "done", "done"]);
        assert_eq!(left, [false, true, false, true, false, false]);
        assert!(session.current().expect("current").is_none());
        assert_eq!(session.position(), 2);
    }

    #[test]
    fn empty_source_starts_exhausted() {
        let mut session = session_over(Vec::new());
        assert_eq!(session.state().expect("state"), SessionState::Exhausted);
        session.act().expect("act is a no-op");
        assert_eq!(session.state().expect("state"), SessionState::Exhausted);
    }

    #[test]
    fn act_before_first_look_reveals_first_question() {
        let mut session = session_over(vec![question("one")]);
        session.act().expect("act");
        assert_eq!(describe(&mut session), "one!");
    }

    #[test]
    fn pulls_lazily_and_only_once() {
        let pulled = Cell::new(0);
        let source = vec![question("one"), question("two"), question("three")]
            .into_iter()
            .inspect(|_| pulled.set(pulled.get() + 1))
            .map(Ok::<_, std::io::Error>);
        let mut session = Session::new(source);
        assert_eq!(pulled.get(), 0);

        describe(&mut session);
        describe(&mut session);
        assert_eq!(pulled.get(), 1);

        session.act().expect("reveal");
        assert_eq!(pulled.get(), 1);
        session.act().expect("advance");
        assert_eq!(pulled.get(), 2);
        assert_eq!(describe(&mut session), "two");
    }

    #[test]
    fn source_errors_surface_when_reached() {
        let reader = QuestionReader::new(
            IoCursor::new("question: fine\n\nnope\n".to_string()),
            "broken.txt",
        );
        let mut session = Session::new(reader);
        assert_eq!(describe(&mut session), "fine");
        session.act().expect("reveal");
        let err = session.act().expect_err("second record is malformed");
        assert!(err.to_string().contains("broken.txt:3"));
        assert_eq!(session.state().expect("state"), SessionState::Exhausted);
    }
}
