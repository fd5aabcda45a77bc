//! The control loop: one window, one session, events handled in arrival order.

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::num::NonZeroU32;
use std::rc::Rc;
use tiny_skia::Pixmap;
use tracing::{debug, info};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::fit::Size;
use crate::present::present;
use crate::questions::Question;
use crate::render::{ImageStore, Renderer, fill_buffer};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reveal the current question, or move on once revealed.
    Advance,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn command_for_key(key: &Key) -> Option<Command> {
    match key {
        Key::Named(NamedKey::Space) => Some(Command::Advance),
        Key::Named(NamedKey::Escape) => Some(Command::Quit),
        _ => None,
    }
}

/// Window-independent part of the viewer: owns the session and everything
/// needed to turn its current state into pixels.
pub struct Viewer<I> {
    session: Session<I>,
    images: ImageStore,
    renderer: Renderer,
}

impl<I, E> Viewer<I>
where
    I: Iterator<Item = Result<Question, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    pub fn new(session: Session<I>, images: ImageStore, renderer: Renderer) -> Self {
        Self {
            session,
            images,
            renderer,
        }
    }

    pub fn handle(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Advance => {
                if self.session.act()? {
                    // passed questions never come back
                    self.images.clear();
                }
                Ok(Flow::Continue)
            }
            Command::Quit => Ok(Flow::Exit),
        }
    }

    /// Renders the current state for a viewport of `viewport` pixels.
    pub fn frame(&mut self, viewport: Size) -> Result<Pixmap> {
        let state = self.session.state()?;
        let plan = present(&state, viewport, &mut self.images)?;
        debug!("draw plan:\n{}", plan);
        self.renderer.render(&plan, &mut self.images)
    }
}

#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Opens the window and runs the event loop until quit or the first error.
///
/// The window and its drawing surface live only for the duration of this call.
pub fn run_window<I, E>(mut viewer: Viewer<I>, options: &WindowOptions) -> Result<()>
where
    I: Iterator<Item = Result<Question, E>> + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {}", err))?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let window = Rc::new(
        WindowBuilder::new()
            .with_title(options.title.clone())
            .with_inner_size(PhysicalSize::new(options.width, options.height))
            .with_resizable(true)
            .build(&event_loop)
            .map_err(|err| anyhow!("failed to create window: {}", err))?,
    );
    let context = softbuffer::Context::new(window.clone())
        .map_err(|err| anyhow!("failed to create drawing context: {}", err))?;
    let mut surface = softbuffer::Surface::new(&context, window.clone())
        .map_err(|err| anyhow!("failed to create drawing surface: {}", err))?;
    info!(
        "window opened at {}x{}",
        window.inner_size().width,
        window.inner_size().height
    );

    let failure: Rc<RefCell<Option<anyhow::Error>>> = Rc::new(RefCell::new(None));
    let loop_failure = failure.clone();
    window.request_redraw();
    event_loop
        .run(move |event, target| {
            let Event::WindowEvent { window_id, event } = event else {
                return;
            };
            if window_id != window.id() {
                return;
            }
            let outcome = match event {
                WindowEvent::CloseRequested => Ok(Flow::Exit),
                WindowEvent::Resized(_) => {
                    window.request_redraw();
                    Ok(Flow::Continue)
                }
                WindowEvent::KeyboardInput { event, .. }
                    if event.state == ElementState::Pressed && !event.repeat =>
                {
                    let flow = match command_for_key(&event.logical_key) {
                        Some(command) => viewer.handle(command),
                        None => Ok(Flow::Continue),
                    };
                    window.request_redraw();
                    flow
                }
                WindowEvent::RedrawRequested => {
                    redraw(&mut viewer, &window, &mut surface).map(|()| Flow::Continue)
                }
                _ => Ok(Flow::Continue),
            };
            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => target.exit(),
                Err(err) => {
                    *loop_failure.borrow_mut() = Some(err);
                    target.exit();
                }
            }
        })
        .map_err(|err| anyhow!("event loop failed: {}", err))?;

    match failure.borrow_mut().take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn redraw<I, E>(
    viewer: &mut Viewer<I>,
    window: &Window,
    surface: &mut softbuffer::Surface<Rc<Window>, Rc<Window>>,
) -> Result<()>
where
    I: Iterator<Item = Result<Question, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    let size = window.inner_size();
    let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
    else {
        // minimized
        return Ok(());
    };
    let pixmap = viewer.frame(Size::new(size.width, size.height))?;
    surface
        .resize(width, height)
        .map_err(|err| anyhow!("failed to resize drawing surface: {}", err))?;
    let mut buffer = surface
        .buffer_mut()
        .map_err(|err| anyhow!("failed to acquire frame buffer: {}", err))?;
    fill_buffer(&pixmap, &mut buffer);
    buffer
        .present()
        .map_err(|err| anyhow!("failed to present frame: {}", err))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::{QuestionReader, read_questions};
    use crate::render::FontConfig;
    use crate::test_util::{write_png, write_quiz};
    use std::fs::File;
    use std::io::BufReader;

    fn viewer_for(path: &std::path::Path) -> Viewer<QuestionReader<BufReader<File>>> {
        let questions = read_questions(path).expect("open quiz");
        let renderer = Renderer::new(&FontConfig::default()).expect("renderer");
        Viewer::new(Session::new(questions), ImageStore::new(), renderer)
    }

    fn rgb(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
        let color = pixmap.pixel(x, y).expect("pixel in bounds").demultiply();
        (color.red(), color.green(), color.blue())
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(
            command_for_key(&Key::Named(NamedKey::Space)),
            Some(Command::Advance)
        );
        assert_eq!(
            command_for_key(&Key::Named(NamedKey::Escape)),
            Some(Command::Quit)
        );
        assert_eq!(command_for_key(&Key::Named(NamedKey::Enter)), None);
    }

    #[test]
    fn frames_follow_the_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "red.png", 40, 20, [255, 0, 0]);
        write_png(dir.path(), "blue.png", 20, 20, [0, 0, 255]);
        let quiz = write_quiz(
            dir.path(),
            "question: q\nimage: red.png\nfinal_image: blue.png\n",
        );
        let mut viewer = viewer_for(&quiz);
        let viewport = Size::new(200, 150);

        // slot (20, 82) 160x60; red fits as 120x60 at (40, 82)
        let frame = viewer.frame(viewport).expect("question frame");
        assert_eq!(rgb(&frame, 100, 110), (255, 0, 0));
        assert_eq!(rgb(&frame, 195, 145), (255, 255, 255));

        // region (10, 82) 180x67; blue fits as 67x67 at (66, 82)
        assert_eq!(viewer.handle(Command::Advance).expect("reveal"), Flow::Continue);
        let frame = viewer.frame(viewport).expect("revealed frame");
        assert_eq!(rgb(&frame, 100, 110), (0, 0, 255));
        assert_eq!(rgb(&frame, 30, 110), (255, 255, 255));

        viewer.handle(Command::Advance).expect("advance");
        let frame = viewer.frame(viewport).expect("exhausted frame");
        assert_eq!(rgb(&frame, 100, 110), (255, 255, 255));

        assert_eq!(viewer.handle(Command::Quit).expect("quit"), Flow::Exit);
    }

    #[test]
    fn images_are_dropped_once_a_question_is_left() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "one.png", 8, 8, [255, 0, 0]);
        write_png(dir.path(), "two.png", 8, 8, [0, 255, 0]);
        let quiz = write_quiz(
            dir.path(),
            "question: first\nimage: one.png\n\nquestion: second\nimage: two.png\n",
        );
        let mut viewer = viewer_for(&quiz);
        let viewport = Size::new(200, 150);

        viewer.frame(viewport).expect("first frame");
        viewer.handle(Command::Advance).expect("reveal");
        viewer.frame(viewport).expect("revealed frame");
        assert_eq!(viewer.images.len(), 1);

        viewer.handle(Command::Advance).expect("advance");
        assert!(viewer.images.is_empty());
        viewer.frame(viewport).expect("second frame");
        assert_eq!(viewer.images.len(), 1);
        assert!(viewer.images.contains(&dir.path().join("two.png")));
        assert!(!viewer.images.contains(&dir.path().join("one.png")));

        viewer.handle(Command::Advance).expect("reveal");
        viewer.handle(Command::Advance).expect("exhaust");
        assert!(viewer.images.is_empty());
    }

    #[test]
    fn missing_image_fails_the_frame() {
        let dir = tempfile::tempdir().expect("tempdir");
        let quiz = write_quiz(dir.path(), "question: q\nimage: nowhere.png\n");
        let mut viewer = viewer_for(&quiz);
        let err = viewer
            .frame(Size::new(200, 150))
            .err()
            .expect("image is missing");
        assert!(format!("{:#}", err).contains("nowhere.png"));
    }
}
