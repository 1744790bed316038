/// Terminal frontend: renders world space as ASCII and feeds keyboard
/// gestures to the animator
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, terminal,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use graph3d_core::{Animator, SharedWorld};

pub mod input;
pub mod renderer;

pub use renderer::AsciiCanvas;

use input::{event_for_key, event_for_mouse, operation_for, InputEvent};

/// Main application struct for the terminal grapher.
pub struct TerminalApp {
    world: SharedWorld,
    animator: Animator,
    canvas: AsciiCanvas,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(world: SharedWorld, animator: Animator) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            world,
            animator,
            canvas: AsciiCanvas::new(width as usize, height as usize),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Runs the event loop, restoring the terminal on exit (even on error),
    /// then drains the animator.
    pub fn run(mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        );
        let _ = terminal::disable_raw_mode();

        self.animator.shutdown();
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let input = match event {
            Event::Key(key) => event_for_key(&key),
            Event::Mouse(mouse) => event_for_mouse(&mouse),
            Event::Resize(width, height) => {
                self.canvas = AsciiCanvas::new(width as usize, height as usize);
                None
            }
            _ => None,
        };
        match input {
            Some(InputEvent::Quit) => self.running = false,
            Some(gesture) => self.submit(gesture),
            None => {}
        }
    }

    /// Translates a gesture into an operation and enqueues it, unless one is
    /// already animating (the busy gate is advisory and checked here, on the
    /// input side).
    fn submit(&self, gesture: InputEvent) {
        if self.animator.is_busy() {
            return;
        }
        if let Some(op) = operation_for(gesture) {
            if let Err(e) = self.animator.submit(op) {
                log::warn!("gesture dropped: {e}");
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        // Snapshot may catch a half-applied increment; that tearing is the
        // accepted cost of sampling the world on our own schedule.
        let objects = self.world.snapshot();
        self.canvas
            .render_world(&objects, &self.animator.status(), self.fps);

        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }
}
