/// Terminal front end: drives a renderer from terminal input
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use nalgebra::Point2;
use offview_core::{arcball, Axis, DrawStrategy, Mesh, RenderError, Renderer};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod options;
pub mod renderer;

pub use options::{Cli, Options, Timing};
pub use renderer::{AsciiBackend, CELL_ASPECT};

/// Degrees per axis key press in trackball mode
const KEY_ROTATION_STEP: f32 = 15.0;
/// Zoom change per key press
const ZOOM_STEP: f32 = 0.1;
/// Frame pacing for trackball mode
const INTERACTIVE_FRAME_TIME: Duration = Duration::from_millis(1000 / 30);

/// Counts frames over fixed windows of wall-clock time
#[derive(Debug)]
pub struct FpsMeter {
    window: Duration,
    started: Instant,
    frames: u64,
}

impl FpsMeter {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            started: Instant::now(),
            frames: 0,
        }
    }

    /// Count one frame. Returns the rate once a full window has elapsed.
    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed < self.window {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.started = now;
        Some(fps)
    }
}

/// What happened during a run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub frames: u64,
    /// Frame rates sampled in clock or dump mode
    pub fps_samples: Vec<f32>,
}

/// In-progress left-button drag, in terminal cells
#[derive(Debug, Clone, Copy)]
struct Drag {
    column: u16,
    row: u16,
}

/// Main application struct for terminal mesh viewing
pub struct TerminalApp<'a> {
    renderer: Renderer<'a, AsciiBackend>,
    options: Options,
    running: bool,
    drag: Option<Drag>,
    frames: u64,
    fps: f32,
    status_meter: FpsMeter,
    timing_meter: Option<FpsMeter>,
    summary: RunSummary,
}

impl<'a> TerminalApp<'a> {
    pub fn new(mesh: &'a Mesh, options: Options) -> Result<Self, RenderError> {
        let (columns, rows) = terminal::size().unwrap_or((80, 24));
        let (width, height) = viewport_for(columns, rows, &options);

        let renderer = Renderer::bind(
            mesh,
            AsciiBackend::new(),
            options.back_cull,
            options.strategy,
            width,
            height,
        )?;

        let timing_meter = match options.timing {
            Timing::Off => None,
            Timing::Clock(seconds) | Timing::Dump(seconds) => {
                Some(FpsMeter::new(Duration::from_secs(u64::from(seconds.max(1)))))
            }
        };

        Ok(Self {
            renderer,
            options,
            running: true,
            drag: None,
            frames: 0,
            fps: 0.0,
            status_meter: FpsMeter::new(Duration::from_secs(1)),
            timing_meter,
            summary: RunSummary::default(),
        })
    }

    pub fn renderer(&self) -> &Renderer<'a, AsciiBackend> {
        &self.renderer
    }

    pub fn run(mut self) -> anyhow::Result<RunSummary> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        if self.options.trackball {
            execute!(stdout(), EnableMouseCapture)?;
        }

        let result = self.main_loop();

        // Cleanup
        let trackball = self.options.trackball;
        let restored = run_all(&mut [
            &mut || -> io::Result<()> {
                if trackball {
                    execute!(stdout(), DisableMouseCapture)?;
                }
                Ok(())
            },
            &mut terminal::disable_raw_mode,
            &mut || execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show),
        ]);

        result?;
        restored?;
        self.summary.frames = self.frames;
        Ok(self.summary)
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event)?;
            }

            // Update
            if !self.options.trackball {
                self.advance_automatic();
            }

            // Render
            self.render()?;
            self.count_frame();

            if self.options.trackball {
                let elapsed = frame_start.elapsed();
                if elapsed < INTERACTIVE_FRAME_TIME {
                    std::thread::sleep(INTERACTIVE_FRAME_TIME - elapsed);
                }
            }
        }

        Ok(())
    }

    /// Apply one terminal event. Exposed so input handling can be driven
    /// without a terminal.
    pub fn handle_event(&mut self, event: Event) -> Result<(), RenderError> {
        match event {
            Event::Key(key) => self.handle_key(key)?,
            Event::Mouse(mouse) if self.options.trackball => self.handle_mouse(mouse),
            Event::Resize(columns, rows) => {
                let (width, height) = viewport_for(columns, rows, &self.options);
                self.renderer.resize(width, height);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), RenderError> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            _ if !self.options.trackball => {}
            KeyCode::Char(c @ ('x' | 'y' | 'z')) => {
                if let Some(axis) = Axis::from_char(c) {
                    self.renderer
                        .orientation_mut()
                        .advance_automatic(KEY_ROTATION_STEP, axis);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.renderer.orientation_mut().zoom_by(ZOOM_STEP);
            }
            KeyCode::Char('-') => self.renderer.orientation_mut().zoom_by(-ZOOM_STEP),
            KeyCode::Char('c') => {
                let culling = !self.renderer.culling();
                self.renderer.set_culling(culling);
            }
            KeyCode::Char('n') => self.renderer.set_strategy(DrawStrategy::Immediate)?,
            KeyCode::Char('d') => self.renderer.set_strategy(DrawStrategy::Precompiled)?,
            KeyCode::Char('v') => self.renderer.set_strategy(DrawStrategy::Batched)?,
            KeyCode::Char('r') => self.renderer.reset(),
            _ => {}
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag = Some(Drag {
                    column: mouse.column,
                    row: mouse.row,
                });
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(start) = self.drag {
                    let from = self.to_ndc(start.column, start.row);
                    let to = self.to_ndc(mouse.column, mouse.row);
                    let rotation = arcball::drag_rotation(from, to);
                    self.renderer.orientation_mut().apply_drag(&rotation);
                    self.drag = Some(Drag {
                        column: mouse.column,
                        row: mouse.row,
                    });
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag = None,
            _ => {}
        }
    }

    /// Cell center to normalized device coordinates, y pointing up
    fn to_ndc(&self, column: u16, row: u16) -> Point2<f32> {
        let (width, height) = self.renderer.backend().size();
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        let x = column as f32 + 0.5;
        let y = row as f32 + 0.5;
        Point2::new((2.0 * x - w) / w, (h - 2.0 * y) / h)
    }

    fn advance_automatic(&mut self) {
        if self.frames >= u64::from(self.options.total_frames)
            && !matches!(self.options.timing, Timing::Clock(_))
        {
            self.running = false;
            return;
        }
        self.renderer
            .orientation_mut()
            .advance_automatic(self.options.rotation_rate, self.options.rotation_axis);
    }

    fn count_frame(&mut self) {
        self.frames += 1;

        if let Some(fps) = self.status_meter.tick() {
            self.fps = fps;
        }

        if let Some(fps) = self.timing_meter.as_mut().and_then(FpsMeter::tick) {
            log::info!("FPS = {fps}");
            self.summary.fps_samples.push(fps);
            if matches!(self.options.timing, Timing::Clock(_)) {
                self.running = false;
            }
        }
    }

    fn render(&mut self) -> anyhow::Result<()> {
        if !self.running {
            return Ok(());
        }
        self.renderer.render()?;

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;
        self.renderer.backend().draw(&mut stdout)?;

        // Draw UI overlay
        let orientation = self.renderer.orientation();
        let controls = if self.options.trackball {
            "Drag=Rotate X/Y/Z=Step +/-=Zoom C=Cull N/D/V=Mode R=Reset Q=Quit"
        } else {
            "Q=Quit"
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "OffView | {:?} | cull {} | axis {:?} {:>5.1}° | zoom {:.1} | FPS: {:.1} | {}",
                self.renderer.strategy(),
                if self.renderer.culling() { "on" } else { "off" },
                orientation.rotation_axis(),
                orientation.angle(),
                orientation.zoom(),
                self.fps,
                controls
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Run every step even if an earlier one fails, returning the first error
fn run_all(steps: &mut [&mut dyn FnMut() -> io::Result<()>]) -> io::Result<()> {
    let mut first_error = None;
    for step in steps.iter_mut() {
        if let Err(err) = step() {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Viewport for a terminal of this size, in columns by half-rows, capped by
/// the requested window size
fn viewport_for(columns: u16, rows: u16, options: &Options) -> (u32, u32) {
    let width = u32::from(columns).min(options.window_width);
    let height = (u32::from(rows) * CELL_ASPECT).min(options.window_height);
    (width, height)
}
