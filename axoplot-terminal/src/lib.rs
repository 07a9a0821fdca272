/// Terminal front end for axonometric surface plots
use axoplot_core::{
    draw_axes, Extents, ExplicitSurface, ImplicitSurface, ParametricCurve, Projector, RenderError,
    RenderParams, RenderResult, SurfaceRenderer, ViewState,
};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::debug;

pub mod renderer;
pub mod scenes;

pub use renderer::CharCanvas;

/// Auto-rotate tick and input poll interval
const TICK: Duration = Duration::from_millis(50);
/// Degrees added per auto-rotate tick
const AUTO_ROTATE_STEP: f64 = 1.0;
/// Degrees per rotate or tilt key press
const KEY_STEP: f64 = 5.0;
const ZOOM_STEP: f64 = 1.1;
const CONTROLS: &str = "Arrows/WASD=View +/-=Zoom Space=Spin F=Fill X=Axes Q=Quit";

/// Anything the app can draw
#[derive(Debug, Clone)]
pub enum Plot {
    Implicit(ImplicitSurface),
    Explicit(ExplicitSurface),
    Curve(ParametricCurve),
}

impl Plot {
    pub fn extents(&self) -> Option<Extents> {
        match self {
            Plot::Implicit(surface) => Some(*surface.extents()),
            Plot::Explicit(surface) => Some(*surface.extents()),
            Plot::Curve(curve) => curve.extents(),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Plot::Implicit(_) => "implicit",
            Plot::Explicit(_) => "explicit",
            Plot::Curve(_) => "curve",
        }
    }
}

/// Convert a rendering error for the binaries' `io::Result` boundary
pub fn io_error(err: RenderError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

/// Main application struct for terminal plotting
pub struct TerminalApp {
    plot: Plot,
    view: ViewState,
    renderer: SurfaceRenderer,
    canvas: CharCanvas,
    auto_rotate: bool,
    show_axes: bool,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(plot: Plot) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(plot, width, height))
    }

    pub fn with_size(plot: Plot, width: u16, height: u16) -> Self {
        Self {
            plot,
            view: ViewState::new(width as u32, height as u32),
            renderer: SurfaceRenderer::new(RenderParams::default()),
            canvas: CharCanvas::new(width as usize, height as usize),
            auto_rotate: false,
            show_axes: false,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn params(&self) -> &RenderParams {
        &self.renderer.params
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut last_tick = Instant::now();

        while self.running {
            // Every view change lands here, before the repaint reads the view
            if event::poll(TICK)? {
                self.handle_event(event::read()?);
            }
            if last_tick.elapsed() >= TICK {
                self.tick();
                last_tick = Instant::now();
            }

            self.render()?;

            // Update FPS counter
            self.frame_count += 1;
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
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press | KeyEventKind::Repeat,
                ..
            }) => self.handle_key(code),
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('a') | KeyCode::Left => self.view = self.view.rotated(-KEY_STEP),
            KeyCode::Char('d') | KeyCode::Right => self.view = self.view.rotated(KEY_STEP),
            KeyCode::Char('w') | KeyCode::Up => self.view = self.view.tilted(KEY_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.view = self.view.tilted(-KEY_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.view = self.view.zoomed(ZOOM_STEP),
            KeyCode::Char('-') => self.view = self.view.zoomed(1.0 / ZOOM_STEP),
            KeyCode::Char(' ') => self.auto_rotate = !self.auto_rotate,
            KeyCode::Char('f') => {
                let fill = !self.renderer.params.fill;
                self.renderer.params = self.renderer.params.with_fill(fill);
            }
            KeyCode::Char('x') => self.show_axes = !self.show_axes,
            _ => return,
        }
        debug!(
            rotation = self.view.rotation,
            tilt = self.view.tilt,
            zoom = self.view.zoom,
            "View updated"
        );
    }

    /// Advance the auto-rotation by one tick
    pub fn tick(&mut self) {
        if self.auto_rotate {
            self.view = self.view.rotated(AUTO_ROTATE_STEP);
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let fresh = ViewState::new(width as u32, height as u32);
        self.view = fresh
            .with_rotation(self.view.rotation)
            .with_tilt(self.view.tilt)
            .with_zoom(self.view.zoom);
        self.canvas = CharCanvas::new(width as usize, height as usize);
        debug!(width, height, "Terminal resized");
    }

    /// Paint the plot into the canvas for one captured view
    pub fn draw_frame(&mut self) -> RenderResult<()> {
        let view = self.view;
        let params = self.renderer.params;
        match &self.plot {
            Plot::Implicit(surface) => {
                self.renderer.render(&mut self.canvas, &view, Some(surface))?
            }
            Plot::Explicit(surface) => surface.render(&mut self.canvas, &view, &params)?,
            Plot::Curve(curve) => curve.render(&mut self.canvas, &view, &params)?,
        }
        if self.show_axes {
            if let Some(extents) = self.plot.extents() {
                let projector = Projector::new(view, extents)?;
                draw_axes(&mut self.canvas, &projector, params.outline);
            }
        }
        Ok(())
    }

    pub fn canvas(&self) -> &CharCanvas {
        &self.canvas
    }

    fn render(&mut self) -> io::Result<()> {
        self.draw_frame().map_err(io_error)?;

        // Output to terminal
        let mut stdout = stdout();
        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Axoplot {} | rot {:.0} tilt {:.0} zoom {:.2} | FPS: {:.1} | {}",
                self.plot.label(),
                self.view.rotation,
                self.view.tilt,
                self.view.zoom,
                self.fps,
                CONTROLS
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> TerminalApp {
        let plot = scenes::scene("saddle").unwrap().unwrap();
        TerminalApp::with_size(plot, 80, 40)
    }

    #[test]
    fn test_keys_update_view() {
        let mut app = app();
        let start = *app.view();
        app.handle_key(KeyCode::Right);
        assert_eq!(app.view().rotation, start.rotation + 5.0);
        app.handle_key(KeyCode::Char('w'));
        assert_eq!(app.view().tilt, start.tilt + 5.0);
        app.handle_key(KeyCode::Char('+'));
        assert!(app.view().zoom > start.zoom);
        app.handle_key(KeyCode::Char('-'));
        assert!((app.view().zoom - start.zoom).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_is_capped_and_still_draws() {
        let plot = scenes::scene("sphere").unwrap().unwrap();
        let mut app = TerminalApp::with_size(plot, 80, 40);
        for _ in 0..260 {
            app.handle_key(KeyCode::Char('+'));
        }
        assert_eq!(app.view().zoom, axoplot_core::projection::MAX_ZOOM);
        app.draw_frame().unwrap();
    }

    #[test]
    fn test_tilt_stays_clamped() {
        let mut app = app();
        for _ in 0..30 {
            app.handle_key(KeyCode::Up);
        }
        assert_eq!(app.view().tilt, 90.0);
        for _ in 0..30 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.view().tilt, 0.0);
    }

    #[test]
    fn test_auto_rotate_ticks() {
        let mut app = app();
        let start = app.view().rotation;
        app.tick();
        assert_eq!(app.view().rotation, start);
        app.handle_key(KeyCode::Char(' '));
        app.tick();
        app.tick();
        assert_eq!(app.view().rotation, start + 2.0);
    }

    #[test]
    fn test_fill_toggle_and_quit() {
        let mut app = app();
        assert!(app.params().fill);
        app.handle_key(KeyCode::Char('f'));
        assert!(!app.params().fill);
        assert!(app.is_running());
        app.handle_key(KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn test_draw_frame_paints_canvas() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        app.draw_frame().unwrap();
        let (w, h) = (80, 40);
        let painted = (0..h)
            .flat_map(|y| (0..w).map(move |x| (x, y)))
            .filter_map(|(x, y)| app.canvas().cell(x, y))
            .filter(|cell| cell.ch != ' ' || cell.bg != RenderParams::default().background)
            .count();
        assert!(painted > 0);
    }
}
