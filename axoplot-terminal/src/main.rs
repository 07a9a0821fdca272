/// Axoplot Terminal Demo - Rotating surface plots
///
/// Usage: axoplot-terminal [sphere|torus|saddle|helix]
/// Controls:
///   - Arrows / WASD: Rotate and tilt the view
///   - +/-: Zoom
///   - Space: Toggle auto-rotation
///   - F: Toggle filled / outline mode
///   - X: Toggle coordinate axes
///   - Q/ESC: Quit

use std::env;
use std::io;
use axoplot_terminal::{io_error, scenes, TerminalApp};

fn main() -> io::Result<()> {
    let name = env::args().nth(1).unwrap_or_else(|| "sphere".to_string());

    println!("Axoplot Terminal - Building {name}...");

    let plot = scenes::scene(&name).map_err(io_error)?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Unknown scene {name:?}, expected one of {}", scenes::SCENES.join(", ")),
        )
    })?;

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(plot)?;
    app.run()?;

    println!("Thank you for using Axoplot!");
    Ok(())
}
