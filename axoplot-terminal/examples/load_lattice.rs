/// Example: Load and render a sampled lattice file in the terminal
///
/// Usage: cargo run --example load_lattice -- path/to/file.lattice

use std::env;
use std::fs;
use std::io;
use axoplot_core::{parse_lattice, ImplicitSurface};
use axoplot_terminal::{io_error, scenes, Plot, TerminalApp};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <lattice-file>", args[0]);
        eprintln!("\nNo lattice file provided, using default sphere...");
        let plot = scenes::scene("sphere").map_err(io_error)?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "sphere scene missing")
        })?;
        let mut app = TerminalApp::new(plot)?;
        return app.run();
    }

    let path = &args[1];

    println!("Loading lattice file: {}", path);

    // Read lattice file
    let text = fs::read_to_string(path).map_err(|e| {
        io::Error::new(io::ErrorKind::NotFound, format!("Failed to read lattice file: {}", e))
    })?;

    // Parse and polygonize
    let lattice = parse_lattice(&text).map_err(io_error)?;
    let surface = ImplicitSurface::build(&lattice).map_err(io_error)?;

    println!("Loaded {} polygons", surface.polygon_count());
    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    // Run the terminal app
    let mut app = TerminalApp::new(Plot::Implicit(surface))?;
    app.run()?;

    println!("Thank you for using Axoplot!");
    Ok(())
}
