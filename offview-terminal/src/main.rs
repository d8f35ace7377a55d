/// OffView - ASCII viewer for NOFF meshes
///
/// Spins the mesh about one axis, or with `-t` rotates it by dragging
/// with the mouse. Run with `--help` for the options.
use anyhow::{Context, Result};
use clap::Parser;
use offview_core::{noff, FaceMerger};
use offview_terminal::{Cli, Options, TerminalApp};

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::from(Cli::parse());
    for warning in &options.warnings {
        eprintln!("offview: {warning}");
    }

    let mut mesh = noff::load_noff(&options.filename)
        .with_context(|| format!("failed to load {}", options.filename.display()))?;

    if options.merge_faces {
        let stats = FaceMerger::optimize(&mut mesh);
        println!(
            "merged {} faces into {}",
            stats.faces_before, stats.faces_after
        );
    }

    let app = TerminalApp::new(&mesh, options).context("failed to prepare mesh for drawing")?;
    let summary = app.run()?;

    for fps in &summary.fps_samples {
        println!("FPS = {fps:.2}");
    }
    log::info!("rendered {} frames", summary.frames);

    Ok(())
}
