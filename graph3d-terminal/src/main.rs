/// Graph3D Terminal - animated 3D plot of an equation and its derivatives
///
/// Controls:
///   - WASD / Arrow / Numpad Keys: Rotate the world
///   - +/-: Roll rotation
///   - z/x or mouse wheel: Zoom
///   - Q/ESC: Quit
use anyhow::{Context, Result};

use graph3d_core::{
    build_derivatives, build_graph, import_object, Animator, Object, PolyEvaluator, SampleRange,
    SharedWorld,
};
use graph3d_terminal::TerminalApp;

const DEFAULT_EXPR: &str = "x^3";

fn main() -> Result<()> {
    env_logger::init();

    let expr = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_EXPR.to_string());
    let world = build_world(&expr).context("building world space")?;

    let animator = Animator::spawn(world.clone());
    let app = TerminalApp::new(world, animator)?;
    app.run()?;
    Ok(())
}

/// Populates world space with the axes, the plotted equation, and its
/// derivative curves. A curve that fails to evaluate still plots (red, all
/// sentinel values); derivatives are skipped entirely if the expression
/// cannot be differentiated.
fn build_world(expr: &str) -> Result<SharedWorld> {
    let origin = (0.0, 0.0, 0.0);
    let evaluator = PolyEvaluator;
    let range = SampleRange::default();
    let world = SharedWorld::new();

    world.insert(import_object(&Object::axes(), origin)?)?;
    world.insert(import_object(&build_graph(&evaluator, expr, range), origin)?)?;
    match build_derivatives(&evaluator, expr, range) {
        Ok(derivatives) => {
            for curve in derivatives {
                world.insert(import_object(&curve, origin)?)?;
            }
        }
        Err(e) => log::warn!("derivatives unavailable for `{expr}`: {e}"),
    }
    Ok(world)
}
