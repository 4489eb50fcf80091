mod app;
mod bundle;
mod logging;
mod ripple;
mod util;

use std::path::PathBuf;

use clap::Parser;

use crate::ripple::RippleConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Bundle graph JSON (`nodes` and `edges`, optionally wrapped in `trimmedNetwork`).
    graph: PathBuf,

    /// File id to center the chart on at startup.
    #[arg(long)]
    selected: Option<String>,

    /// Radius of the largest file in the bundle.
    #[arg(long, default_value_t = 20.0, value_parser = positive_f32)]
    max_radius: f32,

    /// Distance between the selected file and its first ring.
    #[arg(long, default_value_t = 100.0, value_parser = positive_f32)]
    ring_offset: f32,

    /// Log debug output.
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn positive_f32(value: &str) -> Result<f32, String> {
    let parsed = value
        .parse::<f32>()
        .map_err(|error| format!("`{value}` is not a number: {error}"))?;
    if parsed.is_finite() && parsed > 0.0 {
        Ok(parsed)
    } else {
        Err(format!("`{value}` must be a positive number"))
    }
}

impl Args {
    fn ripple_config(&self) -> RippleConfig {
        RippleConfig {
            max_radius: self.max_radius,
            ring_offset: self.ring_offset,
            ..RippleConfig::default()
        }
    }
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose, args.quiet);

    let config = args.ripple_config();
    tracing::info!(graph = %args.graph.display(), ?config, "starting bundle-ripple");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "bundle-ripple",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::BundleRippleApp::new(
                cc,
                args.graph.clone(),
                config,
                args.selected.clone(),
            )))
        }),
    )
}
