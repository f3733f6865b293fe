//! Desktop host for the portfolio page, plus a headless field runner
//!
//! Run with: cargo run --features native
//! Headless: cargo run --features native -- --headless 600 --size 1280x720

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;
    use tracing::{info, warn};
    use tracing_subscriber::{fmt, EnvFilter};

    use portfolio_fx::core::PageConfig;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,portfolio_fx=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = match std::env::var("PORTFOLIO_FX_CONFIG") {
        Ok(path) => PageConfig::from_path(&path).unwrap_or_else(|e| {
            warn!(path = %path, error = %e, "Invalid config, using defaults");
            PageConfig::default()
        }),
        Err(_) => PageConfig::default(),
    };

    let args = cli::Args::parse();
    if let Some(frames) = args.headless {
        return cli::run_headless(config, frames, args.size);
    }

    info!("Opening window");
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("portfolio-fx"),
        ..Default::default()
    };
    eframe::run_native(
        "portfolio-fx",
        options,
        Box::new(move |cc| Ok(Box::new(portfolio_fx::app::PortfolioApp::new(cc, config)))),
    )?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::error::Error;

    use clap::Parser;
    use tracing::info;

    use portfolio_fx::core::{Extent, FieldSimulator, FrameLoop, PageConfig, ParticleField, Recorder};

    const FRAME_STEP: f64 = 1.0 / 60.0;

    #[derive(Parser, Debug)]
    #[command(name = "portfolio-fx")]
    #[command(about = "Portfolio page with a live particle-network background", long_about = None)]
    pub struct Args {
        /// Run the particle field off-screen for FRAMES frames and log stats
        #[arg(long, value_name = "FRAMES", num_args = 0..=1, default_missing_value = "600")]
        pub headless: Option<u64>,

        /// Off-screen surface size for --headless
        #[arg(long, value_name = "WxH", default_value = "1280x720", value_parser = parse_size)]
        pub size: Extent,
    }

    fn parse_size(value: &str) -> Result<Extent, String> {
        let (w, h) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WxH, got {value:?}"))?;
        let w: f32 = w.trim().parse().map_err(|_| format!("bad width in {value:?}"))?;
        let h: f32 = h.trim().parse().map_err(|_| format!("bad height in {value:?}"))?;
        if w < 1.0 || h < 1.0 {
            return Err(format!("size {value:?} must be at least 1x1"));
        }
        Ok(Extent::new(w, h))
    }

    /// Drive the field against an off-screen surface on a synthetic 60 Hz clock
    pub fn run_headless(config: PageConfig, frames: u64, size: Extent) -> Result<(), Box<dyn Error>> {
        let mut surface = Recorder::new(size);
        let mut frame_loop = FrameLoop::new();
        let mut field = FieldSimulator::new(ParticleField::from_entropy(config.field));

        if !field.start(&mut frame_loop, &surface) {
            return Err("field did not start".into());
        }
        info!(frames, width = size.width, height = size.height, "Headless run");

        for frame in 1..=frames {
            frame_loop.tick(&mut surface, frame as f64 * FRAME_STEP);
            if frame % 60 == 0 || frame == frames {
                let stats = field.last_stats();
                info!(
                    frame,
                    nodes = stats.nodes,
                    edges = stats.edges,
                    cd = stats.connection_distance,
                    ops = surface.ops().len(),
                    "stats"
                );
            }
        }

        field.stop();
        frame_loop.tick(&mut surface, (frames + 1) as f64 * FRAME_STEP);
        info!(
            ticks = frame_loop.frames(),
            live_tasks = frame_loop.live_tasks(),
            "Headless run finished"
        );
        Ok(())
    }

}

#[cfg(target_arch = "wasm32")]
fn main() {}
