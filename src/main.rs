//! Systole CLI - terminal bedside monitor and headless waveform tools

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use systole::beat_clock::BeatClock;
use systole::monitor::MonitorConfig;
use systole::morphology::{artifact_jitter, cycle_offset, Amplitudes};
use systole::scenario::Scenario;
use systole::vitals::Rhythm;
use tracing::info;

#[derive(Parser)]
#[command(name = "systole")]
#[command(about = "Simulated bedside telemetry monitor", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the terminal monitor against a scripted case scenario
    Run {
        /// Scenario JSON file (built-in demo case if omitted)
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Display refresh rate in frames per second
        #[arg(long, default_value = "60.0")]
        fps: f64,

        /// Jitter tick period in milliseconds
        #[arg(long, default_value = "2000")]
        jitter_ms: u64,

        /// RNG seed (0 = a fixed default)
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Log file for diagnostics while the UI owns the terminal
        #[arg(long, default_value = "systole.log")]
        log_file: PathBuf,
    },

    /// Synthesize frames headless and dump them as CSV (frame,phase,offset)
    Sweep {
        /// Rhythm label, e.g. "Sinus Rhythm" or "Ventricular Tachycardia"
        #[arg(short, long, default_value = "Sinus Rhythm")]
        rhythm: String,

        /// Heart rate in bpm
        #[arg(long, default_value = "80")]
        hr: u32,

        /// Number of frames to synthesize
        #[arg(short, long, default_value = "600")]
        frames: u32,

        /// Surface height in pixels (sets amplitudes)
        #[arg(long, default_value = "400.0")]
        height: f32,

        /// Frames per nominal second
        #[arg(long, default_value = "60.0")]
        fps: f64,

        /// RNG seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            fps,
            jitter_ms,
            seed,
            log_file,
        } => {
            // The TUI owns the terminal, so diagnostics go to a file.
            let file = std::fs::File::create(&log_file)?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                )
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .init();

            let scenario = match scenario {
                Some(path) => Scenario::load(&path)?,
                None => Scenario::demo(),
            };
            info!(case = scenario.name.as_str(), "starting monitor");

            let config = MonitorConfig {
                fps,
                jitter_period: std::time::Duration::from_millis(jitter_ms.max(1)),
                seed,
                ..MonitorConfig::default()
            };

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let local = tokio::task::LocalSet::new();
            local.block_on(&runtime, systole::ui::run_tui(config, scenario))?;
        }

        Commands::Sweep {
            rhythm,
            hr,
            frames,
            height,
            fps,
            seed,
        } => {
            tracing_subscriber::fmt::init();
            let rhythm = Rhythm::from_label(&rhythm);
            let amplitudes = Amplitudes::for_height(height);
            let mut clock = BeatClock::new(hr, fps, rhythm.is_irregular());
            let mut rng = StdRng::seed_from_u64(seed);

            println!("frame,phase,offset");
            for frame in 0..frames {
                let t = clock.advance(&mut rng);
                let offset =
                    cycle_offset(t, rhythm, &amplitudes, &mut rng) + artifact_jitter(&mut rng);
                println!("{},{},{:.3}", frame, t, offset);
            }
        }
    }

    Ok(())
}
