use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use emulsion_core::{
    load_film_profile, process_image, BloomParams, GrainParams, ProcessOptions, SimulationEngine,
    ToneMode,
};

mod io;

#[derive(Parser)]
#[command(name = "emulsion")]
#[command(version, about = "Analog film response simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate film response for an image
    Convert {
        /// Input PNG file (sRGB-encoded)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Film profile JSON file
        #[arg(short, long, value_name = "FILE")]
        profile: PathBuf,

        /// Output PNG file (default: <input>_<profile name>.png)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Exposure compensation in stops
        #[arg(long, value_name = "EV", default_value = "0.0", allow_hyphen_values = true)]
        ev: f32,

        /// Enable log-average auto exposure
        #[arg(long)]
        auto_exposure: bool,

        /// Preserve the scene's original exposure (fixed normalization)
        #[arg(long)]
        preserve_exposure: bool,

        /// Bloom strength (0 disables bloom)
        #[arg(long, value_name = "STRENGTH", default_value = "0.3")]
        bloom: f32,

        /// Grain strength multiplier (0 disables grain)
        #[arg(long, value_name = "STRENGTH", default_value = "1.0")]
        grain: f32,

        /// Override the profile's tone mapping mode (aces, reinhard, simple, linear)
        #[arg(long, value_name = "MODE")]
        tone_mode: Option<String>,

        /// Number of parallel threads
        #[arg(short = 'j', long, value_name = "N")]
        threads: Option<usize>,

        /// Print pass-level diagnostics
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print calibration results for a film profile
    ProfileInfo {
        /// Film profile JSON file
        #[arg(value_name = "FILE")]
        profile: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Convert {
            input,
            profile,
            out,
            ev,
            auto_exposure,
            preserve_exposure,
            bloom,
            grain,
            tone_mode,
            threads,
            verbose,
        } => run_convert(
            input,
            profile,
            out,
            ev,
            auto_exposure,
            preserve_exposure,
            bloom,
            grain,
            tone_mode,
            threads,
            verbose,
        ),
        Commands::ProfileInfo { profile } => run_profile_info(profile),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_convert(
    input: PathBuf,
    profile_path: PathBuf,
    out: Option<PathBuf>,
    ev: f32,
    auto_exposure: bool,
    preserve_exposure: bool,
    bloom: f32,
    grain: f32,
    tone_mode: Option<String>,
    threads: Option<usize>,
    verbose: bool,
) -> Result<(), String> {
    emulsion_core::config::set_verbose(verbose);

    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
    }

    let profile = load_film_profile(&profile_path)?;
    let engine = SimulationEngine::new(&profile);

    let tone_mode = match tone_mode {
        Some(s) => Some(s.parse::<ToneMode>()?),
        None => None,
    };

    let options = ProcessOptions {
        ev_compensation: ev,
        auto_exposure,
        preserve_exposure,
        tone_mode,
        bloom: BloomParams {
            strength: bloom,
            ..BloomParams::default()
        },
        grain: GrainParams {
            strength: grain,
            ..GrainParams::default()
        },
        ..ProcessOptions::default()
    };

    let image = io::decode_png(&input)?;
    let processed = process_image(&image, &engine, &options)?;

    let out_path = out.unwrap_or_else(|| default_output_path(&input, &profile.name));
    io::encode_png(&processed, &out_path)?;

    println!(
        "Wrote {} ({}x{}, {:?}, ev {:+.2})",
        out_path.display(),
        processed.width,
        processed.height,
        processed.summary.film_type,
        processed.summary.total_ev
    );
    Ok(())
}

fn run_profile_info(profile_path: PathBuf) -> Result<(), String> {
    let profile = load_film_profile(&profile_path)?;
    let engine = SimulationEngine::new(&profile);
    let cal = engine.calibration();

    println!("Profile:          {}", profile.name);
    println!("Process:          {}", profile.process);
    println!("ISO:              {}", profile.iso);
    println!("Film type:        {:?}", engine.film_type());
    println!("Tone mode:        {:?}", profile.tone_mode);
    println!("Offsets (logE):   {:?}", cal.sensitivity_offsets);
    println!("Normalization:    {:?}", cal.normalization_scale);
    println!("dMin:             {:?}", cal.d_min);
    println!("Base response:    {:?}", cal.base_response);
    println!(
        "Spectral table:   {}",
        match &profile.dye_density {
            Some(rows) => format!("{} wavelength samples", rows.len()),
            None => "none (Beer-Lambert scan)".to_string(),
        }
    );
    println!(
        "Dye coupling:     {}",
        if profile.dye_coupling.is_some() {
            "yes"
        } else {
            "no"
        }
    );
    Ok(())
}

/// Default output path: `<stem>_<profile-name>.png` next to the input.
fn default_output_path(input: &Path, profile_name: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let slug: String = profile_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    input.with_file_name(format!("{}_{}.png", stem, slug))
}
