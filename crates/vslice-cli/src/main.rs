//! vslice CLI - G-code generation from vector slicer output.
//!
//! Reads sliced patterns, translates them against one or more printer
//! profiles, and writes one G-code file per profile.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use vslice_gcode::{generate_gcode, PrinterProfile, SliceOptions, TemplateStore};
use vslice_pattern::Pattern;

#[derive(Parser)]
#[command(name = "vslice")]
#[command(about = "Translate vector slicer paths into printer G-code", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a pattern against one or more printer profiles
    Generate {
        /// Pattern name (looked up under $VECTOR_SLICER_OUTPUT/paths) or a
        /// path to the slicer's paths file
        pattern: String,
        /// Built-in profile name or path to a profile TOML file; repeatable
        #[arg(short, long = "profile", required = true)]
        profiles: Vec<String>,
        /// Number of layers to print (pattern layers repeat)
        #[arg(short, long, default_value_t = 1)]
        layers: usize,
        /// Job placement on the bed in millimetres, as X,Y
        #[arg(long)]
        offset: Option<String>,
        /// Override the first layer height (mm)
        #[arg(long)]
        first_layer_height: Option<f64>,
        /// Register a template from a file, as NAME=PATH; repeatable
        #[arg(long = "template")]
        templates: Vec<String>,
        /// Output directory
        #[arg(short, long, default_value = "output")]
        out: PathBuf,
    },
    /// List the built-in printer profiles
    Profiles,
    /// Display information about a pattern
    Info {
        /// Pattern name or path to the slicer's paths file
        pattern: String,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            pattern,
            profiles,
            layers,
            offset,
            first_layer_height,
            templates,
            out,
        } => generate(
            &pattern,
            &profiles,
            layers,
            offset.as_deref(),
            first_layer_height,
            &templates,
            &out,
        ),
        Commands::Profiles => {
            list_profiles();
            Ok(())
        }
        Commands::Info { pattern } => show_info(&pattern),
    }
}

#[allow(clippy::too_many_arguments)]
fn generate(
    pattern_arg: &str,
    profile_args: &[String],
    layers: usize,
    offset: Option<&str>,
    first_layer_height: Option<f64>,
    template_args: &[String],
    out_dir: &Path,
) -> Result<()> {
    let pattern = load_pattern(pattern_arg)?;
    let options = SliceOptions {
        layers,
        offset: offset.map(parse_offset).transpose()?,
        first_layer_height,
    };

    let mut store = TemplateStore::builtin();
    for arg in template_args {
        let (name, path) = arg
            .split_once('=')
            .with_context(|| format!("template argument {arg:?} is not NAME=PATH"))?;
        store.insert_file(name, Path::new(path))?;
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;

    let mut failures = 0usize;
    for profile_arg in profile_args {
        let profile = match load_profile(profile_arg) {
            Ok(profile) => profile,
            Err(e) => {
                error!("profile {profile_arg}: {e:#}");
                failures += 1;
                continue;
            }
        };

        // Each pattern-profile pair translates independently; one failure
        // must not take the remaining profiles down with it.
        match generate_gcode(&pattern, &profile, &options, &store) {
            Ok(output) => {
                let file = out_dir.join(format!(
                    "{}_{}.gcode",
                    pattern.name,
                    slug(&profile.name)
                ));
                fs::write(&file, &output.gcode)
                    .with_context(|| format!("cannot write {}", file.display()))?;
                info!(
                    "{}: {} ({:.1} mm printed, est. {})",
                    profile.name,
                    file.display(),
                    output.stats.print_distance,
                    output.stats.format_time(),
                );
            }
            Err(e) => {
                error!("{}: {e}", profile.name);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} profiles failed", profile_args.len());
    }
    Ok(())
}

fn list_profiles() {
    for profile in PrinterProfile::all_profiles() {
        println!(
            "{:20} print {:.0} mm/min, travel {:.0} mm/min, line {:.2} mm, layer {:.2} mm",
            profile.name,
            profile.print_speed,
            profile.travel_speed,
            profile.line_width,
            profile.layer_height,
        );
    }
}

fn show_info(pattern_arg: &str) -> Result<()> {
    let pattern = load_pattern(pattern_arg)?;
    println!("Pattern: {}", pattern.name);
    println!("Pixel path width: {} px", pattern.pixel_path_width);
    println!("Layers: {}", pattern.layer_count());
    for (i, layer) in pattern.layers.iter().enumerate() {
        println!(
            "  layer {}: {} paths, {:.1} px printed, {:.1} px travel",
            i,
            layer.path_count(),
            layer.printing_distance(),
            layer.travel_distance(),
        );
    }
    if let Some(bounds) = pattern.bounds() {
        println!(
            "Bounds: ({:.1}, {:.1}) to ({:.1}, {:.1}) px",
            bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y
        );
    }
    Ok(())
}

/// Resolve a pattern argument: an existing file path, or a pattern name
/// under `$VECTOR_SLICER_OUTPUT/paths/<name>.csv`.
fn load_pattern(arg: &str) -> Result<Pattern> {
    let direct = Path::new(arg);
    let file = if direct.exists() {
        direct.to_path_buf()
    } else {
        let root = std::env::var_os("VECTOR_SLICER_OUTPUT").with_context(|| {
            format!(
                "{arg:?} is not a file and VECTOR_SLICER_OUTPUT is not set; \
                 cannot locate the slicer output directory"
            )
        })?;
        Path::new(&root).join("paths").join(format!("{arg}.csv"))
    };
    Pattern::load(&file).with_context(|| format!("cannot load pattern from {}", file.display()))
}

/// Resolve a profile argument: a built-in profile name, or a TOML file.
fn load_profile(arg: &str) -> Result<PrinterProfile> {
    if let Some(profile) = PrinterProfile::builtin(arg) {
        return Ok(profile);
    }
    let path = Path::new(arg);
    if !path.exists() {
        bail!("no built-in profile or file named {arg:?}");
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read profile {}", path.display()))?;
    let profile: PrinterProfile = toml::from_str(&text)
        .with_context(|| format!("invalid profile file {}", path.display()))?;
    Ok(profile)
}

fn parse_offset(arg: &str) -> Result<[f64; 2]> {
    let (x, y) = arg
        .split_once(',')
        .with_context(|| format!("offset {arg:?} is not X,Y"))?;
    Ok([
        x.trim().parse().with_context(|| format!("bad X offset {x:?}"))?,
        y.trim().parse().with_context(|| format!("bad Y offset {y:?}"))?,
    ])
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' => '-',
            _ => c.to_ascii_lowercase(),
        })
        .collect()
}
