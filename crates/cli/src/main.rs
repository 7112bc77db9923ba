#![deny(unsafe_code)]
//! CLI binary for pointer-field.
//!
//! Subcommands:
//! - `render <field>`: drive a field with a scripted pointer for N frames, write PNG
//! - `list`: print available fields and palettes
//! - `schema <field>`: print a field's parameter schema as JSON

mod error;
mod path;

use clap::{Parser, Subcommand};
use error::CliError;
use path::PointerPath;
use pointer_field_core::{Engine, FieldError, InputEvent, Palette, Surface};
use pointer_field_engines::pixel::PixelBuffer;
use pointer_field_engines::FieldKind;
use serde_json::Value;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "pointer-field", about = "Pointer-reactive particle field CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a field for N frames under a scripted pointer and write a PNG.
    Render {
        /// Field name ("grid" or "sparks").
        field: String,

        /// Logical surface width.
        #[arg(short = 'W', long, default_value_t = 480)]
        width: u32,

        /// Logical surface height.
        #[arg(short = 'H', long, default_value_t = 480)]
        height: u32,

        /// Device-pixel scale of the output image.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Number of frames to simulate.
        #[arg(short, long, default_value_t = 120)]
        frames: usize,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Palette name (dusk, ember, aurora, mono); overrides `palette` in --params.
        #[arg(short, long)]
        palette: Option<String>,

        /// Field parameters as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Scripted pointer motion.
        #[arg(long, value_enum, default_value_t = PointerPath::Circle)]
        path: PointerPath,

        /// Render as if the host prefers reduced motion.
        #[arg(long)]
        reduced_motion: bool,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// List available fields and palettes.
    List,
    /// Print the parameter schema of a field.
    Schema {
        /// Field name.
        field: String,
    },
}

/// Everything a headless render needs besides the output path.
struct RenderJob {
    field: String,
    surface: Surface,
    frames: usize,
    seed: u64,
    params: Value,
    path: PointerPath,
    reduced_motion: bool,
}

/// Runs the job and returns the field with its final frame.
fn render_frames(job: &RenderJob) -> Result<(FieldKind, PixelBuffer), CliError> {
    let mut field = FieldKind::from_name(&job.field, job.surface, job.seed, &job.params)?;
    if job.reduced_motion {
        field.handle(&InputEvent::ReducedMotion(true));
    }
    let mut buffer = PixelBuffer::new(&job.surface);
    field.render(&mut buffer);

    for frame in 0..job.frames {
        if let Some(p) = job.path.position(frame, job.frames, &job.surface) {
            field.handle(&InputEvent::pointer_move(p));
        }
        field.frame(1.0, &mut buffer);
    }
    Ok((field, buffer))
}

/// Parses `--params` and folds `--palette` into it.
fn build_params(params: &str, palette: Option<String>) -> Result<Value, CliError> {
    let mut params: Value = serde_json::from_str(params).map_err(|e| FieldError::InvalidParam {
        name: "--params".into(),
        reason: e.to_string(),
    })?;
    let Some(object) = params.as_object_mut() else {
        return Err(FieldError::InvalidParam {
            name: "--params".into(),
            reason: "expected a JSON object".into(),
        }
        .into());
    };
    if let Some(name) = palette {
        // Validate eagerly so a typo is reported as bad input, not ignored.
        Palette::from_name(&name)?;
        object.insert("palette".into(), Value::String(name));
    }
    Ok(params)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let fields = FieldKind::list_fields();
            let palettes = Palette::list_names();
            if cli.json {
                let info = serde_json::json!({
                    "fields": fields,
                    "palettes": palettes,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Fields:");
                for name in fields {
                    println!("  {name}");
                }
                println!("Palettes:");
                println!("  {}", palettes.join(", "));
            }
        }
        Command::Schema { field } => {
            let field = FieldKind::from_name(
                &field,
                Surface::new(480.0, 480.0, 1.0),
                1,
                &serde_json::json!({}),
            )?;
            println!("{}", serde_json::to_string_pretty(&field.param_schema())?);
        }
        Command::Render {
            field,
            width,
            height,
            scale,
            frames,
            seed,
            palette,
            params,
            path,
            reduced_motion,
            output,
        } => {
            let job = RenderJob {
                field,
                surface: Surface::new(width as f64, height as f64, scale),
                frames,
                seed,
                params: build_params(&params, palette)?,
                path,
                reduced_motion,
            };
            let (engine, buffer) = render_frames(&job)?;

            pointer_field_engines::snapshot::write_png(&buffer, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "field": job.field,
                    "width": buffer.width(),
                    "height": buffer.height(),
                    "frames": frames,
                    "seed": seed,
                    "particles": engine.particle_count(),
                    "params": engine.params(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}, {frames} frames, {} particles, seed {seed}) -> {}",
                    job.field,
                    buffer.width(),
                    buffer.height(),
                    engine.particle_count(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
