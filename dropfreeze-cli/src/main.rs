//! dropfreeze: annotate droplet-freezing assays from the command line.
//!
//! `annotate` opens an assay directory and reads operator commands from
//! standard input, one per line, until `done` writes the fraction-frozen
//! table or input ends (nothing is written). A failed write keeps the
//! session open. `info` prints an overview of
//! an assay without opening a session.

mod prompt;
mod report;

use clap::{Parser, Subcommand, ValueEnum};
use dropfreeze_core::{AnnotationConfig, AnnotationMode, AssaySummary, Session, Signal};
use dropfreeze_io::{load_assay, AssayLayout, TableFile};
use prompt::Input;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    DropfreezeIo(#[from] dropfreeze_io::Error),

    #[error("core error: {0}")]
    Core(#[from] dropfreeze_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Freeze counting mode.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Each clicked droplet is one freeze
    Events,
    /// Count freezes with inc/dec per frame; clicks are notes only
    Tally,
}

impl From<Mode> for AnnotationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Events => AnnotationMode::Events,
            Mode::Tally => AnnotationMode::Tally,
        }
    }
}

/// Manual annotation of time-lapse droplet-freezing assays.
#[derive(Parser)]
#[command(name = "dropfreeze")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step through an assay and mark freezing events
    Annotate {
        /// Assay directory holding the log and frame images
        assay: PathBuf,

        /// Log file (default: log_data.csv inside the assay directory)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Frame image extension
        #[arg(long, default_value = dropfreeze_io::DEFAULT_IMAGE_EXTENSION)]
        extension: String,

        /// Output file for the fraction-frozen table
        #[arg(short, long, default_value = dropfreeze_io::DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// Freeze counting mode
        #[arg(short, long, value_enum, default_value = "events")]
        mode: Mode,

        /// Half-width of the box around a marked droplet (pixels)
        #[arg(long, default_value_t = dropfreeze_core::DEFAULT_EXCLUSION_RADIUS)]
        radius: f64,

        /// Number of droplets in the assay (default: fractions of counted freezes)
        #[arg(long)]
        droplets: Option<u32>,
    },

    /// Show information about an assay
    Info {
        /// Assay directory holding the log and frame images
        assay: PathBuf,

        /// Log file (default: log_data.csv inside the assay directory)
        #[arg(long)]
        log: Option<PathBuf>,

        /// Frame image extension
        #[arg(long, default_value = dropfreeze_io::DEFAULT_IMAGE_EXTENSION)]
        extension: String,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn layout(log: Option<PathBuf>, extension: &str) -> AssayLayout {
    let layout = AssayLayout::new().with_image_extension(extension);
    match log {
        Some(path) => layout.with_log_file(path),
        None => layout,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Annotate {
            assay,
            log,
            extension,
            output,
            mode,
            radius,
            droplets,
        } => {
            let mut config = AnnotationConfig::new()
                .with_exclusion_radius(radius)
                .with_mode(mode.into());
            if let Some(count) = droplets {
                config = config.with_droplet_count(count);
            }

            let model = load_assay(&assay, &layout(log, &extension), config)?;
            let session = Session::new(model)?;
            let stdin = io::stdin();
            match annotate(session, stdin.lock(), &mut io::stdout(), &output)? {
                Ending::Written(path) => println!("table saved: {}", path.display()),
                Ending::Abandoned => eprintln!("session abandoned, nothing written"),
            }
        }

        Commands::Info {
            assay,
            log,
            extension,
            json,
        } => {
            let layout = layout(log, &extension);
            let model = load_assay(&assay, &layout, AnnotationConfig::default())?;
            let summary = AssaySummary::from_assay(&model);

            if json {
                let report = info_json(&assay, &layout, &summary);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Assay: {}", assay.display());
                print!("{}", report::render_summary(&summary));
            }
        }
    }

    Ok(())
}

/// JSON form of `info`: the assay, how it was read, and its summary.
fn info_json(assay: &Path, layout: &AssayLayout, summary: &AssaySummary) -> serde_json::Value {
    serde_json::json!({
        "assay": assay,
        "layout": layout,
        "summary": summary,
    })
}

/// How an annotation loop ended.
#[derive(Debug, PartialEq)]
enum Ending {
    /// The table was written to this file.
    Written(PathBuf),
    /// Input ended or the operator quit.
    Abandoned,
}

/// Runs the interactive loop over `input`, writing feedback to `out`.
///
/// `done` writes to `output` unless it names another file. If writing
/// fails the error is reported and the loop goes on with the same session.
fn annotate<R: BufRead, W: Write>(
    mut session: Session,
    input: R,
    out: &mut W,
    output: &Path,
) -> Result<Ending> {
    writeln!(out, "{}", prompt::USAGE)?;
    write!(out, "{}", report::render_view(&session.view()?))?;

    for line in input.lines() {
        let line = line?;
        match prompt::parse_line(&line) {
            Ok(Input::Edit(command)) => {
                let signal = session.handle(command)?;
                if !matches!(signal, Signal::Moved { .. }) {
                    writeln!(out, "{}", report::describe(&signal))?;
                }
                if matches!(
                    signal,
                    Signal::Moved { .. } | Signal::Marked { .. } | Signal::Unmarked { .. }
                ) {
                    write!(out, "{}", report::render_view(&session.view()?))?;
                }
            }
            Ok(Input::View) => write!(out, "{}", report::render_view(&session.view()?))?,
            Ok(Input::Help) => writeln!(out, "{}", prompt::USAGE)?,
            Ok(Input::Empty) => {}
            Ok(Input::Done(path)) => {
                let path = path.unwrap_or_else(|| output.to_path_buf());
                match session.finalize(&mut TableFile::new(&path)) {
                    Ok(rows) => {
                        writeln!(out, "wrote {} rows to {}", rows.len(), path.display())?;
                        for row in &rows {
                            writeln!(out, "  {} °C  {}", row.temperature, row.fraction)?;
                        }
                        return Ok(Ending::Written(path));
                    }
                    Err(failed) => {
                        writeln!(
                            out,
                            "{failed}; annotations kept, try 'done FILE' or 'quit'"
                        )?;
                        session = failed.into_session();
                    }
                }
            }
            Ok(Input::Quit) => break,
            Err(e) => writeln!(out, "{e} (type 'help' for commands)")?,
        }
    }

    Ok(Ending::Abandoned)
}
