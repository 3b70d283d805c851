use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};

use tabgen::notation::{encode, from_json, NotationFormat};
use tabgen::render::render_source;
use tabgen::{parse_notes, TabResult, Transcriber, TranscriptionConfig, Tuning};

/// Turn a detected note stream into guitar tablature.
#[derive(Parser, Debug)]
#[command(name = "tabgen", version, about)]
struct Args {
    /// JSON note list from the pitch detector (or a tab JSON with --from-tab)
    input: PathBuf,

    /// Tempo estimate in beats per minute
    #[arg(long)]
    bpm: Option<f64>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tuning preset, overriding the configuration (E_standard, Drop_D, Eb_standard, D_standard)
    #[arg(short, long)]
    tuning: Option<String>,

    /// Output format: text, json, lilypond or svg (default: from --output, else text)
    #[arg(short, long)]
    format: Option<String>,

    /// Score title for LilyPond output
    #[arg(long)]
    title: Option<String>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also engrave the score with lilypond into this .svg, .png or .pdf file
    #[arg(long)]
    render: Option<PathBuf>,

    /// Path to the lilypond executable
    #[arg(long)]
    lilypond: Option<PathBuf>,

    /// Read the input as previously exported tab JSON instead of detector notes
    #[arg(long)]
    from_tab: bool,

    /// Log each pipeline decision to stderr
    #[arg(short, long)]
    verbose: bool,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    // Configuration
    let mut config = match &args.config {
        Some(path) => TranscriptionConfig::load(path)
            .unwrap_or_else(|e| fail(format!("Error loading config '{}': {}", path.display(), e))),
        None => TranscriptionConfig::default(),
    };
    if let Some(name) = &args.tuning {
        config.tuning = Tuning::from_name(name)
            .unwrap_or_else(|| fail(format!("Unknown tuning: {}", name)));
    }
    if let Some(bpm) = args.bpm {
        if !(bpm.is_finite() && bpm > 0.0) {
            fail(format!("--bpm must be a positive number, got {}", bpm));
        }
    }
    let transcriber = Transcriber::new(config);

    // Read input file
    let content = fs::read_to_string(&args.input).unwrap_or_else(|e| {
        fail(format!("Error reading file '{}': {}", args.input.display(), e))
    });

    let tab = if args.from_tab {
        let mut tab = from_json(&content)
            .unwrap_or_else(|e| fail(format!("Error parsing tab '{}': {}", args.input.display(), e)));
        if args.bpm.is_some() {
            tab.bpm = args.bpm;
        }
        tab
    } else {
        let notes = parse_notes(&content).unwrap_or_else(|e| {
            fail(format!("Error parsing notes '{}': {}", args.input.display(), e))
        });
        transcriber.transcribe(&notes, args.bpm)
    };

    let format = match &args.format {
        Some(name) => NotationFormat::from_str(name)
            .unwrap_or_else(|| fail(format!("Unknown format: {}", name))),
        None => args
            .output
            .as_deref()
            .and_then(NotationFormat::from_extension)
            .unwrap_or(NotationFormat::Text),
    };

    let encoded = encode(&tab, format, transcriber.config(), args.title.as_deref())
        .unwrap_or_else(|e| fail(format!("Encoding error: {}", e)));

    // Output
    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, &encoded) {
                fail(format!("Error writing to '{}': {}", path.display(), e));
            }
            eprintln!("Wrote {} to {}", format.extension(), path.display());
        }
        None => {
            println!("{}", encoded);
        }
    }

    if let Some(target) = &args.render {
        render(&transcriber, &tab, target, &args);
    }
}

fn render(transcriber: &Transcriber, tab: &TabResult, target: &Path, args: &Args) {
    let source = transcriber
        .to_lilypond(tab, args.title.as_deref())
        .unwrap_or_else(|e| fail(format!("Encoding error: {}", e)));

    match render_source(&source, target, args.lilypond.as_deref()) {
        Ok(path) => eprintln!("Rendered score to {}", path.display()),
        Err(e) => {
            eprintln!("Render error: {}", e);
            let source_path = target.with_extension("ly");
            if source_path.exists() {
                eprintln!("LilyPond source was kept at {}", source_path.display());
            }
            process::exit(2);
        }
    }
}
