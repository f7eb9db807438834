use std::fs;
use std::path::{Path, PathBuf};

use chart_digitizer::core::{Calibration, CoordinateTransformer, Dataset};
use chart_digitizer::io::paths::{default_file_name, ensure_extension, sanitize_filename};
use chart_digitizer::io::{Project, ProjectMeta, load_project, save_csv, save_project};
use chart_digitizer::telemetry::init_default_tracing;
use chart_digitizer::trace::{AutoTracer, ColumnRange, load_rgba_image};
use chart_digitizer::DigitizerConfig;

const USAGE: &str = "usage:
  digitize trace --image <path> --calibration <json> [--color <#hex>] [--name <text>]
                 [--secondary-y] [--start <col>] [--end <col>] [--title <text>]
                 [--config <json>] [--output <json>]
  digitize csv --input <project.json> [--output <csv>] [--config <json>]
  digitize sanitize <text>";

#[derive(Debug)]
struct TraceArgs {
    image: PathBuf,
    calibration: PathBuf,
    color: Option<String>,
    name: String,
    secondary_y: bool,
    start: u32,
    end: u32,
    title: String,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
}

#[derive(Debug)]
struct CsvArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

#[derive(Debug)]
enum Command {
    Trace(TraceArgs),
    Csv(CsvArgs),
    Sanitize(String),
}

fn main() {
    let _ = init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    match parse_args(std::env::args().skip(1))? {
        Command::Trace(args) => run_trace(args),
        Command::Csv(args) => run_csv(args),
        Command::Sanitize(text) => {
            println!("{}", sanitize_filename(&text));
            Ok(())
        }
    }
}

fn run_trace(args: TraceArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;

    let raw = fs::read_to_string(&args.calibration)
        .map_err(|err| format!("failed to read `{}`: {err}", args.calibration.display()))?;
    let calibration: Calibration =
        serde_json::from_str(&raw).map_err(|err| format!("invalid calibration json: {err}"))?;
    if !calibration.is_complete() {
        return Err(format!(
            "calibration is missing anchors: {:?}",
            calibration.missing_anchors()
        ));
    }

    let image = load_rgba_image(&args.image).map_err(|err| err.to_string())?;
    let dataset = match &args.color {
        Some(color) => Dataset::new(args.name, color),
        None => config.next_dataset(&[], args.name),
    }
    .map_err(|err| err.to_string())?
    .with_secondary_y(args.secondary_y);

    let tracer = AutoTracer::from_config(config.trace, ColumnRange::new(args.start, args.end))
        .map_err(|err| err.to_string())?;
    let transformer = CoordinateTransformer::new(&calibration);
    let points = tracer.trace_dataset(&image, &dataset, &transformer);
    let traced = points.len();
    let dataset = dataset.with_points(points);

    let meta = ProjectMeta {
        title: args.title.clone(),
        ..ProjectMeta::default()
    };
    let project = Project::from_session(meta, &calibration, &[dataset]);
    let output = args.output.unwrap_or_else(|| {
        default_file_name(&args.title, "json", &config.export.default_basename)
    });
    save_project(&output, &project, config.export.pretty_json).map_err(|err| err.to_string())?;
    println!("traced {traced} points -> {}", output.display());
    Ok(())
}

fn run_csv(args: CsvArgs) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let project = load_project(&args.input).map_err(|err| err.to_string())?;
    let output = match args.output {
        Some(path) => path,
        None => default_file_name(&project.title, "csv", &config.export.default_basename),
    };
    save_csv(&output, &project.datasets).map_err(|err| err.to_string())?;
    println!(
        "wrote {} datasets -> {}",
        project.non_empty_datasets().count(),
        output.display()
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<DigitizerConfig, String> {
    match path {
        Some(path) => DigitizerConfig::load(path).map_err(|err| err.to_string()),
        None => Ok(DigitizerConfig::default()),
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command, String> {
    let mut args = args.into_iter();
    let command = args.next().ok_or_else(|| USAGE.to_owned())?;
    match command.as_str() {
        "trace" => parse_trace_args(args).map(Command::Trace),
        "csv" => parse_csv_args(args).map(Command::Csv),
        "sanitize" => {
            let text: Vec<String> = args.collect();
            if text.is_empty() {
                return Err(USAGE.to_owned());
            }
            Ok(Command::Sanitize(text.join(" ")))
        }
        _ => Err(USAGE.to_owned()),
    }
}

fn parse_trace_args(mut args: impl Iterator<Item = String>) -> Result<TraceArgs, String> {
    let mut image = None::<PathBuf>;
    let mut calibration = None::<PathBuf>;
    let mut color = None::<String>;
    let mut name = "Dataset 1".to_owned();
    let mut secondary_y = false;
    let mut range = ColumnRange::full();
    let mut title = String::new();
    let mut config = None::<PathBuf>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--image" => image = Some(PathBuf::from(value_for(&flag, &mut args)?)),
            "--calibration" => calibration = Some(PathBuf::from(value_for(&flag, &mut args)?)),
            "--color" => color = Some(value_for(&flag, &mut args)?),
            "--name" => name = value_for(&flag, &mut args)?,
            "--secondary-y" => secondary_y = true,
            "--start" => range.start = parse_column(&flag, &value_for(&flag, &mut args)?)?,
            "--end" => range.end = parse_column(&flag, &value_for(&flag, &mut args)?)?,
            "--title" => title = value_for(&flag, &mut args)?,
            "--config" => config = Some(PathBuf::from(value_for(&flag, &mut args)?)),
            "--output" => {
                let path = value_for(&flag, &mut args)?;
                output = Some(PathBuf::from(ensure_extension(&path, "json")));
            }
            other => return Err(format!("unknown flag `{other}`\n{USAGE}")),
        }
    }

    Ok(TraceArgs {
        image: image.ok_or_else(|| "missing --image".to_owned())?,
        calibration: calibration.ok_or_else(|| "missing --calibration".to_owned())?,
        color,
        name,
        secondary_y,
        start: range.start,
        end: range.end,
        title,
        config,
        output,
    })
}

fn parse_csv_args(mut args: impl Iterator<Item = String>) -> Result<CsvArgs, String> {
    let mut input = None::<PathBuf>;
    let mut output = None::<PathBuf>;
    let mut config = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--input" => input = Some(PathBuf::from(value_for(&flag, &mut args)?)),
            "--output" => {
                let path = value_for(&flag, &mut args)?;
                output = Some(PathBuf::from(ensure_extension(&path, "csv")));
            }
            "--config" => config = Some(PathBuf::from(value_for(&flag, &mut args)?)),
            other => return Err(format!("unknown flag `{other}`\n{USAGE}")),
        }
    }

    Ok(CsvArgs {
        input: input.ok_or_else(|| "missing --input".to_owned())?,
        output,
        config,
    })
}

fn value_for(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn parse_column(flag: &str, value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|err| format!("invalid value `{value}` for {flag}: {err}"))
}
