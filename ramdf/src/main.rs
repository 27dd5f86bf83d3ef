use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use ramcore::algorithm::filter::Interval;
use ramcore::algorithm::pipeline::{align_trace, build_map, shape_series, PipelineConfig};
use ramcore::data::series::TimeUnit;

use ramdf::data::cache::write_grid_cache;
use ramdf::data::export::{write_json, SpectraPayload, SurfacePayload};
use ramdf::data::markers::CycleMarkers;
use ramdf::data::table::{read_potential_table, read_raman_table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Surface payload as pretty JSON
    Json,
    /// Resampled grid as a bincode cache
    Bin,
}

#[derive(Parser, Debug)]
#[command(name = "ramdf")]
#[command(about = "Shape an operando Raman run into a renderer-ready intensity map")]
struct Args {
    /// Path to the spectra table (time, Raman shift, intensity)
    spectra: PathBuf,

    /// Path to the potential trace table (time, volts)
    #[arg(long)]
    potential: Option<PathBuf>,

    /// Time window LO:HI in hours, or in raw seconds under --seconds;
    /// both ends inclusive
    #[arg(long, value_parser = parse_range)]
    time_range: Option<Interval>,

    /// Raman shift window LO:HI in 1/cm, both ends inclusive
    #[arg(long, value_parser = parse_range)]
    shift_range: Option<Interval>,

    /// Keep the time axis in the table's raw seconds instead of hours
    #[arg(long)]
    seconds: bool,

    /// Scale intensities by the reference peak
    #[arg(long)]
    normalize: bool,

    /// Shift window LO:HI the reference peak is taken over
    #[arg(long, value_parser = parse_range, default_value = "1200:1700")]
    reference_range: Interval,

    /// Require at least this many distinct points per grid axis, zero
    /// disables the check
    #[arg(long, default_value_t = 0)]
    min_axis_points: usize,

    /// Charge switch time in hours, repeatable
    #[arg(long)]
    charge: Vec<f64>,

    /// Discharge switch time in hours, repeatable
    #[arg(long)]
    discharge: Vec<f64>,

    /// Also write the shaped spectra as a stacked JSON payload
    #[arg(long)]
    spectra_out: Option<PathBuf>,

    /// Output path, defaults to the spectra path with the format extension
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,
}

fn parse_range(s: &str) -> Result<Interval, String> {
    let (low, high) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LO:HI, got '{}'", s))?;
    let low: f64 = low
        .trim()
        .parse()
        .map_err(|_| format!("cannot parse '{}' as a number", low))?;
    let high: f64 = high
        .trim()
        .parse()
        .map_err(|_| format!("cannot parse '{}' as a number", high))?;
    Ok(Interval::new(low, high))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let series = read_raman_table(&args.spectra)?;
    println!("read {} samples from {}", series.len(), args.spectra.display());

    let config = PipelineConfig {
        time_unit: if args.seconds {
            // the table is declared as already being in the target unit,
            // which skips the seconds to hours division
            TimeUnit::Hours
        } else {
            TimeUnit::Seconds
        },
        time_range: args.time_range,
        shift_range: args.shift_range,
        normalize: args.normalize,
        reference_range: args.reference_range,
        min_axis_points: args.min_axis_points,
        ..PipelineConfig::default()
    };

    let grid = build_map(&series, &config)?;
    println!("{}", grid);

    let trace = match &args.potential {
        Some(path) => {
            let trace = read_potential_table(path)?;
            let mut trace_config = config.clone();
            if args.seconds {
                // the window is in raw seconds then, the trace is stored
                // in hours, so the trace keeps its full span
                trace_config.time_range = None;
            }
            let aligned = align_trace(&trace, &trace_config);
            println!(
                "aligned potential trace: {} of {} points inside the window",
                aligned.len(),
                trace.len()
            );
            Some(aligned)
        }
        None => None,
    };

    if let Some(path) = &args.spectra_out {
        let shaped = shape_series(&series, &config)?;
        write_json(path, &SpectraPayload::from_series(&shaped))?;
        println!("wrote {}", path.display());
    }

    let markers = CycleMarkers::new(args.charge.clone(), args.discharge.clone());

    let output = args.output.clone().unwrap_or_else(|| {
        args.spectra.with_extension(match args.format {
            OutputFormat::Json => "json",
            OutputFormat::Bin => "bin",
        })
    });

    match args.format {
        OutputFormat::Json => {
            let mut payload = SurfacePayload::from_grid(&grid);
            if let Some(trace) = &trace {
                payload = payload.with_potential(trace);
            }
            if !markers.is_empty() {
                payload = payload.with_markers(markers);
            }
            write_json(&output, &payload)?;
        }
        OutputFormat::Bin => {
            write_grid_cache(&output, &grid)?;
        }
    }
    println!("wrote {}", output.display());

    Ok(())
}
