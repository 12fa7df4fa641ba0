//! Samples from a weighted set of options and reports how often each came up
use clap::Parser;
use env_logger::fmt::Formatter;
use log::Record;
use ring_rs::ring::{ChoiceError, Ring};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::{fs, thread};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Options to choose between
    #[arg(short, long, value_delimiter = ',')]
    options: Vec<String>,
    /// Weight of each option, in the same order
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    weights: Vec<f64>,
    /// JSON settings file; replaces options, weights, trials and seed
    #[arg(long)]
    settings: Option<String>,
    #[arg(short('n'), long, default_value_t = 1)]
    trials: usize,
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(short, long, default_value = None)]
    reports_folder: Option<String>,
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

#[derive(Debug, Deserialize)]
struct ChoiceSettings {
    options: Vec<String>,
    weights: Vec<f64>,
    #[serde(default = "default_trials")]
    trials: usize,
    seed: Option<u64>,
}

fn default_trials() -> usize {
    1
}

#[derive(Debug, Serialize)]
struct TallyEntry<'a> {
    option: &'a str,
    weight: f64,
    count: usize,
    share: f64,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    generated_at: String,
    trials: usize,
    seed: Option<u64>,
    tally: Vec<TallyEntry<'a>>,
}

fn load_settings(args: &Args) -> Result<ChoiceSettings, String> {
    match &args.settings {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .map_err(|err| format!("Failed to read settings file {}: {}", path, err))?;
            serde_json::from_str(&contents)
                .map_err(|err| format!("Failed to parse settings file {}: {}", path, err))
        }
        None => Ok(ChoiceSettings {
            options: args.options.clone(),
            weights: args.weights.clone(),
            trials: args.trials,
            seed: args.seed,
        }),
    }
}

fn run_trials(settings: &ChoiceSettings) -> Result<Vec<usize>, ChoiceError> {
    match settings.seed {
        Some(seed) => {
            Ring::seeded(seed).tally(&settings.options, &settings.weights, settings.trials)
        }
        None => Ring::default().tally(&settings.options, &settings.weights, settings.trials),
    }
}

fn build_tally<'a>(settings: &'a ChoiceSettings, counts: &[usize]) -> Vec<TallyEntry<'a>> {
    settings
        .options
        .iter()
        .zip(&settings.weights)
        .zip(counts)
        .map(|((option, weight), count)| TallyEntry {
            option: option.as_str(),
            weight: *weight,
            count: *count,
            share: if settings.trials == 0 {
                0.0
            } else {
                *count as f64 / settings.trials as f64
            },
        })
        .collect()
}

fn write_report(
    folder: &str,
    settings: &ChoiceSettings,
    tally: Vec<TallyEntry>,
) -> Result<String, String> {
    fs::create_dir_all(folder)
        .map_err(|err| format!("Failed to create reports folder {}: {}", folder, err))?;
    let now = chrono::Local::now();
    let filename = format!("{}/{}.json", folder, now.format("%Y-%m-%d_%H-%M-%S"));
    let report = Report {
        generated_at: now.to_rfc3339(),
        trials: settings.trials,
        seed: settings.seed,
        tally,
    };
    let serialized = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("Failed to serialize report: {}", err))?;
    fs::write(&filename, serialized)
        .map_err(|err| format!("Failed to write report {}: {}", filename, err))?;
    Ok(filename)
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .format(|buf: &mut Formatter, record: &Record| {
            let thread_id = thread::current().id();
            let timestamp = buf.timestamp_millis();
            writeln!(
                buf,
                "[{}] [Thread: {:?}] [{}] - {}",
                timestamp,
                thread_id,
                record.level(),
                record.args()
            )
        })
        .filter_level(args.verbose.log_level_filter())
        .init();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    log::info!(
        "Choosing from {} options over {} trials",
        settings.options.len(),
        settings.trials
    );

    let counts = match run_trials(&settings) {
        Ok(counts) => counts,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    if settings.trials == 1 {
        if let Some(index) = counts.iter().position(|count| *count > 0) {
            println!("{}", settings.options[index]);
        }
    } else {
        println!("Option\tWeight\tCount\tPercentage");
        for entry in build_tally(&settings, &counts) {
            println!(
                "{}\t{}\t{}\t{:>5.2}%",
                entry.option,
                entry.weight,
                entry.count,
                100.0 * entry.share
            );
        }
    }

    if let Some(folder) = &args.reports_folder {
        match write_report(folder, &settings, build_tally(&settings, &counts)) {
            Ok(filename) => log::info!("Wrote report to {}", filename),
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            }
        }
    }
}
