mod common;
mod logic;
mod storage;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use gridiron_game::{CareerConfig, Side};
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use common::split_csv;
use logic::scenarios::{expand_scenarios, get_scenario, list_scenarios};
use logic::{CareerPlan, CareerTester, LogicTester, SidePolicy, resolve_seed_inputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "gridiron-tester", version = "0.1.0")]
#[command(about = "Automated QA driver for the Gridiron coaching career engine")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for the whole catalog)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated, ranges like 1..5 allowed)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Careers simulated per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Season ceiling for scenarios that do not set their own
    #[arg(long, default_value_t = 10)]
    max_seasons: u32,

    /// How preseason side prompts are answered
    #[arg(long, value_enum, default_value_t = SidePolicy::Alternate)]
    side_policy: SidePolicy,

    /// Side granted when a queued gain cannot ask
    #[arg(long, value_parser = parse_side)]
    default_side: Option<Side>,

    /// Coach name shown in narration
    #[arg(long)]
    coach: Option<String>,

    /// Career config JSON; `--coach` and `--default-side` override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the narration of one career on the first seed to this file
    #[arg(long)]
    export_log: Option<PathBuf>,

    /// Directory for career saves used by the persistence scenario
    #[arg(long, default_value = "target/gridiron-saves")]
    save_dir: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_side(raw: &str) -> Result<Side, String> {
    raw.parse()
        .map_err(|()| format!("unknown side `{raw}` (expected offense or defense)"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&split_csv(&args.scenarios));
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let base = base_plan(&args)?;

    let results = run_logic_scenarios(&args, &scenarios, &seeds, &base);

    if let Some(path) = args.export_log.as_ref() {
        export_showcase_log(&base, seeds[0], path)?;
    }

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:15} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏈 Gridiron Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_config(args: &Args) -> Result<CareerConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            CareerConfig::from_json(&raw)
                .with_context(|| format!("invalid career config in {}", path.display()))?
        }
        None => CareerConfig::default(),
    };
    if let Some(coach) = args.coach.as_ref() {
        config.coach_name.clone_from(coach);
    }
    if let Some(side) = args.default_side {
        config.default_side = side;
    }
    Ok(config)
}

fn base_plan(args: &Args) -> Result<CareerPlan> {
    if args.max_seasons == 0 {
        bail!("--max-seasons must be at least 1");
    }
    let config = load_config(args)?;
    Ok(CareerPlan::new(args.max_seasons)
        .with_coach(config.coach_name)
        .with_default_side(config.default_side)
        .with_side_policy(args.side_policy))
}

fn run_logic_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    base: &CareerPlan,
) -> Vec<logic::ScenarioResult> {
    println!("{}", "🧠 Running Career Simulations".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let logic_tester = LogicTester::new(args.verbose);
    let mut results = Vec::new();

    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name, base, &args.save_dir) {
            results.extend(logic_tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn export_showcase_log(base: &CareerPlan, seed: u64, path: &Path) -> Result<()> {
    let run = CareerTester::new(false)
        .run(base, seed)
        .with_context(|| format!("showcase career for seed {seed} failed"))?;
    let mut file = BufWriter::new(
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
    );
    writeln!(file, "{}", run.career.narration().export_text())?;
    file.flush()?;
    println!(
        "📝 Exported {} log entries to {}",
        run.summary.narration_entries,
        path.display()
    );
    Ok(())
}

fn write_reports(
    args: &Args,
    results: &[logic::ScenarioResult],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => {
            logic::reports::generate_json_report(&mut output_target, results)?;
        }
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Gridiron Career Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
