use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use resistor_combo::*;

/// Find series and parallel combinations of standard resistors close to a target value
#[derive(Parser, Debug)]
#[command(name = "resistor-combo")]
#[command(version)]
struct Cli {
    /// Target resistance, e.g. 470, 4k7, 10k or 1M
    target: String,

    /// Maximum tolerance in percent
    #[arg(short, long, default_value_t = 5.0)]
    tolerance: f64,

    /// Number of combinations to list for each connection mode
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Order results by `error` or by `size` (number of resistors)
    #[arg(short, long, default_value = "error")]
    sort: SortKey,

    /// Largest number of resistors in a combination
    #[arg(long, default_value_t = 3)]
    max_size: usize,

    /// How many times a single value may be used in a combination
    #[arg(long, default_value_t = 3)]
    multiplicity: usize,

    /// Standard series to draw values from (e3, e6, e12 or e24)
    #[arg(long, default_value = "e12")]
    family: Family,

    /// Number of decades of values, starting at 10Ω
    #[arg(long, default_value_t = DEFAULT_DECADES)]
    decades: u32,

    /// Stop each search after this many candidate combinations
    #[arg(long)]
    budget: Option<u64>,
}

impl Cli {
    /// The target with its tolerance converted from percent to a fraction.
    fn target_spec(&self) -> Result<TargetSpec> {
        TargetSpec::parse(&self.target, self.tolerance / 100.0)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("resistor_combo=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<Report> {
    let target = cli.target_spec()?;
    let rs = cli.family.series(cli.decades)?;

    let mut rcalc = RCalc::new(&rs)
        .max_size(cli.max_size)
        .multiplicity(cli.multiplicity);
    if let Some(budget) = cli.budget {
        rcalc = rcalc.budget(budget);
    }
    rcalc.limits().validate()?;
    debug!(limits = ?rcalc.limits(), values = rs.len(), "calculator configured");

    println!(
        "Target: {} ±{}%, {} values from {}",
        format_ohms(target.ohms()),
        cli.tolerance,
        rs.len(),
        cli.family
    );
    println!("Number of combinations: {}\n", rcalc.combinations());

    rcalc.calc(&target, cli.sort, cli.count)
}

/// Bad input exits with 2, anything else with 1.
fn exit_status(err: &CalcError) -> u8 {
    if err.is_validation() {
        2
    } else {
        1
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(err) if err.is_validation() => {
            eprintln!("✗ {}", err);
            ExitCode::from(exit_status(&err))
        }
        Err(err) => {
            error!(%err, "calculation failed");
            eprintln!("An error occurred");
            ExitCode::from(exit_status(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("resistor-combo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = cli(&["4k7"]);
        assert_eq!(cli.target, "4k7");
        assert_eq!(cli.tolerance, 5.0);
        assert_eq!(cli.count, 10);
        assert_eq!(cli.sort, SortKey::ByError);
        assert_eq!(cli.max_size, 3);
        assert_eq!(cli.multiplicity, 3);
        assert_eq!(cli.family, Family::E12);
        assert_eq!(cli.decades, DEFAULT_DECADES);
        assert_eq!(cli.budget, None);
    }

    #[test]
    fn tolerance_is_given_in_percent() {
        let spec = cli(&["1k", "-t", "5"]).target_spec().unwrap();
        assert_eq!(spec.ohms(), 1000.0);
        assert_eq!(spec.tolerance(), 0.05);

        let spec = cli(&["470", "--tolerance", "0.5"]).target_spec().unwrap();
        assert_eq!(spec.tolerance(), 0.005);
    }

    #[test]
    fn parses_sort_and_family() {
        let cli = cli(&["1k", "-s", "size", "--family", "E24", "-n", "3", "--budget", "500"]);
        assert_eq!(cli.sort, SortKey::BySize);
        assert_eq!(cli.family, Family::E24);
        assert_eq!(cli.count, 3);
        assert_eq!(cli.budget, Some(500));
    }

    #[test]
    fn rejects_bad_arguments() {
        for args in [
            vec!["resistor-combo", "1k", "--family", "e96"],
            vec!["resistor-combo", "1k", "-s", "colour"],
            vec!["resistor-combo", "1k", "-t", "five"],
            vec!["resistor-combo"],
        ] {
            assert!(Cli::try_parse_from(args.clone()).is_err(), "{:?}", args);
        }
    }

    #[test]
    fn bad_input_maps_to_exit_status_two() {
        let cases: [&[&str]; 6] = [
            &["0"],
            &["abc"],
            &["1k", "-t", "0"],
            &["1k", "--decades", "0"],
            &["1k", "-n", "0"],
            &["1k", "--max-size", "1000000000000"],
        ];
        for args in cases {
            let err = run(&cli(args)).unwrap_err();
            assert!(err.is_validation(), "{:?} gave {:?}", args, err);
            assert_eq!(exit_status(&err), 2);
        }
        assert_eq!(exit_status(&CalcError::internal("boom")), 1);
    }

    #[test]
    fn runs_a_calculation() {
        let report = run(&cli(&["1k", "--max-size", "2", "-n", "3"])).unwrap();
        assert_eq!(report.series.len(), 3);
        assert_eq!(report.series.best().unwrap().description, "1.0kΩ");
        assert_eq!(report.parallel.summary().as_deref(), Some("Exact match"));
    }
}
