//! Handle Forge - username availability sweeper
//!
//! Enumerates short usernames and reports which ones are still free on a site.

use anyhow::Context;
use handle_forge::{
    generate, Charset, CheckConfig, CheckMode, GenerationConfig, HandleForgeError, Result,
    RunReport, Sweeper, Target,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Parsed command line
#[derive(Debug, Default)]
struct CliArgs {
    site: String,
    verbose: bool,
    bulk: bool,
    concurrency: Option<usize>,
    log_dir: Option<PathBuf>,
    generation: GenerationConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    handle_forge::init().context("failed to initialize handle-forge")?;

    let args: Vec<String> = env::args().skip(1).collect();

    // Check for help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(2);
        }
    };

    init_tracing(cli.verbose);

    if let Err(e) = run_sweep(&cli).await {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }

    Ok(())
}

/// `-v` turns on per-candidate debug events; `RUST_LOG` wins when set
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("handle_forge=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-v" | "--verbose" => cli.verbose = true,
            "--bulk" => cli.bulk = true,
            "--min" => cli.generation.min_length = parse_number(arg, iter.next())?,
            "--max" => cli.generation.max_length = parse_number(arg, iter.next())?,
            "--length" => {
                let length = parse_number(arg, iter.next())?;
                cli.generation.min_length = length;
                cli.generation.max_length = length;
            }
            "--cap" => cli.generation.result_cap = parse_number(arg, iter.next())?,
            "--concurrency" => cli.concurrency = Some(parse_number(arg, iter.next())?),
            "--alphabet" => cli.generation.alphabet = flag_value(arg, iter.next())?.chars().collect(),
            "--charset" => cli.generation.alphabet = flag_value(arg, iter.next())?.parse::<Charset>()?.alphabet(),
            "--pattern" => cli.generation.pattern = Some(flag_value(arg, iter.next())?.to_string()),
            "--log-dir" => cli.log_dir = Some(PathBuf::from(flag_value(arg, iter.next())?)),
            flag if flag.starts_with('-') => {
                return Err(HandleForgeError::cli(format!("Unknown option: {}", flag)));
            }
            site => {
                if !cli.site.is_empty() {
                    return Err(HandleForgeError::cli(format!(
                        "Only one site can be checked per run (got '{}' and '{}')",
                        cli.site, site
                    )));
                }
                cli.site = site.to_string();
            }
        }
    }

    if cli.site.is_empty() {
        return Err(HandleForgeError::cli("Must specify a site"));
    }

    Ok(cli)
}

fn flag_value<'a>(flag: &str, value: Option<&'a String>) -> Result<&'a str> {
    value
        .map(String::as_str)
        .ok_or_else(|| HandleForgeError::cli(format!("{} requires a value", flag)))
}

fn parse_number(flag: &str, value: Option<&String>) -> Result<usize> {
    let value = flag_value(flag, value)?;
    value
        .parse()
        .map_err(|_| HandleForgeError::cli(format!("{} expects a number, got '{}'", flag, value)))
}

/// Main sweep workflow
async fn run_sweep(cli: &CliArgs) -> Result<()> {
    let mut config = CheckConfig::from_env()?;
    if cli.bulk {
        config.mode = CheckMode::Bulk;
    }
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = dir.clone();
    }

    // Validate up front so the progress bar knows its length.
    let plan = generate(&cli.generation)?;
    let target = Target::named(&cli.site)?;
    let sweeper = Sweeper::new(target, config)?;

    print_settings(cli, sweeper.config());

    let progress = match plan.search_space() {
        Some(space) if cli.generation.pattern.is_none() => {
            ProgressBar::new(space.min(cli.generation.result_cap as u128) as u64)
        }
        _ => ProgressBar::new_spinner(),
    };
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {pos}/{len} checked {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress.enable_steady_tick(Duration::from_millis(120));

    let report = sweeper
        .run_with_progress(&cli.generation, |verdict| {
            progress.inc(1);
            if !verdict.available {
                return;
            }
            let line = format!("✅ {}", verdict.candidate);
            if progress.is_hidden() {
                println!("{}", line);
            } else {
                progress.println(line);
            }
        })
        .await;
    progress.finish_and_clear();

    print_summary(&report?, sweeper.config());
    Ok(())
}

fn print_settings(cli: &CliArgs, config: &CheckConfig) {
    let generation = &cli.generation;
    println!("🔎 Handle Forge - username availability sweep");
    println!("═══════════════════════════════════════════");
    println!("Site: {}", cli.site);
    println!("Alphabet: {}", generation.alphabet.iter().collect::<String>());
    println!("Length: {}..={}", generation.min_length, generation.max_length);
    if let Some(pattern) = &generation.pattern {
        println!("Pattern: {}", pattern);
    }
    println!("Result Cap: {}", generation.result_cap);
    println!("Mode: {:?}", config.mode);
    println!("Concurrency: {}", config.concurrency);
    println!("Verbose: {}", cli.verbose);
    println!();
}

fn print_summary(report: &RunReport, config: &CheckConfig) {
    println!();
    println!("📈 Summary:");
    println!("   ✅ Available: {}", report.available.len());
    println!("   📊 Total checked: {}", report.checked);
    if report.has_errors() {
        println!("   ⚠️  Issues: {}", report.errors.len());
        for failure in report.errors.iter().take(10) {
            println!("      {} - {}", failure.candidate, failure.error);
        }
        if report.errors.len() > 10 {
            println!("      … and {} more", report.errors.len() - 10);
        }
    }
    println!("   ⏱️  Total time: {:.2}s", report.duration.as_secs_f32());
    if report.metrics.candidates_checked > 0 {
        println!("   📊 Average check time: {:.1}ms", report.metrics.avg_check_time_ms());
    }
    println!(
        "   📝 Log: {}",
        config.log_dir.join(format!("{}.log", report.target)).display()
    );

    println!();
    if report.available.is_empty() {
        println!("😔 No available usernames found. Try a longer length or a wider alphabet.");
    } else {
        println!("🎉 Found {} available username(s)!", report.available.len());
    }
}

/// Print help information
fn print_help() {
    println!("🔎 Handle Forge - username availability sweep");
    println!("═══════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    handle-forge <SITE> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose          Log every check");
    println!("    --length N             Check names of exactly N characters (default: 3)");
    println!("    --min N / --max N      Check a range of lengths");
    println!("    --alphabet STR         Characters to combine (default: a-z)");
    println!("    --charset NAME         letters, alnum or digits");
    println!("    --pattern REGEX        Only check names matching REGEX");
    println!("    --cap N                Stop after N candidates (default: 10000)");
    println!("    --concurrency N        Simultaneous checks (default: 10)");
    println!("    --bulk                 Use the bulk check API (needs NAMECHK_TOKEN)");
    println!("    --log-dir DIR          Where <SITE>.log is written (default: .)");
    println!();
    println!("SITES:");
    println!("    {}", handle_forge::check::registry::known_sites().join(", "));
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    NAMECHK_TOKEN              Bulk check API token");
    println!("    NAMECHK_API_URL            Bulk check API endpoint");
    println!("    HANDLE_FORGE_MODE          probe or bulk");
    println!("    HANDLE_FORGE_CONCURRENCY   Simultaneous checks");
    println!("    HANDLE_FORGE_TIMEOUT_SECS  Per-request timeout");
    println!("    HANDLE_FORGE_LOG_DIR       Log directory");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full_command() {
        let cli = parse_args(&args(&[
            "github", "-v", "--min", "2", "--max", "4", "--alphabet", "xyz", "--pattern", "^x", "--cap", "50",
        ]))
        .unwrap();

        assert_eq!(cli.site, "github");
        assert!(cli.verbose);
        assert_eq!(cli.generation.min_length, 2);
        assert_eq!(cli.generation.max_length, 4);
        assert_eq!(cli.generation.alphabet, vec!['x', 'y', 'z']);
        assert_eq!(cli.generation.pattern.as_deref(), Some("^x"));
        assert_eq!(cli.generation.result_cap, 50);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_args(&args(&[])), Err(HandleForgeError::Cli { .. })));
        assert!(matches!(parse_args(&args(&["github", "--min"])), Err(HandleForgeError::Cli { .. })));
        assert!(matches!(parse_args(&args(&["github", "--cap", "lots"])), Err(HandleForgeError::Cli { .. })));
        assert!(matches!(parse_args(&args(&["github", "gitlab"])), Err(HandleForgeError::Cli { .. })));
        assert!(matches!(
            parse_args(&args(&["github", "--charset", "emoji"])),
            Err(HandleForgeError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_length_sets_both_bounds() {
        let cli = parse_args(&args(&["tumblr", "--length", "5", "--charset", "digits", "--bulk"])).unwrap();
        assert_eq!((cli.generation.min_length, cli.generation.max_length), (5, 5));
        assert_eq!(cli.generation.alphabet.len(), 10);
        assert!(cli.bulk);
    }
}
