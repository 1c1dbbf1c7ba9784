use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use websoc::catalog::{parse_courses, Course};
use websoc::{Config, Schedule, ScheduleCourse, Term};

/// A lecture code plus an optional secondary class code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pick {
    lecture: u32,
    secondary: Option<u32>,
}

#[derive(Debug, Default)]
struct Args {
    input: Option<PathBuf>,
    term: Option<String>,
    config: Option<PathBuf>,
    picks: Vec<Pick>,
    strict: bool,
}

fn parse_pick(value: &str) -> Result<Pick> {
    let (lecture, secondary) = match value.split_once(':') {
        Some((lecture, secondary)) => (lecture, Some(secondary)),
        None => (value, None),
    };

    Ok(Pick {
        lecture: lecture
            .parse()
            .with_context(|| format!("Invalid lecture code in --pick {value}"))?,
        secondary: secondary
            .map(str::parse)
            .transpose()
            .with_context(|| format!("Invalid secondary code in --pick {value}"))?,
    })
}

fn parse_args() -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--term" => parsed.term = Some(args.next().context("Missing value for --term")?),
            "--config" => {
                parsed.config = Some(PathBuf::from(
                    args.next().context("Missing value for --config")?,
                ))
            }
            "--pick" => {
                let value = args.next().context("Missing value for --pick")?;
                parsed.picks.push(parse_pick(&value)?);
            }
            "--strict" => parsed.strict = true,
            "-h" | "--help" => {
                eprintln!("{}", include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("Unknown arg: {other}"),
            other => {
                if parsed.input.replace(PathBuf::from(other)).is_some() {
                    bail!("Only one input file may be given");
                }
            }
        }
    }

    Ok(parsed)
}

/// Uses `--term` if given, otherwise the config's release table.
fn resolve_term(args: &Args) -> Result<Term> {
    if let Some(code) = &args.term {
        return Ok(Term::new(code)?);
    }

    let path = args
        .config
        .as_ref()
        .context("Either --term or --config is required")?;
    let config = Config::load(path)?;
    let today = chrono::Local::now().date_naive();
    Ok(config.current_term(today)?.clone())
}

fn build_schedule(courses: &[Course], picks: &[Pick], strict: bool) -> Result<Schedule> {
    let mut schedule = Schedule::new();

    for pick in picks {
        let course = courses
            .iter()
            .find(|course| course.find_class(pick.lecture).is_some())
            .ok_or_else(|| anyhow!("No course offers class {}", pick.lecture))?;
        let chosen = ScheduleCourse::select(course, pick.lecture, pick.secondary)?;

        if strict {
            schedule.try_add_course(chosen)?;
        } else {
            schedule.add_course(chosen);
        }
    }

    Ok(schedule)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("websoc=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let input = args
        .input
        .as_ref()
        .context("Missing input file (see --help)")?;

    let term = resolve_term(&args)?;
    info!(term = %term, input = %input.display(), "Parsing listing");

    let html = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let courses = parse_courses(&html, &term)?;

    let output = if args.picks.is_empty() {
        serde_json::to_string_pretty(&courses)?
    } else {
        let schedule = build_schedule(&courses, &args.picks, args.strict)?;
        serde_json::to_string_pretty(&schedule.view())?
    };
    println!("{output}");

    Ok(())
}
