use anyhow::{anyhow, bail, Context, Result};

use crate::model::horizon::{Granularity, Horizon};
use crate::service::ForecastRequest;

pub const ALL_SYMBOLS: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Symbol(String),
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastArgs {
    pub target: Target,
    pub mode: Granularity,
    pub value: i64,
    pub series: bool,
    pub confidence: bool,
}

impl ForecastArgs {
    /// Expand the target into one request per symbol, in `symbols` order for `all`.
    pub fn requests(&self, symbols: &[String]) -> Vec<ForecastRequest> {
        let names: Vec<String> = match &self.target {
            Target::Symbol(s) => vec![s.clone()],
            Target::All => symbols.to_vec(),
        };
        names
            .into_iter()
            .map(|s| {
                ForecastRequest::new(s, self.mode, self.value)
                    .with_confidence(self.confidence)
                    .with_series(self.series)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Forecast(ForecastArgs),
    ListSymbols,
    Help,
}

impl CliCommand {
    /// Only `help` runs without loading config or opening the log file.
    pub fn needs_config(&self) -> bool {
        !matches!(self, Self::Help)
    }
}

pub fn print_usage() {
    println!("coin-forecast");
    println!("usage:");
    println!("  coin-forecast <SYMBOL|all> <daily|hourly> <N> [--series] [--no-confidence]");
    println!("  coin-forecast <SYMBOL|all> --days <D> --hours <H> [--series] [--no-confidence]");
    println!("  coin-forecast symbols");
    println!("  coin-forecast help");
}

pub fn parse_args(args: &[String]) -> Result<CliCommand> {
    let first = match args.first() {
        Some(a) => a.as_str(),
        None => return Ok(CliCommand::Help),
    };
    match first {
        "help" | "--help" | "-h" => return Ok(CliCommand::Help),
        "symbols" => return Ok(CliCommand::ListSymbols),
        _ => {}
    }

    let target = if first.eq_ignore_ascii_case(ALL_SYMBOLS) {
        Target::All
    } else {
        Target::Symbol(first.to_string())
    };

    let mut positional: Vec<&str> = Vec::new();
    let mut days: Option<i64> = None;
    let mut hours: Option<i64> = None;
    let mut series = false;
    let mut confidence = true;

    let mut it = args[1..].iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--series" => series = true,
            "--no-confidence" => confidence = false,
            "--days" => days = Some(parse_count(it.next(), "--days")?),
            "--hours" => hours = Some(parse_count(it.next(), "--hours")?),
            flag if flag.starts_with("--") => bail!("unknown flag `{}`", flag),
            other => positional.push(other),
        }
    }

    let (mode, value) = match (days, hours, positional.as_slice()) {
        (None, None, [mode, value]) => {
            let mode: Granularity = mode.parse()?;
            let value = value
                .parse::<i64>()
                .with_context(|| format!("horizon `{}` is not an integer", value))?;
            (mode, value)
        }
        (d, h, []) if d.is_some() || h.is_some() => {
            let horizon = Horizon::from_days_hours(d.unwrap_or(0), h.unwrap_or(0))?;
            (horizon.granularity(), horizon.steps() as i64)
        }
        _ => bail!("expected `<daily|hourly> <N>` or `--days D --hours H`"),
    };

    Ok(CliCommand::Forecast(ForecastArgs {
        target,
        mode,
        value,
        series,
        confidence,
    }))
}

fn parse_count(raw: Option<&String>, flag: &str) -> Result<i64> {
    let raw = raw.ok_or_else(|| anyhow!("`{}` requires a value", flag))?;
    raw.parse::<i64>()
        .with_context(|| format!("`{}` value `{}` is not an integer", flag, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positional_form() {
        let cmd = parse_args(&args(&["btc", "hourly", "12", "--series"])).unwrap();
        let CliCommand::Forecast(f) = cmd else {
            panic!("expected forecast command");
        };
        assert_eq!(f.target, Target::Symbol("btc".to_string()));
        assert_eq!(f.mode, Granularity::Hourly);
        assert_eq!(f.value, 12);
        assert!(f.series);
        assert!(f.confidence);
    }

    #[test]
    fn days_flag_wins_over_hours() {
        let cmd = parse_args(&args(&["all", "--hours", "5", "--days", "3"])).unwrap();
        let CliCommand::Forecast(f) = cmd else {
            panic!("expected forecast command");
        };
        assert_eq!(f.target, Target::All);
        assert_eq!(f.mode, Granularity::Daily);
        assert_eq!(f.value, 3);
    }

    #[test]
    fn zero_horizon_is_passed_through_for_service_validation() {
        let cmd = parse_args(&args(&["ETH", "daily", "0"])).unwrap();
        let CliCommand::Forecast(f) = cmd else {
            panic!("expected forecast command");
        };
        assert_eq!(f.value, 0);
    }

    #[test]
    fn rejects_unknown_mode_and_flags() {
        assert!(parse_args(&args(&["BTC", "weekly", "2"])).is_err());
        assert!(parse_args(&args(&["BTC", "daily", "2", "--verbose"])).is_err());
        assert!(parse_args(&args(&["BTC", "--days", "0", "--hours", "0"])).is_err());
    }

    #[test]
    fn help_skips_config() {
        for raw in [&[][..], &["help"][..], &["-h"][..]] {
            let cmd = parse_args(&args(raw)).unwrap();
            assert_eq!(cmd, CliCommand::Help);
            assert!(!cmd.needs_config());
        }
        assert!(parse_args(&args(&["symbols"])).unwrap().needs_config());
        assert!(parse_args(&args(&["BTC", "daily", "1"])).unwrap().needs_config());
    }

    #[test]
    fn all_expands_in_table_order() {
        let f = ForecastArgs {
            target: Target::All,
            mode: Granularity::Daily,
            value: 1,
            series: false,
            confidence: false,
        };
        let reqs = f.requests(&["BTC".to_string(), "ETH".to_string()]);
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[1].symbol, "ETH");
        assert!(!reqs[0].include_confidence);
    }
}
