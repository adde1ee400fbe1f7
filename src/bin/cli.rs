//! Goalpost CLI - Run backtests and rankings from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use goalpost::backtesting::{
    distinct_leagues, distinct_seasons, filter_by_league, filter_by_roster, filter_by_season,
    order_by_trade, rank_teams, scan_league_markets, simulate, summarize, Market, SeasonMode,
    SimulationConfig, StatsSummary, TradeEntry, Under25Rule,
};
use goalpost::data::{normalize, MatchRecord, Roster};

/// Default data file (relative to project root)
const DEFAULT_DATA_FILE: &str = "data/MAINRAW.csv";

#[derive(Parser)]
#[command(name = "goalpost")]
#[command(author, version, about = "Betting backtest CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the match data CSV
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a staged-capital simulation
    Simulate {
        /// League to backtest
        #[arg(short, long)]
        league: String,

        /// Market: over2.5, under2.5 or under6
        #[arg(short, long)]
        market: String,

        /// Season filter value ("all" disables it)
        #[arg(short, long, default_value = "all")]
        season: String,

        /// Season filter semantics: exact or from
        #[arg(long, default_value = "from")]
        season_mode: String,

        /// Starting capital
        #[arg(long, default_value_t = 1000.0)]
        capital: f64,

        /// Stake percentage of starting capital (0-100)
        #[arg(long, default_value_t = 5.0)]
        stake: f64,

        /// Restrict to the T9 roster of the league
        #[arg(long)]
        t9: bool,

        /// Decide under2.5 from the precomputed flag column instead of
        /// recomputing the goal threshold
        #[arg(long)]
        use_flag: bool,

        /// Print every trade, not just the summary
        #[arg(long)]
        verbose: bool,
    },

    /// Rank teams by market success (selected market and its opposite)
    Rank {
        #[arg(short, long)]
        league: String,

        #[arg(short, long)]
        market: String,

        #[arg(short, long, default_value = "all")]
        season: String,

        #[arg(long)]
        t9: bool,
    },

    /// List distinct seasons and leagues of the dataset
    Filters,

    /// Over/under market scan across all leagues
    Scan,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let records = load_records(&cli.data_file)?;

    match cli.command {
        Commands::Simulate {
            league,
            market,
            season,
            season_mode,
            capital,
            stake,
            t9,
            use_flag,
            verbose,
        } => cmd_simulate(
            &records,
            &league,
            &market,
            &season,
            &season_mode,
            capital,
            stake,
            t9,
            use_flag,
            verbose,
        ),
        Commands::Rank {
            league,
            market,
            season,
            t9,
        } => cmd_rank(&records, &league, &market, &season, t9),
        Commands::Filters => cmd_filters(&records),
        Commands::Scan => cmd_scan(&records),
    }
}

fn load_records(path: &Path) -> Result<Vec<MatchRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {:?}", path))?;
    let records = normalize(&text);
    if records.is_empty() {
        anyhow::bail!("No records found in {:?}", path);
    }
    Ok(records)
}

fn parse_market(name: &str) -> Result<Market> {
    Market::parse(name)
        .with_context(|| format!("Unknown market '{}'; expected over2.5, under2.5 or under6", name))
}

fn parse_season_mode(name: &str) -> Result<SeasonMode> {
    match name {
        "exact" => Ok(SeasonMode::Exact),
        "from" => Ok(SeasonMode::From),
        other => anyhow::bail!("Unknown season mode '{}'; expected exact or from", other),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_simulate(
    records: &[MatchRecord],
    league: &str,
    market: &str,
    season: &str,
    season_mode: &str,
    capital: f64,
    stake: f64,
    t9: bool,
    use_flag: bool,
    verbose: bool,
) -> Result<()> {
    let market = parse_market(market)?;
    let mode = parse_season_mode(season_mode)?;
    if capital <= 0.0 {
        anyhow::bail!("Starting capital must be positive, got {}", capital);
    }
    if !(0.0..=100.0).contains(&stake) {
        anyhow::bail!("Stake percentage must be 0-100, got {}", stake);
    }

    let roster = Roster::default();
    let filtered = filter_by_season(records, mode, season);
    let filtered = filter_by_league(&filtered, league);
    let filtered = filter_by_roster(&filtered, league, &roster, t9);
    let ordered = order_by_trade(&filtered);

    let config = SimulationConfig {
        starting_capital: capital,
        stake_percentage: stake,
        market,
        under25_rule: if use_flag {
            Under25Rule::Flag
        } else {
            Under25Rule::Recompute
        },
    };
    let entries = simulate(&ordered, &config);
    let stats = summarize(&entries, capital);

    if verbose {
        print_trades(&entries);
    }
    print_summary(&config, league, &stats);
    Ok(())
}

fn print_trades(entries: &[TradeEntry]) {
    for entry in entries {
        let outcome = if entry.is_win() {
            "WIN ".green()
        } else {
            "LOSS".red()
        };
        println!(
            "  {:>4} {} odds {:>5.2}  profit {:>9.2}  capital {:>10.2}",
            entry.sequence_number, outcome, entry.odds_used, entry.profit, entry.capital_after
        );
    }
}

fn print_summary(config: &SimulationConfig, league: &str, stats: &StatsSummary) {
    println!("\n{}", "=".repeat(60));
    println!("{}", "BACKTEST RESULTS".bold());
    println!("{}", "=".repeat(60));
    println!("League: {}", league);
    println!("Market: {}", config.market);
    println!("Stake per trade: {:.2}", config.stake_amount());
    println!("{}", "-".repeat(60));
    println!("Total trades: {}", stats.total_games);
    println!("Win rate: {:.1}%", stats.win_rate);
    println!("Starting capital: {:.2}", config.starting_capital);
    println!("Final capital: {:.2}", stats.final_capital);
    println!("Max capital: {:.2}", stats.max_capital);
    println!("Min capital: {:.2}", stats.min_capital);

    let return_line = format!("Total return: {:.2}", stats.total_return);
    let roi_line = format!("ROI: {:.1}%", stats.roi);
    if stats.total_return >= 0.0 {
        println!("{}", return_line.green());
        println!("{}", roi_line.green());
    } else {
        println!("{}", return_line.red());
        println!("{}", roi_line.red());
    }
    println!("{}", "=".repeat(60));
}

fn cmd_rank(
    records: &[MatchRecord],
    league: &str,
    market: &str,
    season: &str,
    t9: bool,
) -> Result<()> {
    let market = parse_market(market)?;
    let roster = Roster::default();

    let selected = rank_teams(records, league, season, market, &roster, t9, false);
    let opposite = rank_teams(records, league, season, market, &roster, t9, true);

    println!("\n{}", "=".repeat(60));
    println!("{} ({})", "TEAM RANKING".bold(), market);
    println!("{}", "=".repeat(60));
    for (i, (label, value)) in selected.labels.iter().zip(&selected.values).enumerate() {
        println!("{:>3}. {:<30} {}", i + 1, label, value);
    }

    println!("\n{} ({})", "OPPOSITE MARKET".bold(), market.opposite());
    println!("{}", "-".repeat(60));
    for (i, (label, value)) in opposite.labels.iter().zip(&opposite.values).enumerate() {
        println!("{:>3}. {:<30} {}", i + 1, label, value);
    }
    Ok(())
}

fn cmd_filters(records: &[MatchRecord]) -> Result<()> {
    println!("{}", "Seasons:".bold());
    for season in distinct_seasons(records) {
        println!("  {}", season);
    }
    println!("{}", "Leagues:".bold());
    for league in distinct_leagues(records) {
        println!("  {}", league);
    }
    Ok(())
}

fn cmd_scan(records: &[MatchRecord]) -> Result<()> {
    let markets = scan_league_markets(records);
    if markets.is_empty() {
        println!("No leagues with valid games found");
        return Ok(());
    }

    println!("\n{}", "=".repeat(72));
    println!("{}", "LEAGUE MARKET SCAN".bold());
    println!("{}", "=".repeat(72));
    println!(
        "{:<24} {:>6} {:>6} {:>6} {:>8} {:>9} {:>10}",
        "Market", "Wins", "Losses", "Games", "Win %", "ROI %", "Income"
    );
    println!("{}", "-".repeat(72));
    for m in &markets {
        let roi = format!("{:>9.1}", m.roi);
        let roi = if m.roi >= 0.0 { roi.green() } else { roi.red() };
        println!(
            "{:<24} {:>6} {:>6} {:>6} {:>8.1} {} {:>10.2}",
            m.id, m.wins, m.losses, m.total_games, m.win_rate, roi, m.income
        );
    }
    println!("{}", "=".repeat(72));
    Ok(())
}
