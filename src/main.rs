use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shuttle_stats::calculate::{
    aggregate_pairwise, build_timelines, pair_leaderboard, resolve_roster, solo_leaderboard,
    StatsReport,
};
use shuttle_stats::config::AppConfig;
use shuttle_stats::generate::{generate_rows, write_rows, MockConfig};
use shuttle_stats::ingest::load_games;
use shuttle_stats::render::{render_dashboard, Dashboard};
use shuttle_stats::storage::StorageConfig;
use shuttle_stats::{format_optional, parse_date, DatasetFingerprint, GameLog, RankingMetric, Roster};

#[derive(Parser)]
#[command(name = "shuttle-stats")]
#[command(about = "Badminton head-to-head statistics and dashboard generator")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./shuttle-stats.toml")]
    config: PathBuf,

    /// Game results CSV (overrides the config file)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute all statistics and write the dashboard
    Render {
        /// Output directory (overrides the config file)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Dashboard title (overrides the config file)
        #[arg(long)]
        title: Option<String>,
    },

    /// Print a ranked leaderboard
    Leaderboard {
        /// total-games, win-percentage, avg-point-diff or avg-games-per-day
        #[arg(long, default_value = "win-percentage")]
        metric: String,

        /// Rank pairs instead of individual players
        #[arg(long)]
        pairs: bool,

        /// Show only the top N entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print one player's record against every opponent
    HeadToHead {
        /// Player name, as written in the CSV
        player: String,
    },

    /// Print one player's daily series
    Timeline {
        /// Player name, as written in the CSV
        player: String,

        /// First day to print (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last day to print (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// Write a random mock dataset
    Generate {
        /// Destination CSV
        #[arg(long, default_value = "./data/games.csv")]
        output: PathBuf,

        /// Number of games
        #[arg(long, default_value = "1000")]
        games: usize,

        /// Probability that a game is singles
        #[arg(long, default_value = "0.75")]
        singles_prob: f64,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = AppConfig::load_or_default(&cli.config);
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|c| c.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::info!("Starting shuttle-stats v{}", env!("CARGO_PKG_VERSION"));

    let mut config =
        loaded.with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if cli.config.exists() {
        tracing::info!("Using config {:?}", cli.config);
    } else {
        tracing::warn!("Config file {:?} not found, using defaults", cli.config);
    }
    if let Some(input) = cli.input {
        config.input = input;
    }

    match cli.command {
        Commands::Render { output_dir, title } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            if let Some(title) = title {
                config.title = title;
            }
            config.validate().context("Invalid configuration")?;
            run_render(&config)
        }

        Commands::Leaderboard {
            metric,
            pairs,
            limit,
        } => {
            let metric: RankingMetric = match metric.parse() {
                Ok(m) => m,
                Err(e) => bail!(e),
            };
            run_leaderboard(&config, metric, pairs, limit)
        }

        Commands::HeadToHead { player } => run_head_to_head(&config, &player),

        Commands::Timeline { player, from, to } => {
            let from = match from {
                Some(s) => Some(parse_date(&s).with_context(|| {
                    format!("Invalid --from date (expected YYYY-MM-DD): {}", s)
                })?),
                None => None,
            };
            let to = match to {
                Some(s) => Some(parse_date(&s).with_context(|| {
                    format!("Invalid --to date (expected YYYY-MM-DD): {}", s)
                })?),
                None => None,
            };
            run_timeline(&config, &player, from, to)
        }

        Commands::Generate {
            output,
            games,
            singles_prob,
            seed,
        } => {
            let mut mock = MockConfig {
                games,
                singles_probability: singles_prob,
                seed,
                ..MockConfig::default()
            };
            if !config.roster.players.is_empty() {
                mock.players = config.roster.players.clone();
            }
            run_generate(&output, &mock)
        }
    }
}

/// Load the CSV named in the config and resolve the roster.
fn load_inputs(config: &AppConfig) -> Result<(GameLog, DatasetFingerprint, Roster)> {
    let (log, fingerprint) = load_games(&config.input)
        .with_context(|| format!("Failed to load games from {:?}", config.input))?;
    let roster = resolve_roster(&log, &config.roster.players);
    tracing::info!("Roster has {} players", roster.len());
    Ok((log, fingerprint, roster))
}

fn find_player<'a>(roster: &'a Roster, name: &str) -> Result<&'a shuttle_stats::Player> {
    match roster.get(name.trim()) {
        Some(player) => Ok(player),
        None => bail!("Unknown player: {}", name),
    }
}

fn run_render(config: &AppConfig) -> Result<()> {
    let (log, fingerprint, roster) = load_inputs(config)?;

    let report = StatsReport::compute(&log, &roster, config.timeline.rolling_window_days)
        .context("Failed to compute statistics")?;
    let dashboard = Dashboard::new(&config.title, fingerprint, report, &log);
    let html = render_dashboard(&dashboard).context("Failed to render dashboard")?;

    let storage = StorageConfig::new(config.output_dir.clone());
    let page = storage.write_dashboard(&html)?;
    storage.write_stats(&dashboard)?;
    storage.write_games(log.games())?;

    println!("\n=== Dashboard ===");
    println!("Singles games:    {}", dashboard.report.singles_games);
    println!("Doubles games:    {}", dashboard.report.doubles_games);
    println!("Players:          {}", dashboard.report.players.len());
    println!("Written to:       {}", page.display());
    Ok(())
}

fn run_leaderboard(
    config: &AppConfig,
    metric: RankingMetric,
    pairs: bool,
    limit: Option<usize>,
) -> Result<()> {
    let (log, _, roster) = load_inputs(config)?;
    let table = aggregate_pairwise(&log, &roster).context("Failed to aggregate games")?;
    let limit = limit.unwrap_or(usize::MAX);

    if pairs {
        let board = pair_leaderboard(&table, &log, metric);
        println!("\n=== Pair leaderboard by {} ===", metric);
        println!(
            "{:>4}  {:<24} {:<24} {:>6} {:>7} {:>7} {:>9} {:>8}",
            "Rank", "Player 1", "Player 2", "Games", "Record", "Win %", "Avg diff", "Per day"
        );
        for entry in board.entries.iter().take(limit) {
            println!(
                "{:>4}  {:<24} {:<24} {:>6} {:>7} {:>7} {:>9} {:>8}",
                entry.rank,
                entry.player1.name(),
                entry.player2.name(),
                entry.total_games,
                entry.record,
                format_optional(entry.win_percentage, 1),
                format_optional(entry.avg_point_diff, 1),
                format_optional(entry.avg_games_per_day, 2),
            );
        }
        if board.is_empty() {
            println!("(no singles games between any pair)");
        }
    } else {
        let board = solo_leaderboard(&table, &log, metric);
        println!("\n=== Leaderboard by {} ===", metric);
        println!(
            "{:>4}  {:<24} {:>6} {:>4} {:>4} {:>7} {:>9} {:>8}",
            "Rank", "Player", "Games", "W", "L", "Win %", "Avg diff", "Per day"
        );
        for entry in board.entries.iter().take(limit) {
            println!(
                "{:>4}  {:<24} {:>6} {:>4} {:>4} {:>7} {:>9} {:>8}",
                entry.rank,
                entry.player.name(),
                entry.total_games,
                entry.wins,
                entry.losses,
                format_optional(entry.win_percentage, 1),
                format_optional(entry.avg_point_diff, 1),
                format_optional(entry.avg_games_per_day, 2),
            );
        }
        if board.is_empty() {
            println!("(no singles games)");
        }
    }

    Ok(())
}

fn run_head_to_head(config: &AppConfig, name: &str) -> Result<()> {
    let (log, _, roster) = load_inputs(config)?;
    let player = find_player(&roster, name)?;
    let table = aggregate_pairwise(&log, &roster).context("Failed to aggregate games")?;

    println!("\n=== {} head-to-head ===", player);
    println!(
        "{:<24} {:>7} {:>6} {:>6} {:>7} {:>9}",
        "Opponent", "Record", "For", "Agst", "Diff", "Win diff"
    );
    for row in table.rows_for(player) {
        if &row.opponent == player {
            continue;
        }
        println!(
            "{:<24} {:>7} {:>6} {:>6} {:>7} {:>9}",
            row.opponent.name(),
            row.record(),
            row.points_for,
            row.points_against,
            row.point_diff().map(|d| format!("{:+}", d)).unwrap_or_else(|| "-".into()),
            row.win_differential().map(|d| format!("{:+}", d)).unwrap_or_else(|| "-".into()),
        );
    }

    Ok(())
}

fn run_timeline(
    config: &AppConfig,
    name: &str,
    from: Option<chrono::NaiveDate>,
    to: Option<chrono::NaiveDate>,
) -> Result<()> {
    let (log, _, roster) = load_inputs(config)?;
    let player = find_player(&roster, name)?.clone();
    let timelines = build_timelines(&log, &roster, config.timeline.rolling_window_days)
        .context("Failed to build timelines")?;

    let Some(timeline) = timelines.players.iter().find(|t| t.player == player) else {
        bail!("No timeline for {}", player);
    };

    println!("\n=== {} over time ===", player);
    println!(
        "Total games: {}  Days played: {}  Avg games/day: {}",
        timeline.total_games,
        timeline.days_played,
        format_optional(timeline.avg_games_per_day, 2)
    );
    println!(
        "{:<10} {:>5} {:>5} {:>6} {:>6} {:>7} {:>8} {:>8} {:>9}",
        "Date", "Games", "Wins", "Cum G", "Cum W", "Win %", "Rolling", "Cum diff", "Avg diff"
    );
    for point in &timeline.points {
        if from.is_some_and(|f| point.date < f) || to.is_some_and(|t| point.date > t) {
            continue;
        }
        println!(
            "{:<10} {:>5} {:>5} {:>6} {:>6} {:>7.1} {:>8} {:>8} {:>9}",
            point.date,
            point.games,
            point.wins,
            point.cumulative_games,
            point.cumulative_wins,
            point.win_percentage,
            format_optional(point.rolling_avg_games, 2),
            point.cumulative_point_diff,
            format_optional(point.avg_point_diff, 1),
        );
    }

    Ok(())
}

fn run_generate(output: &Path, mock: &MockConfig) -> Result<()> {
    let rows = generate_rows(mock).context("Failed to generate games")?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let file = File::create(output).with_context(|| format!("Failed to create {:?}", output))?;
    write_rows(file, &rows).context("Failed to write games")?;

    println!("Wrote {} mock games to {}", rows.len(), output.display());
    Ok(())
}
