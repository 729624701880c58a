use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use tracing::Level;

use std::io::{stdin, stdout, Write};
use std::time::Instant;

use konane_ai::{
    agent::{Player, RandomAgent, SearchAgent},
    board::Coord,
    config::{GameConfig, SearchConfig},
    game::{Game, GameStatus},
    moves::Move,
    solver::{Algorithm, SearchStats, Solver},
    Role, DEFAULT_DEPTH, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};

#[derive(Parser)]
#[command(name = "konane")]
#[command(version, about = "Play Konane against a minimax search agent", long_about = None)]
struct Cli {
    /// Log more detail, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer in the terminal
    Play(PlayArgs),

    /// Pit the computer against a random player over many games
    Bench(BenchArgs),
}

#[derive(Args)]
struct BoardArgs {
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,
}

#[derive(Args)]
struct SearchArgs {
    /// Plies the computer looks ahead
    #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// Use plain minimax instead of alpha-beta pruning
    #[arg(long)]
    naive: bool,

    /// Search the root moves in parallel
    #[arg(long)]
    parallel: bool,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.depth,
            algorithm: if self.naive {
                Algorithm::Naive
            } else {
                Algorithm::AlphaBeta
            },
            parallel: self.parallel,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum Opener {
    Computer,
    User,
}

#[derive(Args)]
struct PlayArgs {
    #[command(flatten)]
    board: BoardArgs,

    #[command(flatten)]
    search: SearchArgs,

    /// Who makes the first move
    #[arg(long, value_enum, default_value_t = Opener::User)]
    first: Opener,
}

#[derive(Args)]
struct BenchArgs {
    #[command(flatten)]
    board: BoardArgs,

    #[command(flatten)]
    search: SearchArgs,

    /// Number of games to play
    #[arg(short, long, default_value_t = 20)]
    games: usize,

    /// Seed for the random player
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Play(args) => play(args),
        Commands::Bench(args) => bench(args),
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let game_config = GameConfig {
        width: args.board.width,
        height: args.board.height,
        // the computer always searches as the maximizer
        first: match args.first {
            Opener::Computer => Role::Max,
            Opener::User => Role::Min,
        },
    };
    let search_config = args.search.config();
    search_config.validate()?;

    let mut game = Game::new(game_config)?;
    let mut computer = SearchAgent::new(Solver::new(&search_config));

    println!("Welcome to Konane\n");
    println!(
        "You play {}. Enter cells as x,y: a single cell in the first two rounds, then the piece to move and where it lands.\n",
        game.color_of(Role::Min).symbol()
    );

    loop {
        game.board().display()?;

        match game.status() {
            GameStatus::Playing => {
                let next_move = match game.to_move() {
                    Role::Max => {
                        println!("Computer is thinking...");
                        stdout().flush()?;
                        match computer.choose(&game.state()) {
                            Some(mv) => {
                                if let Some(result) = computer.last_result() {
                                    println!(
                                        "Computer plays {} (score {}, {} positions evaluated)",
                                        mv, result.value, result.stats.evaluations
                                    );
                                }
                                mv
                            }
                            None => {
                                println!("Computer has no move left.");
                                break;
                            }
                        }
                    }
                    Role::Min => match read_move(&game) {
                        Ok(mv) => mv,
                        Err(err) => {
                            println!("{}", err);
                            // ask for the move again
                            continue;
                        }
                    },
                };

                if let Err(err) = game.play_checked(next_move) {
                    println!("{}", err);
                    continue;
                }
            }
            GameStatus::Won(Role::Min) => {
                println!("Congratulations! You win!");
                break;
            }
            GameStatus::Won(Role::Max) => {
                println!("Oops... You lose.");
                break;
            }
        }
    }

    print_stats(&computer.totals());
    Ok(())
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    stdout().flush()?;
    let mut buffer = String::new();
    stdin().read_line(&mut buffer)?;
    Ok(buffer)
}

fn parse_coord(input: &str, game: &Game) -> Result<Coord> {
    let parts = input
        .split(',')
        .map(|part| part.trim().parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| anyhow!("'{}' is not a pair of numbers", input.trim()))?;

    match parts[..] {
        [x, y] if (1..=game.board().width()).contains(&x)
            && (1..=game.board().height()).contains(&y) =>
        {
            Ok(Coord::new(x, y))
        }
        [_, _] => Err(anyhow!("position {} is not on the board", input.trim())),
        _ => Err(anyhow!("expected a position as x,y, got '{}'", input.trim())),
    }
}

fn read_move(game: &Game) -> Result<Move> {
    if game.round() <= 2 {
        let at = parse_coord(&read_line("Choose a piece to remove: ")?, game)?;
        return Ok(Move::Remove(at));
    }
    let from = parse_coord(&read_line("Choose your initial position: ")?, game)?;
    let to = parse_coord(&read_line("Choose your destination: ")?, game)?;
    Ok(Move::Jump { from, to })
}

fn bench(args: BenchArgs) -> Result<()> {
    let game_config = GameConfig {
        width: args.board.width,
        height: args.board.height,
        first: Role::Max,
    };
    game_config.validate()?;
    let search_config = args.search.config();
    search_config.validate()?;

    let start = Instant::now();
    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Playing games: {bar:40.cyan/blue} {pos}/{len} {msg} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let mut computer = SearchAgent::new(Solver::new(&search_config));
    let mut random = match args.seed {
        Some(seed) => RandomAgent::seeded(seed),
        None => RandomAgent::new(),
    };

    let mut wins = 0;
    for game_number in 0..args.games {
        // alternate who opens so both colours get played
        let config = GameConfig {
            first: if game_number % 2 == 0 { Role::Max } else { Role::Min },
            ..game_config
        };
        let mut game = Game::new(config)?;
        if game.play_out(&mut computer, &mut random)? == Role::Max {
            wins += 1;
        }
        progress.inc(1);
        progress.set_message(&format!("({} won)", wins));
    }
    progress.finish();

    println!(
        "{} won {} of {} games against {} in {}",
        computer.name(),
        wins,
        args.games,
        random.name(),
        HumanDuration(start.elapsed())
    );
    print_stats(&computer.totals());
    Ok(())
}

fn print_stats(stats: &SearchStats) {
    println!(
        "Positions evaluated: {}, average branching factor: {:.2}, cutoffs: {}",
        stats.evaluations,
        stats.average_branching().unwrap_or(0.0),
        stats.cutoffs
    );
}
