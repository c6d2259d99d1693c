//! `juegos`, the command line front end for the Juegos game tracker.
//!
//! Every command prints its result as JSON on stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! juegos login pablo
//! juegos played pablo --rawg-id 3328 --name "The Witcher 3" --genre RPG --rating 9.5
//! juegos achievements pablo
//! juegos competition --period month
//! ```

mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use juegos_core::library::{GameList, NewGame, Period, Placement, RankingOrder, Rating};
use juegos_store_sqlite::SqliteStore;
use serde::Serialize;
use serde_json::json;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "juegos", version, about = "Personal game tracker with achievements")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "juegos.toml", env = "JUEGOS_CONFIG")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List users.
  Users,
  /// Record a game as played, or update an existing played entry.
  Played {
    user:    String,
    #[command(flatten)]
    game:    GameArgs,
    #[command(flatten)]
    verdict: VerdictArgs,
  },
  /// Add a game to the pending list.
  Pending {
    user: String,
    #[command(flatten)]
    game: GameArgs,
  },
  /// Add a game to the in-progress list.
  Playing {
    user: String,
    #[command(flatten)]
    game: GameArgs,
  },
  /// Move an already cached game to another list.
  Move {
    user:    String,
    game_id: i64,
    list:    GameList,
    #[command(flatten)]
    verdict: VerdictArgs,
  },
  /// Mark a played game as completed (`true`) or abandoned (`false`).
  SetCompleted {
    user:      String,
    game_id:   i64,
    #[arg(action = clap::ArgAction::Set)]
    completed: bool,
  },
  /// Remove a game from a list.
  Remove {
    user:    String,
    game_id: i64,
    list:    GameList,
  },
  /// First login: grants the entry achievement.
  Login { user: String },
  /// Every achievement with unlock time or progress.
  Achievements { user: String },
  /// The three lists of a user.
  Library { user: String },
  /// Played games of a user, best first.
  Ranking {
    user:  String,
    #[arg(long, default_value = "rating")]
    order: RankingOrder,
  },
  /// Played games per user in a period.
  Competition {
    #[arg(long, default_value = "all")]
    period: Period,
  },
}

/// Catalog metadata for a game.
#[derive(Args, Debug)]
struct GameArgs {
  #[arg(long)]
  rawg_id:    i64,
  #[arg(long)]
  name:       String,
  #[arg(long)]
  released:   Option<String>,
  #[arg(long)]
  image_url:  Option<String>,
  #[arg(long = "genre")]
  genres:     Vec<String>,
  #[arg(long = "platform")]
  platforms:  Vec<String>,
  #[arg(long)]
  metacritic: Option<i64>,
}

impl From<GameArgs> for NewGame {
  fn from(a: GameArgs) -> Self {
    NewGame {
      rawg_id:    a.rawg_id,
      name:       a.name,
      released:   a.released,
      image_url:  a.image_url,
      genres:     a.genres,
      platforms:  a.platforms,
      metacritic: a.metacritic,
    }
  }
}

/// Rating and outcome of a played game.
#[derive(Args, Debug)]
struct VerdictArgs {
  /// Rating between 0 and 10.
  #[arg(long)]
  rating:    Option<f64>,
  #[arg(long)]
  opinion:   Option<String>,
  /// Record the game as abandoned instead of completed.
  #[arg(long)]
  abandoned: bool,
}

impl VerdictArgs {
  fn into_played(self) -> anyhow::Result<Placement> {
    let rating = self.rating.context("--rating is required for played games")?;
    Ok(Placement::Played {
      rating:    Rating::new(rating).context("invalid rating")?,
      opinion:   self.opinion,
      completed: !self.abandoned,
    })
  }

  fn into_placement(self, list: GameList) -> anyhow::Result<Placement> {
    match list {
      GameList::Played => self.into_played(),
      GameList::Pending => Ok(Placement::Pending),
      GameList::InProgress => Ok(Placement::InProgress),
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs on stderr keep stdout parseable.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  for seed in &settings.users {
    store
      .ensure_user(&seed.name, &seed.slug)
      .await
      .with_context(|| format!("failed to seed user {:?}", seed.slug))?;
  }

  run(&store, cli.command).await
}

async fn run(store: &SqliteStore, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Users => print(&store.list_users().await.context("failed to list users")?),
    Command::Played { user, game, verdict } => {
      let placement = verdict.into_played()?;
      let placed = store
        .record(&user, &game.into(), placement)
        .await
        .context("failed to record played game")?;
      print(&placed)
    }
    Command::Pending { user, game } => {
      let placed = store
        .record(&user, &game.into(), Placement::Pending)
        .await
        .context("failed to add pending game")?;
      print(&placed)
    }
    Command::Playing { user, game } => {
      let placed = store
        .record(&user, &game.into(), Placement::InProgress)
        .await
        .context("failed to add in-progress game")?;
      print(&placed)
    }
    Command::Move { user, game_id, list, verdict } => {
      let placement = verdict.into_placement(list)?;
      let placed = store
        .move_game(&user, game_id, placement)
        .await
        .with_context(|| format!("failed to move game {game_id} to {list}"))?;
      print(&placed)
    }
    Command::SetCompleted { user, game_id, completed } => {
      let outcome = store
        .set_completed(&user, game_id, completed)
        .await
        .context("failed to set completion flag")?;
      print(&outcome)
    }
    Command::Remove { user, game_id, list } => {
      let outcome = store
        .remove(&user, game_id, list)
        .await
        .with_context(|| format!("failed to remove game {game_id} from {list}"))?;
      print(&outcome)
    }
    Command::Login { user } => {
      print(&store.first_login(&user).await.context("failed to record first login")?)
    }
    Command::Achievements { user } => {
      let achievements =
        store.achievements(&user).await.context("failed to list achievements")?;
      print(&json!({ "achievements": achievements }))
    }
    Command::Library { user } => {
      print(&store.library(&user).await.context("failed to read library")?)
    }
    Command::Ranking { user, order } => {
      print(&store.ranking(&user, order).await.context("failed to read ranking")?)
    }
    Command::Competition { period } => {
      print(&store.competition(period).await.context("failed to read competition")?)
    }
  }
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
  let out = serde_json::to_string_pretty(value).context("failed to serialise output")?;
  println!("{out}");
  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_is_well_formed() { Cli::command().debug_assert(); }

  #[test]
  fn played_requires_a_valid_rating() {
    let cli = Cli::try_parse_from([
      "juegos", "played", "pablo", "--rawg-id", "1", "--name", "Hades", "--genre", "Action",
      "--genre", "Indie", "--rating", "11",
    ])
    .unwrap();
    let Command::Played { game, verdict, .. } = cli.command else { panic!("not played") };
    assert_eq!(NewGame::from(game).genres, ["Action", "Indie"]);
    assert!(verdict.into_played().is_err());
  }

  #[test]
  fn move_parses_list_names() {
    let cli = Cli::try_parse_from(["juegos", "move", "inaki", "7", "jugando"]).unwrap();
    let Command::Move { list, verdict, .. } = cli.command else { panic!("not move") };
    assert_eq!(list, GameList::InProgress);
    assert_eq!(verdict.into_placement(list).unwrap(), Placement::InProgress);

    let cli = Cli::try_parse_from(["juegos", "move", "inaki", "7", "played"]).unwrap();
    let Command::Move { list, verdict, .. } = cli.command else { panic!("not move") };
    assert!(verdict.into_placement(list).is_err());
  }

  #[test]
  fn set_completed_takes_explicit_flag() {
    let cli = Cli::try_parse_from(["juegos", "set-completed", "pablo", "3", "false"]).unwrap();
    assert!(matches!(cli.command, Command::SetCompleted { completed: false, .. }));
  }
}
