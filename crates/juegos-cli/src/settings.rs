//! Settings for the `juegos` binary.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// A user seeded into the store at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserSeed {
  pub name: String,
  pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default = "default_users")]
  pub users:      Vec<UserSeed>,
}

fn default_store_path() -> PathBuf { PathBuf::from("juegos.db") }

fn default_users() -> Vec<UserSeed> {
  vec![
    UserSeed { name: "Pablo".into(), slug: "pablo".into() },
    UserSeed { name: "Iñaki".into(), slug: "inaki".into() },
  ]
}

impl Settings {
  /// Layer `JUEGOS_*` environment variables over the optional TOML file at
  /// `path`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("JUEGOS"))
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let settings = Settings::load(Path::new("/nonexistent/juegos.toml")).unwrap();
    assert_eq!(settings.users, default_users());
    assert!(settings.store_path.ends_with("juegos.db"));
  }

  #[test]
  fn file_overrides_defaults() {
    let dir = std::env::temp_dir().join(format!("juegos-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("juegos.toml");
    std::fs::write(
      &path,
      "store_path = \"/tmp/partidas.db\"\n\n[[users]]\nname = \"Ana\"\nslug = \"ana\"\n",
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.store_path, PathBuf::from("/tmp/partidas.db"));
    assert_eq!(settings.users, [UserSeed { name: "Ana".into(), slug: "ana".into() }]);

    std::fs::remove_dir_all(&dir).unwrap();
  }

  #[test]
  fn tilde_expands_to_home() {
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/juegos.db")), PathBuf::from(home).join("juegos.db"));
    }
    assert_eq!(expand_tilde(Path::new("/srv/juegos.db")), PathBuf::from("/srv/juegos.db"));
  }
}
