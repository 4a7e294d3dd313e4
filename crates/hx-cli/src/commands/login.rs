use crate::config::Config;
use anyhow::Result;
use clap::Args;
use dialoguer::{Input, Password};
use hx_client::Session;

#[derive(Args, Debug)]
pub struct LoginCommand {
  /// Force signing in again and refreshing the saved token
  #[arg(short, long)]
  pub force: bool,

  /// Request a token that does not expire in 24 hours
  #[arg(short, long)]
  pub no_expiration: bool,
}

/// Load the cached token, or log in interactively and cache a fresh one
pub async fn ensure_session(config: &Config) -> Result<Session> {
  match Session::load(&config.base_url, config.token_file.as_deref()) {
    Ok(session) => Ok(session),
    Err(_) => interactive_login(config, false, false).await,
  }
}

/// Prompt for credentials, request a token, and save it
pub async fn interactive_login(
  config: &Config,
  force: bool,
  no_expiration: bool,
) -> Result<Session> {
  let username: String = Input::new().with_prompt("Enter username").interact_text()?;
  let password = Password::new().with_prompt("Enter password").interact()?;

  let session =
    Session::login(&config.base_url, &username, &password, no_expiration, force).await?;
  let path = session.save(config.token_file.as_deref())?;
  println!("Success! Saved token to {}", path.display());
  Ok(session)
}

pub async fn execute(cmd: LoginCommand, config: Config) -> Result<()> {
  if !cmd.force {
    if let Ok(_session) = Session::load(&config.base_url, config.token_file.as_deref()) {
      println!("Already logged in. Pass --force to refresh the saved token.");
      return Ok(());
    }
  }
  interactive_login(&config, cmd.force, cmd.no_expiration).await?;
  Ok(())
}
