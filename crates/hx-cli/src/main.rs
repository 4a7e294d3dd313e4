/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

mod commands;
mod config;
mod flatten;
mod spreadsheet;

use commands::{docs, export, login, metadata, results, stream, train, upload};

#[derive(Parser, Debug)]
#[command(author, version, about = "Command line interface for the Crimson Hexagon ForSight API")]
#[command(name = "hx")]
#[command(propagate_version = true)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Verbose output
  #[arg(short, long, global = true)]
  verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
  /// Get an API token and save it for later runs
  Login(login::LoginCommand),

  /// Get monitor results for one or more metrics
  Results(results::ResultsCommand),

  /// Get metadata for account teams, monitors, and geography
  Metadata(metadata::MetadataCommand),

  /// Upload a CSV spreadsheet as custom content
  Upload(upload::UploadCommand),

  /// Upload a CSV spreadsheet of training examples for an opinion monitor
  Train(train::TrainCommand),

  /// Export monitor posts as JSON lines or to a CSV spreadsheet
  Export(export::ExportCommand),

  /// Stream posts in real time, stopping after a maximum count
  StreamPosts(stream::StreamPostsCommand),

  /// Get the API endpoint documentation as JSON
  ApiDocs(docs::ApiDocsCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
  // Load environment variables
  dotenv().ok();

  // Parse CLI arguments
  let cli = Cli::parse();

  // Initialize logging
  let log_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt().with_env_filter(log_level).init();

  // Load configuration
  let config = config::Config::from_env()?;

  // Execute command
  match cli.command {
    Commands::Login(cmd) => login::execute(cmd, config).await?,
    Commands::Results(cmd) => results::execute(cmd, config).await?,
    Commands::Metadata(cmd) => metadata::execute(cmd, config).await?,
    Commands::Upload(cmd) => upload::execute(cmd, config).await?,
    Commands::Train(cmd) => train::execute(cmd, config).await?,
    Commands::Export(cmd) => export::execute(cmd, config).await?,
    Commands::StreamPosts(cmd) => stream::execute(cmd, config).await?,
    Commands::ApiDocs(cmd) => docs::execute(cmd, config).await?,
  }

  Ok(())
}
