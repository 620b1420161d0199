use clap::{Parser, Subcommand, ValueEnum};
use snafu::OptionExt;

use crate::config::Config;
use crate::controller::{PassOutcome, Reconciler};
use crate::error::{InvalidRepositorySnafu, Result, SizeUnavailableSnafu};
use crate::github::GithubClient;
use crate::github::constants::{MISSING_TOKEN_TEXT, PRIVATE_LABEL_QUERY, PRIVATE_LABEL_TEXT};
use crate::github::utils::repo::RepoIdentity;
use crate::page::{Indicator, MemoryPage};
use crate::settings::{
    FileStore, MemoryStore, SettingsStore, clear_token, read_token, save_token, set_auto_ask,
};
use crate::utils::{mask_token, read_token_from_stdin};

#[derive(Parser, Debug)]
#[command(name = "reposize", version, about = "Show the disk usage of GitHub repositories")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the size of a repository as the page indicator would show it
    Size {
        /// `owner/name` or a repository URL
        repo: String,
        /// Treat the repository as private (shows the missing-token state without a token)
        #[arg(long)]
        private: bool,
        /// Use this token instead of the stored one
        #[arg(long, env = "REPOSIZE_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Manage the stored access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Whether private repositories prompt for a token
    AutoAsk { state: Toggle },
}

#[derive(Subcommand, Debug)]
pub enum TokenAction {
    /// Store a token; read from stdin when omitted
    Set { token: Option<String> },
    /// Show the stored token, masked
    Show,
    /// Remove the stored token
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

pub async fn run(args: Args, config: Config) -> Result<()> {
    let store = FileStore::new(&config.settings_file);
    match args.command {
        Command::Size {
            repo,
            private,
            token,
        } => {
            let client = GithubClient::new(config.github.clone())?;
            let page = repository_page(&repo, private)?;
            match token {
                Some(token) => {
                    let overrides = MemoryStore::new();
                    save_token(&overrides, &token).await?;
                    show_size(Reconciler::new(page, overrides, client), &config).await
                }
                None => show_size(Reconciler::new(page, store, client), &config).await,
            }
        }
        Command::Token { action } => match action {
            TokenAction::Set { token } => {
                let token = match token {
                    Some(token) => token,
                    None => read_token_from_stdin()?,
                };
                save_token(&store, &token).await?;
                println!("Token saved to {}", store.path().display());
                Ok(())
            }
            TokenAction::Show => {
                match read_token(&store).await? {
                    Some(token) => println!("{}", mask_token(&token)),
                    None => println!("No token stored"),
                }
                Ok(())
            }
            TokenAction::Clear => {
                clear_token(&store).await?;
                println!("Token removed");
                Ok(())
            }
        },
        Command::AutoAsk { state } => {
            set_auto_ask(&store, state == Toggle::On).await?;
            println!(
                "Token prompt for private repositories {}",
                if state == Toggle::On { "enabled" } else { "disabled" }
            );
            Ok(())
        }
    }
}

/// Build an in-memory repository page for `repo`, stats row included.
fn repository_page(repo: &str, private: bool) -> Result<MemoryPage> {
    let identity = RepoIdentity::from_url(repo).context(InvalidRepositorySnafu { input: repo })?;
    let page = MemoryPage::repository(format!("https://github.com/{identity}"));
    if private {
        page.add_node(PRIVATE_LABEL_QUERY, PRIVATE_LABEL_TEXT);
    }
    Ok(page)
}

async fn show_size<S: SettingsStore>(
    reconciler: Reconciler<MemoryPage, S, GithubClient>,
    config: &Config,
) -> Result<()> {
    let reconciler = reconciler.with_wait_timeout(config.wait_timeout);
    match reconciler.reconcile().await {
        PassOutcome::Rendered(size) => {
            println!("{size}");
            Ok(())
        }
        PassOutcome::MissingToken { prompted } => {
            if prompted {
                eprintln!("This repository is private. Store a token with `reposize token set`.");
            }
            SizeUnavailableSnafu {
                message: MISSING_TOKEN_TEXT,
            }
            .fail()
        }
        PassOutcome::Failed(kind) => SizeUnavailableSnafu {
            message: Indicator::Error(kind).text(),
        }
        .fail(),
        other => SizeUnavailableSnafu {
            message: format!("{other:?}"),
        }
        .fail(),
    }
}
