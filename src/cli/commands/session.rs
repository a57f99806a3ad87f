//! Session command implementation
//!
//! `session create` allocates a session id and its upload folders,
//! `session cleanup` removes everything a session owns.

use super::{load_or_report, parse_session, EXIT_CONFIG, EXIT_FATAL};
use crate::core::session::{SessionLayout, SessionStore};
use clap::{Args, Subcommand};

/// Arguments for the session command
#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Allocate a new session and its upload folders
    Create,

    /// Remove a session's uploads, output and archive
    Cleanup {
        /// Session identifier
        #[arg(short, long)]
        session: String,
    },
}

impl SessionArgs {
    /// Execute the session command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let Some(config) = load_or_report(config_path) else {
            return Ok(EXIT_CONFIG);
        };
        let store = SessionStore::new(SessionLayout::from_config(&config.storage));

        match &self.command {
            SessionCommand::Create => match store.create().await {
                Ok(session) => {
                    println!("✅ Session created: {session}");
                    println!(
                        "   Upload folder: {}",
                        store.layout().upload_dir(&session).display()
                    );
                    Ok(0)
                }
                Err(e) => {
                    println!("❌ Failed to create session");
                    println!("   Error: {e}");
                    Ok(EXIT_FATAL)
                }
            },
            SessionCommand::Cleanup { session } => {
                let Some(session) = parse_session(session) else {
                    return Ok(EXIT_CONFIG);
                };
                match store.cleanup(&session).await {
                    Ok(true) => {
                        println!("🧹 Session {session} removed");
                        Ok(0)
                    }
                    Ok(false) => {
                        println!("ℹ️  Session {session} had no directories");
                        Ok(0)
                    }
                    Err(e) => {
                        println!("❌ Failed to clean up session {session}");
                        println!("   Error: {e}");
                        Ok(EXIT_FATAL)
                    }
                }
            }
        }
    }
}
