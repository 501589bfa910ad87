//! User Edit Form console
//!
//! Usage: `user_form <record-id>`
//!
//! Loads the reference lists and the record concurrently, then takes line
//! commands on stdin until `submit` succeeds or the operator cancels.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{info, warn};

use user_form::console::{parse_command, render_form, render_notification, render_options, Command, HELP};
use user_form::error::SubmitError;
use user_form::form::notification_for;
use user_form::{telemetry, FormConfig, FormSession, HttpUserApi, NotificationCenter, UserApi};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing("user_form=info").context("Failed to set tracing subscriber")?;

    let config = FormConfig::load().context("Failed to load configuration")?;
    let record_id = std::env::args().nth(1).unwrap_or_default();
    info!(api = %config.api_base_url, record = %record_id, "Starting user form");

    println!("\n{}", "═".repeat(60));
    println!("📝 Edit User {}", if record_id.is_empty() { "(no record id)" } else { record_id.as_str() });
    println!("{}\n", "═".repeat(60));

    let api: Arc<dyn UserApi> = Arc::new(HttpUserApi::from_config(&config).context("Failed to build HTTP client")?);
    let notifications = NotificationCenter::new(config.notification_ttl());

    let mut session = FormSession::new(api, record_id, notifications);
    for failure in session.mount().await {
        println!("⚠️  {}", failure);
    }

    println!("{}", render_form(&session));
    println!("💡 Type 'help' for commands\n");

    loop {
        print!("form> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }

        let command = match parse_command(&input) {
            Ok(command) => command,
            Err(e) => {
                println!("⚠️  {}\n", e);
                continue;
            }
        };

        match command {
            Command::Action(action) => {
                session.dispatch(action);
                println!("{}", render_form(&session));
            }
            Command::Show => println!("{}", render_form(&session)),
            Command::Options(list) => println!("{}", render_options(&session, list)),
            Command::Help => println!("{}\n", HELP),
            Command::Dismiss => session.notifications().dismiss().await,
            Command::Reload => match session.reload().await {
                Ok(()) => println!("{}", render_form(&session)),
                Err(e) => println!("⚠️  {}\n", e),
            },
            Command::Submit => {
                let outcome = session.submit().await;
                if let Some(notification) = notification_for(&outcome) {
                    println!("\n{}\n", render_notification(&notification));
                }
                match outcome {
                    Ok(()) => break,
                    Err(SubmitError::Invalid(_)) => println!("{}", render_form(&session)),
                    Err(e) => warn!("Submit failed: {}", e),
                }
            }
            Command::Cancel => {
                println!("\n👋 Changes discarded.\n");
                break;
            }
        }
    }

    Ok(())
}
