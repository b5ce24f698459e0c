//! SeatDesk API server

use clap::{Parser, Subcommand};
use seatdesk_api::{build_router, AppState, Config, JwtAuth};
use seatdesk_core::domain::value_objects::UserId;
use seatdesk_core::{Actor, SeatDesk};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "seatdesk-api", version, about = "SeatDesk membership API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a bearer token signed with the configured secret
    Token {
        /// Account id; a fresh one when omitted
        #[arg(long)]
        user: Option<Uuid>,
        /// Root admin the subadmin acts for; makes the token a subadmin token
        #[arg(long)]
        admin_id: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let auth = JwtAuth::new(&config.jwt_secret);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Token { user, admin_id } => {
            let id = UserId::from_uuid(user.unwrap_or_else(Uuid::new_v4));
            let actor = match admin_id {
                Some(parent) => Actor::subadmin(id, UserId::from_uuid(parent)),
                None => Actor::admin(id),
            };
            println!("{}", auth.issue(&actor, config.token_ttl_hours)?);
            Ok(())
        }
        Command::Serve => serve(config, auth).await,
    }
}

async fn serve(config: Config, auth: JwtAuth) -> Result<(), Box<dyn std::error::Error>> {
    if config.uses_dev_secret() {
        tracing::warn!("using the built-in development JWT secret; set SEATDESK_JWT_SECRET");
    }

    let state = AppState::new(SeatDesk::in_memory(), auth);
    let app = build_router(state, config.cors_permissive);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "SeatDesk API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
