use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use agilenesia_api::auth::password::hash_password;
use agilenesia_api::database::models::user::UserInput;
use agilenesia_api::database::postgres::PgRepository;
use agilenesia_api::database::repository::PortfolioRepository;

/// Operational helper for the Agilenesia portfolio API.
#[derive(Parser)]
#[command(name = "agilenesia-admin", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a bcrypt hash for the given password
    HashPassword {
        password: String,
    },
    /// Create an active admin user in the configured database
    SeedAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword { password } => {
            let hash = hash_password(&password).context("hashing failed")?;
            println!("{}", hash);
        }
        Commands::SeedAdmin {
            name,
            email,
            password,
        } => {
            let database_url =
                std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
            let repo: Arc<dyn PortfolioRepository> =
                Arc::new(PgRepository::connect(&database_url).await?);

            let user = repo
                .create_user(UserInput {
                    name,
                    email,
                    password_hash: hash_password(&password).context("hashing failed")?,
                    role: "admin".to_string(),
                    status: "active".to_string(),
                    client_id: None,
                })
                .await?;

            println!("Created admin user {} ({})", user.email, user.id);
        }
    }

    Ok(())
}
