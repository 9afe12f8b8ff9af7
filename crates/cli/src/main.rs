//! IpuFood CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ipufood migrate
//!
//! # Load the demo menu and accounts (add sample orders with --with-orders)
//! ipufood seed --with-orders
//!
//! # Manage user roles
//! ipufood user promote -e maria@example.com
//! ipufood user demote -e maria@example.com
//! ipufood user list -r admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert demo users, products and orders
//! - `user` - Promote, demote and list users
//!
//! All commands read `DATABASE_URL` (or `IPUFOOD_DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use ipufood_core::UserRole;

mod commands;

#[derive(Parser)]
#[command(name = "ipufood")]
#[command(author, version, about = "IpuFood CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert demo users and menu products
    Seed {
        /// Also create sample orders for the demo customer
        #[arg(long)]
        with_orders: bool,
    },
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Give a user the admin role
    Promote {
        /// User email address
        #[arg(short, long)]
        email: String,
    },
    /// Return a user to the customer role
    Demote {
        /// User email address
        #[arg(short, long)]
        email: String,
    },
    /// List users
    List {
        /// Only users with this role (`admin` or `user`)
        #[arg(short, long)]
        role: Option<UserRole>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { with_orders } => commands::seed::run(with_orders).await?,
        Commands::User { action } => match action {
            UserAction::Promote { email } => {
                commands::user::set_role(&email, UserRole::Admin).await?;
            }
            UserAction::Demote { email } => {
                commands::user::set_role(&email, UserRole::User).await?;
            }
            UserAction::List { role } => commands::user::list(role).await?,
        },
    }
    Ok(())
}
