// CLI module for administrative operations

pub mod assignment;
pub mod migrate;
pub mod restaurant;
pub mod token;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Restaurant access service and administration CLI
#[derive(Parser, Debug)]
#[command(name = "restaurant-access")]
#[command(about = "Restaurant-scoped access control service", long_about = None)]
pub struct Cli {
    /// Defaults to `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run pending migrations and start the HTTP server
    Serve,

    /// Run pending database migrations and exit
    Migrate,

    /// Create a restaurant
    AddRestaurant {
        /// Display name
        name: String,

        /// Unique URL-safe identifier
        slug: String,
    },

    /// Assign a user to a restaurant, reactivating an earlier assignment
    Assign {
        restaurant_id: i64,
        user_id: i64,

        /// super_admin, restaurant_admin, restaurant_manager or staff
        #[arg(long, default_value = "restaurant_manager")]
        role: String,

        /// Unix timestamp after which the assignment lapses
        #[arg(long)]
        expires_at: Option<i64>,
    },

    /// Revoke a user's assignment to a restaurant
    Unassign {
        restaurant_id: i64,
        user_id: i64,

        /// Soft-delete the assignment instead of only deactivating it
        #[arg(long)]
        remove: bool,
    },

    /// Print a signed access token for a principal
    IssueToken {
        user_id: i64,

        /// Role to embed; repeat for several (admin, city-admin, restaurant-manager, staff)
        #[arg(long = "role")]
        roles: Vec<String>,
    },
}

/// Execute an administrative CLI command
///
/// `Serve` and `Migrate` are handled by main.rs before AppData exists and are
/// no-ops here.
///
/// # Arguments
/// * `command` - Parsed CLI command
/// * `app_data` - Application data containing all stores and providers
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve | Commands::Migrate => {}
        Commands::AddRestaurant { name, slug } => {
            restaurant::add_restaurant(&app_data.restaurant_store, &name, &slug).await?;
        }
        Commands::Assign {
            restaurant_id,
            user_id,
            role,
            expires_at,
        } => {
            assignment::assign(&app_data.assignment_store, restaurant_id, user_id, &role, expires_at)
                .await?;
        }
        Commands::Unassign {
            restaurant_id,
            user_id,
            remove,
        } => {
            assignment::unassign(&app_data.assignment_store, restaurant_id, user_id, remove).await?;
        }
        Commands::IssueToken { user_id, roles } => {
            token::issue_token(&app_data.token_provider, user_id, &roles)?;
        }
    }

    Ok(())
}
