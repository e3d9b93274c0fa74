//! UniBazaar CLI - drive the marketplace client from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Log in with email + password
//! ub-cli auth login -e student@campus.edu -p 'hunter2!'
//!
//! # Request a one-time code over WhatsApp, then log in with it
//! ub-cli auth send-otp --phone '0812 345 6789'
//! ub-cli auth login --phone '0812 345 6789' --otp 123456
//!
//! # Cart
//! ub-cli cart add 7 --quantity 2
//! ub-cli cart show
//!
//! # Browse and check out
//! ub-cli products list --search "textbook"
//! ub-cli checkout
//! ```
//!
//! # Environment Variables
//!
//! - `UNIBAZAAR_API_URL` - Base URL of the marketplace backend (required)
//! - `UNIBAZAAR_STATE_DIR` - Session storage directory (default `~/.unibazaar`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use unibazaar_client::{Market, config::ClientConfig};

mod commands;

#[derive(Parser)]
#[command(name = "ub-cli")]
#[command(author, version, about = "UniBazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account authentication
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse stores
    Stores {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Create an order from the current cart
    Checkout,
    /// List your orders
    Orders,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in with exactly one of: email+password, username+password,
    /// phone+otp
    Login {
        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Username
        #[arg(short, long)]
        username: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,

        /// Password (for email or username login)
        #[arg(short, long)]
        password: Option<String>,

        /// One-time code (for phone login)
        #[arg(long)]
        otp: Option<String>,
    },
    /// Register a new account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm: Option<String>,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Register an invited admin account
    RegisterAdmin {
        /// Email address the invitation was sent to
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Username
        #[arg(short, long)]
        username: String,

        /// First name
        #[arg(long)]
        first_name: String,

        /// Last name
        #[arg(long)]
        last_name: String,
    },
    /// Request delivery of a one-time code
    SendOtp {
        /// Deliver by email
        #[arg(short, long)]
        email: Option<String>,

        /// Deliver by WhatsApp to this phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Check a password-reset token
    VerifyResetToken {
        /// The token from the reset email
        #[arg(short, long)]
        token: String,
    },
    /// Set a new password using a reset token
    ResetPassword {
        /// The token from the reset email
        #[arg(short, long)]
        token: String,

        /// New password
        #[arg(short, long)]
        password: String,
    },
    /// Destroy the current session
    Logout,
    /// Show the current user
    Whoami,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show line items, count, and total
    Show,
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: i32,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the absolute quantity on a line item
    Set {
        /// Cart item ID
        item_id: i32,

        /// New quantity (0 keeps the line; use `remove` to delete it)
        quantity: u32,
    },
    /// Remove a line item
    Remove {
        /// Cart item ID
        item_id: i32,
    },
    /// Remove every line item
    Clear,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Restrict to a category ID
        #[arg(short, long)]
        category: Option<i32>,

        /// Restrict to a store ID
        #[arg(long)]
        store: Option<i32>,
    },
    /// Show one product
    Show {
        /// Product ID
        id: i32,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// List stores
    List,
    /// Show one store
    Show {
        /// Store ID
        id: i32,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let market = Market::new(ClientConfig::from_env()?);

    match cli.command {
        Commands::Auth { action } => match action {
            AuthAction::Login {
                email,
                username,
                phone,
                password,
                otp,
            } => commands::auth::login(&market, email, username, phone, password, otp).await?,
            AuthAction::Register {
                name,
                email,
                password,
                confirm,
                phone,
            } => commands::auth::register(&market, name, email, password, confirm, phone).await?,
            AuthAction::RegisterAdmin {
                email,
                password,
                username,
                first_name,
                last_name,
            } => {
                commands::auth::register_admin(
                    &market, email, password, username, first_name, last_name,
                )
                .await?;
            }
            AuthAction::SendOtp { email, phone } => {
                commands::auth::send_otp(&market, email, phone).await?;
            }
            AuthAction::VerifyResetToken { token } => {
                commands::auth::verify_reset_token(&market, &token).await?;
            }
            AuthAction::ResetPassword { token, password } => {
                commands::auth::reset_password(&market, &token, &password).await?;
            }
            AuthAction::Logout => commands::auth::logout(&market).await?,
            AuthAction::Whoami => commands::auth::whoami(&market),
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&market).await?,
            CartAction::Add {
                product_id,
                quantity,
            } => commands::cart::add(&market, product_id, quantity).await?,
            CartAction::Set { item_id, quantity } => {
                commands::cart::set_quantity(&market, item_id, quantity).await?;
            }
            CartAction::Remove { item_id } => commands::cart::remove(&market, item_id).await?,
            CartAction::Clear => commands::cart::clear(&market).await?,
        },
        Commands::Products { action } => match action {
            ProductAction::List {
                search,
                category,
                store,
            } => commands::catalog::list_products(&market, search, category, store).await?,
            ProductAction::Show { id } => commands::catalog::show_product(&market, id).await?,
        },
        Commands::Stores { action } => match action {
            StoreAction::List => commands::catalog::list_stores(&market).await?,
            StoreAction::Show { id } => commands::catalog::show_store(&market, id).await?,
        },
        Commands::Checkout => commands::orders::checkout(&market).await?,
        Commands::Orders => commands::orders::list(&market).await?,
    }
    Ok(())
}
