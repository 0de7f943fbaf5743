//! C¥BRD CLI - shop the drop from a terminal.
//!
//! Cart, wishlist, session and recently viewed products are stored as JSON
//! under the data directory, the same way the storefront server stores them.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! cybrd products list --color white --sort price-asc
//! cybrd products show 3
//!
//! # Cart
//! cybrd cart add 3 --size XL --color black --quantity 2
//! cybrd cart set-qty 3 --size XL --color black 1
//!
//! # Check out with a manual transfer
//! cybrd auth login -e shopper@example.com
//! cybrd checkout place instapay --reference TX-4411
//! ```
//!
//! Pass `--json` before the command for machine-readable output.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

use cybrd_core::{PaymentMethod, ProductId, Size};
use cybrd_storefront::catalog::SortMode;

mod commands;

use commands::{Outcome, Session};

#[derive(Parser)]
#[command(name = "cybrd")]
#[command(author, version, about = "C¥BRD storefront from the terminal")]
struct Cli {
    /// Directory holding the cart, wishlist and session
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = ".cybrd", global = true)]
    data_dir: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Sign in and out
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Review and place an order
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Search product names
        #[arg(short, long)]
        query: Option<String>,

        /// Only products offered in this color
        #[arg(short, long)]
        color: Option<String>,

        /// relevance, price-asc, price-desc or name
        #[arg(short, long, default_value = "relevance")]
        sort: SortMode,
    },
    /// Show one product
    Show { id: ProductId },
    /// Recently viewed products
    Recent,
}

/// A cart line: product, size and (for products with variants) color.
#[derive(clap::Args)]
struct LineArgs {
    id: ProductId,

    /// M, L, XL or 2XL
    #[arg(short, long)]
    size: Size,

    #[arg(short, long)]
    color: Option<String>,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        #[command(flatten)]
        line: LineArgs,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line
    Remove {
        #[command(flatten)]
        line: LineArgs,
    },
    /// Set a line's quantity
    SetQty {
        #[command(flatten)]
        line: LineArgs,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show saved products
    Show,
    /// Save a product
    Add { id: ProductId },
    /// Unsave a product
    Remove { id: ProductId },
    /// Save or unsave a product
    Toggle { id: ProductId },
    /// Remove every saved product
    Clear,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "CYBRD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Signup {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "CYBRD_PASSWORD", hide_env_values = true)]
        password: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in shopper
    Whoami,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Show the order summary and payment options
    Summary,
    /// Place the order
    Place {
        /// paypal, instapay, vodafone or visa
        method: PaymentMethod,

        /// Transaction reference for instapay and vodafone transfers
        #[arg(short, long)]
        reference: Option<String>,

        /// Note for the order
        #[arg(short, long)]
        note: Option<String>,
    },
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(outcome) => emit(&outcome, json),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn emit(outcome: &Outcome, json: bool) {
    if json {
        println!("{}", outcome.render(true));
    } else {
        print!("{}", outcome.render(false));
    }
}

fn run(cli: Cli) -> Result<Outcome, Box<dyn std::error::Error>> {
    let mut session = Session::open(&cli.data_dir);
    let session = &mut session;

    let outcome = match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { query, color, sort } => {
                commands::products::list(session, query, color, sort)?
            }
            ProductsAction::Show { id } => commands::products::show(session, id)?,
            ProductsAction::Recent => commands::products::recent(session)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(session)?,
            CartAction::Add { line, quantity } => commands::cart::add(
                session,
                line.id,
                line.size,
                line.color.as_deref(),
                quantity,
            )?,
            CartAction::Remove { line } => {
                commands::cart::remove(session, line.id, line.size, line.color.as_deref())?
            }
            CartAction::SetQty { line, quantity } => commands::cart::set_quantity(
                session,
                line.id,
                line.size,
                line.color.as_deref(),
                quantity,
            )?,
            CartAction::Clear => commands::cart::clear(session)?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(session)?,
            WishlistAction::Add { id } => commands::wishlist::add(session, id)?,
            WishlistAction::Remove { id } => commands::wishlist::remove(session, id)?,
            WishlistAction::Toggle { id } => commands::wishlist::toggle(session, id)?,
            WishlistAction::Clear => commands::wishlist::clear(session)?,
        },
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(session, &email, &SecretString::from(password))?
            }
            AuthAction::Signup {
                email,
                password,
                name,
            } => commands::auth::signup(
                session,
                &email,
                &SecretString::from(password),
                name.as_deref(),
            )?,
            AuthAction::Logout => commands::auth::logout(session)?,
            AuthAction::Whoami => commands::auth::whoami(session)?,
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Summary => commands::checkout::summary(session)?,
            CheckoutAction::Place {
                method,
                reference,
                note,
            } => commands::checkout::place(session, method, reference, note)?,
        },
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_parses_cart_add() {
        let cli = Cli::try_parse_from([
            "cybrd", "--json", "cart", "add", "3", "--size", "2XL", "--color", "white", "-q", "2",
        ])
        .unwrap();
        assert!(cli.json);
        let Commands::Cart {
            action: CartAction::Add { line, quantity },
        } = cli.command
        else {
            panic!("expected cart add");
        };
        assert_eq!(line.id, ProductId::new(3));
        assert_eq!(line.size, Size::XXL);
        assert_eq!(line.color.as_deref(), Some("white"));
        assert_eq!(quantity, 2);
    }

    #[test]
    fn test_rejects_unknown_size() {
        assert!(Cli::try_parse_from(["cybrd", "cart", "add", "3", "--size", "S"]).is_err());
    }
}
