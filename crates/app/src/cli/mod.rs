use clap::{Parser, Subcommand};
use larder_app::{
    config::ClientConfig,
    context::AppContext,
    observability::init_logging,
    pages::Route,
    session::{FileSessionStore, SessionStore},
};

mod cart;
mod checkout;
mod dashboard;
mod orders;
mod output;
mod pay;
mod session;
mod shop;

use output::TerminalPrompt;

#[derive(Debug, Parser)]
#[command(name = "larder", about = "Larder food-ordering client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    /// Answer yes to every confirmation
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Session(session::SessionCommand),
    Shop(shop::ShopCommand),
    Cart(cart::CartCommand),
    Checkout(checkout::CheckoutArgs),
    Pay(pay::PayArgs),
    Orders(orders::OrdersCommand),
    Dashboard(dashboard::DashboardCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        init_logging(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let store = FileSessionStore::new(self.config.session.session_file.clone());
        let session = store
            .load()
            .map_err(|error| format!("failed to read session: {error}"))?;

        let ctx = AppContext::from_config(&self.config, session)
            .map_err(|error| format!("invalid configuration: {error}"))?;

        let prompt = TerminalPrompt::new(self.yes);

        match self.command {
            Commands::Session(command) => session::run(command, &ctx, &store).await,
            Commands::Shop(command) => shop::run(command, ctx, &prompt).await,
            Commands::Cart(command) => cart::run(command, ctx, &prompt).await,
            Commands::Checkout(args) => checkout::run(args, ctx).await,
            Commands::Pay(args) => pay::run(args, ctx).await,
            Commands::Orders(command) => orders::run(command, ctx, &prompt).await,
            Commands::Dashboard(command) => dashboard::run(command, ctx, &prompt).await,
        }
    }
}

/// Explain a redirect the terminal cannot follow.
fn redirected(route: Route) -> String {
    match route {
        Route::Login => "please sign in first: larder session login".to_string(),
        Route::Shop => "nothing to check out: add items with larder shop add".to_string(),
        Route::OrderHistory => "see your orders with larder orders list".to_string(),
        Route::Checkout(_) | Route::Payment(_) => format!("unexpected redirect to {route:?}"),
    }
}
