use clap::{Args, Subcommand};
use larder::prelude::*;
use larder_app::{
    context::AppContext,
    pages::{AddOutcome, Prompt, ShopPage},
};

use super::output::{major_amount, print_notices};

#[derive(Debug, Args)]
pub(crate) struct ShopCommand {
    #[command(subcommand)]
    command: ShopSubcommand,
}

#[derive(Debug, Subcommand)]
enum ShopSubcommand {
    /// Search dishes by name
    Search(SearchArgs),
    /// List the branches selling a dish
    Options(DishArgs),
    /// Add a dish to the cart
    Add(AddArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Part of the dish name; empty lists every dish
    #[arg(long, default_value = "")]
    query: String,
}

#[derive(Debug, Args)]
struct DishArgs {
    /// Dish name, as shown by search
    #[arg(long)]
    name: String,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Dish name, as shown by search
    #[arg(long)]
    name: String,

    /// Branch to order from; needed when several branches sell the dish
    #[arg(long)]
    branch: Option<u64>,

    /// Number of units
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

pub(crate) async fn run(
    command: ShopCommand,
    ctx: AppContext,
    prompt: &dyn Prompt,
) -> Result<(), String> {
    let currency = ctx.settings.currency;
    let mut page = ShopPage::new(ctx);

    match command.command {
        ShopSubcommand::Search(args) => {
            page.search(&args.query).await;
            print_notices(page.notices_mut());

            for food in page.foods() {
                println!(
                    "{}  {} - {}  ({} branches, {} reviews)",
                    food.name,
                    major_amount(food.min_price, currency),
                    major_amount(food.max_price, currency),
                    food.branch_count,
                    food.review_count
                );
            }
        }
        ShopSubcommand::Options(args) => {
            page.view_options(&args.name).await;
            print_notices(page.notices_mut());

            for option in page.options() {
                println!(
                    "branch #{} {}  food #{}  {}",
                    option.branch_id,
                    option.branch_name,
                    option.food_id,
                    major_amount(option.final_price, currency)
                );
            }
        }
        ShopSubcommand::Add(args) => {
            page.view_options(&args.name).await;

            let outcome = page
                .add_to_cart(args.branch.map(BranchId::new), args.quantity, prompt)
                .await;

            print_notices(page.notices_mut());

            if outcome == Some(AddOutcome::BranchConflict) {
                println!("kept the current cart");
            }
        }
    }

    Ok(())
}
