use clap::{Args, Subcommand};
use larder::prelude::*;
use larder_app::{
    context::AppContext,
    pages::{AddOutcome, CartPage, Prompt},
};

use super::output::{print_cart, print_notices};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart with prices and totals
    Show,
    /// Add a food from a branch
    Add(AddArgs),
    /// Change a line's quantity
    Set(SetArgs),
    /// Remove a line. Servers without line removal only drop it here until the cart reloads
    Remove(FoodArgs),
    /// Empty the cart
    Clear,
    /// Preview the cart with a coupon applied
    Coupon(CouponArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Food to add
    #[arg(long)]
    food: u64,

    /// Branch selling the food
    #[arg(long)]
    branch: u64,

    /// Number of units
    #[arg(long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Food whose line changes
    #[arg(long)]
    food: u64,

    /// New quantity, at least 1
    #[arg(long)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct FoodArgs {
    /// Food whose line is removed
    #[arg(long)]
    food: u64,
}

#[derive(Debug, Args)]
struct CouponArgs {
    /// Coupon code
    #[arg(long)]
    code: String,
}

pub(crate) async fn run(
    command: CartCommand,
    ctx: AppContext,
    prompt: &dyn Prompt,
) -> Result<(), String> {
    let mut page = CartPage::new(ctx);

    page.load().await;

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add(args) => {
            let outcome = page
                .add_item(
                    FoodId::new(args.food),
                    BranchId::new(args.branch),
                    args.quantity,
                    prompt,
                )
                .await;

            if outcome == AddOutcome::BranchConflict {
                println!("kept the current cart");
            }
        }
        CartSubcommand::Set(args) => {
            page.set_quantity(FoodId::new(args.food), args.quantity).await;
        }
        CartSubcommand::Remove(args) => {
            page.remove_line(FoodId::new(args.food), prompt).await;
        }
        CartSubcommand::Clear => page.clear(prompt).await,
        CartSubcommand::Coupon(args) => page.apply_coupon(&args.code).await,
    }

    print_notices(page.notices_mut());
    print_cart(&page);

    Ok(())
}
