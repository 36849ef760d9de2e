use clap::{Args, Subcommand};
use futures::future;
use larder::prelude::*;
use larder_app::{
    context::AppContext,
    pages::{OrderHistoryPage, Prompt},
};

use super::{
    output::{print_notices, print_orders},
    redirected,
};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List your orders
    List,
    /// Cancel an order the seller has not accepted yet
    Cancel(CancelArgs),
    /// Keep the list up to date until interrupted
    Watch,
}

#[derive(Debug, Args)]
struct CancelArgs {
    /// Order to cancel
    #[arg(long)]
    order_id: u64,
}

pub(crate) async fn run(
    command: OrdersCommand,
    ctx: AppContext,
    prompt: &dyn Prompt,
) -> Result<(), String> {
    let currency = ctx.settings.currency;
    let period = ctx.settings.history_poll;
    let mut page = OrderHistoryPage::mount(ctx).map_err(redirected)?;

    page.refresh(false).await;

    match command.command {
        OrdersSubcommand::List => {}
        OrdersSubcommand::Cancel(args) => {
            page.cancel(OrderId::new(args.order_id), prompt).await;
        }
        OrdersSubcommand::Watch => {
            print_notices(page.notices_mut());
            print_orders(page.orders(), currency);

            page.watch(period, future::pending(), |page| {
                print_notices(page.notices_mut());
                print_orders(page.orders(), currency);
            })
            .await;

            return Ok(());
        }
    }

    print_notices(page.notices_mut());
    print_orders(page.orders(), currency);

    Ok(())
}
