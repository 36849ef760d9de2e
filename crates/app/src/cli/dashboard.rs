use clap::{Args, Subcommand};
use futures::{StreamExt, future, stream};
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use larder::prelude::*;
use larder_app::{
    context::AppContext,
    pages::{DashboardPage, Prompt},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use super::{
    output::{minor_amount, print_notices, print_orders},
    redirected,
};

#[derive(Debug, Args)]
pub(crate) struct DashboardCommand {
    #[command(subcommand)]
    command: DashboardSubcommand,
}

#[derive(Debug, Subcommand)]
enum DashboardSubcommand {
    /// Show branch stats and orders
    Show,
    /// Start preparing a new or paid order
    Accept(OrderArgs),
    /// Turn down a new or paid order
    Reject(OrderArgs),
    /// Hand a prepared order to delivery
    Ship(OrderArgs),
    /// Mark a delivered order complete
    Complete(OrderArgs),
    /// Refresh whenever a push message arrives on stdin, one per line
    Watch,
    /// Manage the branch's coupons
    Coupons(CouponsCommand),
}

#[derive(Debug, Args)]
struct CouponsCommand {
    #[command(subcommand)]
    command: CouponsSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponsSubcommand {
    /// List the branch's coupons
    List,
    /// Issue a coupon
    Create(CreateCouponArgs),
    /// Withdraw a coupon
    Delete(DeleteCouponArgs),
}

#[derive(Debug, Args)]
struct CreateCouponArgs {
    /// Code buyers enter, stored upper-case
    #[arg(long)]
    code: String,

    /// Discount in percent, 1 to 100
    #[arg(long)]
    percent: u8,

    /// First valid day (UTC); defaults to now
    #[arg(long)]
    valid_from: Option<Date>,

    /// Last valid day (UTC); defaults to the first
    #[arg(long)]
    valid_to: Option<Date>,
}

#[derive(Debug, Args)]
struct DeleteCouponArgs {
    /// Coupon to withdraw
    #[arg(long)]
    coupon_id: u64,
}

#[derive(Debug, Args)]
struct OrderArgs {
    /// Order to update
    #[arg(long)]
    order_id: u64,
}

pub(crate) async fn run(
    command: DashboardCommand,
    ctx: AppContext,
    prompt: &dyn Prompt,
) -> Result<(), String> {
    let mut page = DashboardPage::mount(ctx).map_err(redirected)?;

    let command = match command.command {
        DashboardSubcommand::Coupons(coupons) => {
            return manage_coupons(coupons.command, &mut page, prompt).await;
        }
        command => command,
    };

    page.refresh().await;

    let action = match command {
        DashboardSubcommand::Show => None,
        DashboardSubcommand::Accept(args) => Some((args.order_id, OrderAction::Accept)),
        DashboardSubcommand::Reject(args) => Some((args.order_id, OrderAction::Reject)),
        DashboardSubcommand::Ship(args) => Some((args.order_id, OrderAction::Ship)),
        DashboardSubcommand::Complete(args) => Some((args.order_id, OrderAction::Complete)),
        DashboardSubcommand::Watch => {
            print_dashboard(&mut page);

            let lines = BufReader::new(tokio::io::stdin()).lines();
            let pushes = stream::unfold(lines, |mut lines| async move {
                match lines.next_line().await {
                    Ok(Some(line)) => Some((line, lines)),
                    Ok(None) => None,
                    Err(error) => {
                        warn!(%error, "stopped reading push messages");
                        None
                    }
                }
            })
            .filter(|line| future::ready(!line.trim().is_empty()));

            page.watch(pushes, print_dashboard).await;

            return Ok(());
        }
        DashboardSubcommand::Coupons(_) => None,
    };

    if let Some((order_id, action)) = action {
        page.act(OrderId::new(order_id), action).await;
    }

    print_dashboard(&mut page);

    Ok(())
}

async fn manage_coupons(
    command: CouponsSubcommand,
    page: &mut DashboardPage,
    prompt: &dyn Prompt,
) -> Result<(), String> {
    page.refresh_coupons().await;

    match command {
        CouponsSubcommand::List => {}
        CouponsSubcommand::Create(args) => {
            let valid_from = args.valid_from.map(start_of_day).transpose()?;
            let valid_to = args.valid_to.map(start_of_day).transpose()?;

            page.create_coupon(&args.code, args.percent, valid_from, valid_to)
                .await;
        }
        CouponsSubcommand::Delete(args) => {
            page.delete_coupon(CouponId::new(args.coupon_id), prompt).await;
        }
    }

    print_notices(page.notices_mut());

    if page.coupons().is_empty() {
        println!("no coupons");
    }

    for coupon in page.coupons() {
        let expiry = coupon
            .expires_at()
            .map_or_else(|| "no expiry".to_string(), |expiry| format!("until {expiry}"));

        println!(
            "#{}  {}  {}%  {}",
            coupon.id, coupon.code, coupon.discount_percent, expiry
        );
    }

    Ok(())
}

fn start_of_day(date: Date) -> Result<Timestamp, String> {
    date.to_zoned(TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(|error| format!("invalid date {date}: {error}"))
}

fn print_dashboard(page: &mut DashboardPage) {
    print_notices(page.notices_mut());

    let currency = page.currency();
    let stats = page.stats();

    println!("branch #{}", page.branch_id());
    println!("revenue: {}", minor_amount(stats.revenue, currency));
    println!("orders: {}", stats.orders);
    println!("pending: {}", stats.pending);
    println!();

    print_orders(page.orders(), currency);
}
