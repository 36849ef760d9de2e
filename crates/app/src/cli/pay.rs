use clap::Args;
use larder::prelude::*;
use larder_app::{
    api::models::NewInstrument,
    context::AppContext,
    pages::{InstrumentSelection, PaymentPage},
};
use rust_decimal::Decimal;

use super::{output::print_notices, redirected};

#[derive(Debug, Args)]
pub(crate) struct PayArgs {
    /// Order to pay for
    #[arg(long)]
    order_id: u64,

    /// Amount to pay; fetched from the order when omitted
    #[arg(long)]
    total: Option<Decimal>,

    #[command(flatten)]
    card: CardArgs,
}

/// How to pay.
#[derive(Debug, Default, Args)]
pub(crate) struct CardArgs {
    /// Saved instrument to pay with
    #[arg(long, conflicts_with = "card_number")]
    instrument: Option<u64>,

    /// Bank of a new card
    #[arg(long, default_value = "")]
    bank_name: String,

    /// Number of a new card; saved for next time
    #[arg(long)]
    card_number: Option<String>,

    /// Holder of a new card
    #[arg(long, default_value = "")]
    card_holder: String,

    /// Expiry of a new card, as MM/YY
    #[arg(long, default_value = "")]
    expiry: String,
}

pub(crate) async fn run(args: PayArgs, ctx: AppContext) -> Result<(), String> {
    settle(
        ctx,
        PaymentHandoff {
            order_id: OrderId::new(args.order_id),
            total_price: args.total,
        },
        args.card,
    )
    .await
}

/// Pay for an order and report the outcome.
pub(crate) async fn settle(
    ctx: AppContext,
    handoff: PaymentHandoff,
    card: CardArgs,
) -> Result<(), String> {
    let mut page = PaymentPage::mount(ctx, Some(handoff))
        .await
        .map_err(redirected)?;

    if let Some(id) = card.instrument {
        page.select_instrument(InstrumentSelection::Saved(InstrumentId::new(id)));
    } else if let Some(card_number) = card.card_number {
        page.select_instrument(InstrumentSelection::New);
        page.new_instrument = NewInstrument {
            bank_name: card.bank_name,
            card_number,
            card_holder: card.card_holder,
            expiry_date: card.expiry,
        };
    }

    println!("paying {} for order #{}", page.amount_display(), page.order_id());

    let route = page.confirm_payment().await;

    print_notices(page.notices_mut());

    match route {
        Some(_) => Ok(()),
        None => Err(format!("order #{} is not paid", page.order_id())),
    }
}
