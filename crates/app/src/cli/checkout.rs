use clap::{Args, ValueEnum};
use larder::prelude::*;
use larder_app::{
    context::AppContext,
    pages::{CartPage, CheckoutPage, Route},
};

use super::{
    output::{minor_amount, print_cart, print_notices},
    pay::{self, CardArgs},
    redirected,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    /// Cash on delivery
    Cod,
    /// Pay online right after ordering
    Banking,
}

impl From<Method> for PaymentMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Cod => Self::Cod,
            Method::Banking => Self::Banking,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Coupon code to apply before ordering
    #[arg(long)]
    coupon: Option<String>,

    /// Saved address to deliver to
    #[arg(long)]
    address_id: Option<u64>,

    /// Recipient name
    #[arg(long)]
    name: Option<String>,

    /// Recipient phone
    #[arg(long)]
    phone: Option<String>,

    /// Delivery address
    #[arg(long)]
    address: Option<String>,

    /// Note for the seller
    #[arg(long)]
    note: Option<String>,

    /// Save the delivery details under this title
    #[arg(long)]
    save_address: Option<String>,

    /// Payment method
    #[arg(long, value_enum, default_value_t = Method::Cod)]
    method: Method,

    #[command(flatten)]
    card: CardArgs,
}

pub(crate) async fn run(args: CheckoutArgs, ctx: AppContext) -> Result<(), String> {
    let mut cart = CartPage::new(ctx.clone());

    cart.load().await;

    if let Some(code) = &args.coupon {
        cart.apply_coupon(code).await;
    }

    print_notices(cart.notices_mut());
    print_cart(&cart);

    let route = cart.proceed_to_checkout();

    print_notices(cart.notices_mut());

    let snapshot = match route {
        Some(Route::Checkout(snapshot)) => snapshot,
        Some(route) => return Err(redirected(route)),
        None => return Err("the cart cannot be checked out".to_string()),
    };

    let mut checkout = CheckoutPage::mount(ctx.clone(), Some(snapshot))
        .await
        .map_err(redirected)?;

    if let Some(id) = args.address_id {
        checkout.select_saved_address(AddressId::new(id));
    }

    let delivery = &mut checkout.delivery;

    for (field, value) in [
        (&mut delivery.name, args.name),
        (&mut delivery.phone, args.phone),
        (&mut delivery.address, args.address),
        (&mut delivery.note, args.note),
    ] {
        if let Some(value) = value {
            *field = value;
        }
    }

    checkout.payment_method = args.method.into();

    if let Some(title) = &args.save_address {
        checkout.save_delivery_address(title).await;
    }

    let snapshot = checkout.snapshot();

    println!(
        "ordering from {}: {}",
        checkout.branch_name(),
        snapshot
            .currency()
            .map_or_else(|_| UNRESOLVED_AMOUNT.to_string(), |currency| {
                minor_amount(snapshot.final_price(), currency)
            })
    );

    let route = checkout.submit_order().await;

    print_notices(checkout.notices_mut());

    match route {
        Some(Route::Payment(handoff)) => pay::settle(ctx, handoff, args.card).await,
        Some(_) => Ok(()),
        None => Err("the order was not placed".to_string()),
    }
}
