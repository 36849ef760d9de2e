use std::io::{self, BufRead, Write};

use larder::{
    money::{minor_from_major, money},
    prelude::*,
};
use larder_app::{
    api::models::OrderRecord,
    pages::{CartPage, NoticeLevel, Notices, Prompt},
};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;

/// Confirms on the terminal, or always when `--yes` was given.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub(crate) fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{message} [y/N] ");

        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();

        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Print and forget the page's notices.
pub(crate) fn print_notices(notices: &mut Notices) {
    for notice in notices.drain() {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };

        println!("[{tag}] {}", notice.message);
    }
}

pub(crate) fn minor_amount(minor: u64, currency: &'static Currency) -> String {
    format_amount(money(minor, currency).ok().as_ref())
}

pub(crate) fn major_amount(major: Option<Decimal>, currency: &'static Currency) -> String {
    let amount = major
        .and_then(|major| minor_from_major(major, currency).ok())
        .and_then(|minor| money(minor, currency).ok());

    format_amount(amount.as_ref())
}

pub(crate) fn print_cart(page: &CartPage) {
    let cart = page.cart();

    if cart.is_empty() {
        println!("cart is empty");
        return;
    }

    if let Some(branch) = cart.branch_id() {
        println!("branch #{branch}");
    }

    for line in cart.lines() {
        println!(
            "  #{:<6} {:<30} {:>4} x {:>14} = {}",
            line.food_id,
            line.name,
            line.quantity,
            minor_amount(line.price, cart.currency()),
            line.line_total()
                .map_or_else(|| UNRESOLVED_AMOUNT.to_string(), |total| minor_amount(total, cart.currency())),
        );
    }

    match page.totals() {
        Ok(totals) => {
            println!("subtotal: {}", totals.subtotal);

            if let Some(coupon) = page.coupon() {
                println!(
                    "coupon {} ({}%): -{}",
                    coupon.code(),
                    coupon.discount_percent(),
                    totals.discount
                );
            }

            println!("total: {}", totals.total);
        }
        Err(error) => println!("total: {UNRESOLVED_AMOUNT} ({error})"),
    }
}

pub(crate) fn print_orders(orders: &[OrderRecord], currency: &'static Currency) {
    if orders.is_empty() {
        println!("no orders found");
        return;
    }

    for order in orders {
        println!("order #{}", order.id);
        println!("  status: {}", order.status.label());
        println!("  total: {}", major_amount(order.total_price, currency));

        if let Some(created_at) = order.created_at() {
            println!("  placed: {}", created_at.strftime("%Y-%m-%d %H:%M"));
        }

        if let Some(method) = order.payment_method {
            println!("  payment: {method:?}");
        }

        if let Some(name) = &order.customer_name {
            println!(
                "  customer: {name} {}",
                order.customer_phone.as_deref().unwrap_or_default()
            );
        }

        if let Some(note) = order.note.as_deref().filter(|note| !note.is_empty()) {
            println!("  note: {note}");
        }

        for item in &order.items {
            println!(
                "  - {} x {}",
                item.quantity,
                item.food_name
                    .clone()
                    .unwrap_or_else(|| format!("food #{}", item.food_id))
            );
        }

        println!();
    }
}
