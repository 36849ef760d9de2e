//! Prelude

pub use crate::{
    cart::{Cart, CartError},
    coupons::{Coupon, CouponError, normalize_code},
    ids::{AddressId, BranchId, CouponId, FoodId, InstrumentId, OrderId, UserId},
    lines::{CartLine, DELETED_ITEM_NAME},
    money::{AmountError, UNRESOLVED_AMOUNT, format_amount},
    orders::{
        DeliveryDetails, NewOrder, OrderAction, OrderPayloadVersion, OrderStatus, PaymentMethod,
    },
    payments::{PaymentAmount, PaymentAmountError, PaymentHandoff},
    pricing::{PricingError, Totals, totals},
    snapshot::{PricedSnapshot, SnapshotError},
};
