//! Typed Ids

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
    num::ParseIntError,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A numeric server identifier tagged with the kind of resource it names.
pub struct TypedId<T>(u64, PhantomData<T>);

impl<T> TypedId<T> {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id, PhantomData)
    }

    /// Return the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<u64> for TypedId<T> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<T> From<TypedId<T>> for u64 {
    fn from(value: TypedId<T>) -> Self {
        value.get()
    }
}

impl<T> FromStr for TypedId<T> {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self::new)
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}

/// Food (catalog product)
#[derive(Debug)]
pub struct Food;

/// Restaurant branch
#[derive(Debug)]
pub struct Branch;

/// Placed order
#[derive(Debug)]
pub struct Order;

/// Authenticated user
#[derive(Debug)]
pub struct User;

/// Saved delivery address
#[derive(Debug)]
pub struct Address;

/// Saved payment instrument
#[derive(Debug)]
pub struct Instrument;

/// Coupon issued by a branch
#[derive(Debug)]
pub struct IssuedCoupon;

/// Food Id
pub type FoodId = TypedId<Food>;

/// Branch Id
pub type BranchId = TypedId<Branch>;

/// Order Id
pub type OrderId = TypedId<Order>;

/// User Id
pub type UserId = TypedId<User>;

/// Address Id
pub type AddressId = TypedId<Address>;

/// Instrument Id
pub type InstrumentId = TypedId<Instrument>;

/// Coupon Id
pub type CouponId = TypedId<IssuedCoupon>;

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_trimmed_numbers() -> TestResult {
        let id: FoodId = " 42 ".parse()?;

        assert_eq!(id, FoodId::new(42));

        Ok(())
    }

    #[test]
    fn blank_input_does_not_parse() {
        assert!("".parse::<AddressId>().is_err());
    }
}
