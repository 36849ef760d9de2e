//! Coupons: buyer verification and seller management.

use async_trait::async_trait;
use larder::prelude::{BranchId, Coupon, CouponId};
use mockall::automock;
use reqwest::Method;

use super::{
    ApiError, HttpApi,
    models::{BranchCoupon, NewCoupon},
};

#[automock]
#[async_trait]
pub trait CouponsApi: Send + Sync {
    /// Verify a normalized code for a branch. Any error means the coupon is not valid.
    async fn verify_coupon(&self, code: String, branch: BranchId) -> Result<Coupon, ApiError>;

    /// Coupons issued by a branch.
    async fn list_coupons(&self, branch: BranchId) -> Result<Vec<BranchCoupon>, ApiError>;

    /// Issue a coupon.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<(), ApiError>;

    /// Withdraw a coupon.
    async fn delete_coupon(&self, coupon: CouponId) -> Result<(), ApiError>;
}

#[async_trait]
impl CouponsApi for HttpApi {
    async fn verify_coupon(&self, code: String, branch: BranchId) -> Result<Coupon, ApiError> {
        self.fetch(
            self.request(Method::GET, "/coupons/verify")
                .query(&[("code", code.as_str())])
                .query(&[("branch_id", branch.get())]),
        )
        .await
    }

    async fn list_coupons(&self, branch: BranchId) -> Result<Vec<BranchCoupon>, ApiError> {
        self.fetch(
            self.request(Method::GET, "/coupons")
                .query(&[("branch_id", branch.get())]),
        )
        .await
    }

    async fn create_coupon(&self, coupon: NewCoupon) -> Result<(), ApiError> {
        self.submit(self.request(Method::POST, "/coupons").json(&coupon))
            .await
    }

    async fn delete_coupon(&self, coupon: CouponId) -> Result<(), ApiError> {
        self.submit(self.request(Method::DELETE, &format!("/coupons/{coupon}")))
            .await
    }
}
