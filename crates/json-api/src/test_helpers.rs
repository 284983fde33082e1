//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use storefront_app::{
    auth::{MockAuthService, records::AuthenticatedUser},
    context::AppContext,
    domain::{
        addresses::{
            MockAddressesService,
            records::{Address, AddressUuid},
        },
        carts::MockCartsService,
        coupons::{
            MockCouponsService,
            records::{Coupon, CouponUuid, DiscountType},
        },
        notifications::MockNotificationsService,
        orders::{
            MockOrdersService,
            records::{AddressSnapshot, Order, OrderUuid, OrderStatus, PaymentStatus},
        },
        payments::MockPaymentsService,
        products::{
            MockProductsService,
            records::{Product, ProductStatus, ProductUuid},
        },
        reviews::MockReviewsService,
        settings::MockSettingsService,
        users::{MockUsersService, records::UserUuid},
        wishlists::MockWishlistsService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER: AuthenticatedUser = AuthenticatedUser {
    uuid: UserUuid::from_uuid(Uuid::nil()),
    is_admin: false,
};

pub(crate) const TEST_ADMIN: AuthenticatedUser = AuthenticatedUser {
    uuid: UserUuid::from_uuid(Uuid::from_u128(1)),
    is_admin: true,
};

/// One mock per application service. Unset expectations panic on use,
/// so each test only configures the services its handler touches.
#[derive(Default)]
pub(crate) struct MockApp {
    pub(crate) addresses: MockAddressesService,
    pub(crate) auth: MockAuthService,
    pub(crate) carts: MockCartsService,
    pub(crate) coupons: MockCouponsService,
    pub(crate) notifications: MockNotificationsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) payments: MockPaymentsService,
    pub(crate) products: MockProductsService,
    pub(crate) reviews: MockReviewsService,
    pub(crate) settings: MockSettingsService,
    pub(crate) users: MockUsersService,
    pub(crate) wishlists: MockWishlistsService,
}

impl MockApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        Arc::new(State::new(AppContext {
            addresses: Arc::new(self.addresses),
            auth: Arc::new(self.auth),
            carts: Arc::new(self.carts),
            coupons: Arc::new(self.coupons),
            notifications: Arc::new(self.notifications),
            orders: Arc::new(self.orders),
            payments: Arc::new(self.payments),
            products: Arc::new(self.products),
            reviews: Arc::new(self.reviews),
            settings: Arc::new(self.settings),
            users: Arc::new(self.users),
            wishlists: Arc::new(self.wishlists),
        }))
    }
}

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_current_user(TEST_USER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_current_user(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

/// A service whose caller is the fixed non-admin test user.
pub(crate) fn user_service(app: MockApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_user)
            .push(route),
    )
}

/// A service whose caller is the fixed admin test user.
pub(crate) fn admin_service(app: MockApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid) -> Product {
    Product {
        uuid,
        name: "Widget".to_string(),
        description: String::new(),
        price: 200,
        discount_percent: 0,
        final_price: 200,
        stock: 5,
        status: ProductStatus::Available,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_coupon(uuid: CouponUuid, code: &str) -> Coupon {
    Coupon {
        uuid,
        code: code.to_string(),
        discount_type: DiscountType::Percentage,
        value: 10,
        min_order_value: 0,
        max_discount: None,
        usage_limit: None,
        used_count: 0,
        expires_at: None,
        is_active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_address(uuid: AddressUuid, user: UserUuid) -> Address {
    Address {
        uuid,
        user_uuid: user,
        line1: "1 High Street".to_string(),
        city: "London".to_string(),
        postal_code: "N1 1AA".to_string(),
        country: "GB".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, user: UserUuid) -> Order {
    Order {
        uuid,
        user_uuid: user,
        status: OrderStatus::Pending,
        subtotal: 200,
        discount: 0,
        coupon_code: None,
        delivery_charge: 50,
        total: 250,
        payment_method: "cod".to_string(),
        payment_status: PaymentStatus::Pending,
        is_paid: false,
        paid_at: None,
        provider_order_id: None,
        provider_payment_id: None,
        is_delivered: false,
        delivered_at: None,
        shipping: AddressSnapshot {
            line1: "1 High Street".to_string(),
            city: "London".to_string(),
            postal_code: "N1 1AA".to_string(),
            country: "GB".to_string(),
        },
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        items: Vec::new(),
    }
}
