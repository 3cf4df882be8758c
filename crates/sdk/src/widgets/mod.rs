//! Headless widgets.
//!
//! Each widget holds a storefront component's state, transitions,
//! validation and network calls, and exposes plain view data. Rendering is
//! up to the embedding application.

mod add_to_cart;
mod application_form;
mod booking;
mod cart_drawer;
mod customer_portal;
mod product_card;
mod subscribe;

pub use add_to_cart::{AddToCartButton, AddToCartError, cart_item_for};
pub use application_form::{
    ApplicationBackend, ApplicationForm, FieldKind, FormError, FormField, FormPreset,
    GENERIC_SUBMIT_ERROR, Validator,
};
pub use booking::{
    BookingBackend, BookingError, BookingStep, BookingWidget, NO_AVAILABLE_TIMES_MESSAGE,
};
pub use cart_drawer::{CartDrawerView, CartLineView, checkout_lines};
pub use customer_portal::{CustomerPortal, PortalTab};
pub use product_card::ProductCardView;
pub use subscribe::{PlanOption, PurchaseOption, SubscribeWidget};
