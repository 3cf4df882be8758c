//! Subscribe-and-save widget.

use rust_decimal::{Decimal, RoundingStrategy};
use storefront_sdk_core::{Money, calculate_discount};

use crate::shopify::CartLineInput;
use crate::types::{Product, SellingPlan, SellingPlanPriceAdjustmentValue};

/// One-time purchase or subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOption {
    OneTime,
    Subscription,
}

/// A selling plan with its price for the current variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOption {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub savings_percent: u32,
}

/// Lets a shopper choose between a one-time purchase and one of the
/// product's selling plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeWidget {
    variant_id: String,
    base_price: Money,
    plans: Vec<SellingPlan>,
    requires_selling_plan: bool,
    option: PurchaseOption,
    selected_plan: Option<String>,
    quantity: u32,
}

impl SubscribeWidget {
    /// Widget for one variant, or `None` if the product has no such variant.
    ///
    /// Products that require a selling plan start on the first plan.
    #[must_use]
    pub fn new(product: &Product, variant_id: &str) -> Option<Self> {
        let variant = product.variant(variant_id)?;
        let plans: Vec<SellingPlan> = product.selling_plans().cloned().collect();

        let (option, selected_plan) = if product.requires_selling_plan {
            (
                PurchaseOption::Subscription,
                plans.first().map(|p| p.id.clone()),
            )
        } else {
            (PurchaseOption::OneTime, None)
        };

        Some(Self {
            variant_id: variant.id.clone(),
            base_price: variant.price.clone(),
            plans,
            requires_selling_plan: product.requires_selling_plan,
            option,
            selected_plan,
            quantity: 1,
        })
    }

    /// Whether the product offers any selling plan.
    #[must_use]
    pub fn has_plans(&self) -> bool {
        !self.plans.is_empty()
    }

    #[must_use]
    pub const fn option(&self) -> PurchaseOption {
        self.option
    }

    #[must_use]
    pub fn selected_plan(&self) -> Option<&str> {
        self.selected_plan.as_deref()
    }

    /// Switch purchase option. Choosing a subscription selects the first
    /// plan if none is selected. One-time is refused for products that
    /// require a selling plan, as is a subscription when there are no plans.
    pub fn select_option(&mut self, option: PurchaseOption) -> bool {
        match option {
            PurchaseOption::OneTime if self.requires_selling_plan => false,
            PurchaseOption::OneTime => {
                self.option = option;
                true
            }
            PurchaseOption::Subscription => {
                let Some(first) = self.plans.first() else {
                    return false;
                };
                if self.selected_plan.is_none() {
                    self.selected_plan = Some(first.id.clone());
                }
                self.option = option;
                true
            }
        }
    }

    /// Select a plan by id; switches to the subscription option.
    pub fn select_plan(&mut self, plan_id: &str) -> bool {
        if !self.plans.iter().any(|p| p.id == plan_id) {
            return false;
        }
        self.selected_plan = Some(plan_id.to_string());
        self.option = PurchaseOption::Subscription;
        true
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    /// Every plan with its adjusted price and savings.
    #[must_use]
    pub fn plan_options(&self) -> Vec<PlanOption> {
        self.plans
            .iter()
            .map(|plan| {
                let price = adjusted_price(&self.base_price, plan);
                PlanOption {
                    id: plan.id.clone(),
                    name: plan.name.clone(),
                    savings_percent: calculate_discount(self.base_price.amount, price.amount),
                    price,
                }
            })
            .collect()
    }

    fn active_plan(&self) -> Option<&SellingPlan> {
        match self.option {
            PurchaseOption::OneTime => None,
            PurchaseOption::Subscription => {
                let id = self.selected_plan.as_deref()?;
                self.plans.iter().find(|p| p.id == id)
            }
        }
    }

    /// Unit price for the current choice.
    #[must_use]
    pub fn price(&self) -> Money {
        self.active_plan().map_or_else(
            || self.base_price.clone(),
            |plan| adjusted_price(&self.base_price, plan),
        )
    }

    /// Percent saved against the one-time price.
    #[must_use]
    pub fn savings_percent(&self) -> u32 {
        calculate_discount(self.base_price.amount, self.price().amount)
    }

    /// The Shopify cart line for the current choice.
    #[must_use]
    pub fn cart_line(&self) -> CartLineInput {
        CartLineInput {
            selling_plan_id: self.active_plan().map(|p| p.id.clone()),
            ..CartLineInput::new(self.variant_id.clone(), self.quantity)
        }
    }
}

/// Price after a plan's first adjustment. Never below zero.
#[must_use]
pub fn adjusted_price(base: &Money, plan: &SellingPlan) -> Money {
    let Some(adjustment) = plan.price_adjustments.first() else {
        return base.clone();
    };

    let amount = match &adjustment.adjustment_value {
        SellingPlanPriceAdjustmentValue::Percentage(percent) => {
            (base.amount * (Decimal::ONE_HUNDRED - *percent) / Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        }
        SellingPlanPriceAdjustmentValue::FixedAmount(off) => base.amount - off.amount,
        SellingPlanPriceAdjustmentValue::FixedPrice(price) => price.amount,
    };

    Money::new(amount.max(Decimal::ZERO), base.currency_code.clone())
}
