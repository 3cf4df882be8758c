//! Cart type conversion functions.

use tracing::warn;

use crate::shopify::types::{
    Attribute, Cart, CartCost, CartDiscountCode, CartLine, CartLineCost, CartMerchandise,
    CartMerchandiseProduct, CartUserError,
};

use super::super::wire::{
    AttributeWire, CartLineNode, CartLineWire, CartNode, CartUserErrorWire, MerchandiseWire,
};
use super::{convert_image, convert_selected_option};

pub fn convert_cart(cart: CartNode) -> Cart {
    Cart {
        id: cart.id,
        checkout_url: cart.checkout_url,
        note: cart.note,
        total_quantity: cart.total_quantity,
        attributes: cart.attributes.into_iter().map(convert_attribute).collect(),
        cost: CartCost {
            subtotal: cart.cost.subtotal_amount,
            total: cart.cost.total_amount,
            total_tax: cart.cost.total_tax_amount,
        },
        discount_codes: cart
            .discount_codes
            .into_iter()
            .map(|d| CartDiscountCode {
                code: d.code,
                applicable: d.applicable,
            })
            .collect(),
        lines: cart.lines.into_nodes().filter_map(convert_cart_line).collect(),
    }
}

pub fn convert_user_error(error: CartUserErrorWire) -> CartUserError {
    CartUserError {
        code: error.code,
        field: error.field,
        message: error.message,
    }
}

fn convert_attribute(a: AttributeWire) -> Attribute {
    Attribute {
        key: a.key,
        value: a.value,
    }
}

fn convert_cart_line(node: CartLineNode) -> Option<CartLine> {
    match node {
        CartLineNode::CartLine(line) => Some(convert_cart_line_fields(line)),
        CartLineNode::Unsupported => {
            warn!("Skipping unsupported cart line type");
            None
        }
    }
}

fn convert_cart_line_fields(line: CartLineWire) -> CartLine {
    CartLine {
        id: line.id,
        quantity: line.quantity,
        attributes: line.attributes.into_iter().map(convert_attribute).collect(),
        cost: CartLineCost {
            amount_per_quantity: line.cost.amount_per_quantity,
            compare_at_amount_per_quantity: line.cost.compare_at_amount_per_quantity,
            subtotal_amount: line.cost.subtotal_amount,
            total_amount: line.cost.total_amount,
        },
        merchandise: convert_merchandise(line.merchandise),
    }
}

fn convert_merchandise(v: MerchandiseWire) -> CartMerchandise {
    CartMerchandise {
        id: v.id,
        title: v.title,
        available_for_sale: v.available_for_sale,
        price: v.price,
        compare_at_price: v.compare_at_price,
        selected_options: v
            .selected_options
            .into_iter()
            .map(convert_selected_option)
            .collect(),
        image: v.image.map(convert_image),
        product: CartMerchandiseProduct {
            id: v.product.id,
            handle: v.product.handle,
            title: v.product.title,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::super::super::wire::CartData;
    use super::*;

    fn money(amount: &str) -> serde_json::Value {
        json!({ "amount": amount, "currencyCode": "USD" })
    }

    #[test]
    fn test_convert_cart_skips_unsupported_lines() {
        let data: CartData = serde_json::from_value(json!({
            "cart": {
                "id": "gid://shopify/Cart/abc?key=1",
                "checkoutUrl": "https://shop.example/checkouts/abc",
                "note": null,
                "totalQuantity": 2,
                "attributes": [],
                "cost": {
                    "subtotalAmount": money("24.00"),
                    "totalAmount": money("24.00"),
                    "totalTaxAmount": null
                },
                "discountCodes": [{ "code": "SAVE10", "applicable": false }],
                "lines": { "edges": [
                    { "node": {
                        "__typename": "CartLine",
                        "id": "gid://shopify/CartLine/1",
                        "quantity": 2,
                        "attributes": [{ "key": "gift", "value": "yes" }],
                        "cost": {
                            "amountPerQuantity": money("12.00"),
                            "compareAtAmountPerQuantity": null,
                            "subtotalAmount": money("24.00"),
                            "totalAmount": money("24.00")
                        },
                        "merchandise": {
                            "id": "gid://shopify/ProductVariant/11",
                            "title": "250g",
                            "availableForSale": true,
                            "price": money("12.00"),
                            "compareAtPrice": null,
                            "selectedOptions": [{ "name": "Size", "value": "250g" }],
                            "image": null,
                            "product": { "id": "gid://shopify/Product/1", "handle": "coffee", "title": "Coffee" }
                        }
                    } },
                    { "node": { "__typename": "ComponentizableCartLine" } }
                ] }
            }
        }))
        .unwrap();

        let cart = convert_cart(data.cart.unwrap());
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].merchandise.product.handle, "coffee");
        assert_eq!(cart.lines[0].attributes[0].value.as_deref(), Some("yes"));
        assert!(!cart.discount_codes[0].applicable);
        assert_eq!(cart.cost.total.display(), "$24.00");
    }
}
