//! GraphQL documents for the Shopify Storefront API.
//!
//! Every operation is assembled from shared fragments so the wire DTOs in
//! `wire.rs` only need one shape per fragment.

// =============================================================================
// Fragments
// =============================================================================

macro_rules! money_fields {
    () => {
        "fragment MoneyFields on MoneyV2 { amount currencyCode }"
    };
}

macro_rules! image_fields {
    () => {
        "fragment ImageFields on Image { id url altText width height }"
    };
}

macro_rules! page_info_fields {
    () => {
        "fragment PageInfoFields on PageInfo { hasNextPage hasPreviousPage startCursor endCursor }"
    };
}

macro_rules! product_fields {
    () => {
        r"fragment ProductFields on Product {
  id handle title description descriptionHtml availableForSale productType vendor tags
  onlineStoreUrl
  seo { title description }
  priceRange { minVariantPrice { ...MoneyFields } maxVariantPrice { ...MoneyFields } }
  compareAtPriceRange { minVariantPrice { ...MoneyFields } maxVariantPrice { ...MoneyFields } }
  featuredImage { ...ImageFields }
  images(first: 10) { edges { node { ...ImageFields } } }
  options { id name optionValues { name } }
  variants(first: 50) {
    edges {
      node {
        id title availableForSale quantityAvailable sku
        price { ...MoneyFields }
        compareAtPrice { ...MoneyFields }
        selectedOptions { name value }
        image { ...ImageFields }
      }
    }
  }
  requiresSellingPlan
  sellingPlanGroups(first: 10) {
    edges {
      node {
        name
        sellingPlans(first: 10) {
          edges {
            node {
              id name description recurringDeliveries
              options { name value }
              priceAdjustments {
                orderCount
                adjustmentValue {
                  __typename
                  ... on SellingPlanPercentagePriceAdjustment { adjustmentPercentage }
                  ... on SellingPlanFixedAmountPriceAdjustment { adjustmentAmount { ...MoneyFields } }
                  ... on SellingPlanFixedPriceAdjustment { price { ...MoneyFields } }
                }
              }
            }
          }
        }
      }
    }
  }
}"
    };
}

macro_rules! collection_fields {
    () => {
        r"fragment CollectionFields on Collection {
  id handle title description descriptionHtml
  seo { title description }
  image { ...ImageFields }
}"
    };
}

// Reduced product field set used inside collections. `vendor`, `tags`,
// `options` and variant `selectedOptions`/`image` are not fetched.
macro_rules! collection_product_fields {
    () => {
        r"fragment CollectionProductFields on Product {
  id handle title description availableForSale productType
  priceRange { minVariantPrice { ...MoneyFields } maxVariantPrice { ...MoneyFields } }
  compareAtPriceRange { minVariantPrice { ...MoneyFields } maxVariantPrice { ...MoneyFields } }
  featuredImage { ...ImageFields }
  images(first: 1) { edges { node { ...ImageFields } } }
  variants(first: 10) {
    edges {
      node {
        id title availableForSale
        price { ...MoneyFields }
        compareAtPrice { ...MoneyFields }
      }
    }
  }
}"
    };
}

macro_rules! cart_fields {
    () => {
        r"fragment CartFields on Cart {
  id checkoutUrl note totalQuantity
  attributes { key value }
  cost {
    subtotalAmount { ...MoneyFields }
    totalAmount { ...MoneyFields }
    totalTaxAmount { ...MoneyFields }
  }
  discountCodes { code applicable }
  lines(first: 100) {
    edges {
      node {
        __typename
        ... on CartLine {
          id quantity
          attributes { key value }
          cost {
            amountPerQuantity { ...MoneyFields }
            compareAtAmountPerQuantity { ...MoneyFields }
            subtotalAmount { ...MoneyFields }
            totalAmount { ...MoneyFields }
          }
          merchandise {
            ... on ProductVariant {
              id title availableForSale
              price { ...MoneyFields }
              compareAtPrice { ...MoneyFields }
              selectedOptions { name value }
              image { ...ImageFields }
              product { id handle title }
            }
          }
        }
      }
    }
  }
}
fragment CartUserErrorFields on CartUserError { code field message }"
    };
}

// =============================================================================
// Product Queries
// =============================================================================

pub const GET_PRODUCT_BY_HANDLE: &str = concat!(
    "query GetProductByHandle($handle: String!) { product(handle: $handle) { ...ProductFields } }",
    "\n",
    product_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

pub const GET_PRODUCTS: &str = concat!(
    r"query GetProducts($first: Int!, $after: String, $query: String) {
  products(first: $first, after: $after, query: $query) {
    pageInfo { ...PageInfoFields }
    edges { node { ...ProductFields } }
  }
}",
    "\n",
    product_fields!(),
    "\n",
    page_info_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

pub const GET_PRODUCT_RECOMMENDATIONS: &str = concat!(
    r"query GetProductRecommendations($productId: ID!, $intent: ProductRecommendationIntent) {
  productRecommendations(productId: $productId, intent: $intent) { ...ProductFields }
}",
    "\n",
    product_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

// =============================================================================
// Collection Queries
// =============================================================================

pub const GET_COLLECTION_BY_HANDLE: &str = concat!(
    r"query GetCollectionByHandle($handle: String!, $productCount: Int!, $after: String) {
  collection(handle: $handle) {
    ...CollectionFields
    products(first: $productCount, after: $after) {
      pageInfo { ...PageInfoFields }
      edges { node { ...CollectionProductFields } }
    }
  }
}",
    "\n",
    collection_fields!(),
    "\n",
    collection_product_fields!(),
    "\n",
    page_info_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

pub const GET_COLLECTIONS: &str = concat!(
    r"query GetCollections($first: Int!, $after: String, $query: String) {
  collections(first: $first, after: $after, query: $query) {
    pageInfo { ...PageInfoFields }
    edges { node { ...CollectionFields } }
  }
}",
    "\n",
    collection_fields!(),
    "\n",
    page_info_fields!(),
    "\n",
    image_fields!(),
);

// =============================================================================
// Cart Queries and Mutations
// =============================================================================

pub const GET_CART: &str = concat!(
    "query GetCart($cartId: ID!) { cart(id: $cartId) { ...CartFields } }",
    "\n",
    cart_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

pub const CREATE_CART: &str = concat!(
    r"mutation CreateCart($input: CartInput!) {
  cartCreate(input: $input) { cart { ...CartFields } userErrors { ...CartUserErrorFields } }
}",
    "\n",
    cart_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

pub const ADD_TO_CART: &str = concat!(
    r"mutation AddToCart($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) { cart { ...CartFields } userErrors { ...CartUserErrorFields } }
}",
    "\n",
    cart_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

pub const UPDATE_CART_LINES: &str = concat!(
    r"mutation UpdateCartLines($cartId: ID!, $lines: [CartLineUpdateInput!]!) {
  cartLinesUpdate(cartId: $cartId, lines: $lines) { cart { ...CartFields } userErrors { ...CartUserErrorFields } }
}",
    "\n",
    cart_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

pub const REMOVE_FROM_CART: &str = concat!(
    r"mutation RemoveFromCart($cartId: ID!, $lineIds: [ID!]!) {
  cartLinesRemove(cartId: $cartId, lineIds: $lineIds) { cart { ...CartFields } userErrors { ...CartUserErrorFields } }
}",
    "\n",
    cart_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

pub const UPDATE_CART_DISCOUNT_CODES: &str = concat!(
    r"mutation UpdateCartDiscountCodes($cartId: ID!, $discountCodes: [String!]!) {
  cartDiscountCodesUpdate(cartId: $cartId, discountCodes: $discountCodes) { cart { ...CartFields } userErrors { ...CartUserErrorFields } }
}",
    "\n",
    cart_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

pub const UPDATE_CART_NOTE: &str = concat!(
    r"mutation UpdateCartNote($cartId: ID!, $note: String!) {
  cartNoteUpdate(cartId: $cartId, note: $note) { cart { ...CartFields } userErrors { ...CartUserErrorFields } }
}",
    "\n",
    cart_fields!(),
    "\n",
    money_fields!(),
    "\n",
    image_fields!(),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_include_used_fragments() {
        for document in [GET_PRODUCT_BY_HANDLE, GET_PRODUCTS, GET_PRODUCT_RECOMMENDATIONS] {
            assert!(document.contains("fragment ProductFields"));
            assert!(document.contains("fragment MoneyFields"));
            assert!(document.contains("fragment ImageFields"));
        }
        assert!(GET_COLLECTION_BY_HANDLE.contains("fragment CollectionProductFields"));
        assert!(!GET_COLLECTION_BY_HANDLE.contains("fragment ProductFields"));
        for document in [
            CREATE_CART,
            ADD_TO_CART,
            UPDATE_CART_LINES,
            REMOVE_FROM_CART,
            UPDATE_CART_DISCOUNT_CODES,
            UPDATE_CART_NOTE,
        ] {
            assert!(document.contains("fragment CartUserErrorFields"));
            assert!(document.starts_with("mutation "));
        }
    }

    #[test]
    fn test_collections_query_omits_unused_money_fragment() {
        assert!(!GET_COLLECTIONS.contains("fragment MoneyFields"));
    }
}
