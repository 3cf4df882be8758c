//! Conversions from wire shapes into domain types.

mod cart;
mod collections;
mod products;

pub use cart::{convert_cart, convert_user_error};
pub use collections::{convert_collection, convert_collection_connection};
pub use products::{convert_product, convert_product_connection};

use crate::types::{Image, PageInfo, PriceRange, SelectedOption, Seo};

use super::wire::{ImageWire, PageInfoWire, PriceRangeWire, SelectedOptionWire, SeoWire};

fn convert_image(i: ImageWire) -> Image {
    Image {
        id: i.id,
        url: i.url,
        alt_text: i.alt_text,
        width: i.width,
        height: i.height,
    }
}

fn convert_seo(s: SeoWire) -> Seo {
    Seo {
        title: s.title,
        description: s.description,
    }
}

fn convert_price_range(r: PriceRangeWire) -> PriceRange {
    PriceRange {
        min_variant_price: r.min_variant_price,
        max_variant_price: r.max_variant_price,
    }
}

fn convert_page_info(p: PageInfoWire) -> PageInfo {
    PageInfo {
        has_next_page: p.has_next_page,
        has_previous_page: p.has_previous_page,
        start_cursor: p.start_cursor,
        end_cursor: p.end_cursor,
    }
}

fn convert_selected_option(o: SelectedOptionWire) -> SelectedOption {
    SelectedOption {
        name: o.name,
        value: o.value,
    }
}
