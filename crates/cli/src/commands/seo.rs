//! JSON-LD output.

use storefront_sdk::SdkConfig;
use storefront_sdk::seo::product_json_ld;

use super::{Source, fetch_product};

/// Print product JSON-LD.
pub async fn product(
    config: &SdkConfig,
    source: Source,
    handle: &str,
    base_url: &str,
) -> storefront_sdk::Result<()> {
    let product = fetch_product(config, source, handle).await?;
    let json_ld = product_json_ld(&product, base_url);

    let rendered = serde_json::to_string_pretty(&json_ld).unwrap_or_else(|_| json_ld.to_string());
    tracing::info!("\n{rendered}");
    Ok(())
}
