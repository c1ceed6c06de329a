use serde::Serialize;
use std::collections::HashMap;

/// A purchasable character credit pack
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub product_id: String,
    pub characters: u64,
    pub price_usd: u32,
    pub name: String,
}

/// Immutable pack catalog, built once at startup and never mutated
pub struct ProductCatalog {
    by_pack: HashMap<String, Product>,
}

impl ProductCatalog {
    /// The standard Chirpify credit packs
    pub fn standard() -> Self {
        let mut by_pack = HashMap::new();

        by_pack.insert(
            "starter".to_string(),
            Product {
                product_id: "pdt_0NZCiIwZqFmmRpNK6z00J".to_string(),
                characters: 10_000,
                price_usd: 5,
                name: "Starter Pack".to_string(),
            },
        );
        by_pack.insert(
            "pro".to_string(),
            Product {
                product_id: "pdt_0NZCiKxzvABY1VnpQrCS5".to_string(),
                characters: 50_000,
                price_usd: 10,
                name: "Pro Pack".to_string(),
            },
        );
        by_pack.insert(
            "power".to_string(),
            Product {
                product_id: "pdt_0NZCiMdfSCB8t18kVCowo".to_string(),
                characters: 200_000,
                price_usd: 25,
                name: "Power Pack".to_string(),
            },
        );

        Self { by_pack }
    }

    pub fn from_products(products: Vec<(String, Product)>) -> Self {
        Self {
            by_pack: products.into_iter().collect(),
        }
    }

    pub fn by_pack(&self, pack: &str) -> Option<&Product> {
        self.by_pack.get(pack)
    }

    /// Credits granted for a provider product id, as referenced by payment events
    pub fn credits_for_product(&self, product_id: &str) -> Option<u64> {
        self.by_pack
            .values()
            .find(|p| p.product_id == product_id)
            .map(|p| p.characters)
    }
}

/// A selectable synthesis voice
#[derive(Debug, Clone, Serialize)]
pub struct Voice {
    #[serde(rename = "id")]
    pub voice_id: String,
    pub name: String,
    pub desc: String,
}

/// Immutable voice catalog with a fixed default voice
pub struct VoiceCatalog {
    by_key: HashMap<String, Voice>,
    default_key: String,
}

impl VoiceCatalog {
    pub fn standard() -> Self {
        let mut by_key = HashMap::new();

        by_key.insert(
            "george".to_string(),
            Voice {
                voice_id: "JBFqnCBsd6RMkjVDRZzb".to_string(),
                name: "George".to_string(),
                desc: "Warm British".to_string(),
            },
        );
        by_key.insert(
            "aria".to_string(),
            Voice {
                voice_id: "9BWtsMINqrJLrRacOk9x".to_string(),
                name: "Aria".to_string(),
                desc: "Expressive American".to_string(),
            },
        );
        by_key.insert(
            "roger".to_string(),
            Voice {
                voice_id: "CwhRBWXzGAHq8TQ4Fs17".to_string(),
                name: "Roger".to_string(),
                desc: "Confident American".to_string(),
            },
        );
        by_key.insert(
            "sarah".to_string(),
            Voice {
                voice_id: "EXAVITQu4vr4xnSDxMaL".to_string(),
                name: "Sarah".to_string(),
                desc: "Soft American".to_string(),
            },
        );
        by_key.insert(
            "charlie".to_string(),
            Voice {
                voice_id: "IKne3meq5aSn9XLyUdCD".to_string(),
                name: "Charlie".to_string(),
                desc: "Casual Australian".to_string(),
            },
        );

        Self {
            by_key,
            default_key: "george".to_string(),
        }
    }

    /// Resolve a requested voice key, falling back to the default voice
    pub fn resolve(&self, key: Option<&str>) -> &Voice {
        key.and_then(|k| self.by_key.get(k))
            .unwrap_or_else(|| &self.by_key[&self.default_key])
    }

    pub fn all(&self) -> &HashMap<String, Voice> {
        &self.by_key
    }
}
