// src/models/catalog.rs

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::appointment::BookingOrigin;

// --- 1. Tratamentos ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    // Apenas informativo: a agenda trabalha sempre com blocos de 60 minutos
    pub duration: u32,
    pub active: bool,
    pub description: Option<String>,
}

// --- 2. Promoções ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub discount_text: String,
    pub valid_until: Option<NaiveDate>,
    pub active: bool,
    // Preço opcional; sem ele a promoção sai por 0
    pub price: Option<Decimal>,
}

// --- 3. Produtos ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategoryType {
    Retail,       // Venda ao cliente
    Professional, // Insumo de cabine
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub active: bool,
    pub description: Option<String>,
    pub category: Option<String>,
    pub category_type: ProductCategoryType,
}

// --- Chave do catálogo ---

/// Identifica um item pelo tipo + id, nunca pelo nome de exibição:
/// um serviço e um produto podem ter o mesmo nome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum CatalogKey {
    Service(String),
    Promotion(String),
    Product(String),
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKey::Service(id) => write!(f, "service:{id}"),
            CatalogKey::Promotion(id) => write!(f, "promotion:{id}"),
            CatalogKey::Product(id) => write!(f, "product:{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogItem {
    Service(Service),
    Promotion(Promotion),
    Product(Product),
}

impl CatalogItem {
    pub fn key(&self) -> CatalogKey {
        match self {
            CatalogItem::Service(s) => CatalogKey::Service(s.id.clone()),
            CatalogItem::Promotion(p) => CatalogKey::Promotion(p.id.clone()),
            CatalogItem::Product(p) => CatalogKey::Product(p.id.clone()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Service(s) => &s.name,
            CatalogItem::Promotion(p) => &p.title,
            CatalogItem::Product(p) => &p.name,
        }
    }

    pub fn price(&self) -> Decimal {
        match self {
            CatalogItem::Service(s) => s.price,
            CatalogItem::Promotion(p) => p.price.unwrap_or(Decimal::ZERO),
            CatalogItem::Product(p) => p.price,
        }
    }

    /// O fluxo público só oferece produtos de varejo com estoque;
    /// a equipe pode lançar qualquer item ativo.
    pub fn is_offerable(&self, origin: BookingOrigin) -> bool {
        match (self, origin) {
            (CatalogItem::Service(s), _) => s.active,
            (CatalogItem::Promotion(p), _) => p.active,
            (CatalogItem::Product(p), BookingOrigin::Public) => {
                p.active && p.stock > 0 && p.category_type == ProductCategoryType::Retail
            }
            (CatalogItem::Product(p), BookingOrigin::Staff) => p.active,
        }
    }
}

// Formato de entrada (arquivo de seed / telas de cadastro)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    #[serde(default)]
    pub services: Vec<Service>,
    #[serde(default)]
    pub promotions: Vec<Promotion>,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Catálogo indexado por `CatalogKey`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: HashMap<CatalogKey, CatalogItem>,
}

impl Catalog {
    pub fn get(&self, key: &CatalogKey) -> Option<&CatalogItem> {
        self.items.get(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Itens que o chamador pode reservar, ordenados por nome.
    pub fn offerable(&self, origin: BookingOrigin) -> Vec<&CatalogItem> {
        let mut items: Vec<&CatalogItem> = self
            .items
            .values()
            .filter(|item| item.is_offerable(origin))
            .collect();
        items.sort_by(|a, b| a.name().cmp(b.name()));
        items
    }
}

impl From<CatalogData> for Catalog {
    fn from(data: CatalogData) -> Self {
        let items = data
            .services
            .into_iter()
            .map(CatalogItem::Service)
            .chain(data.promotions.into_iter().map(CatalogItem::Promotion))
            .chain(data.products.into_iter().map(CatalogItem::Product))
            .map(|item| (item.key(), item))
            .collect();

        Self { items }
    }
}
