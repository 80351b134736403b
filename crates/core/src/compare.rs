//! Side-by-side comparison list

use serde::{Deserialize, Serialize};

use crate::domain::{Offer, OfferId, Product, ProductId};

/// An offer pinned to the comparison view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOffer {
    pub product_id: ProductId,
    pub offer_id: OfferId,
    #[serde(flatten)]
    pub offer: Offer,
}

impl CompareOffer {
    pub fn from_product(product: &Product, index: usize) -> Option<Self> {
        let offer = product.offers.get(index)?;
        Some(Self {
            product_id: product.id.clone(),
            offer_id: product.offer_id(index),
            offer: offer.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompareList {
    #[serde(default)]
    offers: Vec<CompareOffer>,
}

impl CompareList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adding an offer that is already listed is a no-op. Returns whether
    /// the offer was inserted.
    pub fn add_offer(&mut self, offer: CompareOffer) -> bool {
        if self.offers.iter().any(|listed| listed.offer_id == offer.offer_id) {
            return false;
        }
        self.offers.push(offer);
        true
    }

    pub fn remove_offer(&mut self, offer_id: &OfferId) -> bool {
        let before = self.offers.len();
        self.offers.retain(|listed| listed.offer_id != *offer_id);
        self.offers.len() != before
    }

    pub fn clear(&mut self) {
        self.offers.clear();
    }

    pub fn offers(&self) -> &[CompareOffer] {
        &self.offers
    }

    pub fn total(&self) -> f64 {
        compare_total(self.offers.iter().map(|listed| (listed.offer.price, listed.offer.ship_fee)))
    }
}

/// Sum of price plus shipping over `(price, ship_fee)` pairs.
pub fn compare_total(offers: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    offers.into_iter().map(|(price, ship_fee)| price + ship_fee).sum()
}
