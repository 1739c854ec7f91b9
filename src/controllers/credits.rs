//! Credits controller

use std::collections::BTreeMap;
use std::sync::Arc;

use super::InFlight;
use crate::api::AddCreditsResponse;
use crate::auth::AuthSession;
use crate::error::{ClientError, ClientResult};
use crate::models::PricingFeature;

/// Purchasable credit bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditPack {
    pub amount: u32,
    pub label: &'static str,
    pub price: &'static str,
    pub description: &'static str,
    pub highlight: bool,
}

pub const CREDIT_PACKS: [CreditPack; 3] = [
    CreditPack {
        amount: 10,
        label: "Starter",
        price: "Free",
        description: "Get started with basic features",
        highlight: false,
    },
    CreditPack {
        amount: 50,
        label: "Writer",
        price: "$4.99",
        description: "Perfect for short stories & essays",
        highlight: true,
    },
    CreditPack {
        amount: 200,
        label: "Author",
        price: "$14.99",
        description: "Full novels & deep analysis",
        highlight: false,
    },
];

pub const BUY_FAILED: &str = "Failed to add credits";

pub struct CreditsController {
    auth: Arc<AuthSession>,
    inflight: InFlight,
}

impl CreditsController {
    pub fn new(auth: Arc<AuthSession>) -> Self {
        Self {
            auth,
            inflight: InFlight::new(),
        }
    }

    pub fn is_out_of_credits(&self) -> bool {
        self.auth.credits() == 0
    }

    /// Index of the pack whose purchase is pending
    pub fn buying(&self) -> Option<usize> {
        CREDIT_PACKS
            .iter()
            .position(|p| self.inflight.is_active(p.label))
    }

    pub async fn buy(&self, index: usize) -> ClientResult<AddCreditsResponse> {
        let pack = CREDIT_PACKS
            .get(index)
            .ok_or_else(|| ClientError::Validation(format!("Unknown credit pack {}", index)))?;

        let _flight = self.inflight.begin(pack.label)?;
        let res = self.auth.gateway().add_credits(pack.amount).await?;
        tracing::info!(amount = pack.amount, new_balance = res.new_balance, "Credits added");

        self.auth.refresh_user().await;
        Ok(res)
    }

    pub async fn pricing(&self) -> ClientResult<BTreeMap<String, PricingFeature>> {
        self.auth.gateway().pricing().await
    }

    pub async fn balance(&self) -> ClientResult<u32> {
        self.auth.gateway().credit_balance().await
    }
}

pub fn purchase_notice(pack: &CreditPack, res: &AddCreditsResponse) -> String {
    format!(
        "Added {} credits! New balance: {}",
        pack.amount, res.new_balance
    )
}
