//! Status - Tier ごとのアーティファクト数（読み取り専用クエリ）

use serde::{Deserialize, Serialize};

use super::catalog::Catalog;
use crate::domain::Tier;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub hourly: usize,
    pub daily: usize,
    pub weekly: usize,
    pub monthly: usize,
    pub yearly: usize,
    pub manual: usize,
}

impl TierCounts {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            hourly: catalog.count(Tier::Hourly),
            daily: catalog.count(Tier::Daily),
            weekly: catalog.count(Tier::Weekly),
            monthly: catalog.count(Tier::Monthly),
            yearly: catalog.count(Tier::Yearly),
            manual: catalog.count(Tier::Manual),
        }
    }

    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::Hourly => self.hourly,
            Tier::Daily => self.daily,
            Tier::Weekly => self.weekly,
            Tier::Monthly => self.monthly,
            Tier::Yearly => self.yearly,
            Tier::Manual => self.manual,
        }
    }

    pub fn total(&self) -> usize {
        Tier::ALL.iter().map(|tier| self.get(*tier)).sum()
    }
}
