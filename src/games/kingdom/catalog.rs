//! Static content for Cookie Kingdom: upgrades and collectible items.
//!
//! The engine never assumes a fixed id set; it works with whatever
//! `Catalog` it is handed. `Catalog::standard()` is the shipped content.

use std::collections::HashSet;

use thiserror::Error;

use super::state::{ItemDefinition, ProductionKind, Rarity, UpgradeDefinition};

/// Smallest upgrade base cost whose floored x1.15 cost curve is strictly increasing.
pub const MIN_UPGRADE_BASE_COST: u64 = 7;
/// Smallest item base cost whose floored x1.2 cost curve is strictly increasing.
pub const MIN_ITEM_BASE_COST: u64 = 5;

/// Content errors caught by [`Catalog::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate upgrade id `{0}`")]
    DuplicateUpgrade(String),
    #[error("duplicate item id `{0}`")]
    DuplicateItem(String),
    #[error("upgrade `{0}` has a negative or non-finite amount")]
    InvalidAmount(String),
    #[error("upgrade `{0}` needs a positive, finite level duration")]
    InvalidLevelDuration(String),
    #[error("`{id}` base cost {cost} is below the minimum of {min}")]
    BaseCostTooLow { id: String, cost: u64, min: u64 },
}

/// Ordered upgrade and item definitions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub upgrades: Vec<UpgradeDefinition>,
    pub items: Vec<ItemDefinition>,
}

impl Catalog {
    pub fn standard() -> Self {
        Self {
            upgrades: standard_upgrades(),
            items: standard_items(),
        }
    }

    pub fn find_upgrade(&self, id: &str) -> Option<&UpgradeDefinition> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn find_item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Check the content against the assumptions the cost curves and
    /// leveling clock rely on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for upgrade in &self.upgrades {
            if !seen.insert(upgrade.id.as_str()) {
                return Err(CatalogError::DuplicateUpgrade(upgrade.id.clone()));
            }
            if !upgrade.amount.is_finite() || upgrade.amount < 0.0 {
                return Err(CatalogError::InvalidAmount(upgrade.id.clone()));
            }
            if !upgrade.level_duration_sec.is_finite() || upgrade.level_duration_sec <= 0.0 {
                return Err(CatalogError::InvalidLevelDuration(upgrade.id.clone()));
            }
            if upgrade.base_cost < MIN_UPGRADE_BASE_COST {
                return Err(CatalogError::BaseCostTooLow {
                    id: upgrade.id.clone(),
                    cost: upgrade.base_cost,
                    min: MIN_UPGRADE_BASE_COST,
                });
            }
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateItem(item.id.clone()));
            }
            if item.base_cost < MIN_ITEM_BASE_COST {
                return Err(CatalogError::BaseCostTooLow {
                    id: item.id.clone(),
                    cost: item.base_cost,
                    min: MIN_ITEM_BASE_COST,
                });
            }
        }
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn upgrade(
    id: &str,
    name: &str,
    icon: &str,
    description: &str,
    kind: ProductionKind,
    amount: f64,
    base_cost: u64,
    level_duration_sec: f64,
) -> UpgradeDefinition {
    UpgradeDefinition {
        id: id.into(),
        name: name.into(),
        icon: icon.into(),
        description: description.into(),
        kind,
        amount,
        base_cost,
        level_duration_sec,
    }
}

fn standard_upgrades() -> Vec<UpgradeDefinition> {
    vec![
        upgrade(
            "oak-rolling-pin",
            "Oak Rolling Pin",
            "🪵",
            "+1 cookie per click",
            ProductionKind::Click,
            1.0,
            15,
            30.0,
        ),
        upgrade(
            "royal-chef",
            "Royal Chef",
            "👑",
            "+6 cookies per click",
            ProductionKind::Click,
            6.0,
            100,
            90.0,
        ),
        upgrade(
            "village-bakery",
            "Village Bakery",
            "🏠",
            "+1.0 cookies per second",
            ProductionKind::Cps,
            1.0,
            40,
            45.0,
        ),
        upgrade(
            "clockwork-oven",
            "Clockwork Oven",
            "⚙",
            "+5.0 cookies per second",
            ProductionKind::Cps,
            5.0,
            280,
            120.0,
        ),
    ]
}

fn standard_items() -> Vec<ItemDefinition> {
    let item = |id: &str, name: &str, badge: &str, rarity, base_cost, tooltip: &str| ItemDefinition {
        id: id.into(),
        name: name.into(),
        badge: badge.into(),
        tooltip: tooltip.into(),
        rarity,
        base_cost,
    };
    vec![
        item(
            "sugar-charm",
            "Sugar Charm",
            "SC",
            Rarity::Common,
            45,
            "A sweet trinket that smells like fresh dough.",
        ),
        item(
            "flour-badge",
            "Flour Badge",
            "FB",
            Rarity::Uncommon,
            85,
            "Awarded to bakers who finish 100 loaves.",
        ),
        item(
            "butter-seal",
            "Butter Seal",
            "BS",
            Rarity::Rare,
            140,
            "Stamped with the mark of the royal pantry.",
        ),
        item(
            "royal-crest",
            "Royal Crest",
            "RC",
            Rarity::Legendary,
            220,
            "A crest reserved for masters of cookie kingdoms.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_valid() {
        assert_eq!(Catalog::standard().validate(), Ok(()));
    }

    #[test]
    fn standard_catalog_has_both_production_kinds() {
        let catalog = Catalog::standard();
        assert!(catalog.upgrades.iter().any(|u| u.kind == ProductionKind::Click));
        assert!(catalog.upgrades.iter().any(|u| u.kind == ProductionKind::Cps));
        assert_eq!(catalog.items.len(), Rarity::all().len());
    }

    #[test]
    fn empty_catalog_is_valid() {
        assert_eq!(Catalog::default().validate(), Ok(()));
    }

    #[test]
    fn find_by_id() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.find_upgrade("royal-chef").map(|u| u.base_cost), Some(100));
        assert_eq!(
            catalog.find_item("royal-crest").map(|i| i.rarity),
            Some(Rarity::Legendary)
        );
        assert!(catalog.find_upgrade("nope").is_none());
        assert!(catalog.find_item("nope").is_none());
    }

    #[test]
    fn duplicate_upgrade_rejected() {
        let mut catalog = Catalog::standard();
        let dup = catalog.upgrades[0].clone();
        catalog.upgrades.push(dup);
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::DuplicateUpgrade("oak-rolling-pin".into()))
        );
    }

    #[test]
    fn duplicate_item_rejected() {
        let mut catalog = Catalog::standard();
        let dup = catalog.items[1].clone();
        catalog.items.push(dup);
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::DuplicateItem("flour-badge".into()))
        );
    }

    #[test]
    fn zero_level_duration_rejected() {
        let mut catalog = Catalog::standard();
        catalog.upgrades[2].level_duration_sec = 0.0;
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::InvalidLevelDuration("village-bakery".into()))
        );
    }

    #[test]
    fn nan_amount_rejected() {
        let mut catalog = Catalog::standard();
        catalog.upgrades[1].amount = f64::NAN;
        assert_eq!(
            catalog.validate(),
            Err(CatalogError::InvalidAmount("royal-chef".into()))
        );
    }

    #[test]
    fn cheap_base_cost_rejected() {
        let mut catalog = Catalog::standard();
        catalog.items[0].base_cost = 4;
        let err = catalog.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "`sugar-charm` base cost 4 is below the minimum of 5"
        );
    }
}
