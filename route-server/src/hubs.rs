//! Fixed catalogs of rail stations and airports.
//!
//! Rail and flight candidates are modelled through a small set of hubs with
//! known coordinates. Catalogs are built once at startup and shared
//! immutably; iteration order is insertion order, which makes nearest-hub
//! ties deterministic.

use crate::geo::{Coordinate, haversine_km};

/// A station or airport.
#[derive(Debug, Clone, PartialEq)]
pub struct Hub {
    pub name: String,
    pub location: Coordinate,
}

impl Hub {
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// A hub together with its distance from some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyHub<'a> {
    pub hub: &'a Hub,
    pub distance_km: f64,
}

/// An ordered, immutable collection of hubs.
#[derive(Debug, Clone, Default)]
pub struct HubCatalog {
    hubs: Vec<Hub>,
}

impl HubCatalog {
    pub fn new(hubs: Vec<Hub>) -> Self {
        Self { hubs }
    }

    pub fn hubs(&self) -> &[Hub] {
        &self.hubs
    }

    pub fn len(&self) -> usize {
        self.hubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hubs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Hub> {
        self.hubs.iter().find(|h| h.name == name)
    }

    /// The `k` hubs nearest to `point`, closest first.
    ///
    /// The sort is stable: equidistant hubs keep catalog order.
    pub fn nearest(&self, point: Coordinate, k: usize) -> Vec<NearbyHub<'_>> {
        let mut nearby: Vec<NearbyHub<'_>> = self
            .hubs
            .iter()
            .map(|hub| NearbyHub {
                hub,
                distance_km: haversine_km(point, hub.location),
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        nearby.truncate(k);
        nearby
    }
}

/// Fluent builder for a [`HubCatalog`].
#[derive(Debug, Default)]
pub struct HubCatalogBuilder {
    hubs: Vec<Hub>,
}

impl HubCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hub. A later hub with the same name replaces the earlier one
    /// in place.
    pub fn add(mut self, name: &str, lat: f64, lon: f64) -> Self {
        let hub = Hub::new(name, Coordinate::new(lat, lon));
        match self.hubs.iter_mut().find(|h| h.name == name) {
            Some(existing) => *existing = hub,
            None => self.hubs.push(hub),
        }
        self
    }

    pub fn build(self) -> HubCatalog {
        HubCatalog::new(self.hubs)
    }
}

/// Major Indian rail terminals.
pub fn india_rail_hubs() -> HubCatalog {
    HubCatalogBuilder::new()
        .add("Howrah (HWH)", 22.5893, 88.3570)
        .add("Sealdah (SDAH)", 22.5697, 88.3736)
        .add("New Delhi (NDLS)", 28.6430, 77.2215)
        .add("Chennai Central (MAS)", 13.0823, 80.2750)
        .add("Mumbai CSMT (CSMT)", 18.9398, 72.8356)
        .add("Secunderabad (SC)", 17.4350, 78.5011)
        .build()
}

/// Major Indian airports.
pub fn india_air_hubs() -> HubCatalog {
    HubCatalogBuilder::new()
        .add("Kolkata CCU", 22.6547, 88.4467)
        .add("Delhi DEL", 28.5562, 77.1000)
        .add("Mumbai BOM", 19.0952, 72.8741)
        .add("Bengaluru BLR", 13.1992, 77.7063)
        .add("Chennai MAA", 12.9941, 80.1809)
        .add("Hyderabad HYD", 17.2400, 78.4294)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogs() {
        assert_eq!(india_rail_hubs().len(), 6);
        assert_eq!(india_air_hubs().len(), 6);
        assert!(india_rail_hubs().get("Howrah (HWH)").is_some());
        assert!(india_air_hubs().get("Delhi DEL").is_some());
    }

    #[test]
    fn nearest_orders_by_distance() {
        let catalog = india_rail_hubs();
        let esplanade = Coordinate::new(22.5667, 88.3667);
        let nearest = catalog.nearest(esplanade, 3);

        assert_eq!(nearest.len(), 3);
        let names: Vec<&str> = nearest.iter().map(|n| n.hub.name.as_str()).collect();
        assert_eq!(names[..2], ["Sealdah (SDAH)", "Howrah (HWH)"]);
        assert!(nearest.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[test]
    fn nearest_with_k_above_len() {
        let catalog = india_air_hubs();
        assert_eq!(catalog.nearest(Coordinate::new(0.0, 0.0), 10).len(), 6);
    }

    #[test]
    fn nearest_ties_keep_catalog_order() {
        let catalog = HubCatalogBuilder::new()
            .add("East", 0.0, 1.0)
            .add("West", 0.0, -1.0)
            .add("North", 1.0, 0.0)
            .build();

        let nearest = catalog.nearest(Coordinate::new(0.0, 0.0), 2);
        assert_eq!(nearest[0].hub.name, "East");
        assert_eq!(nearest[1].hub.name, "West");
    }

    #[test]
    fn builder_replaces_duplicates_in_place() {
        let catalog = HubCatalogBuilder::new()
            .add("A", 1.0, 1.0)
            .add("B", 2.0, 2.0)
            .add("A", 3.0, 3.0)
            .build();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.hubs()[0].location, Coordinate::new(3.0, 3.0));
    }

    #[test]
    fn empty_catalog() {
        let catalog = HubCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.nearest(Coordinate::new(0.0, 0.0), 4).is_empty());
    }
}
