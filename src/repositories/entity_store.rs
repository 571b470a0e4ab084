//! Colección en memoria indexada por id
//!
//! Conserva el orden de inserción, que es el orden en que se listan las entidades.

use uuid::Uuid;

use crate::models::{Driver, FuelLog, MaintenanceLog, Trip, Vehicle};

/// Entidad identificable por un `Uuid`
pub trait Entity: Clone {
    fn id(&self) -> Uuid;
}

impl Entity for Vehicle {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Driver {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Trip {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for FuelLog {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for MaintenanceLog {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct EntityStore<T> {
    items: Vec<T>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    /// Inserta o reemplaza la entidad con el mismo id
    pub fn upsert(&mut self, item: T) {
        match self.get_mut(item.id()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn all(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateVehicleRequest;

    fn vehicle(plate: &str) -> Vehicle {
        Vehicle::new(CreateVehicleRequest {
            registration: plate.to_string(),
            name: "Volvo FH16".to_string(),
            max_capacity_kg: 26000.0,
            odometer_km: None,
            acquisition_cost: None,
            region: None,
            license_expiry: None,
            next_service_due_km: None,
        })
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut store = EntityStore::new();
        let first = vehicle("AB-123-CD");
        let second = vehicle("EF-456-GH");
        store.upsert(first.clone());
        store.upsert(second.clone());

        let mut renamed = first.clone();
        renamed.name = "Scania R500".to_string();
        store.upsert(renamed);

        assert_eq!(store.len(), 2);
        assert_eq!(store.all()[0].name, "Scania R500");
        assert_eq!(store.all()[1].id, second.id);
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut store: EntityStore<Vehicle> = EntityStore::new();
        assert!(store.remove(Uuid::new_v4()).is_none());
        assert!(store.is_empty());
    }
}
