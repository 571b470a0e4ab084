//! Repositorios en memoria
//!
//! Colecciones de entidades y el almacén compartido de la flota.

pub mod entity_store;
pub mod fleet_store;

pub use entity_store::{Entity, EntityStore};
pub use fleet_store::{AlertBook, FleetData, FleetStore};
