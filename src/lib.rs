//! Núcleo de despacho de la flota
//!
//! Ciclo de vida de viajes, validación de despacho, agregación financiera y
//! alertas sobre un almacén en memoria, expuestos por una API HTTP con Axum.

pub mod config;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
