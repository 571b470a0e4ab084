//! Configuración del proyecto
//!
//! Este módulo contiene las variables de entorno y los umbrales de alertas.

pub mod environment;

pub use environment::*;
