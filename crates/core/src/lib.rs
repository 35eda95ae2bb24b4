//! Core cost-control logic for Obralis.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `wbs` - Work-breakdown-structure tree and subtree rollups
//! - `apu` - Unit-price analysis (resource costing)
//! - `markup` - Direct-cost to sale-price markup chain
//! - `budget` - Budget versions, lines, and the version lifecycle
//! - `certification` - Progress-certification billing engine
//! - `events` - Outbox event records for reliable relay
//! - `access` - Actions gated by the host's access-control collaborator

pub mod access;
pub mod apu;
pub mod budget;
pub mod certification;
pub mod events;
pub mod markup;
pub mod wbs;
