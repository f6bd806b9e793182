//! Strata Core Types and Definitions
//!
//! This crate provides the foundational types for Strata pipeline diagrams:
//!
//! - **Colors**: CSS color handling ([`color::Color`])
//! - **Geometry**: Points, sizes and bounds ([`geometry`] module)
//! - **Draw**: Shapes, render layers and text measurement ([`draw`] module)
//! - **Semantic**: The pipeline model ([`semantic`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod semantic;
