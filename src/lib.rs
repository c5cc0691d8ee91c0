//! MintLedger - A multi-asset token ledger with centralized administrative control
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`ledger`] - Class registry, balance accounting, gates, and every
//!   mutating and read operation with its authorization and invariant checks
//!
//! ## Identity & Events
//! - [`identity`] - Account principals (32-byte, address-like)
//! - [`events`] - Event definitions and notification sinks
//!
//! ## State Management
//! - [`snapshot`] - State capture, binary serialization, digests
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`runtime`] - Hosting-runtime shim and collaborator hooks

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod ledger;

// ============================================================================
// Identity & Events
// ============================================================================
pub mod events;
pub mod identity;

// ============================================================================
// State Management
// ============================================================================
pub mod snapshot;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
pub mod runtime;
