//! Integration-test support for the rig generator.
//!
//! - [`helpers`] — small scene constructors
//! - [`assertions`] — assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
