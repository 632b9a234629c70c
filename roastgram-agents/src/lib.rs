//! roastgram Agents
//!
//! Reviewer agents that critique a fetched profile snapshot:
//! - **Art Director**: visual read of the avatar and overall presentation
//! - **Copywriter**: storytelling and engagement in post captions
//! - **Marketer**: bio positioning plus competitor comparison
//!
//! ## Modular Personas
//!
//! Reviewer behaviors are defined via TOML persona files in `prompts/`.
//! See [`persona::PersonaRegistry`] for loading and managing personas.

pub mod backend;
pub mod persona;
pub mod research;
pub mod panel;

pub use backend::*;
pub use persona::*;
pub use research::*;
pub use panel::*;
