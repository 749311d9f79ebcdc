//! Data models for catalog entities.
//!
//! `Hero` mirrors the shape of the public superhero dataset so remote
//! records deserialize directly. `HeroCreate` and `HeroPatch` are the
//! inputs UI consumers hand to the repository.

pub mod hero;

pub use hero::{
    Appearance, Biography, Connections, Hero, HeroCreate, HeroImages, HeroPatch, Powerstats, Work,
    DEFAULT_ALIGNMENT, DEFAULT_POWERSTAT, DEFAULT_PUBLISHER, NO_ALTER_EGOS, PLACEHOLDER,
    PLACEHOLDER_IMAGE_URL,
};
