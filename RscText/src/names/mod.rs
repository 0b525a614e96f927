//! Display names for coded game enumerations
//!
//! Static tables for skills and stats, plus material codes with
//! normalization of values written in an overlapping layout.

mod material;
mod tables;

pub use material::{
    ArmorMaterial, MaterialCode, MaterialKind, WeaponMaterial, material_display_name,
    normalize_material,
};
pub use tables::{
    SKILL_COUNT, STAT_COUNT, abbreviated_stat_name, skill_display_name, stat_description_id,
    stat_display_name,
};
