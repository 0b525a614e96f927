//! Material codes and their self-correcting normalization
//!
//! Item records store material as an integer code. Some external tools write
//! the same code scaled by 256 with garbage in the low byte, so a code that
//! matches nothing is retried once as `(code >> 8)`, clamped into the
//! enumeration's code range.

use serde::Serialize;

/// A closed enumeration of material codes
pub trait MaterialCode: Sized + Copy {
    /// Smallest known code
    const MIN_CODE: i32;
    /// Largest known code
    const MAX_CODE: i32;
    /// Material of `MIN_CODE`
    const LOWEST: Self;

    /// Direct mapping of a known code
    fn from_code(code: i32) -> Option<Self>;

    /// Canonical code of this material
    fn code(self) -> i32;

    /// Display name
    fn display_name(self) -> &'static str;
}

/// Weapon materials, coded `0..=9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WeaponMaterial {
    Iron = 0,
    Steel = 1,
    Silver = 2,
    Elven = 3,
    Dwarven = 4,
    Mithril = 5,
    Adamantium = 6,
    Ebony = 7,
    Orcish = 8,
    Daedric = 9,
}

const WEAPON_MATERIALS: [WeaponMaterial; 10] = [
    WeaponMaterial::Iron,
    WeaponMaterial::Steel,
    WeaponMaterial::Silver,
    WeaponMaterial::Elven,
    WeaponMaterial::Dwarven,
    WeaponMaterial::Mithril,
    WeaponMaterial::Adamantium,
    WeaponMaterial::Ebony,
    WeaponMaterial::Orcish,
    WeaponMaterial::Daedric,
];

const WEAPON_NAMES: [&str; 10] = [
    "Iron", "Steel", "Silver", "Elven", "Dwarven", "Mithril", "Adamantium", "Ebony", "Orcish",
    "Daedric",
];

impl MaterialCode for WeaponMaterial {
    const MIN_CODE: i32 = 0;
    const MAX_CODE: i32 = 9;
    const LOWEST: Self = Self::Iron;

    fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| WEAPON_MATERIALS.get(i))
            .copied()
    }

    fn code(self) -> i32 {
        self as i32
    }

    fn display_name(self) -> &'static str {
        WEAPON_NAMES[self as usize]
    }
}

/// Armor materials
///
/// Plate tiers are `0x0200 | weapon tier`. `0x0103` is a second, historical
/// chain code and maps to [`ArmorMaterial::Chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArmorMaterial {
    Leather,
    Chain,
    Iron,
    Steel,
    Silver,
    Elven,
    Dwarven,
    Mithril,
    Adamantium,
    Ebony,
    Orcish,
    Daedric,
}

/// Known armor codes in ascending order
const ARMOR_CODES: [(i32, ArmorMaterial); 13] = [
    (0x0000, ArmorMaterial::Leather),
    (0x0100, ArmorMaterial::Chain),
    (0x0103, ArmorMaterial::Chain),
    (0x0200, ArmorMaterial::Iron),
    (0x0201, ArmorMaterial::Steel),
    (0x0202, ArmorMaterial::Silver),
    (0x0203, ArmorMaterial::Elven),
    (0x0204, ArmorMaterial::Dwarven),
    (0x0205, ArmorMaterial::Mithril),
    (0x0206, ArmorMaterial::Adamantium),
    (0x0207, ArmorMaterial::Ebony),
    (0x0208, ArmorMaterial::Orcish),
    (0x0209, ArmorMaterial::Daedric),
];

impl MaterialCode for ArmorMaterial {
    const MIN_CODE: i32 = 0x0000;
    const MAX_CODE: i32 = 0x0209;
    const LOWEST: Self = Self::Leather;

    fn from_code(code: i32) -> Option<Self> {
        ARMOR_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|&(_, material)| material)
    }

    fn code(self) -> i32 {
        match self {
            Self::Leather => 0x0000,
            Self::Chain => 0x0100,
            Self::Iron => 0x0200,
            Self::Steel => 0x0201,
            Self::Silver => 0x0202,
            Self::Elven => 0x0203,
            Self::Dwarven => 0x0204,
            Self::Mithril => 0x0205,
            Self::Adamantium => 0x0206,
            Self::Ebony => 0x0207,
            Self::Orcish => 0x0208,
            Self::Daedric => 0x0209,
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            Self::Leather => "Leather",
            Self::Chain => "Chain",
            Self::Iron => "Iron",
            Self::Steel => "Steel",
            Self::Silver => "Silver",
            Self::Elven => "Elven",
            Self::Dwarven => "Dwarven",
            Self::Mithril => "Mithril",
            Self::Adamantium => "Adamantium",
            Self::Ebony => "Ebony",
            Self::Orcish => "Orcish",
            Self::Daedric => "Daedric",
        }
    }
}

/// Which material enumeration a code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Weapon,
    Armor,
}

impl std::str::FromStr for MaterialKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weapon" | "w" => Ok(Self::Weapon),
            "armor" | "armour" | "a" => Ok(Self::Armor),
            _ => Err(format!("Invalid material kind '{s}'. Valid values: weapon, armor")),
        }
    }
}

/// Resolve a coded value to a material. Never fails.
///
/// 1. Known codes map directly.
/// 2. Otherwise `(code >> 8)` clamped to `[MIN_CODE, MAX_CODE]` is tried once.
/// 3. If that lands in a gap, the nearest known code below it is used.
pub fn normalize_material<M: MaterialCode>(code: i32) -> M {
    if let Some(material) = M::from_code(code) {
        return material;
    }

    let shifted = (code >> 8).clamp(M::MIN_CODE, M::MAX_CODE);
    tracing::debug!("Material code {code:#x} unknown, retrying as {shifted:#x}");
    if let Some(material) = M::from_code(shifted) {
        return material;
    }

    (M::MIN_CODE..shifted)
        .rev()
        .find_map(M::from_code)
        .unwrap_or(M::LOWEST)
}

/// Display name of a weapon or armor material code
#[must_use]
pub fn material_display_name(kind: MaterialKind, code: i32) -> &'static str {
    match kind {
        MaterialKind::Weapon => normalize_material::<WeaponMaterial>(code).display_name(),
        MaterialKind::Armor => normalize_material::<ArmorMaterial>(code).display_name(),
    }
}
