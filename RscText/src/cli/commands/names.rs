//! CLI commands for display-name tables

use super::definitions::CodeArg;
use crate::names::{
    ArmorMaterial, MaterialCode, MaterialKind, SKILL_COUNT, STAT_COUNT, WeaponMaterial,
    abbreviated_stat_name, material_display_name, normalize_material, skill_display_name,
    stat_description_id, stat_display_name,
};

/// Print a material's display name and the code it normalizes to
pub fn material(kind: MaterialKind, code: i32) {
    let canonical = match kind {
        MaterialKind::Weapon => normalize_material::<WeaponMaterial>(code).code(),
        MaterialKind::Armor => normalize_material::<ArmorMaterial>(code).code(),
    };
    let name = material_display_name(kind, code);

    if canonical == code {
        println!("{name}");
    } else {
        println!("{name} (normalized {code:#06x} -> {canonical:#06x})");
    }
}

fn codes(arg: CodeArg, count: usize) -> Vec<i32> {
    match arg {
        CodeArg::All => (0..count).filter_map(|c| i32::try_from(c).ok()).collect(),
        CodeArg::Code(code) => vec![code],
    }
}

/// Print skill names
pub fn skill(arg: CodeArg) {
    for code in codes(arg, SKILL_COUNT) {
        match skill_display_name(code) {
            "" => println!("{code:3}  (unknown)"),
            name => println!("{code:3}  {name}"),
        }
    }
}

/// Print stat names, abbreviations, and description records
pub fn stat(arg: CodeArg) {
    for code in codes(arg, STAT_COUNT) {
        match stat_description_id(code) {
            -1 => println!("{code:3}  (unknown)"),
            description => println!(
                "{code:3}  {:<4} {:<14} description record {description}",
                abbreviated_stat_name(code),
                stat_display_name(code)
            ),
        }
    }
}
