// core/point_group.rs
// Space group (1..=230) -> crystallographic point group (1..=32).

use std::fmt;

use crate::error::{FigureError, Result};

pub const N_SPACE_GROUPS: u32 = 230;
pub const N_POINT_GROUPS: usize = 32;

/// Hermann–Mauguin symbols in International Tables order; index + 1 is the
/// point-group number.
pub const POINT_GROUP_SYMBOLS: [&str; N_POINT_GROUPS] = [
    "1", "-1", "2", "m", "2/m", "222", "mm2", "mmm", "4", "-4", "4/m", "422", "4mm", "-42m",
    "4/mmm", "3", "-3", "32", "3m", "-3m", "6", "-6", "6/m", "622", "6mm", "-62m", "6/mmm", "23",
    "m-3", "432", "-43m", "m-3m",
];

// Last space group of each point group. Space groups are numbered so that
// every point group owns one contiguous run.
const LAST_SPACE_GROUP: [u32; N_POINT_GROUPS] = [
    1, 2, 5, 9, 15, 24, 46, 74, 80, 82, 88, 98, 110, 122, 142, 146, 148, 155, 161, 167, 173, 174,
    176, 182, 186, 190, 194, 199, 206, 214, 220, 230,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrystalSystem {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointGroup(u8);

impl PointGroup {
    /// 1-based point-group number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// 0-based row/column in the relation matrix.
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    pub fn symbol(self) -> &'static str {
        POINT_GROUP_SYMBOLS[self.index()]
    }

    pub fn crystal_system(self) -> CrystalSystem {
        match self.0 {
            1..=2 => CrystalSystem::Triclinic,
            3..=5 => CrystalSystem::Monoclinic,
            6..=8 => CrystalSystem::Orthorhombic,
            9..=15 => CrystalSystem::Tetragonal,
            16..=20 => CrystalSystem::Trigonal,
            21..=27 => CrystalSystem::Hexagonal,
            _ => CrystalSystem::Cubic,
        }
    }

    pub fn is_centrosymmetric(self) -> bool {
        matches!(self.0, 2 | 5 | 8 | 11 | 15 | 17 | 20 | 23 | 27 | 29 | 32)
    }
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

pub fn point_group(space_group: u32) -> Result<PointGroup> {
    if !(1..=N_SPACE_GROUPS).contains(&space_group) {
        return Err(FigureError::Lookup { space_group });
    }
    let idx = LAST_SPACE_GROUP.partition_point(|&last| last < space_group);
    Ok(PointGroup(idx as u8 + 1))
}
