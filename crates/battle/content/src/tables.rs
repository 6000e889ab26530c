//! The built-in elemental affinity table.
//!
//! Rows are the attacking element, columns the defending element, both in
//! catalog order (Neutral, Water, Earth, Fire, Wind, Poison, Holy, Dark,
//! Ghost, Undead). One matrix per defense level; higher levels sharpen both
//! the resistances and the weaknesses.

use battle_core::{Element, ElementTable};

#[rustfmt::skip]
const LEVEL_1: [[i16; 10]; 10] = [
    [100, 100, 100, 100, 100, 100, 100, 100,  70, 100],
    [100,  25, 100,  90, 175, 100, 100, 100, 100, 100],
    [100, 100,  50, 125,  90, 125, 100, 100, 100, 100],
    [100,  90, 150,  25, 100, 125, 100, 100, 100, 125],
    [100, 175,  50, 100,  25, 125, 100, 100, 100, 100],
    [100, 100, 125, 125, 125,   0,  75,  50, 100,  50],
    [100, 100, 100, 100, 100, 100,   0, 125, 100, 150],
    [100, 100, 100, 100, 100,  50, 125,   0, 100,   0],
    [ 70, 100, 100, 100, 100, 100, 100, 100, 125, 100],
    [100, 100, 100, 100, 100,  50,   0,   0, 100,   0],
];

#[rustfmt::skip]
const LEVEL_2: [[i16; 10]; 10] = [
    [100, 100, 100, 100, 100, 100, 100, 100,  50, 100],
    [100,   0, 100,  80, 175, 100, 100, 100, 100, 100],
    [100, 100,  25, 125,  75, 125, 100, 100, 100, 100],
    [100,  80, 175,   0, 100, 125, 100, 100, 100, 150],
    [100, 175,  25, 100,   0, 125, 100, 100, 100, 100],
    [100, 100, 125, 125, 125,   0,  50,  25, 100,  25],
    [100, 100, 100, 100, 100, 100,   0, 142, 100, 175],
    [100, 100, 100, 100, 100,  25, 142,   0, 100,   0],
    [ 50, 100, 100, 100, 100, 100, 100, 100, 150, 100],
    [100, 100, 100, 100, 100,  25,   0,   0, 100,   0],
];

#[rustfmt::skip]
const LEVEL_3: [[i16; 10]; 10] = [
    [100, 100, 100, 100, 100, 100, 100, 100,  25, 100],
    [100, -25, 100,  70, 200, 100, 100, 100, 100, 125],
    [100, 100,   0, 150,  50, 125, 100, 100, 100, 100],
    [100,  70, 200, -25, 100, 125, 100, 100, 100, 175],
    [100, 200,   0, 100, -25, 125, 100, 100, 100, 100],
    [100, 100, 125, 125, 125,   0,  25,   0, 100,   0],
    [100, 100, 100, 100, 100, 125,   0, 170, 100, 200],
    [100, 100, 100, 100, 100,   0, 170,   0, 100,   0],
    [ 25, 100, 100, 100, 100, 100, 100, 100, 175, 100],
    [100, 100, 100, 100, 100,   0,   0,   0, 100,   0],
];

#[rustfmt::skip]
const LEVEL_4: [[i16; 10]; 10] = [
    [100, 100, 100, 100, 100, 100, 100, 100,   0, 100],
    [100, -50, 100,  60, 200, 100, 100, 100, 100, 150],
    [100, 100, -25, 175,  25, 125, 100, 100, 100, 100],
    [100,  60, 200, -50, 100, 125, 100, 100, 100, 200],
    [100, 200, -25, 100, -50, 125, 100, 100, 100, 100],
    [100, 100, 125, 125, 125,   0,   0, -25, 100, -25],
    [100, 100, 100, 100, 100, 125,   0, 200, 100, 220],
    [100, 100, 100, 100, 100, -25, 200,   0, 100,   0],
    [  0, 100, 100, 100, 100, 100, 100, 100, 200, 100],
    [100, 100, 100, 100, 100, -25,   0,   0, 100,   0],
];

const LEVELS: [&[[i16; 10]; 10]; 4] = [&LEVEL_1, &LEVEL_2, &LEVEL_3, &LEVEL_4];

/// Builds the standard affinity table.
pub fn standard_elements() -> ElementTable {
    let mut table = ElementTable::neutral();
    for (index, matrix) in LEVELS.iter().enumerate() {
        for (atk, row) in matrix.iter().enumerate() {
            for (def, &pct) in row.iter().enumerate() {
                let (Some(atk), Some(def)) =
                    (Element::from_repr(atk as u8), Element::from_repr(def as u8))
                else {
                    continue;
                };
                table.set(index as u8 + 1, atk, def, pct);
            }
        }
    }
    table
}
