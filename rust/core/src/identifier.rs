// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Beacon identifiers derived from coordinates.
//!
//! The identifier is laid out like a UUID (8-4-4-4-12) but is a plain
//! encoding of coordinate bytes, consumed downstream as a join key:
//!
//! ```text
//! Z0Z1Z2Z3-0000-Y0Y1-Y2Y3-0000X0X1X2X3
//! ```
//!
//! `Xn`, `Yn` and `Zn` are byte `n` of the little-endian IEEE-754
//! representation of `x` (f64), `y` (f64) and `z_index` (f32). Only the four
//! low-order bytes of each f64 take part, so two beacons with the same
//! coordinates always collide.

use std::fmt::Write;

/// Encode a coordinate triple into an uppercase identifier.
pub fn encode(x: f64, y: f64, z_index: f32) -> String {
    let x = x.to_le_bytes();
    let y = y.to_le_bytes();
    let z = z_index.to_le_bytes();

    let mut id = String::with_capacity(36);
    push_hex(&mut id, &z);
    id.push_str("-0000-");
    push_hex(&mut id, &y[0..2]);
    id.push('-');
    push_hex(&mut id, &y[2..4]);
    id.push_str("-0000");
    push_hex(&mut id, &x[0..4]);
    id
}

fn push_hex(out: &mut String, bytes: &[u8]) {
    for b in bytes {
        // Writing into a String cannot fail
        let _ = write!(out, "{b:02X}");
    }
}
