// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate text formatting for the topology document.

/// Formats a latitude or longitude with the `##.000000` mask.
///
/// Six fractional digits, always. Integer digits are optional under the
/// mask, so magnitudes below one lose their leading zero.
pub fn format_coordinate(value: f64) -> String {
    let text = format!("{value:.6}");
    if let Some(rest) = text.strip_prefix("0.") {
        format!(".{rest}")
    } else if let Some(rest) = text.strip_prefix("-0.") {
        format!("-.{rest}")
    } else {
        text
    }
}
