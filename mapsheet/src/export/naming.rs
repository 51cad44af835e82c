//! Cell labels and page file names.

use super::page::Orientation;

/// Spreadsheet-style column letters: 0 → `A`, 25 → `Z`, 26 → `AA`.
pub fn column_label(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col as u64 + 1;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    // Only ASCII letters were pushed.
    letters.into_iter().map(char::from).collect()
}

/// Human-readable cell label: column letters followed by the 1-based row.
pub fn cell_label(row: u32, col: u32) -> String {
    format!("{}{}", column_label(col), row + 1)
}

/// Deterministic page file name:
/// `{prefix}_{row+1:02}_{col+1:02}_{orientation}_z{target_zoom}.png`.
///
/// ```
/// use mapsheet::export::{page_file_name, Orientation};
///
/// assert_eq!(
///     page_file_name("map", 0, 2, Orientation::Portrait, 17),
///     "map_01_03_portrait_z17.png"
/// );
/// ```
pub fn page_file_name(
    prefix: &str,
    row: u32,
    col: u32,
    orientation: Orientation,
    target_zoom: u8,
) -> String {
    format!(
        "{}_{:02}_{:02}_{}_z{}.png",
        prefix,
        row + 1,
        col + 1,
        orientation,
        target_zoom
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_labels() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(1), "B");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(51), "AZ");
        assert_eq!(column_label(52), "BA");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    #[test]
    fn test_cell_label() {
        assert_eq!(cell_label(0, 0), "A1");
        assert_eq!(cell_label(1, 2), "C2");
        assert_eq!(cell_label(9, 26), "AA10");
    }

    #[test]
    fn test_file_name_padding() {
        assert_eq!(
            page_file_name("map", 1, 2, Orientation::Portrait, 17),
            "map_02_03_portrait_z17.png"
        );
        assert_eq!(
            page_file_name("berlin", 11, 0, Orientation::Landscape, 9),
            "berlin_12_01_landscape_z9.png"
        );
    }

    #[test]
    fn test_file_name_beyond_two_digits() {
        assert_eq!(
            page_file_name("map", 99, 0, Orientation::Portrait, 19),
            "map_100_01_portrait_z19.png"
        );
    }
}
