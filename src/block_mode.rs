//! The 11-bit block mode field (bits 0..=10 of a normal block).
//!
//! The field selects the weight grid size, the plane count and the weight range.
//! Layouts follow the "2D block mode" table of the ASTC specification.

use crate::bits::get_bit;
use crate::ise::IseParams;

/// Bits 0..=8 of a void-extent block.
pub const VOID_EXTENT_MARKER: u32 = 0x1FC;

/// Weight range class: `r` (3 bits) and the high-precision flag `h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RangeClass {
    params: IseParams,
    r: u32,
    h: u32,
}

const RANGE_CLASSES: [RangeClass; 12] = [
    RangeClass { params: IseParams::plain(1), r: 2, h: 0 },
    RangeClass { params: IseParams::trit(0), r: 3, h: 0 },
    RangeClass { params: IseParams::plain(2), r: 4, h: 0 },
    RangeClass { params: IseParams::quint(0), r: 5, h: 0 },
    RangeClass { params: IseParams::trit(1), r: 6, h: 0 },
    RangeClass { params: IseParams::plain(3), r: 7, h: 0 },
    RangeClass { params: IseParams::quint(1), r: 2, h: 1 },
    RangeClass { params: IseParams::trit(2), r: 3, h: 1 },
    RangeClass { params: IseParams::plain(4), r: 4, h: 1 },
    RangeClass { params: IseParams::quint(2), r: 5, h: 1 },
    RangeClass { params: IseParams::trit(3), r: 6, h: 1 },
    RangeClass { params: IseParams::plain(5), r: 7, h: 1 },
];

fn range_class(params: IseParams) -> Option<RangeClass> {
    RANGE_CLASSES.iter().copied().find(|c| c.params == params)
}

/// Whether a weight grid may use this encoding at all.
pub fn supports_weight_range(params: IseParams) -> bool {
    range_class(params).is_some()
}

fn weight_params(r: u32, h: u32) -> Option<IseParams> {
    RANGE_CLASSES.iter().find(|c| c.r == r && c.h == h).map(|c| c.params)
}

/// Whether a grid dimension is weight-range-independent or offset by one of the
/// two free variables of a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Term {
    Fixed(u32),
    PlusA(u32),
    PlusB(u32),
}

impl Term {
    fn bounds(self, a_max: u32, b_max: u32) -> (u32, u32) {
        match self {
            Term::Fixed(c) => (c, c),
            Term::PlusA(c) => (c, c + a_max),
            Term::PlusB(c) => (c, c + b_max),
        }
    }
}

/// Rows of the layout table, named after the grid size they encode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LayoutKind {
    WidthB4HeightA2,
    WidthB8HeightA2,
    WidthA2HeightB8,
    WidthA2HeightB6,
    WidthB2HeightA2,
    Width12HeightA2,
    WidthA2Height12,
    Width6Height10,
    Width10Height6,
    WidthA6HeightB6,
}

#[derive(Clone, Copy, Debug)]
struct Layout {
    kind: LayoutKind,
    a_bits: u32,
    b_bits: u32,
    width: Term,
    height: Term,
}

/// Scanned in order; the first row that can hold the grid is used.
const LAYOUTS: [Layout; 10] = [
    Layout { kind: LayoutKind::WidthB4HeightA2, a_bits: 2, b_bits: 2, width: Term::PlusB(4), height: Term::PlusA(2) },
    Layout { kind: LayoutKind::WidthB8HeightA2, a_bits: 2, b_bits: 2, width: Term::PlusB(8), height: Term::PlusA(2) },
    Layout { kind: LayoutKind::WidthA2HeightB8, a_bits: 2, b_bits: 2, width: Term::PlusA(2), height: Term::PlusB(8) },
    Layout { kind: LayoutKind::WidthA2HeightB6, a_bits: 2, b_bits: 1, width: Term::PlusA(2), height: Term::PlusB(6) },
    Layout { kind: LayoutKind::WidthB2HeightA2, a_bits: 2, b_bits: 1, width: Term::PlusB(2), height: Term::PlusA(2) },
    Layout { kind: LayoutKind::Width12HeightA2, a_bits: 2, b_bits: 0, width: Term::Fixed(12), height: Term::PlusA(2) },
    Layout { kind: LayoutKind::WidthA2Height12, a_bits: 2, b_bits: 0, width: Term::PlusA(2), height: Term::Fixed(12) },
    Layout { kind: LayoutKind::Width6Height10, a_bits: 0, b_bits: 0, width: Term::Fixed(6), height: Term::Fixed(10) },
    Layout { kind: LayoutKind::Width10Height6, a_bits: 0, b_bits: 0, width: Term::Fixed(10), height: Term::Fixed(6) },
    Layout { kind: LayoutKind::WidthA6HeightB6, a_bits: 2, b_bits: 2, width: Term::PlusA(6), height: Term::PlusB(6) },
];

struct Fields {
    d: u32,
    h: u32,
    r: u32,
    a: u32,
    b: u32,
}

impl Layout {
    /// Solves for `(a, b)`, or `None` when the grid is outside this row.
    fn solve(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        let a_max = (1 << self.a_bits) - 1;
        let b_max = (1 << self.b_bits) - 1;
        let (w_min, w_max) = self.width.bounds(a_max, b_max);
        let (h_min, h_max) = self.height.bounds(a_max, b_max);
        if !(w_min..=w_max).contains(&width) || !(h_min..=h_max).contains(&height) {
            return None;
        }

        let mut a = 0;
        let mut b = 0;
        for (term, value) in [(self.width, width), (self.height, height)] {
            match term {
                Term::Fixed(_) => {}
                Term::PlusA(c) => a = value - c,
                Term::PlusB(c) => b = value - c,
            }
        }
        Some((a, b))
    }

    fn pack(&self, f: &Fields) -> u32 {
        let r0 = get_bit(f.r, 0);
        let r1 = get_bit(f.r, 1);
        let r2 = get_bit(f.r, 2);
        let dh = (f.d << 10) | (f.h << 9);
        let a = f.a << 5;

        // Rows with r in bits 0..=1 and a row selector in bits 2..=3.
        let low_r = |selector: u32| dh | a | (r0 << 4) | (selector << 2) | (r2 << 1) | r1;
        // Rows with bits 0..=1 zero and r in bits 2..=4.
        let high_r = (r0 << 4) | (r2 << 3) | (r1 << 2);

        match self.kind {
            LayoutKind::WidthB4HeightA2 => low_r(0) | (f.b << 7),
            LayoutKind::WidthB8HeightA2 => low_r(1) | (f.b << 7),
            LayoutKind::WidthA2HeightB8 => low_r(2) | (f.b << 7),
            LayoutKind::WidthA2HeightB6 => low_r(3) | (f.b << 7),
            LayoutKind::WidthB2HeightA2 => low_r(3) | (1 << 8) | (f.b << 7),
            LayoutKind::Width12HeightA2 => dh | a | high_r,
            LayoutKind::WidthA2Height12 => dh | (1 << 7) | a | high_r,
            LayoutKind::Width6Height10 => dh | (0b11 << 7) | high_r,
            LayoutKind::Width10Height6 => dh | (0b11 << 7) | (1 << 5) | high_r,
            LayoutKind::WidthA6HeightB6 => (f.b << 9) | (0b10 << 7) | a | high_r,
        }
    }
}

/// Encodes the block mode field for a weight grid.
///
/// Returns `None` when the weight range has no encoding, no layout row holds the
/// grid, or the chosen row cannot carry the dual-plane or high-range flag.
pub fn encode(grid_width: u32, grid_height: u32, dual_plane: bool, weight_ise: IseParams) -> Option<u16> {
    let class = range_class(weight_ise)?;
    let (layout, (a, b)) = LAYOUTS
        .iter()
        .find_map(|l| l.solve(grid_width, grid_height).map(|ab| (l, ab)))?;

    if layout.kind == LayoutKind::WidthA6HeightB6 && (dual_plane || class.h != 0) {
        return None;
    }

    let fields = Fields {
        d: dual_plane as u32,
        h: class.h,
        r: class.r,
        a,
        b,
    };
    Some(layout.pack(&fields) as u16)
}

/// A decoded block mode field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockModeInfo {
    VoidExtent,
    Weights {
        grid_width: u32,
        grid_height: u32,
        dual_plane: bool,
        weight_ise: IseParams,
    },
}

fn field(bits: u32, low: u32, high: u32) -> u32 {
    (bits >> low) & ((1 << (high - low + 1)) - 1)
}

/// Decodes the 11-bit block mode field. Returns `None` for reserved encodings.
pub fn decode(block_mode: u16) -> Option<BlockModeInfo> {
    let m = block_mode as u32 & 0x7FF;

    if field(m, 0, 8) == VOID_EXTENT_MARKER {
        return Some(BlockModeInfo::VoidExtent);
    }
    if (field(m, 0, 1) == 0 && field(m, 6, 8) == 7) || field(m, 0, 3) == 0 {
        return None;
    }

    let a = field(m, 5, 6);
    let (r, width, height) = if field(m, 0, 1) == 0 {
        let r = (get_bit(m, 3) << 2) | (get_bit(m, 2) << 1) | get_bit(m, 4);
        let (w, h) = match field(m, 7, 8) {
            0 => (12, a + 2),
            1 => (a + 2, 12),
            2 => (a + 6, field(m, 9, 10) + 6),
            _ if get_bit(m, 5) == 1 => (10, 6),
            _ => (6, 10),
        };
        (r, w, h)
    } else {
        let r = (get_bit(m, 1) << 2) | (get_bit(m, 0) << 1) | get_bit(m, 4);
        let (w, h) = match field(m, 2, 3) {
            0 => (field(m, 7, 8) + 4, a + 2),
            1 => (field(m, 7, 8) + 8, a + 2),
            2 => (a + 2, field(m, 7, 8) + 8),
            _ if get_bit(m, 8) == 1 => (get_bit(m, 7) + 2, a + 2),
            _ => (a + 2, get_bit(m, 7) + 6),
        };
        (r, w, h)
    };

    // The a+6/b+6 row reuses bits 9 and 10 for b.
    let wide_grid = field(m, 0, 1) == 0 && field(m, 7, 8) == 2;
    let h = if wide_grid { 0 } else { get_bit(m, 9) };
    let dual_plane = !wide_grid && get_bit(m, 10) == 1;

    Some(BlockModeInfo::Weights {
        grid_width: width,
        grid_height: height,
        dual_plane,
        weight_ise: weight_params(r, h)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_by_four_two_bit_weights() {
        // Row 0: b = 0, a = 2, r = 4.
        assert_eq!(encode(4, 4, false, IseParams::plain(2)), Some(0x042));
    }

    #[test]
    fn unsupported_ranges_are_rejected() {
        assert_eq!(encode(4, 4, false, IseParams::plain(6)), None);
        assert_eq!(encode(4, 4, false, IseParams::plain(0)), None);
        assert_eq!(encode(4, 4, false, IseParams::quint(3)), None);
    }

    #[test]
    fn wide_grid_row_excludes_dual_plane_and_high_range() {
        assert!(encode(7, 7, false, IseParams::plain(1)).is_some());
        assert_eq!(encode(7, 7, true, IseParams::plain(1)), None);
        assert_eq!(encode(7, 7, false, IseParams::plain(4)), None);
    }

    #[test]
    fn grids_below_two_have_no_layout() {
        assert_eq!(encode(1, 4, false, IseParams::plain(2)), None);
        assert_eq!(encode(4, 1, false, IseParams::plain(2)), None);
        assert_eq!(encode(13, 2, false, IseParams::plain(2)), None);
    }

    #[test]
    fn every_grid_round_trips() {
        for class in RANGE_CLASSES {
            for dual_plane in [false, true] {
                for w in 2..=12 {
                    for h in 2..=12 {
                        let Some(mode) = encode(w, h, dual_plane, class.params) else {
                            continue;
                        };
                        assert_eq!(
                            decode(mode),
                            Some(BlockModeInfo::Weights {
                                grid_width: w,
                                grid_height: h,
                                dual_plane,
                                weight_ise: class.params,
                            }),
                            "{w}x{h} dual={dual_plane} {:?}",
                            class.params
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn reserved_and_void_extent_decode() {
        assert_eq!(decode(0x1FC), Some(BlockModeInfo::VoidExtent));
        assert_eq!(decode(0x000), None);
        // Bits 0..=1 clear with bits 6..=8 all set.
        assert_eq!(decode(0x1C0 | 0b100), None);
    }
}
