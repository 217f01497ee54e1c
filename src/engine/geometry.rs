use crate::catalog::challenge::Section;

/// Vertical placement of a section's overlay, in the same unit as the line
/// height (pixels in a browser, rows in a terminal).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub top: u32,
    pub height: u32,
    pub z_index: i32,
}

impl Region {
    pub fn contains(&self, y: u32) -> bool {
        y >= self.top && y < self.top + self.height
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

/// Maps line ranges onto overlay regions. `line_height` has to match the
/// renderer's line height exactly or regions drift off their code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub line_height: u32,
    pub min_height: u32,
}

const BASE_Z: i32 = 10;
const Z_SPAN: i32 = 100;

impl Geometry {
    /// 24px lines with a 44px minimum touch target.
    pub const BROWSER: Geometry = Geometry {
        line_height: 24,
        min_height: 44,
    };

    /// One terminal row per code line.
    pub const TERMINAL: Geometry = Geometry {
        line_height: 1,
        min_height: 1,
    };

    pub fn new(line_height: u32, min_height: u32) -> Self {
        Self {
            line_height: line_height.max(1),
            min_height,
        }
    }

    pub fn region(&self, section: &Section) -> Region {
        let top = section.start_line.saturating_sub(1) * self.line_height;
        let height = (section.line_count() * self.line_height).max(self.min_height);
        Region {
            top,
            height,
            z_index: z_index(section),
        }
    }

    /// Id of the topmost region under `y`. Equal priorities go to the later
    /// section, which is painted last.
    pub fn hit_test<'a>(&self, sections: &'a [Section], y: u32) -> Option<&'a str> {
        let mut best: Option<(&Section, i32)> = None;
        for section in sections {
            let region = self.region(section);
            if !region.contains(y) {
                continue;
            }
            if best.is_none_or(|(_, z)| region.z_index >= z) {
                best = Some((section, region.z_index));
            }
        }
        best.map(|(s, _)| s.id.as_str())
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::TERMINAL
    }
}

/// Fewer lines means a higher z-index, so a nested one-liner stays clickable
/// inside the block that contains it.
pub fn z_index(section: &Section) -> i32 {
    let lines = i32::try_from(section.line_count()).unwrap_or(i32::MAX);
    BASE_Z + Z_SPAN.saturating_sub(lines)
}

/// Sections ordered bottom-to-top, i.e. the order to paint them in.
pub fn paint_order(sections: &[Section]) -> Vec<&Section> {
    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by_key(|s| z_index(s));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: &str, start: u32, end: u32) -> Section {
        Section {
            id: id.to_string(),
            start_line: start,
            end_line: end,
            is_bug: false,
            parent_id: None,
        }
    }

    #[test]
    fn test_browser_region_position() {
        let r = Geometry::BROWSER.region(&section("a", 3, 5));
        assert_eq!(r.top, 48);
        assert_eq!(r.height, 72);
    }

    #[test]
    fn test_single_line_floors_to_min_height() {
        let r = Geometry::BROWSER.region(&section("a", 1, 1));
        assert_eq!(r.top, 0);
        assert_eq!(r.height, 44);
    }

    #[test]
    fn test_terminal_region_is_one_row_per_line() {
        let r = Geometry::TERMINAL.region(&section("a", 2, 4));
        assert_eq!((r.top, r.height), (1, 3));
        assert!(r.contains(1));
        assert!(r.contains(3));
        assert!(!r.contains(4));
        assert_eq!(r.bottom(), 4);
    }

    #[test]
    fn test_z_index_prefers_narrow_sections() {
        assert_eq!(z_index(&section("a", 1, 1)), 109);
        assert_eq!(z_index(&section("a", 1, 10)), 100);
        assert!(z_index(&section("a", 5, 5)) > z_index(&section("b", 1, 20)));
    }

    #[test]
    fn test_z_index_for_huge_sections_goes_below_base() {
        assert_eq!(z_index(&section("a", 1, 150)), -40);
    }

    #[test]
    fn test_hit_test_picks_nested_section() {
        let sections = vec![section("outer", 1, 10), section("inner", 4, 4)];
        let g = Geometry::TERMINAL;
        assert_eq!(g.hit_test(&sections, 3), Some("inner"));
        assert_eq!(g.hit_test(&sections, 0), Some("outer"));
        assert_eq!(g.hit_test(&sections, 10), None);
    }

    #[test]
    fn test_hit_test_ties_go_to_later_section() {
        let sections = vec![section("first", 2, 3), section("second", 3, 4)];
        assert_eq!(Geometry::TERMINAL.hit_test(&sections, 2), Some("second"));
        assert_eq!(Geometry::TERMINAL.hit_test(&sections, 1), Some("first"));
    }

    #[test]
    fn test_hit_test_respects_min_height() {
        let sections = vec![section("a", 1, 1)];
        let g = Geometry::new(24, 44);
        assert_eq!(g.hit_test(&sections, 40), Some("a"));
        assert_eq!(g.hit_test(&sections, 44), None);
    }

    #[test]
    fn test_paint_order_puts_narrow_last() {
        let sections = vec![section("small", 2, 2), section("big", 1, 8)];
        let order: Vec<&str> = paint_order(&sections).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["big", "small"]);
    }

    #[test]
    fn test_zero_line_height_is_clamped() {
        assert_eq!(Geometry::new(0, 0).line_height, 1);
    }
}
