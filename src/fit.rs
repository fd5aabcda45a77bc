//! Aspect-ratio preserving placement of an image inside a viewport.

/// Width and height in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const ZERO: Size = Size { w: 0, h: 0 };

    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Offset of the scaled image from the viewport's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fit {
    pub size: Size,
    pub offset: Offset,
}

/// Scales `image` to fit inside `viewport`, keeping its aspect ratio.
///
/// The binding dimension is filled completely; the other one is floored and,
/// with `center`, the leftover space is split evenly (floor division).
/// Aspect ratios are compared by cross-multiplying, so equal inputs always
/// produce equal placements. Any zero dimension produces an empty fit.
pub fn fit(image: Size, viewport: Size, center: bool) -> Fit {
    if image.is_empty() || viewport.is_empty() {
        return Fit::default();
    }
    let (iw, ih) = (u64::from(image.w), u64::from(image.h));
    let (vw, vh) = (u64::from(viewport.w), u64::from(viewport.h));

    let viewport_cross = vw * ih;
    let image_cross = iw * vh;

    if viewport_cross < image_cross {
        // width binds
        let h = (vw * ih / iw) as u32;
        let y = if center { (viewport.h - h) / 2 } else { 0 };
        Fit {
            size: Size::new(viewport.w, h),
            offset: Offset { x: 0, y },
        }
    } else if viewport_cross > image_cross {
        // height binds
        let w = (vh * iw / ih) as u32;
        let x = if center { (viewport.w - w) / 2 } else { 0 };
        Fit {
            size: Size::new(w, viewport.h),
            offset: Offset { x, y: 0 },
        }
    } else {
        Fit {
            size: viewport,
            offset: Offset::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(image: (u32, u32), viewport: (u32, u32), center: bool) -> ((u32, u32), (u32, u32)) {
        let fit = fit(
            Size::new(image.0, image.1),
            Size::new(viewport.0, viewport.1),
            center,
        );
        ((fit.size.w, fit.size.h), (fit.offset.x, fit.offset.y))
    }

    #[test]
    fn wide_image_in_square_viewport() {
        assert_eq!(fitted((200, 100), (100, 100), true), ((100, 50), (0, 25)));
        assert_eq!(fitted((200, 100), (100, 100), false), ((100, 50), (0, 0)));
    }

    #[test]
    fn tall_image_in_square_viewport() {
        assert_eq!(fitted((100, 200), (100, 100), true), ((50, 100), (25, 0)));
        assert_eq!(fitted((100, 200), (100, 100), false), ((50, 100), (0, 0)));
    }

    #[test]
    fn same_aspect_fills_viewport() {
        assert_eq!(fitted((200, 100), (400, 200), true), ((400, 200), (0, 0)));
        assert_eq!(fitted((3, 2), (3, 2), true), ((3, 2), (0, 0)));
    }

    #[test]
    fn scaled_size_is_floored() {
        // 100 * 300 / 700 = 42.85..
        assert_eq!(fitted((700, 300), (100, 100), true), ((100, 42), (0, 29)));
        // 60 * 333 / 100 = 199.8
        assert_eq!(fitted((333, 100), (500, 60), true), ((199, 60), (150, 0)));
    }

    #[test]
    fn result_always_fits_and_touches_one_side() {
        let sizes = [1, 7, 64, 99, 100, 333, 1024];
        for &iw in &sizes {
            for &ih in &sizes {
                for &(vw, vh) in &[(800, 600), (123, 457), (1, 1), (640, 37)] {
                    let fit = fit(Size::new(iw, ih), Size::new(vw, vh), true);
                    assert!(fit.size.w + fit.offset.x <= vw);
                    assert!(fit.size.h + fit.offset.y <= vh);
                    assert!(fit.size.w == vw || fit.size.h == vh);
                }
            }
        }
    }

    #[test]
    fn zero_dimensions_produce_empty_fit() {
        assert_eq!(fitted((0, 10), (100, 100), true), ((0, 0), (0, 0)));
        assert_eq!(fitted((10, 10), (100, 0), true), ((0, 0), (0, 0)));
    }
}
