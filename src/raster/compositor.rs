// Page grouping: stack pages into one tall image or keep them apart.

use image::{Rgba, imageops};

use super::{RasterPage, RasterSequence};

/// Rendered output grouped according to the combine-pages policy.
#[derive(Debug, Clone, PartialEq)]
pub enum PageGroup {
    /// All pages stacked top to bottom in one image.
    Combined(RasterPage),
    /// One image per page, in PDF order.
    PerPage(RasterSequence),
}

impl PageGroup {
    /// Groups `pages` as one combined image when `combine_pages` is set,
    /// otherwise keeps the sequence.
    pub fn from_pages(pages: RasterSequence, combine_pages: bool) -> Self {
        if combine_pages {
            PageGroup::Combined(combine(&pages))
        } else {
            PageGroup::PerPage(pages)
        }
    }

    /// The grouped images in page order.
    pub fn images(&self) -> &[RasterPage] {
        match self {
            PageGroup::Combined(page) => std::slice::from_ref(page),
            PageGroup::PerPage(pages) => pages,
        }
    }
}

/// Stacks `pages` vertically, left-aligned, on a transparent canvas.
///
/// The canvas is as wide as the widest page and as tall as all pages together;
/// page `i` starts at the summed height of the pages before it.
pub fn combine(pages: &[RasterPage]) -> RasterPage {
    let width = pages.iter().map(|p| p.width()).max().unwrap_or(0);
    let height: u32 = pages.iter().map(|p| p.height()).sum();

    let mut canvas = RasterPage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    let mut offset: i64 = 0;
    for page in pages {
        imageops::replace(&mut canvas, page, 0, offset);
        offset += page.height() as i64;
    }
    canvas
}
