// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgstream::tiny_skia;
use svgstream::{Document, Size, StyleSheet};

fn render(svg: &str, width: f64, height: f64) -> tiny_skia::Pixmap {
    let document = Document::from_data(svg.as_bytes()).unwrap();
    document.render(Size::new(width, height), None).unwrap()
}

fn pixel(pixmap: &tiny_skia::Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
    let px = pixmap.pixel(x, y).unwrap();
    (px.red(), px.green(), px.blue(), px.alpha())
}

#[test]
fn full_bleed_rect() {
    let pixmap = render(
        "<svg width='10' height='10'><rect x='0' y='0' width='10' height='10' fill='#f00'/></svg>",
        10.0,
        10.0,
    );

    for (x, y) in [(0, 0), (5, 5), (9, 9), (0, 9), (9, 0)] {
        assert_eq!(pixel(&pixmap, x, y), (255, 0, 0, 255), "at ({}, {})", x, y);
    }
}

#[test]
fn circle_with_functional_color() {
    let pixmap = render(
        "<svg width='10' height='10'><circle cx='5' cy='5' r='3' fill='rgb(0,100%,0)'/></svg>",
        10.0,
        10.0,
    );

    assert_eq!(pixel(&pixmap, 5, 5), (0, 255, 0, 255));
    assert_eq!(pixel(&pixmap, 0, 0), (0, 0, 0, 0));
}

#[test]
fn view_box_letterboxing() {
    let pixmap = render(
        "<svg viewBox='0 0 100 50' width='200' height='200' \
              preserveAspectRatio='xMidYMid meet'>\
            <rect x='0' y='0' width='100' height='50' fill='#000'/>\
         </svg>",
        200.0,
        200.0,
    );

    // The 100x50 view box scales by 2 and centers into y in 50..150.
    assert_eq!(pixel(&pixmap, 100, 100), (0, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 100, 52), (0, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 100, 148), (0, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 100, 30), (0, 0, 0, 0));
    assert_eq!(pixel(&pixmap, 100, 170), (0, 0, 0, 0));
}

#[test]
fn style_element_class() {
    let pixmap = render(
        "<svg width='10' height='10'>\
            <style type='text/css'>.a{fill:#00f}</style>\
            <rect class='a' width='10' height='10'/>\
         </svg>",
        10.0,
        10.0,
    );

    assert_eq!(pixel(&pixmap, 5, 5), (0, 0, 255, 255));
}

#[test]
fn external_style_sheet() {
    let document = Document::from_data(
        b"<svg width='10' height='10'><rect class='box' width='10' height='10'/></svg>",
    )
    .unwrap();
    let sheet = StyleSheet::from_data(b".box { fill: #0f0 }").unwrap();

    let pixmap = document
        .render(Size::new(10.0, 10.0), Some(&sheet))
        .unwrap();

    assert_eq!(pixel(&pixmap, 5, 5), (0, 255, 0, 255));
}

#[test]
fn linear_gradient_fill() {
    let pixmap = render(
        "<svg width='100' height='10'>\
            <linearGradient id='g'>\
                <stop offset='0' stop-color='#f00'/>\
                <stop offset='1' stop-color='#00f'/>\
            </linearGradient>\
            <rect width='100' height='10' fill='url(#g)'/>\
         </svg>",
        100.0,
        10.0,
    );

    let left = pixel(&pixmap, 2, 5);
    let right = pixel(&pixmap, 97, 5);
    assert_eq!(left.3, 255);
    assert_eq!(right.3, 255);
    assert!(left.0 > 200 && left.2 < 60, "left is {:?}", left);
    assert!(right.2 > 200 && right.0 < 60, "right is {:?}", right);
}

#[test]
fn radial_gradient_fill() {
    let pixmap = render(
        "<svg width='20' height='20'>\
            <radialGradient id='g'>\
                <stop offset='0' stop-color='#fff'/>\
                <stop offset='1' stop-color='#000'/>\
            </radialGradient>\
            <circle cx='10' cy='10' r='8' fill='url(#g)'/>\
         </svg>",
        20.0,
        20.0,
    );

    let center = pixel(&pixmap, 10, 10);
    let rim = pixel(&pixmap, 10, 3);
    assert!(center.0 > 200, "center is {:?}", center);
    assert!(rim.0 < 80, "rim is {:?}", rim);
    assert_eq!(pixel(&pixmap, 0, 0).3, 0);
}

#[test]
fn dangling_gradient_reference() {
    let pixmap = render(
        "<svg width='10' height='10'><rect width='10' height='10' fill='url(#nope)'/></svg>",
        10.0,
        10.0,
    );

    // The fill is skipped silently.
    assert_eq!(pixel(&pixmap, 5, 5), (0, 0, 0, 0));
}

#[test]
fn group_opacity() {
    let pixmap = render(
        "<svg width='4' height='4'><rect width='4' height='4' opacity='0.5'/></svg>",
        4.0,
        4.0,
    );

    let (_, _, _, alpha) = pixel(&pixmap, 2, 2);
    assert!(alpha > 120 && alpha < 135, "alpha is {}", alpha);
}

#[test]
fn display_none_skips_painting() {
    let pixmap = render(
        "<svg width='4' height='4'><rect width='4' height='4' display='none' fill='#f00'/></svg>",
        4.0,
        4.0,
    );

    assert_eq!(pixel(&pixmap, 2, 2).3, 0);
}

#[test]
fn display_none_inherits_through_groups() {
    let pixmap = render(
        "<svg width='4' height='4'>\
            <g display='none'><rect width='4' height='4' fill='#f00'/></g>\
         </svg>",
        4.0,
        4.0,
    );

    assert_eq!(pixel(&pixmap, 2, 2).3, 0);
}

#[test]
fn visibility_can_be_restored_by_child() {
    let pixmap = render(
        "<svg width='4' height='4'>\
            <g visibility='hidden'>\
                <rect width='4' height='4' visibility='visible' fill='#f00'/>\
            </g>\
         </svg>",
        4.0,
        4.0,
    );

    // Unlike display, visibility can be switched back on.
    assert_eq!(pixel(&pixmap, 2, 2), (255, 0, 0, 255));
}

#[test]
fn stroked_line() {
    let pixmap = render(
        "<svg width='10' height='10'>\
            <line x1='0' y1='5' x2='10' y2='5' stroke='#f00' stroke-width='2'/>\
         </svg>",
        10.0,
        10.0,
    );

    assert_eq!(pixel(&pixmap, 5, 5), (255, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 5, 1).3, 0);
}

#[test]
fn line_ignores_fill() {
    let pixmap = render(
        "<svg width='10' height='10'><line x1='0' y1='0' x2='10' y2='10' fill='#f00'/></svg>",
        10.0,
        10.0,
    );

    // Lines are not fillable, and no stroke was requested.
    assert_eq!(pixel(&pixmap, 5, 5).3, 0);
}

#[test]
fn even_odd_fill_rule() {
    let pixmap = render(
        "<svg width='10' height='10'>\
            <path d='M0 0 L10 0 L10 10 L0 10 Z M2 2 L8 2 L8 8 L2 8 Z' \
                  fill-rule='evenodd' fill='#f00'/>\
         </svg>",
        10.0,
        10.0,
    );

    // Both subpaths wind the same way; only even-odd leaves a hole.
    assert_eq!(pixel(&pixmap, 5, 5).3, 0);
    assert_eq!(pixel(&pixmap, 1, 1), (255, 0, 0, 255));
}

#[test]
fn transform_translate() {
    let pixmap = render(
        "<svg width='10' height='10'>\
            <rect width='2' height='2' transform='translate(4 4)' fill='#f00'/>\
         </svg>",
        10.0,
        10.0,
    );

    assert_eq!(pixel(&pixmap, 5, 5), (255, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 1, 1).3, 0);
}

#[test]
fn polygon_implicit_close() {
    let pixmap = render(
        "<svg width='10' height='10'>\
            <polygon points='0,0 10,0 10,10 0,10' fill='#0f0'/>\
         </svg>",
        10.0,
        10.0,
    );

    assert_eq!(pixel(&pixmap, 5, 5), (0, 255, 0, 255));
}

#[test]
fn nested_svg_viewport_clips() {
    let pixmap = render(
        "<svg width='10' height='10'>\
            <svg width='4' height='4'><rect width='10' height='10' fill='#f00'/></svg>\
         </svg>",
        10.0,
        10.0,
    );

    // The nested viewport clips the oversized rect.
    assert_eq!(pixel(&pixmap, 2, 2), (255, 0, 0, 255));
    assert_eq!(pixel(&pixmap, 6, 6).3, 0);
}

#[test]
fn zero_size_svg_renders_nothing() {
    let pixmap = render(
        "<svg width='0' height='10'><rect width='10' height='10' fill='#f00'/></svg>",
        10.0,
        10.0,
    );

    assert_eq!(pixel(&pixmap, 5, 5).3, 0);
}

#[test]
fn rounded_rect_corners() {
    let pixmap = render(
        "<svg width='20' height='20'>\
            <rect width='20' height='20' rx='8' fill='#f00'/>\
         </svg>",
        20.0,
        20.0,
    );

    // The corner is cut away, the middle is filled.
    assert_eq!(pixel(&pixmap, 0, 0).3, 0);
    assert_eq!(pixel(&pixmap, 10, 10), (255, 0, 0, 255));
}
