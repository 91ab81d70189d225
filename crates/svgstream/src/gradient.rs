// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use strict_num::NormalizedF64;
use svgstream_types::{Color, Length, LengthUnit, Transform, TransformListParser};

/// The coordinate system of the gradient geometry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum GradientUnits {
    /// Geometry is in fractions of the painted shape's bounding box.
    ObjectBoundingBox,
    /// Geometry is in the user coordinate system in place
    /// when the gradient is referenced.
    UserSpaceOnUse,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct LinearGeometry {
    pub x1: Length,
    pub y1: Length,
    pub x2: Length,
    pub y2: Length,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct RadialGeometry {
    pub cx: Length,
    pub cy: Length,
    pub r: Length,
    pub fx: Length,
    pub fy: Length,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) enum GradientGeometry {
    Linear(LinearGeometry),
    Radial(RadialGeometry),
}

/// A gradient stop. Offsets are non-decreasing within one gradient.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct Stop {
    pub offset: NormalizedF64,
    pub color: Color,
    pub opacity: NormalizedF64,
}

/// A gradient definition collected between the element's begin and end.
#[derive(Clone, Debug)]
pub(crate) struct Gradient {
    pub id: String,
    pub units: GradientUnits,
    pub transforms: Vec<Transform>,
    pub stops: Vec<Stop>,
    pub geometry: GradientGeometry,
}

impl Gradient {
    /// Collects the attributes shared by both gradient kinds.
    pub fn new(geometry: GradientGeometry, attributes: &crate::renderer::AttributeMap<'_>) -> Self {
        let id = attributes
            .get("id")
            .map(|v| v.to_string())
            .unwrap_or_default();

        let mut transforms = Vec::new();
        if let Some(value) = attributes.get("gradientTransform") {
            for ts in TransformListParser::from(*value) {
                match ts {
                    Ok(ts) => transforms.push(ts),
                    Err(_) => break,
                }
            }
        }

        let units = match attributes.get("gradientUnits") {
            Some(&"userSpaceOnUse") => GradientUnits::UserSpaceOnUse,
            _ => GradientUnits::ObjectBoundingBox,
        };

        Gradient {
            id,
            units,
            transforms,
            stops: Vec::new(),
            geometry,
        }
    }
}

/// Resolves a `stop` offset length against the previous stop.
///
/// A unitless value is a fraction, a percentage is divided by 100,
/// any other unit is rejected. The result is clamped to the unit range
/// and then raised to at least `prev` to keep offsets non-decreasing.
pub(crate) fn resolve_stop_offset(length: Length, prev: f64) -> Option<f64> {
    let offset = match length.unit {
        LengthUnit::None => length.number,
        LengthUnit::Percent => length.number / 100.0,
        _ => return None,
    };

    let offset = offset.max(0.0).min(1.0);
    Some(offset.max(prev))
}

/// Evaluates a gradient geometry length.
///
/// Only percentages are resolved (as a fraction); every other unit is
/// taken at face value.
pub(crate) fn evaluate_length(length: Length) -> f64 {
    match length.unit {
        LengthUnit::Percent => length.number * 0.01,
        _ => length.number,
    }
}
