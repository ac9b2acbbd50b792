// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Per-edge animation timing for active routes

use crate::graph::TopologyGraph;
use crate::types::{EdgeTiming, RoutePath, DEFAULT_EDGE_WEIGHT_MS};

/// Fixed milliseconds a marker spends on any edge before the weight term
pub const ANIMATION_BASE_MS: f64 = 150.0;
/// Additional marker milliseconds per weight unit
pub const ANIMATION_WEIGHT_FACTOR: f64 = 10.0;

/// Clamp a raw simulation speed; non-finite and non-positive values run at 1x
#[must_use]
pub fn normalize_speed(speed: f64) -> f64 {
    if speed.is_finite() && speed > 0.0 {
        speed
    } else {
        1.0
    }
}

/// Marker duration for a single edge at a given speed
///
/// Strictly monotonic in the weight, so a heavier edge always animates
/// slower than a lighter one at the same speed.
#[must_use]
pub fn edge_duration_ms(weight_ms: f64, speed: f64) -> f64 {
    (ANIMATION_BASE_MS + ANIMATION_WEIGHT_FACTOR * weight_ms) / normalize_speed(speed)
}

/// Derive the timing tuples for one route
///
/// Delays accumulate along the route so a marker enters each edge exactly
/// when it leaves the previous one; the period is the whole route's duration
/// and is shared by all of the route's tuples. Zero-length routes yield no
/// tuples.
#[must_use]
pub fn derive_route_timings(
    route: &RoutePath,
    graph: &TopologyGraph,
    speed: f64,
    preview: bool,
) -> Vec<EdgeTiming> {
    let speed = normalize_speed(speed);
    let durations: Vec<f64> = route
        .edge_ids
        .iter()
        .map(|id| {
            let weight = graph
                .get_edge(id)
                .map_or(DEFAULT_EDGE_WEIGHT_MS, |e| e.weight_ms);
            edge_duration_ms(weight, speed)
        })
        .collect();
    let period: f64 = durations.iter().sum();

    let mut timings = Vec::with_capacity(durations.len());
    let mut delay = 0.0;
    for (edge_id, duration) in route.edge_ids.iter().zip(durations) {
        timings.push(EdgeTiming {
            edge_id: edge_id.clone(),
            delay_ms: delay,
            duration_ms: duration,
            period_ms: period,
            preview,
        });
        delay += duration;
    }
    timings
}
