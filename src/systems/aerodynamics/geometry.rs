use std::collections::VecDeque;

use crate::components::rocket::{ComponentId, FlightConfiguration, Rocket};
use crate::components::{Warning, WarningKind, WarningSink};
use crate::utils::{round_to, EPSILON};

/// Walk the active airframe and report geometry problems.
///
/// Adjacent bodies are compared after rounding lengths to `resolution`, so
/// differences below it are treated as flush. Pod sets and parallel stages
/// are checked as separate airframes and then against the body carrying them.
pub fn check_geometry(configuration: &FlightConfiguration, resolution: f64, warnings: &mut dyn WarningSink) {
    let root = configuration.rocket().root();
    check_branch(configuration, root, resolution, warnings);
}

/// First fore end and last aft end of a checked chain of bodies.
#[derive(Debug, Clone, Copy)]
struct ChainExtent {
    fore: f64,
    aft: f64,
}

fn check_branch(
    configuration: &FlightConfiguration,
    branch: ComponentId,
    resolution: f64,
    warnings: &mut dyn WarningSink,
) -> Option<ChainExtent> {
    let rocket = configuration.rocket();
    let rounded = |x: f64| round_to(x, resolution);

    let mut queue = VecDeque::new();
    enqueue_children(configuration, branch, &mut queue);

    let mut previous: Option<ComponentId> = None;
    let mut extent: Option<ChainExtent> = None;

    while let Some(id) = queue.pop_front() {
        let component = match rocket.component(id) {
            Some(c) => c,
            None => continue,
        };

        if component.is_pod_like() {
            if let Some(pods) = check_branch(configuration, id, resolution, warnings) {
                check_pod_placement(rocket, id, pods, &rounded, warnings);
            }
            continue;
        }

        let profile = match component.profile() {
            Some(profile) => profile,
            None => {
                if component.is_stage() {
                    enqueue_children(configuration, id, &mut queue);
                }
                continue;
            }
        };
        enqueue_children(configuration, id, &mut queue);

        if profile.length < EPSILON
            || (profile.fore_radius < EPSILON && profile.aft_radius < EPSILON)
        {
            warnings.add(Warning::for_components(WarningKind::ZeroVolumeBody, &[id]));
        }

        let fore = rocket.absolute_x(id);
        let aft = fore + profile.length;

        match previous {
            None => {
                if profile.fore_radius - profile.thickness > EPSILON {
                    warnings.add(Warning::for_components(WarningKind::OpenAirframeForward, &[id]));
                }
            }
            Some(prev) => {
                let prev_profile = rocket.component(prev).and_then(|c| c.profile());
                let prev_aft_radius = prev_profile.map_or(0.0, |p| p.aft_radius);
                let prev_aft = aft_x(rocket, prev);

                if rounded(2.0 * profile.fore_radius) != rounded(2.0 * prev_aft_radius) {
                    warnings.add(Warning::for_components(
                        WarningKind::DiameterDiscontinuity,
                        &[prev, id],
                    ));
                }

                if rounded(fore) != rounded(prev_aft) {
                    let kind = if fore > prev_aft {
                        WarningKind::AirframeGap
                    } else {
                        WarningKind::AirframeOverlap
                    };
                    warnings.add(Warning::for_components(kind, &[prev, id]));
                }
            }
        }

        extent = Some(match extent {
            None => ChainExtent { fore, aft },
            Some(chain) => ChainExtent {
                fore: chain.fore,
                aft,
            },
        });
        previous = Some(id);
    }

    extent
}

/// Queue the children of `id`, replacing inactive stages by their active sub-stages.
fn enqueue_children(configuration: &FlightConfiguration, id: ComponentId, queue: &mut VecDeque<ComponentId>) {
    let rocket = configuration.rocket();
    for &child in rocket.children(id) {
        let is_stage = rocket.component(child).map_or(false, |c| c.is_stage());
        if is_stage && !configuration.is_stage_active(child) {
            queue.extend(
                rocket
                    .top_level_child_stages(child)
                    .into_iter()
                    .filter(|&stage| configuration.is_stage_active(stage)),
            );
            continue;
        }
        queue.push_back(child);
    }
}

/// Body a pod set or parallel stage is mounted on: its parent when that is a
/// body, otherwise the nearest body of the airframe it sits in.
fn carrier_of(rocket: &Rocket, pods: ComponentId) -> Option<ComponentId> {
    match rocket.parent(pods) {
        Some(parent) if rocket.component(parent).map_or(false, |c| c.is_symmetric()) => Some(parent),
        _ => rocket
            .previous_symmetric(pods)
            .or_else(|| rocket.next_symmetric(pods)),
    }
}

fn aft_x(rocket: &Rocket, id: ComponentId) -> f64 {
    let length = rocket.component(id).and_then(|c| c.profile()).map_or(0.0, |p| p.length);
    rocket.absolute_x(id) + length
}

/// Classify a pod chain against the airframe it is mounted on.
///
/// A chain ending at or before the front of the airframe is entirely
/// forward. One starting ahead of its carrier, or flush with the aft end
/// of the body preceding the carrier, overlaps it.
fn check_pod_placement(
    rocket: &Rocket,
    pods: ComponentId,
    chain: ChainExtent,
    rounded: &impl Fn(f64) -> f64,
    warnings: &mut dyn WarningSink,
) {
    let carrier = match carrier_of(rocket, pods) {
        Some(carrier) => carrier,
        None => return,
    };
    let carrier_fore = rocket.absolute_x(carrier);
    let predecessor = rocket.previous_symmetric(carrier);

    let mut airframe_fore = carrier_fore;
    let mut scout = predecessor;
    while let Some(body) = scout {
        airframe_fore = rocket.absolute_x(body);
        scout = rocket.previous_symmetric(body);
    }

    let kind = if rounded(chain.aft) <= rounded(airframe_fore) {
        Some(WarningKind::PodsetForward)
    } else if rounded(chain.fore) < rounded(carrier_fore) {
        Some(WarningKind::PodsetOverlap)
    } else {
        match predecessor {
            Some(prev) if rounded(chain.fore) == rounded(aft_x(rocket, prev)) => Some(WarningKind::PodsetOverlap),
            _ => None,
        }
    };

    if let Some(kind) = kind {
        warnings.add(Warning::for_components(kind, &[pods]));
    }
}
