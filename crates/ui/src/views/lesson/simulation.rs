use dioxus::prelude::*;
use maglab_core::field::{
    BarMagnet, MagnetArrangement, SampleGrid, bar_magnet_field, two_magnet_field, two_magnet_pair,
};

use super::widgets::{Markdown, QuiverPlot, Slider};
use crate::vm::{PlotFrame, QuiverVm, magnet_quiver};

const POLE_SEPARATION: f64 = 1.2;
const PLOT_SCALE: f64 = 60.0;

const FIELD_LINES: &str = "\
- Field lines leave the **N pole** and enter the **S pole**.
- Where the lines crowd together the field is strong.
- Field lines never cross or split.
- A compass needle lines up with the field line passing through it.";

fn bar_magnet_plot(strength: f64, density: f64) -> Option<QuiverVm> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = density.round().max(2.0) as usize;
    let grid = SampleGrid::square(3.0, n).ok()?;
    let field = bar_magnet_field(&grid, POLE_SEPARATION, strength);
    let magnet = BarMagnet::vertical(POLE_SEPARATION, strength);
    Some(magnet_quiver(
        &grid,
        &field,
        &[magnet],
        PlotFrame::around(&grid, PLOT_SCALE * 6.0 / density),
    ))
}

fn two_magnet_plot(distance: f64, strength: f64, arrangement: MagnetArrangement) -> Option<QuiverVm> {
    let grid = SampleGrid::linspace((-4.0, 4.0), 37, (-3.0, 3.0), 29).ok()?;
    let field = two_magnet_field(&grid, distance, strength, arrangement);
    let magnets = two_magnet_pair(distance, strength, arrangement);
    Some(magnet_quiver(&grid, &field, &magnets, PlotFrame::around(&grid, PLOT_SCALE)))
}

#[component]
pub fn SimulationPage() -> Element {
    let strength = use_signal(|| 1.0);
    let density = use_signal(|| 25.0);
    let distance = use_signal(|| 2.5);
    let pair_strength = use_signal(|| 10.0);
    let mut arrangement = use_signal(|| MagnetArrangement::Attract);

    let single = bar_magnet_plot(strength(), density());
    let pair = two_magnet_plot(distance(), pair_strength(), arrangement());

    rsx! {
        Markdown { text: FIELD_LINES.to_owned() }

        section { class: "card",
            h3 { "Bar magnet" }
            div { class: "controls",
                Slider { label: "Magnet strength".to_owned(), min: 0.5, max: 5.0, step: 0.5, value: strength }
                Slider { label: "Arrow density".to_owned(), min: 15.0, max: 35.0, step: 5.0, value: density }
            }
            if let Some(vm) = single {
                QuiverPlot { vm }
            }
        }

        section { class: "card",
            h3 { "Two magnets" }
            div { class: "controls",
                div { class: "radio-group",
                    for option in [MagnetArrangement::Attract, MagnetArrangement::Repel] {
                        label {
                            input {
                                r#type: "radio",
                                name: "arrangement",
                                checked: arrangement() == option,
                                onchange: move |_| arrangement.set(option),
                            }
                            span { "{option.label()}" }
                        }
                    }
                }
                Slider { label: "Distance".to_owned(), min: 1.0, max: 4.0, step: 0.5, value: distance }
                Slider { label: "Magnet strength".to_owned(), min: 5.0, max: 30.0, step: 1.0, value: pair_strength }
            }
            if let Some(vm) = pair {
                QuiverPlot { vm }
            }
        }
    }
}
