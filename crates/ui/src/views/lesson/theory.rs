use dioxus::prelude::*;
use maglab_core::field::{
    CurrentSense, SampleGrid, Solenoid, circular_loop_center_field, solenoid_internal_field,
    straight_wire_field,
};

use super::widgets::{CurvePlot, Figure, Markdown, QuiverPlot, Slider};
use crate::vm::{PlotFrame, curve, quiver};

const WIRE_TEXT: &str = "\
The field around a long straight wire circles the wire. Its strength is \
proportional to the current and inversely proportional to the distance:

**B = k · I / r**

Point the thumb of your right hand along the current; your fingers curl the \
way the field lines go.";

const LOOP_TEXT: &str = "\
At the center of a circular loop the field points along the loop's axis:

**B = k′ · N · I / R**

Curl the fingers of your right hand with the current; your thumb gives the \
field direction at the center.";

const SOLENOID_TEXT: &str = "\
Inside a long solenoid the field is nearly uniform and points along the axis:

**B = k″ · n · I**

where *n* is the number of turns per unit length. Outside, the field is \
like that of a bar magnet.";

#[component]
pub fn TheoryPage() -> Element {
    rsx! {
        WireSection {}
        LoopSection {}
        SolenoidSection {}
    }
}

#[component]
fn WireSection() -> Element {
    let current = use_signal(|| 2.0);
    let grid = SampleGrid::square(2.0, 15).ok();
    let plot = grid
        .as_ref()
        .map(|grid| quiver(grid, &straight_wire_field(grid, current()), PlotFrame::around(grid, 60.0)));
    let sense = CurrentSense::of(current());

    rsx! {
        section { class: "card",
            h3 { "Straight wire" }
            Markdown { text: WIRE_TEXT.to_owned() }
            Slider { label: "Current I".to_owned(), min: -5.0, max: 5.0, step: 0.5, value: current }
            p { class: "muted", "Current out of the page; field lines run {sense.label()}." }
            if let Some(vm) = plot {
                QuiverPlot { vm }
            }
        }
    }
}

fn loop_direction(field: f64) -> &'static str {
    if field > 0.0 {
        "up, out of the loop plane"
    } else if field < 0.0 {
        "down, into the loop plane"
    } else {
        "zero"
    }
}

#[component]
fn LoopSection() -> Element {
    let current = use_signal(|| 2.0);
    let radius = use_signal(|| 1.5);
    let i = current();
    let center = circular_loop_center_field(i, radius());
    let vm = curve(0.5, 3.0, 51, radius(), |r| circular_loop_center_field(i, r).ok(), 320.0, 160.0);

    rsx! {
        section { class: "card",
            h3 { "Circular loop" }
            Markdown { text: LOOP_TEXT.to_owned() }
            div { class: "figure-row",
                Figure { name: "circular_wire_center.png".to_owned() }
                Figure { name: "circular_wire_pattern.png".to_owned() }
            }
            Slider { label: "Current I".to_owned(), min: -5.0, max: 5.0, step: 0.5, value: current }
            Slider { label: "Radius R".to_owned(), min: 0.5, max: 3.0, step: 0.1, value: radius }
            match center {
                Ok(b) => rsx! {
                    p { "Field at the center: {b:.2} ({loop_direction(b)})" }
                },
                Err(err) => rsx! {
                    p { class: "notice notice-warning", "{err}" }
                },
            }
            CurvePlot { vm, caption: "B at the center against R for the chosen current".to_owned() }
        }
    }
}

#[component]
fn SolenoidSection() -> Element {
    let current = use_signal(|| 2.0);
    let turns = use_signal(|| 15.0);
    let inside = solenoid_internal_field(current(), turns());
    let plot = SampleGrid::linspace((-3.0, 3.0), 25, (-1.5, 1.5), 13)
        .ok()
        .zip(Solenoid::new(4.0, 1.0, turns(), current()).ok())
        .map(|(grid, solenoid)| {
            quiver(&grid, &solenoid.cross_section(&grid), PlotFrame::around(&grid, 50.0))
        });

    rsx! {
        section { class: "card",
            h3 { "Solenoid" }
            Markdown { text: SOLENOID_TEXT.to_owned() }
            div { class: "figure-row",
                Figure { name: "solenoid_direction.png".to_owned() }
                Figure { name: "solenoid_iron_filings.png".to_owned() }
            }
            Slider { label: "Current I".to_owned(), min: 0.1, max: 5.0, step: 0.1, value: current }
            Slider { label: "Turns per length n".to_owned(), min: 5.0, max: 30.0, step: 1.0, value: turns }
            p { "Field inside: {inside:.1}" }
            if let Some(vm) = plot {
                QuiverPlot { vm }
            }
        }
    }
}
