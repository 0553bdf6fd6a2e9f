use dioxus::prelude::*;
use maglab_core::model::LessonPage;

use super::widgets::{ChatPanel, Markdown};

const HOME_TEXT: &str = "\
In 1820 Hans Christian Oersted noticed that a compass needle swung aside \
whenever a current flowed in a nearby wire. Electricity and magnetism, until \
then studied separately, turned out to be linked.

In this lesson you will explore the magnetic field that an electric current \
creates: first with simulations and experiments, then with the rules that \
describe it.

Use the menu on the left to move between steps. Enter your student ID and \
name first so your work can be recorded.";

const GOALS_ONE: &str = "\
1. Confirm through simulation and experiment that an electric current has a \
magnetic action.
2. Understand the shape of the magnetic field around a straight wire, a \
circular loop and a solenoid.";

const GOALS_TWO: &str = "\
1. Interpret quantitatively how the direction and strength of a current affect \
its magnetic field.
2. Explain everyday devices that use the magnetic field of a current.";

#[component]
pub fn HomePage() -> Element {
    rsx! {
        Markdown { text: HOME_TEXT.to_owned() }
        section { class: "card",
            h3 { "Ask Phi-Bot" }
            p { class: "muted", "Curious about anything before we start? Ask the tutor." }
            ChatPanel {
                page: LessonPage::Home,
                placeholder: "Ask a question about magnetism".to_owned(),
            }
        }
    }
}

#[component]
pub fn GoalsPage(page: LessonPage) -> Element {
    let goals = if page == LessonPage::GoalsTwo { GOALS_TWO } else { GOALS_ONE };
    rsx! {
        section { class: "card goals",
            h3 { "In this period you will" }
            Markdown { text: goals.to_owned() }
        }
    }
}
