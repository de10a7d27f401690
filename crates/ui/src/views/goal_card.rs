use dioxus::prelude::*;

use crate::vm::GoalCardVm;

#[component]
pub fn GoalCard(goal: GoalCardVm) -> Element {
    rsx! {
        section { class: "goal-card",
            h3 { "Your Reading Goal" }
            p { class: "goal-period", "{goal.period_label}" }
            div { class: "goal-numbers",
                div {
                    p { class: "goal-value", "{goal.pages_per_day}" }
                    p { "pages per day" }
                }
                div {
                    p { class: "goal-value", "{goal.target_pages}" }
                    p { "target pages" }
                }
            }
            p { class: "goal-days", "{goal.days_label}" }
        }
    }
}
