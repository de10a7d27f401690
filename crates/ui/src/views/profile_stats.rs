use dioxus::prelude::*;

use crate::vm::ProfileStatsVm;

#[component]
pub fn ProfileStats(stats: ProfileStatsVm) -> Element {
    rsx! {
        section { class: "profile-stats",
            header {
                span { class: "avatar", "{stats.initials}" }
                h2 { "{stats.heading}" }
                p { class: "display-name", "{stats.display_name}" }
            }
            // Definition list reads well for label/value pairs.
            dl { class: "shelf-counts",
                dt { "Read" }
                dd { "{stats.read}" }

                dt { "Reading" }
                dd { "{stats.reading}" }

                dt { "To read" }
                dd { "{stats.to_read}" }
            }
        }
    }
}
