use dioxus::prelude::*;

use crate::vm::{Notice, NoticeKind};

#[component]
pub fn NoticeBanner(notice: Notice) -> Element {
    let class = match notice.kind {
        NoticeKind::Success => "notice notice-success",
        NoticeKind::Error => "notice notice-error",
    };

    rsx! {
        div { class, role: "status", "{notice.text}" }
    }
}
