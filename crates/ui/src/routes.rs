use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AnalyticsView, HistoryView, HomeView, ResultView, SessionView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/session", SessionView)] Session {},
        #[route("/results/:result_id", ResultView)] ResultDetail { result_id: i64 },
        #[route("/history", HistoryView)] History {},
        #[route("/analytics", AnalyticsView)] Analytics {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Assess" }
            ul {
                li { Link { to: Route::Home {}, "New session" } }
                li { Link { to: Route::History {}, "History" } }
                li { Link { to: Route::Analytics {}, "Analytics" } }
            }
        }
    }
}
