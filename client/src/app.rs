//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::route_guard::RouteGuard;
use crate::config::ClientConfig;
use crate::pages::{admin::AdminPage, home::HomePage, login::LoginPage};
use crate::session::bootstrap::bootstrap;
use crate::session::store_for_current_context;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the session store for this execution context (one per tab, one per
/// SSR request), runs the startup hook, and provides store and config to the
/// rest of the tree.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let mut store = store_for_current_context();
    bootstrap(&mut store);

    provide_context(RwSignal::new(store));
    provide_context(ClientConfig::from_build_env());

    view! {
        <Stylesheet id="leptos" href="/pkg/saluki.css"/>
        <Title text="Saluki ERP"/>

        <Router>
            <RouteGuard>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("admin") view=AdminPage/>
                </Routes>
            </RouteGuard>
        </Router>
    }
}
