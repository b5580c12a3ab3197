//! Navigation interceptor wrapping the route table.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs the session guard for every location change, during the SSR pass and
//! in the browser. Guarded content renders only when navigation is allowed;
//! otherwise a `<Redirect>` is emitted (a 302 on the server, a client-side
//! navigation in the browser).

use leptos::prelude::*;
use leptos_router::components::Redirect;
use leptos_router::hooks::use_location;

use crate::config::ClientConfig;
use crate::session::SessionStore;
use crate::session::guard::{self, Destination, GuardOutcome};

#[component]
pub fn RouteGuard(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionStore>>();
    let routes = expect_context::<ClientConfig>().routes;
    let location = use_location();

    let guard_routes = routes.clone();
    let outcome = Memo::new(move |_| {
        let to = Destination::from_parts(
            &location.pathname.get(),
            &location.search.get(),
            &location.hash.get(),
        );
        // Re-run on session changes, but rehydration inside the guard must not
        // notify subscribers of the signal it is evaluating.
        session.track();
        let fallback = GuardOutcome::RedirectToLogin { redirect: to.full_path() };
        session
            .try_update_untracked(|store| guard::evaluate(store, &guard_routes, &to))
            .unwrap_or(fallback)
    });

    view! {
        <Show
            when=move || outcome.get().is_allow()
            fallback=move || {
                outcome.get().location(&routes).map(|path| view! { <Redirect path=path/> })
            }
        >
            {children()}
        </Show>
    }
}
