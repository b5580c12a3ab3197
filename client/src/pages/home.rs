//! Landing page for signed-in users.
//!
//! User details render only after hydration: the SSR pass sees the cookie but
//! not the locally stored profile, so rendering them on the server would
//! produce markup the browser disagrees with.

use leptos::prelude::*;

use crate::session::guard::{Destination, login_location};
use crate::session::{Invalidation, SessionStore};

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionStore>>();
    let mounted = RwSignal::new(false);
    Effect::new(move || mounted.set(true));

    #[cfg(feature = "hydrate")]
    {
        let config = expect_context::<crate::config::ClientConfig>();
        let navigate = leptos_router::hooks::use_navigate();
        let location = leptos_router::hooks::use_location();
        leptos::task::spawn_local(async move {
            let api = crate::net::transport::browser_client(session, &config, navigate, location);
            match crate::net::api::current_user(&api).await {
                Ok(user) => {
                    // Refresh the cached profile; the token stays as it is.
                    let token = session.with_untracked(|store| store.token().map(str::to_owned));
                    if let Some(token) = token {
                        session.update(|store| store.establish(token, user));
                    }
                }
                Err(e) => log::debug!("session check failed: {e}"),
            }
        });
    }

    let navigate = leptos_router::hooks::use_navigate();
    let location = leptos_router::hooks::use_location();
    let routes = expect_context::<crate::config::ClientConfig>().routes;
    let on_logout = move |_| {
        if session.try_update(SessionStore::invalidate) == Some(Invalidation::RedirectToLogin) {
            // Same location the route guard redirects to once it sees the
            // cleared session.
            let here = Destination::from_parts(
                &location.pathname.get_untracked(),
                &location.search.get_untracked(),
                &location.hash.get_untracked(),
            );
            navigate(&login_location(&routes, &here.full_path()), leptos_router::NavigateOptions::default());
        }
    };

    let user_name = move || session.with(|store| store.user().map(|u| u.name.clone()).unwrap_or_default());
    let user_email = move || session.with(|store| store.user().map(|u| u.email.clone()).unwrap_or_default());
    let is_admin = move || session.with(SessionStore::is_admin);

    view! {
        <div class="home-page">
            <header class="home-header">
                <h1>"Saluki ERP"</h1>
                <button class="btn" on:click=on_logout>
                    "Sign Out"
                </button>
            </header>
            <Show when=move || mounted.get()>
                <section class="home-profile">
                    <p class="home-profile__name">{user_name}</p>
                    <p class="home-profile__email">{user_email}</p>
                </section>
                <Show when=is_admin>
                    <a class="btn" href="/admin">
                        "Administration"
                    </a>
                </Show>
            </Show>
        </div>
    }
}
