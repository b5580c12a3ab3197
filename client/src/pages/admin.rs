//! Administration page, visible to users holding the `ADMIN` role.

use leptos::prelude::*;

use crate::session::SessionStore;

#[component]
pub fn AdminPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionStore>>();
    let mounted = RwSignal::new(false);
    Effect::new(move || mounted.set(true));

    // Roles come from the locally stored profile, so the decision waits for
    // hydration.
    let allowed = move || mounted.get() && session.with(SessionStore::is_admin);

    view! {
        <div class="admin-page">
            <h1>"Administration"</h1>
            <Show
                when=allowed
                fallback=move || {
                    view! {
                        <Show when=move || mounted.get()>
                            <p class="admin-page__denied">"You do not have access to this page."</p>
                        </Show>
                    }
                }
            >
                <p>"Clinic settings and user management."</p>
            </Show>
            <a href="/">"Back"</a>
        </div>
    }
}
