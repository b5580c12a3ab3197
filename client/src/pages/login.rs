//! Login page: email + password against the API's auth endpoint.
//!
//! On success the session is established (cookie + local profile) and the
//! browser continues to the `redirect` target the guard recorded, falling back
//! to the landing page when that target is missing or unsafe.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::net::api::ApiError;

/// Trim and require both fields.
///
/// # Errors
///
/// Returns the message to show when either field is blank.
pub fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter both email and password.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// User-facing text for a failed login attempt.
pub fn login_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Unauthorized => "Invalid email or password.".to_owned(),
        ApiError::Status { status, .. } if *status >= 500 => "The server is unavailable. Try again shortly.".to_owned(),
        ApiError::Status { status, .. } => format!("Sign-in failed ({status})."),
        ApiError::Transport(_) => "Could not reach the server.".to_owned(),
        ApiError::Json(_) => "Unexpected response from the server.".to_owned(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let session = expect_context::<RwSignal<crate::session::SessionStore>>();
    #[cfg(feature = "hydrate")]
    let config = expect_context::<crate::config::ClientConfig>();
    #[cfg(feature = "hydrate")]
    let query = leptos_router::hooks::use_query_map();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();
    #[cfg(feature = "hydrate")]
    let location = leptos_router::hooks::use_location();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            use crate::net::api::login;
            use crate::net::transport::browser_client;
            use crate::session::guard::{REDIRECT_PARAM, normalize_redirect};
            use leptos_router::NavigateOptions;

            let config = config.clone();
            let navigate = navigate.clone();
            let location = location.clone();
            let redirect = query.with_untracked(|q| q.get(REDIRECT_PARAM));
            leptos::task::spawn_local(async move {
                // On this public page a 401 clears state without navigating.
                let api = browser_client(session, &config, navigate.clone(), location);
                match login(&api, &email_value, &password_value).await {
                    Ok(response) => {
                        session.update(|store| store.establish(response.token, response.user));
                        let target = normalize_redirect(redirect.as_deref(), &config.routes);
                        navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
                    }
                    Err(e) => {
                        log::warn!("login failed: {e}");
                        info.set(login_error_message(&e));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (email_value, password_value);
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Saluki ERP"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        autocomplete="username"
                        placeholder="you@salukivet.com.br"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
