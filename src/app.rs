use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::auth::{self, Session};
use crate::components::{AuthScreen, Dashboard};
use crate::config::AppConfig;

#[derive(Clone, PartialEq)]
enum AuthStatus {
    Checking,
    Authenticated(Session),
    Unauthenticated,
}

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let auth_status = use_state(|| AuthStatus::Checking);

    {
        let auth_status = auth_status.clone();
        let config = props.config.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match auth::get_current_session(&config).await {
                        Some(session) => auth_status.set(AuthStatus::Authenticated(session)),
                        None => auth_status.set(AuthStatus::Unauthenticated),
                    }
                });
                || ()
            },
            (),
        );
    }

    let on_session = {
        let auth_status = auth_status.clone();
        Callback::from(move |session: Session| auth_status.set(AuthStatus::Authenticated(session)))
    };
    let on_signed_out = {
        let auth_status = auth_status.clone();
        let local = props.config.is_local();
        Callback::from(move |_: ()| {
            if local {
                auth_status.set(AuthStatus::Authenticated(Session::local()));
            } else {
                auth_status.set(AuthStatus::Unauthenticated);
            }
        })
    };

    match (&*auth_status, &props.config.remote) {
        (AuthStatus::Checking, _) => html! {
            <div class="min-h-screen flex items-center justify-center bg-background text-muted-foreground">
                {"세션 확인 중..."}
            </div>
        },
        (AuthStatus::Authenticated(session), _) => html! {
            <Dashboard
                key={session.user.id.clone()}
                session={session.clone()}
                config={props.config.clone()}
                {on_session}
                {on_signed_out}
            />
        },
        (AuthStatus::Unauthenticated, Some(remote)) => html! {
            <AuthScreen remote={remote.clone()} on_authenticated={on_session} />
        },
        (AuthStatus::Unauthenticated, None) => html! {
            <Dashboard session={Session::local()} config={props.config.clone()} {on_session} {on_signed_out} />
        },
    }
}
