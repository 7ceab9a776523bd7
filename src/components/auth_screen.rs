use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::auth::{self, Session, SignUpOutcome};
use crate::config::RemoteConfig;

#[derive(Clone, PartialEq)]
enum Status {
    Idle,
    Info(String),
    Success(String),
    Error(String),
}

#[derive(Properties, PartialEq)]
pub struct AuthScreenProps {
    pub remote: RemoteConfig,
    pub on_authenticated: Callback<Session>,
}

#[function_component(AuthScreen)]
pub fn auth_screen(props: &AuthScreenProps) -> Html {
    let is_login = use_state(|| true);
    let email = use_state(|| "".to_string());
    let password = use_state(|| "".to_string());
    let nickname = use_state(|| "".to_string());
    let status = use_state(|| Status::Idle);
    let loading = use_state(|| false);

    let on_submit = {
        let is_login = is_login.clone();
        let email = email.clone();
        let password = password.clone();
        let nickname = nickname.clone();
        let status = status.clone();
        let loading = loading.clone();
        let remote = props.remote.clone();
        let on_authenticated = props.on_authenticated.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let email_val = (*email).clone();
            let password_val = (*password).clone();
            let nickname_val = (*nickname).clone();
            let login = *is_login;
            let remote = remote.clone();
            let on_authenticated = on_authenticated.clone();
            let status = status.clone();
            let loading = loading.clone();

            loading.set(true);
            status.set(Status::Info(
                if login { "로그인 중..." } else { "가입 처리 중..." }.to_string(),
            ));
            spawn_local(async move {
                let result = if login {
                    auth::sign_in_with_password(&remote, &email_val, &password_val)
                        .await
                        .map(SignUpOutcome::SignedIn)
                } else {
                    auth::sign_up(&remote, &email_val, &password_val, &nickname_val).await
                };

                match result {
                    Ok(SignUpOutcome::SignedIn(session)) => {
                        log::info!("[auth] signed in as {}", session.user.email);
                        auth::persist_session(&session);
                        status.set(Status::Success("환영합니다!".to_string()));
                        on_authenticated.emit(session);
                    }
                    Ok(SignUpOutcome::ConfirmationPending) => {
                        status.set(Status::Success(
                            "가입 완료! 이메일을 확인한 뒤 로그인해주세요.".to_string(),
                        ));
                    }
                    Err(err) => {
                        log::warn!("[auth] {}", err);
                        status.set(Status::Error(err.user_message()));
                    }
                }
                loading.set(false);
            });
        })
    };

    let toggle_mode = {
        let is_login = is_login.clone();
        let status = status.clone();
        Callback::from(move |_| {
            is_login.set(!*is_login);
            status.set(Status::Idle);
        })
    };

    let text_input = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
        })
    };
    let input_class = "w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary";

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{ if *is_login { "가계부 로그인" } else { "회원가입" } }</h1>
                    <p class="text-sm text-muted-foreground mt-2">
                        { if *is_login { "계속하려면 로그인하세요." } else { "수입, 지출, 저축을 한눈에 관리하세요." } }
                    </p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"이메일"}</label>
                        <input type="email" class={input_class} value={(*email).clone()} oninput={text_input(&email)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"비밀번호"}</label>
                        <input type="password" class={input_class} value={(*password).clone()} oninput={text_input(&password)} />
                    </div>

                    if !*is_login {
                        <div class="space-y-1">
                            <label class="text-sm font-medium text-foreground">{"닉네임"}</label>
                            <input class={input_class} value={(*nickname).clone()} oninput={text_input(&nickname)} />
                        </div>
                    }

                    {
                        match &*status {
                            Status::Idle => html! {},
                            Status::Info(msg) => html! { <div class="text-sm text-muted-foreground">{ msg.clone() }</div> },
                            Status::Success(msg) => html! { <div class="text-sm text-green-600">{ msg.clone() }</div> },
                            Status::Error(msg) => html! { <div class="text-sm text-red-500">{ msg.clone() }</div> },
                        }
                    }

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "잠시만 기다려주세요..." } else if *is_login { "로그인" } else { "가입하기" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    { if *is_login { "계정이 없으신가요?" } else { "이미 계정이 있으신가요?" } }
                    <button class="ml-2 text-primary font-semibold" onclick={toggle_mode}>
                        { if *is_login { "회원가입" } else { "로그인" } }
                    </button>
                </div>
            </div>
        </div>
    }
}
