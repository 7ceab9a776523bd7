use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::icons::icon_close;
use crate::auth::{self, Session};
use crate::backend::local::save_avatar;
use crate::config::AppConfig;
use crate::dialog;

#[derive(Properties, PartialEq)]
pub struct ProfileModalProps {
    pub session: Session,
    pub config: Rc<AppConfig>,
    pub avatar: Option<String>,
    pub on_close: Callback<()>,
    pub on_updated: Callback<Session>,
    pub on_avatar: Callback<String>,
}

#[function_component(ProfileModal)]
pub fn profile_modal(props: &ProfileModalProps) -> Html {
    let nickname = use_state(|| props.session.user.display_name());
    let saving = use_state(|| false);

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    let on_save = {
        let nickname = nickname.clone();
        let saving = saving.clone();
        let session = props.session.clone();
        let config = props.config.clone();
        let on_updated = props.on_updated.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let name = nickname.trim().to_string();
            if name.is_empty() || name == session.user.display_name() {
                return;
            }
            let session = session.clone();
            let config = config.clone();
            let on_updated = on_updated.clone();
            let saving = saving.clone();
            saving.set(true);
            spawn_local(async move {
                let result = match &config.remote {
                    Some(remote) => auth::update_display_name(remote, &session, &name).await,
                    None => Ok(auth::UserProfile {
                        display_name: Some(name.clone()),
                        ..session.user.clone()
                    }),
                };
                match result {
                    Ok(user) => {
                        let next = session.with_user(user);
                        auth::persist_session(&next);
                        on_updated.emit(next);
                        dialog::alert("닉네임이 변경되었습니다.");
                    }
                    Err(err) => {
                        log::error!("[profile] nickname update failed: {}", err);
                        dialog::alert(&format!("닉네임 변경에 실패했습니다: {}", err.user_message()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let on_file = {
        let user_id = props.session.user.id.clone();
        let on_avatar = props.on_avatar.clone();
        Callback::from(move |e: Event| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let Ok(reader) = web_sys::FileReader::new() else {
                dialog::alert("이미지를 읽을 수 없습니다.");
                return;
            };
            let user_id = user_id.clone();
            let on_avatar = on_avatar.clone();
            let result_reader = reader.clone();
            let onload = Closure::once_into_js(move || {
                let Some(data_url) = result_reader.result().ok().and_then(|v| v.as_string()) else {
                    dialog::alert("이미지를 읽을 수 없습니다.");
                    return;
                };
                match save_avatar(&user_id, &data_url) {
                    Ok(()) => {
                        on_avatar.emit(data_url);
                        dialog::alert("프로필 사진이 변경되었습니다.");
                    }
                    Err(err) => {
                        log::error!("[profile] avatar not stored: {}", err);
                        dialog::alert(&err.user_message());
                    }
                }
            });
            reader.set_onload(Some(onload.unchecked_ref()));
            if reader.read_as_data_url(&file).is_err() {
                dialog::alert("이미지를 읽을 수 없습니다.");
            }
        })
    };

    let user = &props.session.user;

    html! {
        <div class="fixed inset-0 bg-black/40 flex items-center justify-center z-50">
            <div class="w-full max-w-sm bg-card border border-border rounded-2xl shadow-lg p-6">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="text-lg font-bold text-foreground">{"프로필"}</h3>
                    <button class="p-1 hover:bg-secondary rounded" onclick={close}>{ icon_close() }</button>
                </div>

                <div class="flex flex-col items-center gap-3 mb-6">
                    {
                        match &props.avatar {
                            Some(url) => html! { <img src={url.clone()} alt="avatar" class="w-20 h-20 rounded-full object-cover" /> },
                            None => html! {
                                <div class="w-20 h-20 rounded-full bg-[#2B3674] text-white text-3xl flex items-center justify-center font-bold">
                                    { user.initial() }
                                </div>
                            },
                        }
                    }
                    <label class="text-sm text-[#4318FF] font-semibold cursor-pointer">
                        {"사진 변경"}
                        <input type="file" accept="image/*" class="hidden" onchange={on_file} />
                    </label>
                    <p class="text-xs text-muted-foreground">{ user.email.clone() }</p>
                </div>

                <form class="space-y-3" onsubmit={on_save}>
                    <label class="text-sm font-medium text-foreground">{"닉네임"}</label>
                    <input
                        class="w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary"
                        value={(*nickname).clone()}
                        oninput={{
                            let nickname = nickname.clone();
                            Callback::from(move |e: InputEvent| {
                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                nickname.set(input.value());
                            })
                        }}
                    />
                    <button
                        type="submit"
                        class="w-full bg-[#4318FF] text-white py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*saving}
                    >
                        { if *saving { "저장 중..." } else { "저장" } }
                    </button>
                </form>
            </div>
        </div>
    }
}
