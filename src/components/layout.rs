use yew::prelude::*;

use super::icons::{icon_calendar, icon_layout_grid, icon_log_out, icon_refresh};
use crate::auth::UserProfile;
use crate::state::View;

struct NavItem {
    label: &'static str,
    view: View,
    icon: fn() -> Html,
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub view: View,
    pub on_view: Callback<View>,
    pub user: UserProfile,
    pub avatar: Option<String>,
    pub syncing: bool,
    pub on_sync: Callback<()>,
    pub on_profile: Callback<()>,
    pub on_logout: Callback<()>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar view={props.view} on_view={props.on_view.clone()} on_logout={props.on_logout.clone()} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header
                    user={props.user.clone()}
                    avatar={props.avatar.clone()}
                    syncing={props.syncing}
                    on_sync={props.on_sync.clone()}
                    on_profile={props.on_profile.clone()}
                />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    user: UserProfile,
    avatar: Option<String>,
    syncing: bool,
    on_sync: Callback<()>,
    on_profile: Callback<()>,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    let on_sync = {
        let on_sync = props.on_sync.clone();
        Callback::from(move |_| on_sync.emit(()))
    };
    let on_profile = {
        let on_profile = props.on_profile.clone();
        Callback::from(move |_| on_profile.emit(()))
    };

    html! {
        <header class="bg-[#E8EEF5] border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1"></div>
            <div class="flex items-center gap-4">
                <button
                    class="flex items-center gap-2 px-3 py-2 rounded-xl text-sm font-medium hover:bg-secondary transition-colors"
                    onclick={on_sync}
                    disabled={props.syncing}
                    title="동기화"
                >
                    <span class={if props.syncing { "animate-spin" } else { "" }}>{ icon_refresh() }</span>
                    <span>{ if props.syncing { "동기화 중..." } else { "동기화" } }</span>
                </button>
                <button class="flex items-center gap-3" onclick={on_profile}>
                    {
                        match &props.avatar {
                            Some(url) => html! {
                                <img src={url.clone()} alt="avatar" class="w-9 h-9 rounded-full object-cover" />
                            },
                            None => html! {
                                <div class="w-9 h-9 rounded-full bg-[#2B3674] text-white flex items-center justify-center font-bold">
                                    { props.user.initial() }
                                </div>
                            },
                        }
                    }
                    <span class="text-sm font-semibold text-[#2B3674]">{ props.user.greeting() }</span>
                </button>
            </div>
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    view: View,
    on_view: Callback<View>,
    on_logout: Callback<()>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let nav_items = vec![
        NavItem {
            label: "연간 요약",
            view: View::Overview,
            icon: icon_layout_grid,
        },
        NavItem {
            label: "월별 가계부",
            view: View::Month,
            icon: icon_calendar,
        },
    ];

    let on_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_| on_logout.emit(()))
    };

    html! {
        <div class="w-[220px] h-screen bg-[#E8EEF5] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <div class="w-12 h-12 bg-[#4318FF] rounded-full flex items-center justify-center text-2xl">
                    {"💰"}
                </div>
                <span class="text-[#2B3674] text-2xl font-black tracking-tight">{"가계부"}</span>
            </div>

            <div class="flex-1 bg-[#2B3674] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for nav_items.iter().map(|item| {
                        let class_name = if item.view == props.view {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#6AD2FF] text-[#2B3674] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_view = props.on_view.clone();
                        let view = item.view;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_view.emit(view))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icon_log_out() }
                        <span>{"로그아웃"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Page frame: title row with actions, then the content stack.
pub fn page_shell(title: Option<String>, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                {
                    match title {
                        Some(title) => html! { <h1 class="text-2xl font-bold text-foreground">{ title }</h1> },
                        None => html! { <div></div> },
                    }
                }
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}
