use std::rc::Rc;

use chrono::Datelike;
use futures::lock::Mutex;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::category_cards::CategorySection;
use super::charts::{BarChart, PieChart};
use super::detail_modal::DetailModal;
use super::icons::{icon_chevron_left, icon_chevron_right, icon_plus};
use super::layout::{page_shell, Layout};
use super::profile_modal::ProfileModal;
use super::recent::RecentList;
use super::summary::{MonthSummary, YearSummary};
use super::transaction_form::TransactionForm;
use super::{FormTarget, Ledger};
use crate::aggregate::{monthly_rollup, monthly_series, selectable_years, yearly_rollup};
use crate::auth::{self, Session};
use crate::backend::local::load_avatar;
use crate::backend::Backend;
use crate::config::AppConfig;
use crate::controller;
use crate::dialog;
use crate::model::{today, Kind};
use crate::state::{Action, AppState, View};
use crate::store::CategorySet;

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub session: Session,
    pub config: Rc<AppConfig>,
    pub on_session: Callback<Session>,
    pub on_signed_out: Callback<()>,
}

#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let state = use_reducer(|| {
        let now = today();
        AppState::new(now.year(), now.month())
    });
    let syncing = use_state(|| false);
    let form = use_state(|| None::<FormTarget>);
    let show_profile = use_state(|| false);
    let user_id = props.session.user.id.clone();
    let avatar = {
        let user_id = user_id.clone();
        use_state(move || load_avatar(&user_id))
    };

    let saved_categories = use_state(|| Rc::new(Mutex::new(CategorySet::default())));

    let ledger = Ledger {
        state: state.clone(),
        backend: Backend::for_session(&props.config, &props.session),
        user_id: user_id.clone(),
        config: props.config.clone(),
        saved_categories: (*saved_categories).clone(),
    };

    let run_sync = {
        let ledger = ledger.clone();
        let syncing = syncing.clone();
        let on_signed_out = props.on_signed_out.clone();
        Callback::from(move |_: ()| {
            let ledger = ledger.clone();
            let syncing = syncing.clone();
            let on_signed_out = on_signed_out.clone();
            syncing.set(true);
            spawn_local(async move {
                let (action, err) = controller::sync(
                    &ledger.backend,
                    &ledger.user_id,
                    ledger.config.sync_timeout_ms,
                    &ledger.saved_categories,
                    ledger.state.transactions.all(),
                )
                .await;
                ledger.state.dispatch(action);
                syncing.set(false);
                if let Some(err) = err {
                    log::error!("[sync] {}", err);
                    if err.is_auth_failure() {
                        auth::clear_session();
                        on_signed_out.emit(());
                    } else {
                        dialog::alert(&format!("데이터를 불러오지 못했습니다: {}", err.user_message()));
                    }
                }
            });
        })
    };

    {
        let run_sync = run_sync.clone();
        use_effect_with_deps(
            move |_| {
                run_sync.emit(());
                || ()
            },
            user_id.clone(),
        );
    }

    let on_view = {
        let state = state.clone();
        Callback::from(move |view: View| state.dispatch(Action::SwitchView(view)))
    };
    let on_edit = {
        let form = form.clone();
        Callback::from(move |id: i64| form.set(Some(FormTarget::Edit(id))))
    };
    let open_form = {
        let form = form.clone();
        Callback::from(move |_| form.set(Some(FormTarget::New)))
    };
    let close_form = {
        let form = form.clone();
        Callback::from(move |_: ()| form.set(None))
    };
    let toggle_profile = {
        let show_profile = show_profile.clone();
        Callback::from(move |_: ()| show_profile.set(!*show_profile))
    };
    let on_avatar = {
        let avatar = avatar.clone();
        Callback::from(move |url: String| avatar.set(Some(url)))
    };
    let on_logout = {
        let session = props.session.clone();
        let config = props.config.clone();
        let on_signed_out = props.on_signed_out.clone();
        Callback::from(move |_| {
            if !dialog::confirm("로그아웃 하시겠습니까?") {
                return;
            }
            let session = session.clone();
            let config = config.clone();
            let on_signed_out = on_signed_out.clone();
            spawn_local(async move {
                if let Some(remote) = &config.remote {
                    if let Err(err) = auth::sign_out(remote, &session).await {
                        log::warn!("[auth] sign out: {}", err);
                    }
                }
                auth::clear_session();
                on_signed_out.emit(());
            });
        })
    };
    let on_year = {
        let state = state.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            if let Ok(year) = select.value().parse::<i32>() {
                state.dispatch(Action::SelectYear(year));
            }
        })
    };
    let navigate = |delta: i32| {
        let state = state.clone();
        Callback::from(move |_| state.dispatch(Action::NavigateMonth(delta)))
    };

    let years = selectable_years(state.transactions.all(), today().year());
    let year_select = html! {
        <select class="p-2 border rounded-lg text-sm" onchange={on_year}>
            { for years.iter().map(|y| html! {
                <option value={y.to_string()} selected={*y == state.year}>{ format!("{}년", y) }</option>
            }) }
        </select>
    };
    let add_button = html! {
        <button onclick={open_form} class="flex items-center gap-2 bg-[#4318FF] text-white px-4 py-2 rounded-xl font-bold text-sm hover:opacity-90 transition-all">
            { icon_plus() }
            {"거래 추가"}
        </button>
    };

    let content = if state.loading {
        html! {
            <div class="p-6 text-center text-muted-foreground">{"불러오는 중..."}</div>
        }
    } else {
        match state.view {
            View::Month => {
                let rollup = monthly_rollup(&state.categories, state.transactions.all(), state.year, state.month);
                page_shell(
                    None,
                    html! {
                        <div class="flex items-center gap-3">
                            <button class="p-2 rounded-lg hover:bg-secondary" onclick={navigate(-1)}>{ icon_chevron_left() }</button>
                            <span class="text-lg font-bold text-[#2B3674]">{ format!("{}년 {}월", state.year, state.month) }</span>
                            <button class="p-2 rounded-lg hover:bg-secondary" onclick={navigate(1)}>{ icon_chevron_right() }</button>
                            { year_select }
                            { add_button }
                        </div>
                    },
                    html! {
                        <>
                            <MonthSummary />
                            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                                { for Kind::DISPLAY_ORDER.iter().map(|k| html! { <CategorySection kind={*k} /> }) }
                            </div>
                            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                                <PieChart
                                    title="지출 구성"
                                    data={rollup.breakdown(&state.categories, Kind::Expense)}
                                    total={rollup.expense}
                                    currency_symbol={ledger.symbol().to_string()}
                                />
                                <RecentList on_edit={on_edit.clone()} />
                            </div>
                        </>
                    },
                )
            }
            View::Overview => {
                let yearly = yearly_rollup(&state.categories, state.transactions.all(), state.year);
                page_shell(
                    Some(format!("{}년 연간 요약", state.year)),
                    html! {
                        <div class="flex items-center gap-3">
                            { year_select }
                            { add_button }
                        </div>
                    },
                    html! {
                        <>
                            <YearSummary />
                            <BarChart year={state.year} series={monthly_series(state.transactions.all(), state.year)} />
                            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                                <PieChart
                                    title="연간 지출 구성"
                                    data={yearly.rollup.breakdown(&state.categories, Kind::Expense)}
                                    total={yearly.rollup.expense}
                                    currency_symbol={ledger.symbol().to_string()}
                                />
                                <PieChart
                                    title="연간 저축 구성"
                                    data={yearly.rollup.breakdown(&state.categories, Kind::Savings)}
                                    total={yearly.rollup.savings}
                                    currency_symbol={ledger.symbol().to_string()}
                                />
                            </div>
                            <RecentList on_edit={on_edit.clone()} />
                        </>
                    },
                )
            }
        }
    };

    html! {
        <ContextProvider<Ledger> context={ledger.clone()}>
            <Layout
                view={state.view}
                on_view={on_view}
                user={props.session.user.clone()}
                avatar={(*avatar).clone()}
                syncing={*syncing}
                on_sync={run_sync}
                on_profile={toggle_profile.clone()}
                on_logout={on_logout}
            >
                { content }
            </Layout>

            if let Some(category) = state.detail.clone() {
                <DetailModal {category} on_edit={on_edit.clone()} />
            }
            if let Some(target) = *form {
                <TransactionForm key={format!("{:?}", target)} {target} on_close={close_form} />
            }
            if *show_profile {
                <ProfileModal
                    session={props.session.clone()}
                    config={props.config.clone()}
                    avatar={(*avatar).clone()}
                    on_close={toggle_profile}
                    on_updated={props.on_session.clone()}
                    {on_avatar}
                />
            }
        </ContextProvider<Ledger>>
    }
}
