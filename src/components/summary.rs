use yew::prelude::*;

use super::icons::{icon_credit_card, icon_piggy, icon_trending_up, icon_wallet};
use super::Ledger;
use crate::aggregate::{monthly_rollup, yearly_rollup};
use crate::format::format_currency;
use crate::model::DEFAULT_INCOME_ID;
use crate::state::Action;

#[derive(Clone, Copy, PartialEq)]
pub enum StatIcon {
    TrendingUp,
    CreditCard,
    Piggy,
    Wallet,
}

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: &'static str,
    pub value: String,
    pub icon: StatIcon,
    #[prop_or_default]
    pub negative: bool,
    #[prop_or_default]
    pub onclick: Option<Callback<()>>,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    let clickable = props.onclick.is_some();
    let onclick = {
        let cb = props.onclick.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(cb) = &cb {
                cb.emit(());
            }
        })
    };
    let card_class = classes!(
        "bg-card", "p-6", "rounded-[10px]", "shadow-sm", "border", "border-border",
        "flex", "justify-between", "items-start",
        clickable.then_some("cursor-pointer hover:shadow-md transition-shadow"),
    );
    let value_class = if props.negative {
        "text-2xl font-bold text-red-500 tracking-tight"
    } else {
        "text-2xl font-bold text-[#2B3674] tracking-tight"
    };

    html! {
        <div class={card_class} {onclick}>
            <div>
                <p class="text-muted-foreground text-[11px] font-bold mb-1 tracking-widest">{ props.title }</p>
                <h3 class={value_class}>{ props.value.clone() }</h3>
            </div>
            <div class="p-3 bg-[#F4F7FE] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::TrendingUp => icon_trending_up(),
                        StatIcon::CreditCard => icon_credit_card(),
                        StatIcon::Piggy => icon_piggy(),
                        StatIcon::Wallet => icon_wallet(),
                    }
                }
            </div>
        </div>
    }
}

#[function_component(MonthSummary)]
pub fn month_summary() -> Html {
    let ledger = use_context::<Ledger>();
    let Some(ledger) = ledger else {
        return html! {};
    };
    let state = &*ledger.state;
    let rollup = monthly_rollup(&state.categories, state.transactions.all(), state.year, state.month);
    let symbol = ledger.symbol();

    let open_income = {
        let dispatcher = ledger.state.clone();
        Callback::from(move |_: ()| dispatcher.dispatch(Action::OpenDetail(DEFAULT_INCOME_ID.to_string())))
    };

    html! {
        <div class="grid grid-cols-1 md:grid-cols-4 gap-6">
            <StatCard title="수입" value={format_currency(rollup.income, symbol)} icon={StatIcon::TrendingUp} onclick={open_income} />
            <StatCard title="지출" value={format_currency(rollup.expense, symbol)} icon={StatIcon::CreditCard} />
            <StatCard title="저축" value={format_currency(rollup.savings, symbol)} icon={StatIcon::Piggy} />
            <StatCard title="잔액" value={format_currency(rollup.balance(), symbol)} icon={StatIcon::Wallet} negative={rollup.balance() < 0} />
        </div>
    }
}

#[function_component(YearSummary)]
pub fn year_summary() -> Html {
    let ledger = use_context::<Ledger>();
    let Some(ledger) = ledger else {
        return html! {};
    };
    let state = &*ledger.state;
    let yearly = yearly_rollup(&state.categories, state.transactions.all(), state.year);
    let symbol = ledger.symbol();

    html! {
        <div class="grid grid-cols-1 md:grid-cols-4 gap-6">
            <StatCard title="연간 수입" value={format_currency(yearly.rollup.income, symbol)} icon={StatIcon::TrendingUp} />
            <StatCard title="연간 지출" value={format_currency(yearly.rollup.expense, symbol)} icon={StatIcon::CreditCard} />
            <StatCard title="연간 저축" value={format_currency(yearly.rollup.savings, symbol)} icon={StatIcon::Piggy} />
            <StatCard title="저축률" value={format!("{}%", yearly.savings_rate)} icon={StatIcon::Wallet} />
        </div>
    }
}
