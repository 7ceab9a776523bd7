use yew::prelude::*;

use super::icons::{icon_close, icon_pencil, icon_trash};
use super::Ledger;
use crate::aggregate::category_detail;
use crate::controller;
use crate::dialog;
use crate::format::format_currency;
use crate::model::{date_year_month, today, Kind};
use crate::state::{parse_form, Action};

#[derive(Properties, PartialEq)]
pub struct DetailModalProps {
    pub category: String,
    pub on_edit: Callback<i64>,
}

/// Transactions of one category in the cursor month, with a quick-add row.
#[function_component(DetailModal)]
pub fn detail_modal(props: &DetailModalProps) -> Html {
    let ledger = use_context::<Ledger>();
    let date = use_state(|| today().format("%Y-%m-%d").to_string());
    let amount = use_state(String::new);
    let desc = use_state(String::new);

    let Some(ledger) = ledger else {
        return html! {};
    };
    let state = &*ledger.state;
    let category = props.category.clone();
    let detail = category_detail(&state.categories, state.transactions.all(), &category, state.year, state.month);
    let (icon, name) = match state.categories.find(&category) {
        Some((_, cat)) => (cat.icon.clone(), cat.name.clone()),
        None => (detail.kind.default_icon().to_string(), state.categories.display_name(&category)),
    };
    let symbol = ledger.symbol().to_string();

    let on_close = {
        let dispatcher = ledger.state.clone();
        Callback::from(move |_| dispatcher.dispatch(Action::CloseDetail))
    };

    let on_quick_add = {
        let ledger = ledger.clone();
        let date = date.clone();
        let amount = amount.clone();
        let desc = desc.clone();
        let category = category.clone();
        let kind = detail.kind;
        let cursor = (state.year, state.month);
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = match parse_form(&date, kind, &category, &amount, &desc) {
                Ok(draft) => draft,
                Err(err) => {
                    dialog::alert(&err.user_message());
                    return;
                }
            };
            let filed_under = date_year_month(&draft.date).filter(|ym| *ym != cursor);
            let amount = amount.clone();
            let desc = desc.clone();
            log::debug!("[quick-add] {} {}", draft.category, draft.amount);
            ledger.run_then(
                "quick-add",
                move |l| async move {
                    controller::add_transaction(&l.backend, &l.user_id, &l.state.categories, &l.state.transactions, draft).await
                },
                move || {
                    amount.set(String::new());
                    desc.set(String::new());
                    if let Some((y, m)) = filed_under {
                        dialog::alert(&format!("{}년 {}월 내역으로 저장되었습니다.", y, m));
                    }
                },
            );
        })
    };

    let rows = detail.items.iter().map(|tx| {
        let id = tx.id;
        let on_edit = {
            let on_edit = props.on_edit.clone();
            Callback::from(move |_| on_edit.emit(id))
        };
        let on_delete = {
            let ledger = ledger.clone();
            Callback::from(move |_| {
                if !dialog::confirm("이 거래 내역을 삭제하시겠습니까?") {
                    return;
                }
                ledger.run("tx", move |l| async move { controller::delete_transaction(&l.backend, id).await });
            })
        };
        html! {
            <tr key={id.to_string()} class="text-sm hover:bg-muted/30 transition-colors">
                <td class="px-4 py-3 text-muted-foreground">{ tx.date.clone() }</td>
                <td class="px-4 py-3 text-foreground">{ if tx.desc.is_empty() { "-".to_string() } else { tx.desc.clone() } }</td>
                <td class="px-4 py-3 text-right font-semibold text-foreground">{ format_currency(tx.amount, &symbol) }</td>
                <td class="px-4 py-3 text-right">
                    <button class="p-1 text-muted-foreground hover:text-[#4318FF]" onclick={on_edit} title="수정">{ icon_pencil() }</button>
                    <button class="p-1 text-muted-foreground hover:text-red-500" onclick={on_delete} title="삭제">{ icon_trash() }</button>
                </td>
            </tr>
        }
    });

    let text_input = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
        })
    };
    let total_class = if detail.kind == Kind::Expense {
        "text-red-500 font-bold"
    } else {
        "text-[#2B3674] font-bold"
    };

    html! {
        <div class="fixed inset-0 bg-black/40 flex items-center justify-center z-40">
            <div class="w-full max-w-2xl bg-card rounded-2xl shadow-lg overflow-hidden">
                <div class="px-6 py-4 border-b border-border flex items-center justify-between">
                    <h3 class="text-lg font-bold text-foreground">
                        { format!("{} {} · {}년 {}월", icon, name, state.year, state.month) }
                    </h3>
                    <button class="p-1 hover:bg-secondary rounded" onclick={on_close}>{ icon_close() }</button>
                </div>

                <div class="max-h-80 overflow-y-auto">
                    <table class="w-full text-left border-collapse">
                        <thead>
                            <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest">
                                <th class="px-4 py-3 font-bold">{"날짜"}</th>
                                <th class="px-4 py-3 font-bold">{"내용"}</th>
                                <th class="px-4 py-3 font-bold text-right">{"금액"}</th>
                                <th class="px-4 py-3"></th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            if detail.items.is_empty() {
                                <tr><td colspan="4" class="px-4 py-6 text-center text-muted-foreground">{"이번 달 내역이 없습니다."}</td></tr>
                            } else {
                                { for rows }
                            }
                        </tbody>
                    </table>
                </div>

                <div class="px-6 py-3 border-t border-border flex items-center justify-between">
                    <span class="text-sm text-muted-foreground">{ detail.kind.total_label() }</span>
                    <span class={total_class}>{ format_currency(detail.total, &symbol) }</span>
                </div>

                <form class="px-6 py-4 bg-[#F4F7FE] grid grid-cols-1 md:grid-cols-4 gap-2" onsubmit={on_quick_add}>
                    <input type="date" class="p-2 border rounded" value={(*date).clone()} oninput={text_input(&date)} />
                    <input type="number" placeholder="금액" class="p-2 border rounded" value={(*amount).clone()} oninput={text_input(&amount)} />
                    <input placeholder="내용 (선택)" class="p-2 border rounded" value={(*desc).clone()} oninput={text_input(&desc)} />
                    <button type="submit" class="bg-[#4318FF] text-white rounded font-semibold">{"빠른 추가"}</button>
                </form>
            </div>
        </div>
    }
}
