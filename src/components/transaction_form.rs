use yew::prelude::*;

use super::icons::{icon_close, icon_plus};
use super::{FormTarget, Ledger};
use crate::controller;
use crate::dialog;
use crate::model::{today, Kind, TransactionDraft};
use crate::state::parse_form;

#[derive(Properties, PartialEq)]
pub struct TransactionFormProps {
    pub target: FormTarget,
    pub on_close: Callback<()>,
}

fn blank_draft(ledger: &Ledger) -> TransactionDraft {
    let kind = Kind::Expense;
    TransactionDraft {
        date: today().format("%Y-%m-%d").to_string(),
        kind,
        category: ledger
            .state
            .categories
            .list(kind)
            .first()
            .map(|c| c.id.clone())
            .unwrap_or_default(),
        amount: 0,
        desc: String::new(),
    }
}

/// Add/edit modal. Editing pre-fills every field from the stored transaction.
#[function_component(TransactionForm)]
pub fn transaction_form(props: &TransactionFormProps) -> Html {
    let ledger = use_context::<Ledger>();
    let seed = ledger.as_ref().and_then(|ledger| match props.target {
        FormTarget::New => Some((blank_draft(ledger), String::new())),
        FormTarget::Edit(id) => ledger
            .state
            .transactions
            .get(id)
            .map(|tx| (tx.to_draft(), tx.amount.to_string())),
    });
    let kind = use_state(|| seed.as_ref().map(|(d, _)| d.kind).unwrap_or(Kind::Expense));
    let category = use_state(|| seed.as_ref().map(|(d, _)| d.category.clone()).unwrap_or_default());
    let date = use_state(|| seed.as_ref().map(|(d, _)| d.date.clone()).unwrap_or_default());
    let amount = use_state(|| seed.as_ref().map(|(_, a)| a.clone()).unwrap_or_default());
    let desc = use_state(|| seed.as_ref().map(|(d, _)| d.desc.clone()).unwrap_or_default());

    let Some(ledger) = ledger else {
        return html! {};
    };
    let categories = ledger.state.categories.list(*kind).to_vec();

    let close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    let on_kind = {
        let kind = kind.clone();
        let category = category.clone();
        let ledger = ledger.clone();
        move |next: Kind| {
            let kind = kind.clone();
            let category = category.clone();
            let ledger = ledger.clone();
            Callback::from(move |_| {
                kind.set(next);
                let first = ledger.state.categories.list(next).first().map(|c| c.id.clone());
                category.set(first.unwrap_or_default());
            })
        }
    };

    let on_category = {
        let category = category.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            category.set(select.value());
        })
    };

    let on_add_category = {
        let ledger = ledger.clone();
        let kind = *kind;
        Callback::from(move |_| {
            let Some(name) = dialog::prompt(&format!("새 {} 카테고리 이름을 입력하세요:", kind.label())) else {
                return;
            };
            if name.trim().is_empty() {
                return;
            }
            ledger.run("category", move |l| async move {
                controller::add_category(&l.backend, &l.user_id, &l.saved_categories, kind, &name).await
            });
        })
    };

    let on_submit = {
        let ledger = ledger.clone();
        let target = props.target;
        let on_close = props.on_close.clone();
        let (kind, category, date, amount, desc) =
            (kind.clone(), category.clone(), date.clone(), amount.clone(), desc.clone());
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = match parse_form(&date, *kind, &category, &amount, &desc) {
                Ok(draft) => draft,
                Err(err) => {
                    dialog::alert(&err.user_message());
                    return;
                }
            };
            let on_close = on_close.clone();
            let done = move || on_close.emit(());
            match target {
                FormTarget::New => ledger.run_then(
                    "tx",
                    move |l| async move {
                        controller::add_transaction(&l.backend, &l.user_id, &l.state.categories, &l.state.transactions, draft).await
                    },
                    done,
                ),
                FormTarget::Edit(id) => ledger.run_then(
                    "tx",
                    move |l| async move { controller::update_transaction(&l.backend, id, draft).await },
                    done,
                ),
            }
        })
    };

    let text_input = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            handle.set(input.value());
        })
    };

    if seed.is_none() {
        return html! {};
    }

    html! {
        <div class="fixed inset-0 bg-black/40 flex items-center justify-center z-50">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-6">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="text-lg font-bold text-foreground">
                        { if matches!(props.target, FormTarget::New) { "거래 추가" } else { "거래 수정" } }
                    </h3>
                    <button class="p-1 hover:bg-secondary rounded" onclick={close.clone()}>{ icon_close() }</button>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="flex gap-4">
                        { for Kind::DISPLAY_ORDER.iter().map(|k| html! {
                            <label class="flex items-center gap-1 text-sm">
                                <input type="radio" name="tx-kind" checked={*kind == *k} onclick={on_kind(*k)} />
                                { k.label() }
                            </label>
                        }) }
                    </div>

                    <div class="flex gap-2">
                        <select class="flex-1 p-2 border rounded" onchange={on_category}>
                            { for categories.iter().map(|c| html! {
                                <option value={c.id.clone()} selected={*category == c.id}>
                                    { format!("{} {}", c.icon, c.name) }
                                </option>
                            }) }
                        </select>
                        <button type="button" class="px-2 border rounded" onclick={on_add_category} title="카테고리 추가">{ icon_plus() }</button>
                    </div>

                    <input type="date" class="w-full p-2 border rounded" value={(*date).clone()} oninput={text_input(&date)} />
                    <input type="number" placeholder="금액" class="w-full p-2 border rounded" value={(*amount).clone()} oninput={text_input(&amount)} />
                    <input placeholder="내용 (선택)" class="w-full p-2 border rounded" value={(*desc).clone()} oninput={text_input(&desc)} />

                    <div class="flex justify-end gap-2">
                        <button type="button" class="px-4 py-2 rounded-lg border" onclick={close}>{"취소"}</button>
                        <button type="submit" class="px-4 py-2 rounded-lg bg-[#4318FF] text-white font-semibold">{"저장"}</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
