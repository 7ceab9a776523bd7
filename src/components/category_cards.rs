use yew::prelude::*;

use super::emoji_picker::EmojiPicker;
use super::icons::icon_plus;
use super::Ledger;
use crate::aggregate::monthly_rollup;
use crate::controller;
use crate::dialog;
use crate::format::format_currency;
use crate::model::{Category, Kind};
use crate::state::{move_before, Action};

#[derive(Properties, PartialEq)]
pub struct CategorySectionProps {
    pub kind: Kind,
}

/// One category list as draggable cards with this month's totals.
#[function_component(CategorySection)]
pub fn category_section(props: &CategorySectionProps) -> Html {
    let ledger = use_context::<Ledger>();
    let dragging = use_state(|| None::<String>);
    let preview = use_state(|| None::<Vec<String>>);
    let picker_for = use_state(|| None::<String>);

    let Some(ledger) = ledger else {
        return html! {};
    };
    let kind = props.kind;
    let state = &*ledger.state;
    let rollup = monthly_rollup(&state.categories, state.transactions.all(), state.year, state.month);
    let current_ids = state.categories.ids(kind);
    let order = (*preview).clone().unwrap_or_else(|| current_ids.clone());
    let cards: Vec<Category> = order
        .iter()
        .filter_map(|id| state.categories.list(kind).iter().find(|c| &c.id == id).cloned())
        .collect();

    let on_add = {
        let ledger = ledger.clone();
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

    let reset_drag = {
        let dragging = dragging.clone();
        let preview = preview.clone();
        move || {
            dragging.set(None);
            preview.set(None);
        }
    };

    let on_drop = {
        let ledger = ledger.clone();
        let dragging = dragging.clone();
        let preview = preview.clone();
        let current_ids = current_ids.clone();
        let reset_drag = reset_drag.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            if (*dragging).is_none() {
                return;
            }
            let next = (*preview).clone();
            reset_drag();
            let Some(next) = next.filter(|next| *next != current_ids) else {
                return;
            };
            log::debug!("[category] reorder {} -> {:?}", kind.as_str(), next);
            ledger.run("category", move |l| async move {
                controller::reorder_categories(&l.backend, &l.user_id, &l.saved_categories, kind, next).await
            });
        })
    };

    // Dragging past the last card moves the dragged one to the end.
    let on_list_dragover = {
        let dragging = dragging.clone();
        let preview = preview.clone();
        let current_ids = current_ids.clone();
        Callback::from(move |e: DragEvent| {
            let Some(dragged) = (*dragging).clone() else {
                return;
            };
            e.prevent_default();
            let base = (*preview).clone().unwrap_or_else(|| current_ids.clone());
            let next = move_before(&base, &dragged, None);
            if Some(&next) != (*preview).as_ref() {
                preview.set(Some(next));
            }
        })
    };

    let picker = match &*picker_for {
        Some(id) => {
            let id = id.clone();
            let on_pick = {
                let ledger = ledger.clone();
                let picker_for = picker_for.clone();
                Callback::from(move |icon: String| {
                    picker_for.set(None);
                    let id = id.clone();
                    ledger.run("category", move |l| async move {
                        controller::set_category_icon(&l.backend, &l.user_id, &l.saved_categories, &id, &icon).await
                    });
                })
            };
            let on_close = {
                let picker_for = picker_for.clone();
                Callback::from(move |_: ()| picker_for.set(None))
            };
            html! { <EmojiPicker {on_pick} {on_close} /> }
        }
        None => html! {},
    };

    html! {
        <div class="bg-card rounded-[10px] p-6 border border-border">
            <div class="flex items-center justify-between mb-4">
                <h3 class="font-bold text-foreground text-lg">{ format!("{} 카테고리", kind.label()) }</h3>
                <button onclick={on_add} class="flex items-center gap-1 text-sm font-semibold text-[#4318FF] hover:opacity-80">
                    { icon_plus() }
                    {"추가"}
                </button>
            </div>
            <div class="grid grid-cols-2 md:grid-cols-3 gap-3 min-h-[4rem]" ondragover={on_list_dragover} ondrop={on_drop.clone()}>
                { for cards.iter().map(|cat| {
                    let id = cat.id.clone();
                    let is_dragged = (*dragging).as_deref() == Some(id.as_str());

                    let on_open = {
                        let dispatcher = ledger.state.clone();
                        let id = id.clone();
                        Callback::from(move |_| dispatcher.dispatch(Action::OpenDetail(id.clone())))
                    };
                    let on_icon = {
                        let picker_for = picker_for.clone();
                        let id = id.clone();
                        Callback::from(move |e: MouseEvent| {
                            e.stop_propagation();
                            picker_for.set(Some(id.clone()));
                        })
                    };
                    let on_delete = {
                        let ledger = ledger.clone();
                        let id = id.clone();
                        let name = cat.name.clone();
                        Callback::from(move |e: MouseEvent| {
                            e.stop_propagation();
                            let question = format!(
                                "'{}' 카테고리를 삭제하시겠습니까?\n이 카테고리의 모든 거래 내역도 함께 삭제됩니다.",
                                name
                            );
                            if !dialog::confirm(&question) {
                                return;
                            }
                            let id = id.clone();
                            ledger.run("category", move |l| async move {
                                controller::delete_category(&l.backend, &l.user_id, &l.saved_categories, &id).await
                            });
                        })
                    };
                    let on_dragstart = {
                        let dragging = dragging.clone();
                        let id = id.clone();
                        Callback::from(move |e: DragEvent| {
                            if let Some(dt) = e.data_transfer() {
                                if let Err(err) = dt.set_data("text/plain", &id) {
                                    log::debug!("[category] drag data not set: {:?}", err);
                                }
                            }
                            dragging.set(Some(id.clone()));
                        })
                    };
                    let on_dragover = {
                        let dragging = dragging.clone();
                        let preview = preview.clone();
                        let current_ids = current_ids.clone();
                        let id = id.clone();
                        Callback::from(move |e: DragEvent| {
                            let Some(dragged) = (*dragging).clone() else {
                                return;
                            };
                            e.prevent_default();
                            e.stop_propagation();
                            let base = (*preview).clone().unwrap_or_else(|| current_ids.clone());
                            let next = move_before(&base, &dragged, Some(&id));
                            if Some(&next) != (*preview).as_ref() {
                                preview.set(Some(next));
                            }
                        })
                    };
                    let on_dragend = {
                        let reset_drag = reset_drag.clone();
                        Callback::from(move |_: DragEvent| reset_drag())
                    };
                    let card_class = if is_dragged {
                        "relative p-4 rounded-xl border-2 border-dashed border-[#4318FF] bg-[#F4F7FE] opacity-60 cursor-grabbing"
                    } else {
                        "relative p-4 rounded-xl border border-border bg-white hover:shadow-md transition-shadow cursor-pointer"
                    };

                    html! {
                        <div
                            key={id.clone()}
                            class={card_class}
                            draggable="true"
                            onclick={on_open}
                            ondragstart={on_dragstart}
                            ondragover={on_dragover}
                            ondrop={on_drop.clone()}
                            ondragend={on_dragend}
                        >
                            <button class="absolute top-1 right-2 text-xs text-muted-foreground hover:text-red-500" onclick={on_delete} title="삭제">{"✕"}</button>
                            <button class="text-2xl" onclick={on_icon} title="아이콘 변경">{ cat.icon.clone() }</button>
                            <p class="text-sm font-semibold text-foreground mt-1 truncate">{ cat.name.clone() }</p>
                            <p class="text-xs text-muted-foreground">{ format_currency(rollup.category_total(&cat.id), ledger.symbol()) }</p>
                        </div>
                    }
                }) }
            </div>
            { picker }
        </div>
    }
}
