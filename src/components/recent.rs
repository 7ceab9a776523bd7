use yew::prelude::*;

use super::Ledger;
use crate::aggregate::recent;
use crate::format::format_signed;
use crate::model::Kind;

const RECENT_COUNT: usize = 5;

#[derive(Properties, PartialEq)]
pub struct RecentListProps {
    pub on_edit: Callback<i64>,
}

/// Newest transactions across every month.
#[function_component(RecentList)]
pub fn recent_list(props: &RecentListProps) -> Html {
    let ledger = use_context::<Ledger>();
    let Some(ledger) = ledger else {
        return html! {};
    };
    let state = &*ledger.state;
    let items = recent(state.transactions.all(), RECENT_COUNT);

    html! {
        <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
            <div class="p-6 flex justify-between items-center border-b border-border">
                <h3 class="font-bold text-foreground text-lg">{"최근 거래"}</h3>
            </div>
            if items.is_empty() {
                <p class="px-6 py-6 text-center text-sm text-muted-foreground">{"거래 내역이 없습니다."}</p>
            } else {
                <ul class="divide-y divide-border">
                    { for items.iter().map(|tx| {
                        let id = tx.id;
                        let on_edit = {
                            let on_edit = props.on_edit.clone();
                            Callback::from(move |_| on_edit.emit(id))
                        };
                        let outflow = tx.kind == Kind::Expense;
                        let icon = state
                            .categories
                            .find(&tx.category)
                            .map(|(_, c)| c.icon.clone())
                            .unwrap_or_else(|| tx.kind.default_icon().to_string());
                        html! {
                            <li key={id.to_string()} class="px-6 py-3 flex items-center justify-between text-sm hover:bg-muted/30 cursor-pointer" onclick={on_edit}>
                                <div class="flex items-center gap-3">
                                    <span class="text-xl">{ icon }</span>
                                    <div>
                                        <p class="text-foreground font-medium">{ state.categories.display_name(&tx.category) }</p>
                                        <p class="text-xs text-muted-foreground">
                                            { if tx.desc.is_empty() { tx.date.clone() } else { format!("{} · {}", tx.date, tx.desc) } }
                                        </p>
                                    </div>
                                </div>
                                <span class={if outflow { "font-semibold text-red-500" } else { "font-semibold text-[#01B574]" }}>
                                    { format_signed(tx.amount, outflow, ledger.symbol()) }
                                </span>
                            </li>
                        }
                    }) }
                </ul>
            }
        </div>
    }
}
